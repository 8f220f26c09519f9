//! Error taxonomy for the encryption core.

use thiserror::Error;

/// Failure raised by the crypto engines.
///
/// Distinguishes caller mistakes ([`CryptoError::InvalidInput`]) from
/// failures of the cryptographic operation itself
/// ([`CryptoError::CipherFailure`]). Neither is retried: a deterministic
/// cryptographic mismatch does not change on a second attempt.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Empty data or key argument supplied to an engine call. The caller
    /// must fix the input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The underlying cryptographic operation failed: bad key length,
    /// padding mismatch, corrupt base64, unsupported algorithm spec, or
    /// oversized RSA plaintext.
    #[error("cipher failure: {message}")]
    CipherFailure {
        /// Human-readable description of what failed.
        message: String,
        /// The wrapped cause, when the failure originated in a lower layer.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CryptoError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        CryptoError::InvalidInput(message.into())
    }

    pub(crate) fn cipher(message: impl Into<String>) -> Self {
        CryptoError::CipherFailure {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn cipher_with(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CryptoError::CipherFailure {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Fatal failure surfaced to the caller by the interception layer.
///
/// Decrypt-side engine failures only reach this type when the directive has
/// `throw_on_failure = true`; encrypt-side failures always do.
#[derive(Debug, Error)]
pub enum InterceptError {
    /// Decrypting an operation argument failed and the directive demanded
    /// propagation.
    #[error("failed to decrypt operation arguments")]
    Decrypt(#[source] CryptoError),

    /// Encrypting the operation result failed.
    #[error("failed to encrypt operation response")]
    Encrypt(#[source] CryptoError),

    /// The operation result could not be serialised before encryption.
    #[error("failed to serialise operation response")]
    Serialize(#[from] serde_json::Error),

    /// The wrapped operation itself failed; passed through unchanged.
    #[error(transparent)]
    Operation(anyhow::Error),
}
