//! The interception layer: decrypt-then-invoke-then-encrypt around an
//! operation, driven by the directives registered for it.
//!
//! Per-invocation state machine, terminal on first return or failure:
//!
//! 1. a decrypt directive, if present, resolves the targeted string
//!    arguments — each either decrypts or, under a fail-open directive,
//!    falls back to its original encrypted value;
//! 2. the wrapped operation runs exactly once with the resolved arguments;
//!    its own failure propagates unchanged;
//! 3. an encrypt directive, if present, serialises the non-null result and
//!    replaces it with ciphertext. Failure here is always fatal.
//!
//! With no directives registered the layer is a pass-through. The two crypto
//! phases never interleave: argument resolution completes before the
//! operation runs, and result encryption starts only after it returns.
//!
//! The interceptor holds no per-call state beyond locals, so concurrent
//! invocations across threads need no synchronisation.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::CipherConfig;
use crate::crypto::{aes, rsa};
use crate::directive::registry::DirectiveRegistry;
use crate::directive::{Algorithm, DecryptDirective, EncryptDirective, ParamSelector};
use crate::error::{CryptoError, InterceptError};

/// Outcome of one argument decryption attempt.
///
/// The fail-open path is modelled as data rather than a caught error so the
/// interceptor chooses the fallback value without error-based control flow.
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    /// Decryption succeeded; carries the cleartext.
    Decrypted(String),
    /// Decryption failed under a fail-open directive; carries the original,
    /// still-encrypted value.
    Fallback(String),
}

/// Applies directive-driven cryptographic transformation around operation
/// invocations.
///
/// Cheap to clone and safe to share across threads: the configuration is
/// behind an `Arc` and the registry is immutable after build.
#[derive(Debug, Clone)]
pub struct Interceptor {
    config: Arc<CipherConfig>,
    registry: Arc<DirectiveRegistry>,
}

impl Interceptor {
    /// Create an interceptor over a frozen registry and loaded configuration.
    pub fn new(config: Arc<CipherConfig>, registry: DirectiveRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
        }
    }

    /// Invoke `operation` through the interception pipeline.
    ///
    /// `args` are the operation's positional arguments; only string-typed
    /// values are ever candidates for decryption. `f` is the wrapped
    /// operation itself and runs exactly once per call. Its serialised
    /// result is returned as-is, or as a ciphertext string when an encrypt
    /// directive is registered and the result is non-null.
    ///
    /// # Errors
    ///
    /// - [`InterceptError::Decrypt`] when argument decryption fails under a
    ///   `throw_on_failure` directive — the operation does not run;
    /// - [`InterceptError::Operation`] when the operation fails — passed
    ///   through unchanged;
    /// - [`InterceptError::Serialize`] / [`InterceptError::Encrypt`] when the
    ///   result cannot be serialised or encrypted — always fatal.
    pub fn invoke<F, R>(
        &self,
        operation: &str,
        mut args: Vec<Value>,
        f: F,
    ) -> Result<Value, InterceptError>
    where
        F: FnOnce(&[Value]) -> anyhow::Result<R>,
        R: Serialize,
    {
        let directives = self.registry.get(operation);
        let decrypt_directive = directives.and_then(|d| d.decrypt.as_ref());
        let encrypt_directive = directives.and_then(|d| d.encrypt.as_ref());

        if let Some(directive) = decrypt_directive {
            if self.config.debug_mode {
                debug!(operation, args = args.len(), "resolving encrypted arguments");
            }
            self.resolve_args(operation, &mut args, directive)?;
        }

        // Exactly one invocation of the wrapped operation per call.
        let result = f(&args).map_err(InterceptError::Operation)?;
        let value = serde_json::to_value(result)?;

        match encrypt_directive {
            Some(directive) if !value.is_null() => self
                .encrypt_result(operation, &value, directive)
                .map(Value::String),
            Some(_) => {
                debug!(operation, "operation returned null, skipping encryption");
                Ok(value)
            }
            None => Ok(value),
        }
    }

    fn resolve_args(
        &self,
        operation: &str,
        args: &mut [Value],
        directive: &DecryptDirective,
    ) -> Result<(), InterceptError> {
        match directive.parameter {
            ParamSelector::AllStrings => {
                for arg in args.iter_mut() {
                    self.resolve_one(operation, arg, directive)?;
                }
            }
            ParamSelector::Position(n) => {
                if let Some(arg) = args.get_mut(n) {
                    self.resolve_one(operation, arg, directive)?;
                }
            }
        }
        Ok(())
    }

    fn resolve_one(
        &self,
        operation: &str,
        arg: &mut Value,
        directive: &DecryptDirective,
    ) -> Result<(), InterceptError> {
        // Non-string arguments are never candidates for decryption.
        let Value::String(ciphertext) = arg else {
            return Ok(());
        };

        match self.resolve_argument(ciphertext, directive) {
            Ok(Resolved::Decrypted(cleartext)) => {
                *arg = Value::String(cleartext);
                Ok(())
            }
            Ok(Resolved::Fallback(original)) => {
                *arg = Value::String(original);
                Ok(())
            }
            Err(e) => {
                error!(operation, error = %e, "failed to decrypt operation argument");
                Err(InterceptError::Decrypt(e))
            }
        }
    }

    /// Decrypt a single argument, honouring the directive's tolerance policy.
    fn resolve_argument(
        &self,
        ciphertext: &str,
        directive: &DecryptDirective,
    ) -> Result<Resolved, CryptoError> {
        match self.decrypt_value(ciphertext, directive.algorithm) {
            Ok(cleartext) => Ok(Resolved::Decrypted(cleartext)),
            Err(e) if !directive.throw_on_failure => {
                warn!(error = %e, "argument decryption failed; continuing with original value");
                Ok(Resolved::Fallback(ciphertext.to_owned()))
            }
            Err(e) => Err(e),
        }
    }

    fn decrypt_value(&self, ciphertext: &str, algorithm: Algorithm) -> Result<String, CryptoError> {
        match algorithm {
            Algorithm::Aes => aes::decrypt(
                ciphertext,
                self.config.aes.key.as_bytes(),
                &self.config.aes.algorithm,
            ),
            Algorithm::Rsa => self
                .rsa_key(self.config.rsa.private_key.as_deref(), "private")
                .and_then(|key| rsa::decrypt_with_private_key(ciphertext, key)),
        }
    }

    fn encrypt_result(
        &self,
        operation: &str,
        value: &Value,
        directive: &EncryptDirective,
    ) -> Result<String, InterceptError> {
        let text = serde_json::to_string(value)?;
        if self.config.debug_mode {
            debug!(operation, len = text.len(), "encrypting serialised response");
        }

        let encrypted = match directive.algorithm {
            Algorithm::Aes => aes::encrypt(
                &text,
                self.config.aes.key.as_bytes(),
                &self.config.aes.algorithm,
            ),
            Algorithm::Rsa => self
                .rsa_key(self.config.rsa.public_key.as_deref(), "public")
                .and_then(|key| rsa::encrypt_with_public_key(&text, key)),
        };

        encrypted.map_err(|e| {
            error!(operation, error = %e, "failed to encrypt operation response");
            InterceptError::Encrypt(e)
        })
    }

    fn rsa_key<'a>(&self, key: Option<&'a str>, which: &str) -> Result<&'a str, CryptoError> {
        key.ok_or_else(|| CryptoError::cipher(format!("RSA {which} key is not configured")))
    }
}
