//! Declarative directives that parameterise the interception layer.
//!
//! A directive is metadata attached to an operation at registration time:
//! it says whether the operation's arguments arrive encrypted, whether the
//! result must leave encrypted, with which algorithm, and how decryption
//! failures are handled. The operation's own logic never sees any of this.
//!
//! Directives are plain immutable values; once a [`registry::DirectiveRegistry`]
//! is built they cannot change for the life of the process.

pub mod registry;

use std::collections::HashSet;

/// Cryptographic algorithm a directive applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Symmetric block cipher; key and mode come from the AES config section.
    Aes,
    /// Asymmetric cipher; key material comes from the RSA config section.
    Rsa,
}

/// Which positional arguments a [`DecryptDirective`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSelector {
    /// Every string-typed argument of the call.
    AllStrings,
    /// A single positional argument — only if it is present and string-typed.
    Position(usize),
}

/// Marks an operation whose incoming arguments carry ciphertext that must be
/// decrypted before the operation runs.
#[derive(Debug, Clone)]
pub struct DecryptDirective {
    /// `true`: any decryption failure aborts the call before the operation
    /// runs. `false` (fail-open): the failure is logged and the original,
    /// still-encrypted value is passed through instead.
    pub throw_on_failure: bool,
    /// Algorithm used to decrypt the targeted arguments.
    pub algorithm: Algorithm,
    /// Which arguments to decrypt.
    pub parameter: ParamSelector,
}

impl Default for DecryptDirective {
    fn default() -> Self {
        Self {
            throw_on_failure: true,
            algorithm: Algorithm::Aes,
            parameter: ParamSelector::Position(0),
        }
    }
}

/// Marks an operation whose result must be serialised and encrypted before
/// it is returned to the caller.
#[derive(Debug, Clone)]
pub struct EncryptDirective {
    /// Field names to leave out of encryption. Carried for configuration
    /// compatibility but never consulted: the response is always encrypted
    /// as a whole serialised value.
    pub exclude_fields: HashSet<String>,
    /// Algorithm used to encrypt the serialised result.
    pub algorithm: Algorithm,
    /// Declared intent to encrypt the whole response rather than individual
    /// fields. Like `exclude_fields`, carried but not consulted — whole-value
    /// encryption is the only implemented behaviour.
    pub encrypt_entire_response: bool,
}

impl Default for EncryptDirective {
    fn default() -> Self {
        Self {
            exclude_fields: HashSet::new(),
            algorithm: Algorithm::Aes,
            encrypt_entire_response: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_defaults_match_declared_policy() {
        let d = DecryptDirective::default();
        assert!(d.throw_on_failure);
        assert_eq!(d.algorithm, Algorithm::Aes);
        assert_eq!(d.parameter, ParamSelector::Position(0));
    }

    #[test]
    fn encrypt_defaults_match_declared_policy() {
        let e = EncryptDirective::default();
        assert!(e.exclude_fields.is_empty());
        assert_eq!(e.algorithm, Algorithm::Aes);
        assert!(e.encrypt_entire_response);
    }
}
