//! Build-time registry attaching directives to operation identifiers.
//!
//! Directive attachment is explicit rather than discovered by reflection:
//! operations register their directives through a builder at startup, the
//! registry is frozen by [`DirectiveRegistryBuilder::build`], and the
//! interceptor consults it on every call. Lookups are plain map reads — no
//! locking, safe to share across threads.

use std::collections::HashMap;

use super::{DecryptDirective, EncryptDirective};

/// The directives attached to a single operation.
#[derive(Debug, Clone, Default)]
pub struct DirectiveSet {
    /// Decrypt incoming arguments before the operation runs.
    pub decrypt: Option<DecryptDirective>,
    /// Encrypt the serialised result after the operation returns.
    pub encrypt: Option<EncryptDirective>,
}

/// Immutable map from operation identifier to its [`DirectiveSet`].
///
/// There is no post-build mutation API: an operation's directives are fixed
/// for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
    entries: HashMap<String, DirectiveSet>,
}

impl DirectiveRegistry {
    /// Start building a registry.
    pub fn builder() -> DirectiveRegistryBuilder {
        DirectiveRegistryBuilder::default()
    }

    /// Look up the directives registered for `operation`.
    ///
    /// Returns `None` for operations with no directives — the interceptor
    /// treats those as pass-through.
    pub fn get(&self, operation: &str) -> Option<&DirectiveSet> {
        self.entries.get(operation)
    }

    /// Number of operations with at least one directive attached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no operation has directives attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`DirectiveRegistry`].
#[derive(Debug, Default)]
pub struct DirectiveRegistryBuilder {
    entries: HashMap<String, DirectiveSet>,
}

impl DirectiveRegistryBuilder {
    /// Attach a [`DecryptDirective`] to `operation`.
    ///
    /// Attaching a second decrypt directive to the same operation replaces
    /// the first — an operation carries at most one of each kind.
    pub fn decrypt(mut self, operation: impl Into<String>, directive: DecryptDirective) -> Self {
        self.entries.entry(operation.into()).or_default().decrypt = Some(directive);
        self
    }

    /// Attach an [`EncryptDirective`] to `operation`.
    pub fn encrypt(mut self, operation: impl Into<String>, directive: EncryptDirective) -> Self {
        self.entries.entry(operation.into()).or_default().encrypt = Some(directive);
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> DirectiveRegistry {
        DirectiveRegistry {
            entries: self.entries,
        }
    }
}
