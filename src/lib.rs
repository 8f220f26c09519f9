//! Directive-driven encryption interception for request-handling pipelines.
//!
//! `enc-intercept` wraps operation invocations to transparently decrypt
//! incoming string arguments and encrypt outgoing results. The crypto policy
//! lives in declarative per-operation [directives](directive) rather than in
//! the operation's own code: handlers receive cleartext and return plain
//! values, and the [`Interceptor`] does the rest.
//!
//! # Architecture
//!
//! - [`crypto`] — stateless AES and RSA engines over base64 text forms;
//! - [`directive`] — the policy model and the build-time [`DirectiveRegistry`];
//! - [`intercept`] — the per-invocation decrypt → invoke → encrypt pipeline;
//! - [`config`] — [`CipherConfig`], loaded once at startup and read-only after;
//! - [`error`] — the [`CryptoError`] / [`InterceptError`] taxonomy.
//!
//! Transport framing, routing and serialization internals are the host
//! application's concern; the only wire form this crate owns is "ciphertext
//! and keys are base64 strings".
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use enc_intercept::{crypto::aes, CipherConfig, DecryptDirective, DirectiveRegistry, Interceptor};
//!
//! let config = Arc::new(CipherConfig::default());
//! let registry = DirectiveRegistry::builder()
//!     .decrypt("user.register", DecryptDirective::default())
//!     .build();
//! let interceptor = Interceptor::new(config.clone(), registry);
//!
//! // The caller sends ciphertext; the operation sees cleartext.
//! let ciphertext = aes::encrypt("alice", config.aes.key.as_bytes(), &config.aes.algorithm)?;
//! let result = interceptor.invoke("user.register", vec![Value::String(ciphertext)], |args| {
//!     Ok(format!("registered {}", args[0].as_str().unwrap()))
//! })?;
//! assert_eq!(result, json!("registered alice"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod crypto;
pub mod directive;
pub mod error;
pub mod intercept;

pub use config::CipherConfig;
pub use crypto::KeyPair;
pub use directive::registry::{DirectiveRegistry, DirectiveSet};
pub use directive::{Algorithm, DecryptDirective, EncryptDirective, ParamSelector};
pub use error::{CryptoError, InterceptError};
pub use intercept::Interceptor;
