//! Stateless cryptographic engines.
//!
//! Each engine is a set of pure functions over `(data, key, algorithm spec)`
//! with no knowledge of directives or interception, and no shared mutable
//! state — concurrent calls need no locking. Ciphertext and key material
//! cross these boundaries only as base64 strings (standard alphabet, padded).
//!
//! Engine work is CPU-bound and runs on the calling thread; high-throughput
//! callers should dispatch invocations to a worker pool sized for CPU-bound
//! work rather than a single-threaded event loop.

pub mod aes;
pub mod rsa;

pub use rsa::KeyPair;
