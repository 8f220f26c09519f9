//! AES engine: ECB or CBC block mode with PKCS#7 padding.
//!
//! The algorithm spec string (e.g. `"AES/ECB/PKCS5Padding"`) is an opaque
//! configuration value parsed per call; deployments may vary it, so no single
//! mode is hardcoded. PKCS#5 padding over a 16-byte block *is* PKCS#7, so the
//! `PKCS7Padding` spelling is accepted as a synonym.
//!
//! ECB is deterministic and unauthenticated: the same key and plaintext
//! always produce the same ciphertext, and tampering is not detected. That
//! determinism is load-bearing for existing ciphertext, but it sits outside
//! the guarantees of modern AEAD modes — do not reach for this module as a
//! general-purpose cipher.
//!
//! CBC output is self-contained: a fresh random IV is generated per call and
//! prepended to the ciphertext, so decryption needs only the key.
//!
//! All functions are pure over `(data, key, spec)`; there is no shared state.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;

/// AES block size in bytes; also the length of a CBC IV.
pub const BLOCK_LEN: usize = 16;

/// Block cipher mode selected by the algorithm spec string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ecb,
    Cbc,
}

fn parse_spec(spec: &str) -> Result<Mode, CryptoError> {
    match spec {
        "AES/ECB/PKCS5Padding" | "AES/ECB/PKCS7Padding" => Ok(Mode::Ecb),
        "AES/CBC/PKCS5Padding" | "AES/CBC/PKCS7Padding" => Ok(Mode::Cbc),
        other => Err(CryptoError::cipher(format!(
            "unsupported AES algorithm spec: {other}"
        ))),
    }
}

/// Returns `true` iff `key` has a valid AES key length (16, 24 or 32 bytes).
pub fn is_valid_key(key: &[u8]) -> bool {
    matches!(key.len(), 16 | 24 | 32)
}

/// Encrypt `plaintext` with AES under the mode named by `algorithm`.
///
/// Returns the ciphertext as a base64 string (standard alphabet, padded).
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if `plaintext` is empty, and
/// [`CryptoError::CipherFailure`] if the key length is unsupported or the
/// algorithm spec is unknown.
pub fn encrypt(plaintext: &str, key: &[u8], algorithm: &str) -> Result<String, CryptoError> {
    if plaintext.is_empty() {
        return Err(CryptoError::invalid_input("data to encrypt cannot be empty"));
    }
    let mode = parse_spec(algorithm)?;
    check_key(key)?;

    let ciphertext = match mode {
        Mode::Ecb => encrypt_ecb(plaintext.as_bytes(), key)?,
        Mode::Cbc => encrypt_cbc(plaintext.as_bytes(), key)?,
    };
    Ok(BASE64.encode(ciphertext))
}

/// Decrypt a base64 ciphertext produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if the input is empty, and
/// [`CryptoError::CipherFailure`] on a base64 decode error, padding mismatch
/// (wrong key or corrupt data), unsupported key length or algorithm spec, or
/// non-UTF-8 plaintext.
pub fn decrypt(ciphertext_b64: &str, key: &[u8], algorithm: &str) -> Result<String, CryptoError> {
    if ciphertext_b64.is_empty() {
        return Err(CryptoError::invalid_input(
            "encrypted data cannot be empty",
        ));
    }
    let mode = parse_spec(algorithm)?;
    check_key(key)?;

    let ciphertext = BASE64
        .decode(ciphertext_b64)
        .map_err(|e| CryptoError::cipher_with("ciphertext is not valid base64", e))?;

    let plaintext = match mode {
        Mode::Ecb => decrypt_ecb(&ciphertext, key)?,
        Mode::Cbc => decrypt_cbc(&ciphertext, key)?,
    };
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::cipher_with("decrypted data is not valid UTF-8", e))
}

/// Generate a cryptographically random AES key of `key_size_bits` bits.
///
/// Returns the raw key bytes base64 encoded.
///
/// # Errors
///
/// Returns [`CryptoError::CipherFailure`] unless `key_size_bits` is 128, 192
/// or 256.
pub fn generate_random_key(key_size_bits: usize) -> Result<String, CryptoError> {
    let len = match key_size_bits {
        128 => 16,
        192 => 24,
        256 => 32,
        other => {
            return Err(CryptoError::cipher(format!(
                "unsupported AES key size: {other} bits"
            )))
        }
    };
    let mut key = vec![0u8; len];
    OsRng.fill_bytes(&mut key);
    Ok(BASE64.encode(&key))
}

fn check_key(key: &[u8]) -> Result<(), CryptoError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(CryptoError::cipher(format!(
            "unsupported AES key length: {} bytes (expected 16, 24 or 32)",
            key.len()
        )))
    }
}

fn encrypt_ecb(data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let init = || CryptoError::cipher("AES cipher initialisation failed");
    Ok(match key.len() {
        16 => ecb::Encryptor::<Aes128>::new_from_slice(key)
            .map_err(|_| init())?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        24 => ecb::Encryptor::<Aes192>::new_from_slice(key)
            .map_err(|_| init())?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        _ => ecb::Encryptor::<Aes256>::new_from_slice(key)
            .map_err(|_| init())?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
    })
}

fn decrypt_ecb(data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let init = || CryptoError::cipher("AES cipher initialisation failed");
    let unpad =
        |_| CryptoError::cipher("AES decryption failed: padding mismatch (wrong key or corrupt data)");
    match key.len() {
        16 => ecb::Decryptor::<Aes128>::new_from_slice(key)
            .map_err(|_| init())?
            .decrypt_padded_vec_mut::<Pkcs7>(data)
            .map_err(unpad),
        24 => ecb::Decryptor::<Aes192>::new_from_slice(key)
            .map_err(|_| init())?
            .decrypt_padded_vec_mut::<Pkcs7>(data)
            .map_err(unpad),
        _ => ecb::Decryptor::<Aes256>::new_from_slice(key)
            .map_err(|_| init())?
            .decrypt_padded_vec_mut::<Pkcs7>(data)
            .map_err(unpad),
    }
}

fn encrypt_cbc(data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let init = || CryptoError::cipher("AES cipher initialisation failed");
    let mut iv = [0u8; BLOCK_LEN];
    OsRng.fill_bytes(&mut iv);

    let ct = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, &iv)
            .map_err(|_| init())?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, &iv)
            .map_err(|_| init())?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        _ => cbc::Encryptor::<Aes256>::new_from_slices(key, &iv)
            .map_err(|_| init())?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
    };

    let mut out = Vec::with_capacity(BLOCK_LEN + ct.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ct);
    Ok(out)
}

fn decrypt_cbc(data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if data.len() < BLOCK_LEN {
        return Err(CryptoError::cipher(
            "CBC ciphertext is shorter than one IV block",
        ));
    }
    let (iv, ct) = data.split_at(BLOCK_LEN);

    let init = || CryptoError::cipher("AES cipher initialisation failed");
    let unpad =
        |_| CryptoError::cipher("AES decryption failed: padding mismatch (wrong key or corrupt data)");
    match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| init())?
            .decrypt_padded_vec_mut::<Pkcs7>(ct)
            .map_err(unpad),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| init())?
            .decrypt_padded_vec_mut::<Pkcs7>(ct)
            .map_err(unpad),
        _ => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| init())?
            .decrypt_padded_vec_mut::<Pkcs7>(ct)
            .map_err(unpad),
    }
}
