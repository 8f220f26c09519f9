//! RSA engine: PKCS#1 v1.5 asymmetric transforms over base64-encoded keys.
//!
//! Key material crosses this boundary only as base64 text of standard DER
//! encodings — X.509 SubjectPublicKeyInfo for public keys, PKCS#8 for private
//! keys. Decoded key objects never leave the module.
//!
//! Two operation pairs:
//!
//! - confidentiality: [`encrypt_with_public_key`] / [`decrypt_with_private_key`],
//!   standard PKCS#1 v1.5 encryption (block type 2);
//! - possession proof: [`encrypt_with_private_key`] / [`decrypt_with_public_key`],
//!   the raw modular transform over block-type-1 padded data. This is not a
//!   digest-based signature scheme — it only demonstrates that the producer
//!   held the private key.
//!
//! Plaintext longer than `modulus_len - 11` bytes is rejected; chunking is
//! the caller's concern.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rsa::hazmat::{rsa_decrypt, rsa_encrypt};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Overhead of PKCS#1 v1.5 padding: 2 marker bytes, >= 8 padding bytes and
/// a separator. The largest message for a k-byte modulus is `k - 11` bytes.
const PKCS1_OVERHEAD: usize = 11;

/// A freshly generated RSA key pair.
///
/// `public_key` is base64 X.509 SubjectPublicKeyInfo DER; `private_key` is
/// base64 PKCS#8 DER. The pair is produced on demand and never persisted by
/// this crate.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyPair {
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print private key material, not even in debug builds.
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

fn check_spec(algorithm: &str) -> Result<(), CryptoError> {
    match algorithm {
        "RSA" | "RSA/ECB/PKCS1Padding" => Ok(()),
        other => Err(CryptoError::cipher(format!(
            "unsupported RSA algorithm spec: {other}"
        ))),
    }
}

/// Generate an RSA key pair of `key_size_bits` bits.
///
/// # Errors
///
/// Returns [`CryptoError::CipherFailure`] if `algorithm` is not an RSA spec
/// or the underlying provider rejects the key size.
pub fn generate_key_pair(key_size_bits: usize, algorithm: &str) -> Result<KeyPair, CryptoError> {
    check_spec(algorithm)?;

    let private = RsaPrivateKey::new(&mut OsRng, key_size_bits).map_err(|e| {
        CryptoError::cipher_with(
            format!("RSA key generation failed for {key_size_bits}-bit key"),
            e,
        )
    })?;
    let public = private.to_public_key();

    let private_der = private
        .to_pkcs8_der()
        .map_err(|e| CryptoError::cipher(format!("PKCS#8 encoding of private key failed: {e}")))?;
    let public_der = public
        .to_public_key_der()
        .map_err(|e| CryptoError::cipher(format!("X.509 encoding of public key failed: {e}")))?;

    Ok(KeyPair {
        public_key: BASE64.encode(public_der.as_bytes()),
        private_key: BASE64.encode(private_der.as_bytes()),
    })
}

/// Encrypt `plaintext` under an X.509 public key — the confidentiality pair's
/// sending half. Returns base64 ciphertext.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] when `plaintext` or the key is
/// empty, and [`CryptoError::CipherFailure`] on key decode failure or when
/// the plaintext exceeds the modulus-derived block size.
pub fn encrypt_with_public_key(
    plaintext: &str,
    public_key_b64: &str,
) -> Result<String, CryptoError> {
    ensure_non_empty(plaintext, "data to encrypt")?;
    ensure_non_empty(public_key_b64, "public key")?;

    let key = decode_public_key(public_key_b64)?;
    let ciphertext = key
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext.as_bytes())
        .map_err(|e| CryptoError::cipher_with("RSA public-key encryption failed", e))?;
    Ok(BASE64.encode(ciphertext))
}

/// Decrypt ciphertext produced by [`encrypt_with_public_key`] with the
/// matching PKCS#8 private key.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] when the data or key is empty, and
/// [`CryptoError::CipherFailure`] on base64/DER decode failure or a padding
/// mismatch (wrong key or corrupt ciphertext).
pub fn decrypt_with_private_key(
    ciphertext_b64: &str,
    private_key_b64: &str,
) -> Result<String, CryptoError> {
    ensure_non_empty(ciphertext_b64, "encrypted data")?;
    ensure_non_empty(private_key_b64, "private key")?;

    let key = decode_private_key(private_key_b64)?;
    let ciphertext = decode_ciphertext(ciphertext_b64)?;
    let plaintext = key
        .decrypt(Pkcs1v15Encrypt, &ciphertext)
        .map_err(|e| CryptoError::cipher_with("RSA private-key decryption failed", e))?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::cipher_with("decrypted data is not valid UTF-8", e))
}

/// Encrypt `plaintext` under the private key — the possession-proof pair's
/// producing half. Returns base64 ciphertext.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] when the data or key is empty, and
/// [`CryptoError::CipherFailure`] on key decode failure, oversized plaintext,
/// or a failed modular transform.
pub fn encrypt_with_private_key(
    plaintext: &str,
    private_key_b64: &str,
) -> Result<String, CryptoError> {
    ensure_non_empty(plaintext, "data to encrypt")?;
    ensure_non_empty(private_key_b64, "private key")?;

    let key = decode_private_key(private_key_b64)?;
    let k = key.size();
    let padded = pad_type1(plaintext.as_bytes(), k)?;

    let m = BigUint::from_bytes_be(&padded);
    let c = rsa_decrypt(Some(&mut OsRng), &key, &m)
        .map_err(|e| CryptoError::cipher_with("RSA private-key transform failed", e))?;
    Ok(BASE64.encode(left_pad(&c.to_bytes_be(), k)?))
}

/// Decrypt ciphertext produced by [`encrypt_with_private_key`] with the
/// matching public key, verifying the block-type-1 padding.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] when the data or key is empty, and
/// [`CryptoError::CipherFailure`] on decode failure, a failed transform, or
/// padding that does not match a private-key encryption (wrong key).
pub fn decrypt_with_public_key(
    ciphertext_b64: &str,
    public_key_b64: &str,
) -> Result<String, CryptoError> {
    ensure_non_empty(ciphertext_b64, "encrypted data")?;
    ensure_non_empty(public_key_b64, "public key")?;

    let key = decode_public_key(public_key_b64)?;
    let ciphertext = decode_ciphertext(ciphertext_b64)?;

    let c = BigUint::from_bytes_be(&ciphertext);
    let m = rsa_encrypt(&key, &c)
        .map_err(|e| CryptoError::cipher_with("RSA public-key transform failed", e))?;
    let padded = left_pad(&m.to_bytes_be(), key.size())?;
    let plaintext = unpad_type1(&padded)?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::cipher_with("decrypted data is not valid UTF-8", e))
}

fn ensure_non_empty(value: &str, what: &str) -> Result<(), CryptoError> {
    if value.is_empty() {
        Err(CryptoError::invalid_input(format!("{what} cannot be empty")))
    } else {
        Ok(())
    }
}

fn decode_public_key(public_key_b64: &str) -> Result<RsaPublicKey, CryptoError> {
    let der = BASE64
        .decode(public_key_b64)
        .map_err(|e| CryptoError::cipher_with("public key is not valid base64", e))?;
    RsaPublicKey::from_public_key_der(&der).map_err(|e| {
        CryptoError::cipher(format!(
            "public key is not valid X.509 SubjectPublicKeyInfo: {e}"
        ))
    })
}

fn decode_private_key(private_key_b64: &str) -> Result<RsaPrivateKey, CryptoError> {
    let der = BASE64
        .decode(private_key_b64)
        .map_err(|e| CryptoError::cipher_with("private key is not valid base64", e))?;
    RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CryptoError::cipher(format!("private key is not valid PKCS#8: {e}")))
}

fn decode_ciphertext(ciphertext_b64: &str) -> Result<Vec<u8>, CryptoError> {
    BASE64
        .decode(ciphertext_b64)
        .map_err(|e| CryptoError::cipher_with("ciphertext is not valid base64", e))
}

/// PKCS#1 v1.5 block type 1: `00 01 FF..FF 00 || msg`, `k` bytes total.
fn pad_type1(msg: &[u8], k: usize) -> Result<Vec<u8>, CryptoError> {
    if msg.len() + PKCS1_OVERHEAD > k {
        return Err(CryptoError::cipher(format!(
            "data too long for {k}-byte RSA modulus: {} bytes (max {})",
            msg.len(),
            k - PKCS1_OVERHEAD
        )));
    }
    let mut block = vec![0xFFu8; k];
    block[0] = 0x00;
    block[1] = 0x01;
    let sep = k - msg.len() - 1;
    block[sep] = 0x00;
    block[sep + 1..].copy_from_slice(msg);
    Ok(block)
}

/// Strip and verify block type 1 padding from a full-width block.
fn unpad_type1(block: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let bad = || CryptoError::cipher("RSA block has invalid type-1 padding (wrong key?)");

    if block.len() < PKCS1_OVERHEAD || block[0] != 0x00 || block[1] != 0x01 {
        return Err(bad());
    }
    let sep = block[2..]
        .iter()
        .position(|&b| b == 0x00)
        .map(|i| i + 2)
        .ok_or_else(bad)?;
    // At least 8 bytes of 0xFF padding before the separator.
    if sep < 10 || block[2..sep].iter().any(|&b| b != 0xFF) {
        return Err(bad());
    }
    Ok(block[sep + 1..].to_vec())
}

/// Left-pad a big-endian integer encoding with zeroes to width `k`.
fn left_pad(bytes: &[u8], k: usize) -> Result<Vec<u8>, CryptoError> {
    if bytes.len() > k {
        return Err(CryptoError::cipher(
            "RSA transform produced a value wider than the modulus",
        ));
    }
    let mut out = vec![0u8; k];
    out[k - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "RSA";

    fn test_pair() -> KeyPair {
        // 512-bit keys keep test key generation fast; the transforms are
        // size-independent.
        generate_key_pair(512, SPEC).unwrap()
    }

    #[test]
    fn confidentiality_round_trip() {
        let pair = test_pair();
        let ct = encrypt_with_public_key("sensitive payload", &pair.public_key).unwrap();
        let pt = decrypt_with_private_key(&ct, &pair.private_key).unwrap();
        assert_eq!(pt, "sensitive payload");
    }

    #[test]
    fn possession_proof_round_trip() {
        let pair = test_pair();
        let ct = encrypt_with_private_key("signed by me", &pair.private_key).unwrap();
        let pt = decrypt_with_public_key(&ct, &pair.public_key).unwrap();
        assert_eq!(pt, "signed by me");
    }

    #[test]
    fn public_encryption_is_randomised() {
        let pair = test_pair();
        let a = encrypt_with_public_key("same input", &pair.public_key).unwrap();
        let b = encrypt_with_public_key("same input", &pair.public_key).unwrap();
        assert_ne!(a, b, "PKCS#1 v1.5 type-2 padding is randomised");
    }

    #[test]
    fn wrong_key_pair_fails() {
        let pair = test_pair();
        let other = test_pair();
        let ct = encrypt_with_public_key("secret", &pair.public_key).unwrap();
        assert!(decrypt_with_private_key(&ct, &other.private_key).is_err());

        let ct = encrypt_with_private_key("secret", &pair.private_key).unwrap();
        assert!(decrypt_with_public_key(&ct, &other.public_key).is_err());
    }

    #[test]
    fn mixed_pairs_do_not_cross() {
        // A type-2 ciphertext must not unpad as a type-1 block.
        let pair = test_pair();
        let ct = encrypt_with_public_key("secret", &pair.public_key).unwrap();
        assert!(decrypt_with_public_key(&ct, &pair.public_key).is_err());
    }

    #[test]
    fn empty_arguments_are_invalid_input() {
        let pair = test_pair();
        for err in [
            encrypt_with_public_key("", &pair.public_key).unwrap_err(),
            encrypt_with_public_key("data", "").unwrap_err(),
            decrypt_with_private_key("", &pair.private_key).unwrap_err(),
            decrypt_with_private_key("abcd", "").unwrap_err(),
            encrypt_with_private_key("", &pair.private_key).unwrap_err(),
            decrypt_with_public_key("", &pair.public_key).unwrap_err(),
        ] {
            assert!(matches!(err, CryptoError::InvalidInput(_)), "{err}");
        }
    }

    #[test]
    fn malformed_keys_are_cipher_failure() {
        let err = encrypt_with_public_key("data", "not-base64!!!").unwrap_err();
        assert!(matches!(err, CryptoError::CipherFailure { .. }));

        // Valid base64, invalid DER.
        let bogus = BASE64.encode(b"not a key");
        let err = encrypt_with_public_key("data", &bogus).unwrap_err();
        assert!(matches!(err, CryptoError::CipherFailure { .. }));
        let err = decrypt_with_private_key("abcd", &bogus).unwrap_err();
        assert!(matches!(err, CryptoError::CipherFailure { .. }));
    }

    #[test]
    fn oversized_plaintext_rejected_not_chunked() {
        let pair = test_pair();
        // A 512-bit modulus holds at most 64 - 11 = 53 message bytes.
        let long = "x".repeat(200);
        let err = encrypt_with_public_key(&long, &pair.public_key).unwrap_err();
        assert!(matches!(err, CryptoError::CipherFailure { .. }));
        let err = encrypt_with_private_key(&long, &pair.private_key).unwrap_err();
        assert!(matches!(err, CryptoError::CipherFailure { .. }));
    }

    #[test]
    fn unsupported_spec_rejected() {
        assert!(matches!(
            generate_key_pair(512, "DSA").unwrap_err(),
            CryptoError::CipherFailure { .. }
        ));
    }

    #[test]
    fn jce_spec_spelling_accepted() {
        assert!(generate_key_pair(512, "RSA/ECB/PKCS1Padding").is_ok());
    }

    #[test]
    fn key_pair_debug_redacts_private_key() {
        let pair = test_pair();
        let rendered = format!("{pair:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(&pair.private_key));
    }

    #[test]
    fn type1_padding_round_trip() {
        let padded = pad_type1(b"hello", 64).unwrap();
        assert_eq!(padded.len(), 64);
        assert_eq!(&padded[..2], &[0x00, 0x01]);
        assert_eq!(unpad_type1(&padded).unwrap(), b"hello");
    }

    #[test]
    fn type1_padding_rejects_short_filler() {
        // Fewer than 8 padding bytes is not a valid block.
        let mut block = vec![0xFFu8; 16];
        block[0] = 0x00;
        block[1] = 0x01;
        block[5] = 0x00;
        assert!(unpad_type1(&block).is_err());
    }
}
