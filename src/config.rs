//! Process-wide cipher configuration.
//!
//! Loaded once at startup from environment variables and read-only
//! thereafter; the core never re-reads it mid-run. Variables use the `ENC`
//! prefix with `__` separating nested sections, e.g. `ENC_AES__KEY`,
//! `ENC_RSA__KEY_SIZE`, `ENC_DEBUG_MODE`.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::aes;

/// Validated cipher configuration shared by the engines and the interceptor.
#[derive(Debug, Clone, Deserialize)]
pub struct CipherConfig {
    /// Symmetric cipher settings.
    #[serde(default)]
    pub aes: AesConfig,

    /// Asymmetric cipher settings.
    #[serde(default)]
    pub rsa: RsaConfig,

    /// Request paths the host pipeline applies interception to. Consumed by
    /// the routing layer, not by this core.
    #[serde(default = "default_enabled_paths")]
    pub enabled_paths: Vec<String>,

    /// Request paths the host pipeline exempts from interception.
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,

    /// Emit verbose per-call traces (argument counts, data lengths).
    #[serde(default)]
    pub debug_mode: bool,
}

/// AES section of [`CipherConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct AesConfig {
    /// Raw key material; its UTF-8 byte length must be 16, 24 or 32.
    #[serde(default = "default_aes_key")]
    pub key: String,

    /// Algorithm spec string, e.g. `"AES/ECB/PKCS5Padding"`.
    #[serde(default = "default_aes_algorithm")]
    pub algorithm: String,

    /// Whether the host pipeline should offer AES interception at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// RSA section of [`CipherConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct RsaConfig {
    /// Key size in bits for on-demand key pair generation.
    #[serde(default = "default_rsa_key_size")]
    pub key_size: usize,

    /// Algorithm spec string, normally `"RSA"`.
    #[serde(default = "default_rsa_algorithm")]
    pub algorithm: String,

    /// Whether the host pipeline should offer RSA interception at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base64 X.509 SubjectPublicKeyInfo key used to encrypt results when a
    /// directive selects RSA. Required only if such a directive exists.
    #[serde(default)]
    pub public_key: Option<String>,

    /// Base64 PKCS#8 key used to decrypt arguments when a directive selects
    /// RSA. Required only if such a directive exists.
    #[serde(default)]
    pub private_key: Option<String>,
}

fn default_aes_key() -> String {
    "MySecretKey12345".into()
}
fn default_aes_algorithm() -> String {
    "AES/ECB/PKCS5Padding".into()
}
fn default_rsa_key_size() -> usize {
    1024
}
fn default_rsa_algorithm() -> String {
    "RSA".into()
}
fn default_true() -> bool {
    true
}
fn default_enabled_paths() -> Vec<String> {
    vec!["/api/v1/**".into()]
}
fn default_excluded_paths() -> Vec<String> {
    vec!["/actuator/**".into(), "/swagger-ui/**".into()]
}

impl Default for AesConfig {
    fn default() -> Self {
        Self {
            key: default_aes_key(),
            algorithm: default_aes_algorithm(),
            enabled: true,
        }
    }
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            key_size: default_rsa_key_size(),
            algorithm: default_rsa_algorithm(),
            enabled: true,
            public_key: None,
            private_key: None,
        }
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            aes: AesConfig::default(),
            rsa: RsaConfig::default(),
            enabled_paths: default_enabled_paths(),
            excluded_paths: default_excluded_paths(),
            debug_mode: false,
        }
    }
}

impl CipherConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("ENC").separator("__"))
            .build()
            .context("failed to build configuration from environment")?;

        let c: CipherConfig = cfg
            .try_deserialize()
            .context("failed to deserialise cipher configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.aes.enabled {
            if self.aes.key.trim().is_empty() {
                anyhow::bail!("AES key is required and must not be empty");
            }
            if !aes::is_valid_key(self.aes.key.as_bytes()) {
                anyhow::bail!(
                    "AES key must be 16, 24 or 32 bytes, got {}",
                    self.aes.key.len()
                );
            }
            if self.aes.algorithm.trim().is_empty() {
                anyhow::bail!("AES algorithm spec must not be empty");
            }
        }
        if self.rsa.enabled {
            if self.rsa.key_size == 0 {
                anyhow::bail!("RSA key size must be positive");
            }
            if self.rsa.algorithm.trim().is_empty() {
                anyhow::bail!("RSA algorithm spec must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let cfg = CipherConfig::default();
        assert_eq!(cfg.aes.key, "MySecretKey12345");
        assert_eq!(cfg.aes.algorithm, "AES/ECB/PKCS5Padding");
        assert!(cfg.aes.enabled);
        assert_eq!(cfg.rsa.key_size, 1024);
        assert_eq!(cfg.rsa.algorithm, "RSA");
        assert!(cfg.rsa.enabled);
        assert_eq!(cfg.enabled_paths, vec!["/api/v1/**"]);
        assert_eq!(cfg.excluded_paths, vec!["/actuator/**", "/swagger-ui/**"]);
        assert!(!cfg.debug_mode);
    }

    #[test]
    fn default_config_validates() {
        assert!(CipherConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_aes_key_length() {
        let cfg = CipherConfig {
            aes: AesConfig {
                key: "tooshort".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_aes_key() {
        let cfg = CipherConfig {
            aes: AesConfig {
                key: "".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_rsa_key_size() {
        let cfg = CipherConfig {
            rsa: RsaConfig {
                key_size: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn disabled_sections_skip_validation() {
        let cfg = CipherConfig {
            aes: AesConfig {
                key: "".into(),
                enabled: false,
                ..Default::default()
            },
            rsa: RsaConfig {
                key_size: 0,
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
