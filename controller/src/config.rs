//! Controller configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use rbpool_types::{Address, SeedCommitment, BPS_DENOMINATOR};

use crate::targeting::SplitPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a controller deployment.
///
/// Loaded from TOML via [`ControllerConfig::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Fee taken from every rebase, in basis points (0..=10000).
    #[serde(default = "default_fee_basis_points")]
    pub fee_basis_points: u32,

    /// Receives the fee. Hex, 32 bytes.
    #[serde(with = "hex_address")]
    pub fee_collector: Address,

    /// Commitment to the operator's first secret seed. Hex, 32 bytes.
    #[serde(with = "hex_commitment")]
    pub initial_seed_commitment: SeedCommitment,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How a distribution is split when both pools hold shares.
    #[serde(default)]
    pub split: SplitPolicy,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_fee_basis_points() -> u32 {
    330
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

mod hex_address {
    use rbpool_types::Address;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(addr: &Address, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&addr.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(d)?;
        Address::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

mod hex_commitment {
    use rbpool_types::SeedCommitment;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(c: &SeedCommitment, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&c.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SeedCommitment, D::Error> {
        let raw = String::deserialize(d)?;
        SeedCommitment::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

impl ControllerConfig {
    pub fn new(fee_collector: Address, initial_seed_commitment: SeedCommitment) -> Self {
        Self {
            fee_basis_points: default_fee_basis_points(),
            fee_collector,
            initial_seed_commitment,
            split: SplitPolicy::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }

    pub fn with_fee_basis_points(mut self, bps: u32) -> Self {
        self.fee_basis_points = bps;
        self
    }

    pub fn with_split(mut self, split: SplitPolicy) -> Self {
        self.split = split;
        self
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if u128::from(self.fee_basis_points) > BPS_DENOMINATOR {
            return Err(ConfigError::Invalid(format!(
                "fee_basis_points {} exceeds {}",
                self.fee_basis_points, BPS_DENOMINATOR
            )));
        }
        if let SplitPolicy::Fixed { red_bps } = self.split {
            if u128::from(red_bps) > BPS_DENOMINATOR {
                return Err(ConfigError::Invalid(format!(
                    "split red_bps {} exceeds {}",
                    red_bps, BPS_DENOMINATOR
                )));
            }
        }
        if self.fee_collector.is_zero() {
            return Err(ConfigError::Invalid("fee_collector must not be zero".into()));
        }
        Ok(())
    }
}
