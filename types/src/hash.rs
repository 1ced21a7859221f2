//! Seed secrets and their commitments for the rebase commit-reveal protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TypesError;

fn parse_32(s: &str) -> Result<[u8; 32], TypesError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(raw, &mut bytes).map_err(|_| TypesError::InvalidHash(s.to_string()))?;
    Ok(bytes)
}

/// A 32-byte commitment to a not-yet-revealed seed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedCommitment([u8; 32]);

impl SeedCommitment {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        parse_32(s).map(Self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SeedCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedCommitment({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for SeedCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A 32-byte seed secret.
///
/// Kept private by the keeper until the rebase that reveals it. Does not
/// implement `Debug` or `Display`; bytes are zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SeedKey([u8; 32]);

impl SeedKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        parse_32(s).map(Self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_hex_roundtrip() {
        let c = SeedCommitment::new([7u8; 32]);
        assert_eq!(SeedCommitment::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn seed_accepts_0x_prefix() {
        let hex = format!("0x{}", "11".repeat(32));
        let seed = SeedKey::from_hex(&hex).unwrap();
        assert_eq!(seed.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(SeedKey::from_hex("zz").is_err());
        assert!(SeedCommitment::from_hex(&"ab".repeat(31)).is_err());
    }
}
