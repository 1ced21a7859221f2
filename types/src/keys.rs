//! Holder keys and the signatures carried by base-asset approvals.
//!
//! A holder's [`Address`](crate::Address) is derived from their
//! [`PublicKey`]; the matching [`ApprovalKey`] signs approvals that let the
//! controller pull base asset on their behalf.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TypesError;

/// Ed25519 verifying key embedded in every approval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Ed25519 secret used only to sign approvals.
///
/// No `Debug`, `Clone` or serde; bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ApprovalKey([u8; 32]);

impl ApprovalKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn secret_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// A holder's approval key pair.
///
/// Build with `rbpool_crypto::generate_keypair()` or
/// `rbpool_crypto::keypair_from_seed()`.
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: ApprovalKey,
}

/// Signature over an approval's signing bytes.
///
/// Hex in human-readable formats (JSON approvals handed between wallet and
/// keeper), raw bytes in binary ones.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    pub fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 64];
        hex::decode_to_slice(raw, &mut bytes)
            .map_err(|_| TypesError::InvalidSignature(s.to_string()))?;
        Ok(Self(bytes))
    }

    fn from_slice(raw: &[u8]) -> Result<Self, TypesError> {
        raw.try_into()
            .map(Self)
            .map_err(|_| TypesError::InvalidSignature(format!("{} bytes", raw.len())))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let raw = String::deserialize(deserializer)?;
            Self::from_hex(&raw).map_err(serde::de::Error::custom)
        } else {
            let raw = Vec::<u8>::deserialize(deserializer)?;
            Self::from_slice(&raw).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig() -> Signature {
        let mut bytes = [0u8; 64];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Signature::new(bytes)
    }

    #[test]
    fn json_uses_hex() {
        let json = serde_json::to_string(&sig()).unwrap();
        assert_eq!(json, format!("\"{}\"", sig().to_hex()));
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig());
    }

    #[test]
    fn bincode_uses_raw_bytes() {
        let bytes = bincode::serialize(&sig()).unwrap();
        // u64 length prefix + 64 bytes
        assert_eq!(bytes.len(), 72);
        let back: Signature = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, sig());
    }

    #[test]
    fn short_signature_rejected() {
        let short = bincode::serialize(&vec![7u8; 63]).unwrap();
        assert!(bincode::deserialize::<Signature>(&short).is_err());
        assert!(matches!(
            Signature::from_hex("abcd"),
            Err(TypesError::InvalidSignature(_))
        ));
    }

    #[test]
    fn hex_accepts_prefix() {
        let hex = format!("0x{}", sig().to_hex());
        assert_eq!(Signature::from_hex(&hex).unwrap(), sig());
    }
}
