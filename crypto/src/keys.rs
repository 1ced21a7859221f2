//! Ed25519 approval keys.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rbpool_types::{ApprovalKey, KeyPair, PublicKey};

/// Generate a new approval key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        secret: ApprovalKey::new(signing_key.to_bytes()),
    }
}

/// The verifying key for an approval key.
pub fn public_key_of(secret: &ApprovalKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(secret.secret_bytes());
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let secret = ApprovalKey::new(*seed);
    KeyPair {
        public: public_key_of(&secret),
        secret,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_valid_keypair() {
        let kp = generate_keypair();
        assert_ne!(kp.public.0, [0u8; 32]);
        assert_eq!(public_key_of(&kp.secret), kp.public);
    }

    #[test]
    fn keypair_from_seed_deterministic() {
        let kp1 = keypair_from_seed(&[42u8; 32]);
        let kp2 = keypair_from_seed(&[42u8; 32]);
        assert_eq!(kp1.public, kp2.public);
        assert_eq!(kp1.secret.secret_bytes(), kp2.secret.secret_bytes());
    }

    #[test]
    fn different_seeds_produce_different_keys() {
        let kp1 = keypair_from_seed(&[1u8; 32]);
        let kp2 = keypair_from_seed(&[2u8; 32]);
        assert_ne!(kp1.public, kp2.public);
    }
}
