//! Cryptographic primitives for the rebasing pools.
//!
//! - **Ed25519** for signing and verifying base-asset approvals
//! - **Blake2b** for seed commitments and address derivation

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::derive_address;
pub use hash::{blake2b_256, blake2b_256_multi, random_bytes_32};
pub use keys::{generate_keypair, keypair_from_seed, public_key_of};
pub use sign::{sign_message, verify_signature};
