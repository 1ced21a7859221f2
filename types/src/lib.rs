//! Fundamental types for the Red/Black rebasing pools.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, seed hashes, keys, timestamps, pool selectors and the
//! 256-bit-intermediate arithmetic used by share conversions.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod pool;
pub mod time;

pub use address::Address;
pub use amount::{mul_div_ceil, mul_div_floor, BPS_DENOMINATOR, POOL_DECIMALS, SCALAR_ONE};
pub use error::TypesError;
pub use hash::{SeedCommitment, SeedKey};
pub use keys::{ApprovalKey, KeyPair, PublicKey, Signature};
pub use pool::PoolSelector;
pub use time::Timestamp;
