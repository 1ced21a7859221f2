//! Holder address derivation from public keys.
//!
//! `address = Blake2b-256("rbpool-address" ‖ public_key)`

use crate::hash::blake2b_256_multi;
use rbpool_types::{Address, PublicKey};

const ADDRESS_DOMAIN: &[u8] = b"rbpool-address";

/// Derive the account address owned by `public_key`.
pub fn derive_address(public_key: &PublicKey) -> Address {
    Address::new(blake2b_256_multi(&[ADDRESS_DOMAIN, public_key.as_bytes()]))
}
