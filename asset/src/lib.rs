//! Interface to the base-asset custodian.
//!
//! The pools never hold the base asset themselves; the controller moves it
//! through a [`BaseAsset`] implementation. Deposits are authorized by a
//! detached [`SignedApproval`]: an Ed25519-signed message naming owner,
//! spender, amount, a monotonic nonce and a deadline.

pub mod approval;
pub mod custodian;

pub use approval::{ApprovalError, ApprovalVerifier, SignedApproval};
pub use custodian::{AssetError, BaseAsset};
