//! Rebasing share ledger.
//!
//! Each pool token stores **shares**, not balances. A single per-pool ratio
//! (`total_supply / total_shares`) converts shares to externally visible
//! units, so a rebase that grows every holder's balance proportionally is one
//! addition to `total_supply`: O(1) in the number of holders.
//!
//! Privileged mutations (mint, burn, rebase) are gated by an [`AccessGuard`]
//! that trusts exactly one registered controller identity.

pub mod access;
pub mod error;
pub mod ledger;
pub mod shares;

pub use access::AccessGuard;
pub use error::LedgerError;
pub use ledger::{RebasingLedger, Settlement};
