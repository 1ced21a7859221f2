//! The Red/Black pool controller.
//!
//! The controller is the only identity the two pool ledgers trust for
//! privileged operations. It:
//! - pulls base asset into custody on deposit and mints pool shares
//! - burns shares and releases base asset on withdraw
//! - swaps a holder's value between pools at 1:1
//! - distributes external base-asset inflow to the pools through `rebase`,
//!   gated by a commit-reveal seed chain so nobody can predict or grab the
//!   timing of a rebase

pub mod config;
pub mod coordinator;
pub mod error;
pub mod seed;
pub mod targeting;

pub use config::{ConfigError, ControllerConfig};
pub use coordinator::{RebaseCoordinator, RebaseReport};
pub use error::ControllerError;
pub use seed::{seed_commitment, SeedChain, SeedDraw};
pub use targeting::{split_distribution, SplitPolicy};
