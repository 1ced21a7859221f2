//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators (the base-asset custodian, the clock) are
//! abstracted behind traits or plain values. This crate provides in-memory
//! implementations that:
//! - Behave like the real collaborator, including approval replay protection
//! - Can be controlled programmatically (faucet, time travel)
//! - Never touch the filesystem or network

pub mod asset;
pub mod clock;

pub use asset::NullBaseAsset;
pub use clock::NullClock;
