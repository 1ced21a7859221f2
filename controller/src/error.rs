//! Controller errors.

use rbpool_asset::{ApprovalError, AssetError};
use rbpool_ledger::LedgerError;
use rbpool_types::{Address, PoolSelector};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("caller {caller} may not act for {holder}")]
    Unauthorized { caller: Address, holder: Address },

    #[error("invalid pool selector {0}: expected 0 (red) or 1 (black)")]
    InvalidPoolSelector(i64),

    #[error("source and destination pool are both {0}")]
    SamePool(PoolSelector),

    #[error("insufficient pool balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("approval rejected: {0}")]
    ApprovalInvalid(#[from] ApprovalError),

    #[error("revealed seed does not match the pending commitment")]
    InvalidSeedKey,

    #[error("next commitment repeats the seed being revealed")]
    SeedReused,

    #[error("{pool} pool does not trust this controller")]
    NotWired { pool: PoolSelector },

    #[error("base asset: {0}")]
    Asset(#[from] AssetError),

    #[error("ledger: {0}")]
    Ledger(LedgerError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("snapshot: {0}")]
    Snapshot(String),
}

impl From<LedgerError> for ControllerError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientBalance { needed, available } => {
                Self::InsufficientBalance { needed, available }
            }
            LedgerError::Overflow => Self::Overflow,
            other => Self::Ledger(other),
        }
    }
}
