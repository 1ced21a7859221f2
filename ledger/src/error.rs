//! Ledger errors.

use rbpool_types::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("caller {caller} is not authorized for this operation")]
    Unauthorized { caller: Address },

    #[error("controller is already registered")]
    ControllerAlreadySet,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("amount {amount} is worth zero shares at the current scalar")]
    ZeroShares { amount: u128 },

    #[error("arithmetic overflow in share accounting")]
    Overflow,
}
