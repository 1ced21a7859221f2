//! The base-asset custodian consumed by the controller.

use rbpool_types::Address;
use thiserror::Error;

use crate::approval::ApprovalVerifier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("insufficient base asset: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    #[error("insufficient base-asset allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("base-asset balance overflow")]
    Overflow,
}

/// A fungible base asset with balances, transfers and signed approvals.
pub trait BaseAsset: ApprovalVerifier {
    fn balance_of(&self, account: &Address) -> u128;

    fn allowance(&self, owner: &Address, spender: &Address) -> u128;

    /// Move `amount` of `caller`'s own balance to `to`.
    fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), AssetError>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), AssetError>;
}
