//! Nullable base asset: an in-memory custodian with real approvals.

use std::collections::HashMap;

use rbpool_asset::{ApprovalError, ApprovalVerifier, AssetError, BaseAsset, SignedApproval};
use rbpool_types::{Address, Timestamp};

/// In-memory base asset.
///
/// Signatures are verified for real (Ed25519); nonces are tracked per owner
/// and must be used in order, so a consumed approval cannot be replayed.
#[derive(Clone, Debug, Default)]
pub struct NullBaseAsset {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    nonces: HashMap<Address, u64>,
}

impl NullBaseAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with preset balances.
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, u128)>) -> Self {
        Self {
            balances: balances.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Credit `amount` out of thin air (test faucet).
    pub fn mint_to(&mut self, account: &Address, amount: u128) {
        *self.balances.entry(*account).or_insert(0) += amount;
    }

    /// Next nonce the owner must sign with.
    pub fn nonce_of(&self, owner: &Address) -> u64 {
        self.nonces.get(owner).copied().unwrap_or(0)
    }

    /// Sum of all balances.
    pub fn total_issued(&self) -> u128 {
        self.balances.values().sum()
    }

    fn debit(&mut self, from: &Address, amount: u128) -> Result<(), AssetError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(AssetError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.balances.insert(*from, available - amount);
        Ok(())
    }

    fn credit_check(&self, to: &Address, amount: u128) -> Result<(), AssetError> {
        self.balance_of(to)
            .checked_add(amount)
            .map(|_| ())
            .ok_or(AssetError::Overflow)
    }
}

impl ApprovalVerifier for NullBaseAsset {
    fn verify_approval(
        &self,
        approval: &SignedApproval,
        owner: &Address,
        spender: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), ApprovalError> {
        approval.check(owner, spender, amount, now)?;
        let expected = self.nonce_of(owner);
        if approval.nonce != expected {
            return Err(ApprovalError::NonceMismatch {
                expected,
                got: approval.nonce,
            });
        }
        Ok(())
    }

    fn consume_approval(
        &mut self,
        approval: &SignedApproval,
        owner: &Address,
        spender: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), ApprovalError> {
        self.verify_approval(approval, owner, spender, amount, now)?;
        self.nonces.insert(*owner, approval.nonce + 1);
        self.allowances.insert((*owner, *spender), amount);
        tracing::trace!(%owner, %spender, amount, nonce = approval.nonce, "approval consumed");
        Ok(())
    }
}

impl BaseAsset for NullBaseAsset {
    fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), AssetError> {
        if caller != to {
            self.credit_check(to, amount)?;
        }
        self.debit(caller, amount)?;
        *self.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(AssetError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.transfer(from, to, amount)?;
        self.allowances.insert((*from, *spender), allowed - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbpool_crypto::{derive_address, keypair_from_seed};

    fn spender() -> Address {
        Address::new([0xCC; 32])
    }

    #[test]
    fn transfer_moves_balance() {
        let a = Address::new([1; 32]);
        let b = Address::new([2; 32]);
        let mut asset = NullBaseAsset::with_balances([(a, 100)]);
        asset.transfer(&a, &b, 40).unwrap();
        assert_eq!(asset.balance_of(&a), 60);
        assert_eq!(asset.balance_of(&b), 40);
        assert_eq!(asset.total_issued(), 100);
    }

    #[test]
    fn transfer_over_balance_fails() {
        let a = Address::new([1; 32]);
        let mut asset = NullBaseAsset::with_balances([(a, 10)]);
        assert_eq!(
            asset.transfer(&a, &spender(), 11),
            Err(AssetError::InsufficientFunds {
                needed: 11,
                available: 10
            })
        );
        assert_eq!(asset.balance_of(&a), 10);
    }

    #[test]
    fn approval_grants_allowance_once() {
        let kp = keypair_from_seed(&[7u8; 32]);
        let owner = derive_address(&kp.public);
        let mut asset = NullBaseAsset::new();
        asset.mint_to(&owner, 1_000);

        let approval = SignedApproval::sign(&kp, spender(), 600, 0, Timestamp::new(50));
        asset
            .consume_approval(&approval, &owner, &spender(), 600, Timestamp::new(10))
            .unwrap();
        assert_eq!(asset.allowance(&owner, &spender()), 600);
        assert_eq!(asset.nonce_of(&owner), 1);

        // replay
        assert_eq!(
            asset.consume_approval(&approval, &owner, &spender(), 600, Timestamp::new(10)),
            Err(ApprovalError::NonceMismatch {
                expected: 1,
                got: 0
            })
        );
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let kp = keypair_from_seed(&[7u8; 32]);
        let owner = derive_address(&kp.public);
        let mut asset = NullBaseAsset::new();
        asset.mint_to(&owner, 1_000);
        let approval = SignedApproval::sign(&kp, spender(), 600, 0, Timestamp::new(50));
        asset
            .consume_approval(&approval, &owner, &spender(), 600, Timestamp::new(10))
            .unwrap();

        asset.transfer_from(&spender(), &owner, &spender(), 600).unwrap();
        assert_eq!(asset.balance_of(&spender()), 600);
        assert_eq!(asset.allowance(&owner, &spender()), 0);
        assert!(matches!(
            asset.transfer_from(&spender(), &owner, &spender(), 1),
            Err(AssetError::InsufficientAllowance { .. })
        ));
    }
}
