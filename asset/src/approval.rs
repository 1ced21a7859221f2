//! Detached signed approvals.

use rbpool_crypto::{derive_address, sign_message, verify_signature};
use rbpool_types::{Address, KeyPair, PublicKey, Signature, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APPROVAL_DOMAIN: &[u8] = b"rbpool-approval-v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("approval signer {signer} is not the owner {owner}")]
    WrongSigner { owner: Address, signer: Address },

    #[error("approval is for owner {approved}, not {requested}")]
    WrongOwner { approved: Address, requested: Address },

    #[error("approval is for spender {approved}, not {requested}")]
    WrongSpender { approved: Address, requested: Address },

    #[error("approval covers {approved}, request is for {requested}")]
    AmountMismatch { approved: u128, requested: u128 },

    #[error("approval signature is invalid")]
    BadSignature,

    #[error("approval expired at {deadline} (now {now})")]
    Expired { deadline: Timestamp, now: Timestamp },

    #[error("approval nonce {got} already used or out of order (expected {expected})")]
    NonceMismatch { expected: u64, got: u64 },
}

/// A signed authorization for `spender` to move `amount` of `owner`'s base
/// asset, valid until `deadline` and usable once (monotonic `nonce`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedApproval {
    pub owner: Address,
    pub owner_key: PublicKey,
    pub spender: Address,
    pub amount: u128,
    pub nonce: u64,
    pub deadline: Timestamp,
    pub signature: Signature,
}

impl SignedApproval {
    /// Sign an approval with the owner's key pair.
    pub fn sign(
        keypair: &KeyPair,
        spender: Address,
        amount: u128,
        nonce: u64,
        deadline: Timestamp,
    ) -> Self {
        let owner = derive_address(&keypair.public);
        let message = signing_bytes(&owner, &spender, amount, nonce, deadline);
        Self {
            owner,
            owner_key: keypair.public,
            spender,
            amount,
            nonce,
            deadline,
            signature: sign_message(&message, &keypair.secret),
        }
    }

    /// The exact bytes covered by the signature.
    pub fn message(&self) -> Vec<u8> {
        signing_bytes(&self.owner, &self.spender, self.amount, self.nonce, self.deadline)
    }

    /// Stateless checks: the key belongs to the owner, the signature is
    /// valid, the request matches, and the deadline has not passed.
    ///
    /// Nonce freshness is the custodian's job (it owns the nonce counter).
    pub fn check(
        &self,
        owner: &Address,
        spender: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), ApprovalError> {
        let signer = derive_address(&self.owner_key);
        if signer != self.owner {
            return Err(ApprovalError::WrongSigner {
                owner: self.owner,
                signer,
            });
        }
        if self.owner != *owner {
            return Err(ApprovalError::WrongOwner {
                approved: self.owner,
                requested: *owner,
            });
        }
        if self.spender != *spender {
            return Err(ApprovalError::WrongSpender {
                approved: self.spender,
                requested: *spender,
            });
        }
        if self.amount != amount {
            return Err(ApprovalError::AmountMismatch {
                approved: self.amount,
                requested: amount,
            });
        }
        if self.deadline.is_past(now) {
            return Err(ApprovalError::Expired {
                deadline: self.deadline,
                now,
            });
        }
        if !verify_signature(&self.message(), &self.signature, &self.owner_key) {
            return Err(ApprovalError::BadSignature);
        }
        Ok(())
    }
}

fn signing_bytes(
    owner: &Address,
    spender: &Address,
    amount: u128,
    nonce: u64,
    deadline: Timestamp,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(APPROVAL_DOMAIN.len() + 32 + 32 + 16 + 8 + 8);
    buf.extend_from_slice(APPROVAL_DOMAIN);
    buf.extend_from_slice(owner.as_bytes());
    buf.extend_from_slice(spender.as_bytes());
    buf.extend_from_slice(&amount.to_be_bytes());
    buf.extend_from_slice(&nonce.to_be_bytes());
    buf.extend_from_slice(&deadline.as_secs().to_be_bytes());
    buf
}

/// Verifies and consumes signed approvals.
pub trait ApprovalVerifier {
    /// Check that `approval` authorizes `spender` to move exactly `amount`
    /// from `owner` at `now`, including nonce freshness. No state change.
    fn verify_approval(
        &self,
        approval: &SignedApproval,
        owner: &Address,
        spender: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), ApprovalError>;

    /// Verify, then burn the nonce and grant the allowance. A consumed
    /// approval can never be verified again.
    fn consume_approval(
        &mut self,
        approval: &SignedApproval,
        owner: &Address,
        spender: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), ApprovalError>;
}
