//! Commit-reveal seed chain gating rebases.
//!
//! The controller always holds exactly one commitment
//! `H(tag ‖ controller ‖ seed)`. A rebase must reveal the matching seed and,
//! in the same call, supply the commitment for the next one. Observers only
//! ever see hashes of unused seeds, so they cannot predict when the next
//! rebase lands or which pool a seed draw picks.

use rbpool_crypto::blake2b_256_multi;
use rbpool_types::{Address, PoolSelector, SeedCommitment, SeedKey};
use serde::{Deserialize, Serialize};

use crate::error::ControllerError;

const SEED_DOMAIN: &[u8] = b"rbpool-seed-v1";
const DRAW_DOMAIN: &[u8] = b"rbpool-draw-v1";

/// Commitment to `seed` bound to the controller at `domain`.
///
/// The address binding stops a seed revealed to one deployment from being
/// replayed against another.
pub fn seed_commitment(domain: &Address, seed: &SeedKey) -> SeedCommitment {
    SeedCommitment::new(blake2b_256_multi(&[
        SEED_DOMAIN,
        domain.as_bytes(),
        seed.as_bytes(),
    ]))
}

/// Entropy released by a successful reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedDraw([u8; 32]);

impl SeedDraw {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The pool this draw favours (low bit of the first byte).
    pub fn pool(&self) -> PoolSelector {
        if self.0[0] & 1 == 0 {
            PoolSelector::Red
        } else {
            PoolSelector::Black
        }
    }
}

/// The single pending commitment and how many times it has rotated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedChain {
    domain: Address,
    pending: SeedCommitment,
    rotations: u64,
}

impl SeedChain {
    pub fn new(domain: Address, initial: SeedCommitment) -> Self {
        Self {
            domain,
            pending: initial,
            rotations: 0,
        }
    }

    pub fn pending(&self) -> &SeedCommitment {
        &self.pending
    }

    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    /// Check a reveal against the pending commitment without consuming it.
    pub fn verify(&self, revealed: &SeedKey, next: &SeedCommitment) -> Result<SeedDraw, ControllerError> {
        if seed_commitment(&self.domain, revealed) != self.pending {
            return Err(ControllerError::InvalidSeedKey);
        }
        // Committing to the seed just revealed would make the next rebase
        // public knowledge.
        if *next == self.pending {
            return Err(ControllerError::SeedReused);
        }
        Ok(SeedDraw(blake2b_256_multi(&[
            DRAW_DOMAIN,
            self.pending.as_bytes(),
            revealed.as_bytes(),
        ])))
    }

    /// Verify the reveal and replace the commitment with `next`.
    pub fn rotate(&mut self, revealed: &SeedKey, next: SeedCommitment) -> Result<SeedDraw, ControllerError> {
        let draw = self.verify(revealed, &next)?;
        self.pending = next;
        self.rotations += 1;
        Ok(draw)
    }
}
