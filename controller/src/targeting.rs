//! Which pool(s) a rebase distribution goes to.

use rbpool_types::{mul_div_floor, PoolSelector, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};

use crate::seed::SeedDraw;

/// How a distribution is split when both pools hold shares.
///
/// A single populated pool always receives everything, and two empty pools
/// receive nothing, whatever the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// In proportion to each pool's total supply: both pools grow by the
    /// same relative rate.
    #[default]
    Proportional,
    /// A fixed share for Red, the rest to Black.
    Fixed { red_bps: u32 },
    /// Everything to the pool picked by the revealed seed.
    SeedDraw,
}

/// Split `amount` into `(red, black)` parts. The parts always sum to
/// `amount` unless both pools are empty, in which case both are zero.
///
/// Returns `None` only if the supplies overflow when summed.
pub fn split_distribution(
    policy: SplitPolicy,
    amount: u128,
    red_supply: u128,
    black_supply: u128,
    draw: &SeedDraw,
) -> Option<(u128, u128)> {
    match (red_supply > 0, black_supply > 0) {
        (false, false) => return Some((0, 0)),
        (true, false) => return Some((amount, 0)),
        (false, true) => return Some((0, amount)),
        (true, true) => {}
    }
    let red = match policy {
        SplitPolicy::Proportional => {
            let total = red_supply.checked_add(black_supply)?;
            mul_div_floor(amount, red_supply, total)?
        }
        SplitPolicy::Fixed { red_bps } => {
            mul_div_floor(amount, u128::from(red_bps).min(BPS_DENOMINATOR), BPS_DENOMINATOR)?
        }
        SplitPolicy::SeedDraw => match draw.pool() {
            PoolSelector::Red => amount,
            PoolSelector::Black => 0,
        },
    };
    Some((red, amount - red))
}
