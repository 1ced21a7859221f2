//! Conversions between external amounts and shares.
//!
//! The per-share scalar is the exact ratio `total_supply / total_shares`. An
//! empty pool (`total_shares == 0`) has a scalar of exactly 1.0. Rounding
//! always favours the pool: whoever receives shares rounds down, whoever
//! gives up shares rounds up.

use rbpool_types::{mul_div_ceil, mul_div_floor, SCALAR_ONE};

/// Shares credited for `amount` (floor). An empty pool mints 1:1.
pub fn shares_for_amount_floor(amount: u128, total_shares: u128, total_supply: u128) -> Option<u128> {
    if total_shares == 0 || total_supply == 0 {
        return Some(amount);
    }
    mul_div_floor(amount, total_shares, total_supply)
}

/// Shares debited for `amount` (ceil).
pub fn shares_for_amount_ceil(amount: u128, total_shares: u128, total_supply: u128) -> Option<u128> {
    if total_shares == 0 || total_supply == 0 {
        return Some(amount);
    }
    mul_div_ceil(amount, total_shares, total_supply)
}

/// External value of `shares` (floor).
pub fn amount_for_shares(shares: u128, total_shares: u128, total_supply: u128) -> u128 {
    if total_shares == 0 {
        return 0;
    }
    // shares <= total_shares, so the result is <= total_supply and fits.
    mul_div_floor(shares, total_supply, total_shares).unwrap_or(total_supply)
}

/// The scalar as an 18-decimal fixed-point number (`SCALAR_ONE == 1.0`).
pub fn scalar_fixed(total_shares: u128, total_supply: u128) -> u128 {
    if total_shares == 0 {
        return SCALAR_ONE;
    }
    mul_div_floor(total_supply, SCALAR_ONE, total_shares).unwrap_or(u128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_is_one_to_one() {
        assert_eq!(shares_for_amount_floor(500, 0, 0), Some(500));
        assert_eq!(shares_for_amount_ceil(500, 0, 0), Some(500));
        assert_eq!(amount_for_shares(500, 0, 0), 0);
        assert_eq!(scalar_fixed(0, 0), SCALAR_ONE);
    }

    #[test]
    fn grown_pool_rounds_in_pool_favour() {
        // scalar = 3/2
        assert_eq!(shares_for_amount_floor(10, 200, 300), Some(6));
        assert_eq!(shares_for_amount_ceil(10, 200, 300), Some(7));
        assert_eq!(amount_for_shares(7, 200, 300), 10);
        assert_eq!(scalar_fixed(200, 300), SCALAR_ONE * 3 / 2);
    }

    #[test]
    fn whole_pool_is_worth_total_supply() {
        assert_eq!(amount_for_shares(1_000, 1_000, 1_967), 1_967);
    }
}
