//! Amount arithmetic shared by the ledgers and the controller.
//!
//! Amounts are raw `u128` units of the base asset (9 decimals). Every
//! multiply-then-divide goes through a 256-bit intermediate so that
//! `shares * supply` cannot overflow before the division.

use primitive_types::U256;

/// Decimals reported by both pool tokens (matches the base asset).
pub const POOL_DECIMALS: u8 = 9;

/// Denominator for basis-point rates (10000 bp = 100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Fixed-point representation of a per-share scalar of 1.0 (18 decimals).
pub const SCALAR_ONE: u128 = 1_000_000_000_000_000_000;

/// `floor(a * b / denom)`, or `None` on a zero denominator or a result
/// that does not fit in `u128`.
pub fn mul_div_floor(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    let result = U256::from(a).checked_mul(U256::from(b))? / U256::from(denom);
    narrow(result)
}

/// `ceil(a * b / denom)`, or `None` on a zero denominator or overflow.
pub fn mul_div_ceil(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    let product = U256::from(a).checked_mul(U256::from(b))?;
    let denom = U256::from(denom);
    let (quotient, remainder) = product.div_mod(denom);
    let result = if remainder.is_zero() {
        quotient
    } else {
        quotient.checked_add(U256::one())?
    };
    narrow(result)
}

fn narrow(value: U256) -> Option<u128> {
    if value > U256::from(u128::MAX) {
        None
    } else {
        Some(value.as_u128())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_and_ceil_agree_on_exact_division() {
        assert_eq!(mul_div_floor(10, 30, 5), Some(60));
        assert_eq!(mul_div_ceil(10, 30, 5), Some(60));
    }

    #[test]
    fn floor_and_ceil_differ_on_remainder() {
        assert_eq!(mul_div_floor(10, 1, 3), Some(3));
        assert_eq!(mul_div_ceil(10, 1, 3), Some(4));
    }

    #[test]
    fn zero_denominator_is_none() {
        assert_eq!(mul_div_floor(1, 1, 0), None);
        assert_eq!(mul_div_ceil(1, 1, 0), None);
    }

    #[test]
    fn wide_intermediate_does_not_overflow() {
        let big = u128::MAX / 2;
        assert_eq!(mul_div_floor(big, 1_000, 1_000), Some(big));
        assert_eq!(mul_div_ceil(big, 1_000, 1_000), Some(big));
    }

    #[test]
    fn oversized_result_is_none() {
        assert_eq!(mul_div_floor(u128::MAX, 2, 1), None);
    }

    #[test]
    fn fee_example() {
        // 330 bp of 1e8
        assert_eq!(mul_div_floor(100_000_000, 330, BPS_DENOMINATOR), Some(3_300_000));
    }
}
