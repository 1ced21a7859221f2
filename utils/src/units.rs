//! Human-readable rendering of raw pool amounts.

use rbpool_types::POOL_DECIMALS;

/// Render a raw amount with the pools' 9 decimals, trailing zeros trimmed.
///
/// `format_units(1_500_000_000)` is `"1.5"`.
pub fn format_units(raw: u128) -> String {
    let unit = 10u128.pow(POOL_DECIMALS as u32);
    let whole = raw / unit;
    let frac = raw % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = POOL_DECIMALS as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_units() {
        assert_eq!(format_units(0), "0");
        assert_eq!(format_units(2_000_000_000), "2");
    }

    #[test]
    fn fractional_units() {
        assert_eq!(format_units(1_500_000_000), "1.5");
        assert_eq!(format_units(96_700_000), "0.0967");
        assert_eq!(format_units(1), "0.000000001");
    }
}
