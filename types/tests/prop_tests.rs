use proptest::prelude::*;

use rbpool_types::{mul_div_ceil, mul_div_floor, Address, PoolSelector, SeedCommitment, Timestamp};

proptest! {
    /// ceil is floor, or floor + 1 when the division leaves a remainder.
    #[test]
    fn ceil_is_floor_plus_remainder_bit(
        a in 0u128..u64::MAX as u128,
        b in 0u128..u64::MAX as u128,
        d in 1u128..u64::MAX as u128,
    ) {
        let floor = mul_div_floor(a, b, d).unwrap();
        let ceil = mul_div_ceil(a, b, d).unwrap();
        let exact = (a * b) % d == 0;
        prop_assert_eq!(ceil, if exact { floor } else { floor + 1 });
    }

    /// floor(a * b / b) == a for any nonzero b.
    #[test]
    fn mul_then_div_by_same_is_identity(a in 0u128..u128::MAX / 2, b in 1u128..u128::MAX) {
        prop_assert_eq!(mul_div_floor(a, b, b), Some(a));
    }

    /// Address hex parsing inverts display.
    #[test]
    fn address_display_parse(bytes in prop::array::uniform32(0u8..)) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Address bincode serialization roundtrip.
    #[test]
    fn address_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let addr = Address::new(bytes);
        let encoded = bincode::serialize(&addr).unwrap();
        let decoded: Address = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, addr);
    }

    /// SeedCommitment hex roundtrip.
    #[test]
    fn commitment_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let c = SeedCommitment::new(bytes);
        prop_assert_eq!(SeedCommitment::from_hex(&c.to_hex()).unwrap(), c);
    }

    /// Every raw selector outside {0, 1} is rejected.
    #[test]
    fn selector_rejects_out_of_range(raw in any::<i64>()) {
        let parsed = PoolSelector::try_from(raw);
        prop_assert_eq!(parsed.is_ok(), raw == 0 || raw == 1);
    }

    /// A deadline is past only strictly after its second.
    #[test]
    fn deadline_is_past_strictly_after(deadline in 0u64..1_000_000, now in 0u64..1_000_000) {
        prop_assert_eq!(Timestamp::new(deadline).is_past(Timestamp::new(now)), now > deadline);
    }
}
