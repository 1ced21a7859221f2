use proptest::prelude::*;

use rbpool_ledger::{LedgerError, RebasingLedger};
use rbpool_types::Address;

const ADMIN: Address = Address::ZERO;

fn controller() -> Address {
    Address::new([0xC0; 32])
}

fn holder(n: u8) -> Address {
    Address::new([n.wrapping_add(1); 32])
}

fn make_ledger() -> RebasingLedger {
    let mut ledger = RebasingLedger::red(ADMIN);
    ledger.set_controller(&ADMIN, controller()).unwrap();
    ledger
}

fn sum_balances(ledger: &RebasingLedger, holders: u8) -> u128 {
    (0..holders).map(|h| ledger.balance_of(&holder(h))).sum()
}

#[derive(Clone, Debug)]
enum Op {
    Mint { to: u8, amount: u128 },
    Burn { from: u8, amount: u128 },
    Transfer { from: u8, to: u8, amount: u128 },
}

fn op_strategy(holders: u8) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..holders, 1u128..1_000_000_000_000).prop_map(|(to, amount)| Op::Mint { to, amount }),
        (0..holders, 0u128..1_000_000_000_000).prop_map(|(from, amount)| Op::Burn { from, amount }),
        (0..holders, 0..holders, 0u128..1_000_000_000_000)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
    ]
}

proptest! {
    /// Without rebases, supply equals minted minus burned and the holder
    /// balances sum to it exactly (the scalar stays 1.0).
    #[test]
    fn supply_tracks_mints_and_burns(ops in prop::collection::vec(op_strategy(5), 1..60)) {
        let mut ledger = make_ledger();
        let c = controller();
        let mut expected: u128 = 0;
        for op in ops {
            match op {
                Op::Mint { to, amount } => {
                    ledger.mint(&c, &holder(to), amount).unwrap();
                    expected += amount;
                }
                Op::Burn { from, amount } => {
                    if ledger.burn(&c, &holder(from), amount).is_ok() {
                        expected -= amount;
                    }
                }
                Op::Transfer { from, to, amount } => {
                    let _ = ledger.transfer(&holder(from), &holder(to), amount);
                }
            }
            prop_assert_eq!(ledger.total_supply(), expected);
            let sum = sum_balances(&ledger, 5);
            prop_assert!(sum <= expected);
            prop_assert!(expected - sum <= 5, "drift {} exceeds holder count", expected - sum);
        }
    }

    /// A rebase adds exactly the distributed amount to supply and each
    /// holder gains their proportional slice (within one unit).
    #[test]
    fn rebase_is_proportional(
        deposits in prop::collection::vec(1u128..1_000_000_000_000, 1..8),
        distribution in 0u128..1_000_000_000_000,
    ) {
        let mut ledger = make_ledger();
        let c = controller();
        for (i, amount) in deposits.iter().enumerate() {
            ledger.mint(&c, &holder(i as u8), *amount).unwrap();
        }
        let supply_before = ledger.total_supply();
        let before: Vec<u128> = (0..deposits.len()).map(|i| ledger.balance_of(&holder(i as u8))).collect();

        prop_assert_eq!(ledger.rebase(&c, distribution).unwrap(), distribution);
        prop_assert_eq!(ledger.total_supply(), supply_before + distribution);

        for (i, b) in before.iter().enumerate() {
            let after = ledger.balance_of(&holder(i as u8));
            let expected_gain = b * distribution / supply_before;
            let gain = after - b;
            prop_assert!(gain + 1 >= expected_gain && gain <= expected_gain + 1,
                "holder {} gained {} expected ~{}", i, gain, expected_gain);
        }
    }

    /// Repeated rebases never let holder balances exceed supply, and the
    /// shortfall stays bounded by the holder count, not the rebase count.
    #[test]
    fn drift_bounded_by_holders(
        deposits in prop::collection::vec(1u128..1_000_000_000, 1..6),
        rebases in prop::collection::vec(1u128..1_000_000_000, 1..40),
    ) {
        let mut ledger = make_ledger();
        let c = controller();
        for (i, amount) in deposits.iter().enumerate() {
            ledger.mint(&c, &holder(i as u8), *amount).unwrap();
        }
        let holders = deposits.len() as u8;
        for amount in rebases {
            ledger.rebase(&c, amount).unwrap();
            let sum = sum_balances(&ledger, holders);
            prop_assert!(sum <= ledger.total_supply());
            prop_assert!(ledger.total_supply() - sum <= holders as u128);
        }
    }

    /// The scalar never decreases across mints, burns and rebases.
    #[test]
    fn scalar_non_decreasing(ops in prop::collection::vec((0u8..3, 0u8..4, 1u128..1_000_000_000), 1..60)) {
        let mut ledger = make_ledger();
        let c = controller();
        ledger.mint(&c, &holder(0), 1_000_000).unwrap();
        let mut scalar = ledger.per_share_scalar();
        for (kind, who, amount) in ops {
            let _ = match kind {
                0 => ledger.mint(&c, &holder(who), amount).map(|_| ()),
                1 => {
                    let burnable = amount.min(ledger.balance_of(&holder(who)));
                    ledger.burn(&c, &holder(who), burnable).map(|_| ())
                }
                _ => ledger.rebase(&c, amount).map(|_| ()),
            };
            if ledger.is_empty() {
                scalar = ledger.per_share_scalar();
                continue;
            }
            prop_assert!(ledger.per_share_scalar() >= scalar);
            scalar = ledger.per_share_scalar();
        }
    }

    /// Failed privileged calls by a non-controller leave the ledger intact.
    #[test]
    fn non_controller_cannot_mutate(amount in 1u128..1_000_000, intruder in 1u8..150) {
        let mut ledger = make_ledger();
        ledger.mint(&controller(), &holder(0), 1_000).unwrap();
        let snapshot = bincode::serialize(&ledger).unwrap();
        let who = holder(intruder);
        prop_assert!(matches!(ledger.mint(&who, &who, amount), Err(LedgerError::Unauthorized { .. })), "mint by non-controller must be Unauthorized");
        prop_assert!(matches!(ledger.burn(&who, &holder(0), 1), Err(LedgerError::Unauthorized { .. })), "burn by non-controller must be Unauthorized");
        prop_assert!(matches!(ledger.rebase(&who, amount), Err(LedgerError::Unauthorized { .. })), "rebase by non-controller must be Unauthorized");
        prop_assert_eq!(bincode::serialize(&ledger).unwrap(), snapshot);
    }
}
