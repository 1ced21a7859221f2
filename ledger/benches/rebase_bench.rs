use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rbpool_ledger::RebasingLedger;
use rbpool_types::Address;

fn populated_ledger(holders: u32) -> (RebasingLedger, Address) {
    let admin = Address::ZERO;
    let controller = Address::new([0xC0; 32]);
    let mut ledger = RebasingLedger::red(admin);
    ledger.set_controller(&admin, controller).unwrap();
    for i in 0..holders {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&i.to_be_bytes());
        bytes[31] = 1;
        ledger.mint(&controller, &Address::new(bytes), 1_000_000_000).unwrap();
    }
    (ledger, controller)
}

/// Rebase cost must not depend on the number of holders.
fn rebase_by_holder_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebase");
    for holders in [10u32, 1_000, 100_000] {
        let (mut ledger, controller) = populated_ledger(holders);
        group.bench_with_input(BenchmarkId::from_parameter(holders), &holders, |b, _| {
            b.iter(|| ledger.rebase(&controller, black_box(1_000)).unwrap())
        });
    }
    group.finish();
}

fn balance_of_bench(c: &mut Criterion) {
    let (ledger, _) = populated_ledger(1_000);
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    let holder = Address::new(bytes);

    c.bench_function("balance_of", |b| b.iter(|| ledger.balance_of(black_box(&holder))));
}

criterion_group!(benches, rebase_by_holder_count, balance_of_bench);
criterion_main!(benches);
