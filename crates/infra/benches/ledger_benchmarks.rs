use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockledger_core::OwnerId;
use stockledger_infra::audit_log::InMemoryAuditLog;
use stockledger_infra::store::InMemoryRecordStore;
use stockledger_infra::{Ledger, NewRecord};
use stockledger_inventory::{AuditAction, FilterCriteria};

type BenchLedger = Ledger<InMemoryRecordStore, InMemoryAuditLog>;

fn setup() -> (BenchLedger, OwnerId) {
    (
        Ledger::new(InMemoryRecordStore::new(), InMemoryAuditLog::new()),
        OwnerId::new(),
    )
}

fn draft(i: usize, quantity: i64) -> NewRecord {
    NewRecord {
        name: format!("Item {i}"),
        category: Some(format!("cat-{}", i % 8)),
        quantity,
        capital_price: 100,
        selling_price: 150,
        image: None,
    }
}

fn bench_operation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("operation_latency");

    group.bench_function("create_record", |b| {
        let (ledger, owner) = setup();
        let mut i = 0;
        b.iter(|| {
            i += 1;
            ledger.create(owner, black_box(draft(i, 10))).unwrap();
        });
    });

    group.bench_function("consume_one_unit", |b| {
        let (ledger, owner) = setup();
        let id = ledger.create(owner, draft(0, i64::MAX)).unwrap().record_id();
        b.iter(|| {
            ledger.consume(owner, id, black_box(1)).unwrap();
        });
    });

    group.bench_function("create_then_delete", |b| {
        let (ledger, owner) = setup();
        b.iter(|| {
            let id = ledger.create(owner, draft(0, 1)).unwrap().record_id();
            ledger.delete(owner, id).unwrap();
        });
    });

    group.finish();
}

fn bench_filter_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_scaling");

    for size in [10_usize, 100, 1000] {
        let (ledger, owner) = setup();
        for i in 0..size {
            let id = ledger.create(owner, draft(i, 100)).unwrap().record_id();
            ledger.consume(owner, id, (i % 50 + 1) as i64).unwrap();
            if i % 4 == 0 {
                ledger.delete(owner, id).unwrap();
            }
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("used_range", size), &size, |b, _| {
            let criteria = FilterCriteria {
                min_used: Some(10),
                max_used: Some(30),
                ..FilterCriteria::default()
            };
            b.iter(|| black_box(ledger.filter(owner, &criteria).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("deleted_only", size), &size, |b, _| {
            let criteria = FilterCriteria {
                action: Some(AuditAction::Delete),
                ..FilterCriteria::default()
            };
            b.iter(|| black_box(ledger.filter(owner, &criteria).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("summary", size), &size, |b, _| {
            b.iter(|| black_box(ledger.summary(owner).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_operation_latency, bench_filter_scaling);
criterion_main!(benches);
