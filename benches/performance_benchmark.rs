use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fitdesk::domain::ledger::{fields, Category, EntryStatus, LedgerEntry};
use fitdesk::domain::record::{collect, Collection, RecordId};
use fitdesk::repository::{ListAction, ListStore};
use fitdesk::services::billing_service::ledger_spec;
use fitdesk::view::{derive_view, SortDirection, ViewControls};
use rand::Rng;
use std::time::Duration;

const DESCRIPTIONS: [&str; 5] = [
    "Mensalidade",
    "Aluguel do espaço",
    "Conta de luz",
    "Personal trainer",
    "Manutenção de equipamentos",
];

fn create_ledger(count: usize) -> Collection<LedgerEntry> {
    let mut rng = rand::thread_rng();

    collect((1..=count).map(|i| {
        LedgerEntry::new(
            RecordId::from(i as u64),
            &format!("{} - {}", DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())], i),
            rng.gen_range(50.0..5000.0),
            &format!("{:02}/{:02}/2024", rng.gen_range(1..=28), rng.gen_range(1..=12)),
            if rng.gen_bool(0.7) { EntryStatus::Paid } else { EntryStatus::Pending },
            if rng.gen_bool(0.6) { Category::Income } else { Category::Expense },
        )
    }))
}

fn bench_derive_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_view");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    let spec = ledger_spec();
    let controls = ViewControls::default()
        .with_search("men")
        .with_filter("receita")
        .sorted_by(fields::DATE, SortDirection::Desc);

    for count in [1_000, 10_000, 50_000] {
        let ledger = create_ledger(count);
        group.bench_with_input(BenchmarkId::new("search_filter_sort", count), &ledger, |b, ledger| {
            b.iter(|| derive_view(black_box(ledger), &spec, &controls));
        });
    }

    group.finish();
}

fn bench_sort_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_only");
    group.sample_size(10);

    let spec = ledger_spec();
    let ledger = create_ledger(20_000);

    for column in [fields::AMOUNT, fields::DATE, fields::DESCRIPTION] {
        let controls = ViewControls::default().sorted_by(column, SortDirection::Asc);
        group.bench_with_input(BenchmarkId::new("column", column), &controls, |b, controls| {
            b.iter(|| derive_view(black_box(&ledger), &spec, controls));
        });
    }

    group.finish();
}

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");
    group.sample_size(10);

    let ledger = create_ledger(10_000);

    group.bench_function("remove_middle", |b| {
        b.iter_batched(
            || ListStore::new("ledger", ledger.clone()),
            |mut store| store.apply(ListAction::Remove(RecordId::from(5_000u64))),
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("add", |b| {
        b.iter_batched(
            || ListStore::new("ledger", ledger.clone()),
            |mut store| {
                store.apply(ListAction::Add(LedgerEntry::new(
                    "",
                    "Nova transação",
                    100.0,
                    "01/01/2024",
                    EntryStatus::Pending,
                    Category::Income,
                )))
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_derive_view, bench_sort_only, bench_mutations);
criterion_main!(benches);
