//! Benchmarks for aggregation, scoring and selection
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic table shaped like the retail dataset: ~125k
//! transactions spread over ~7k customers.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Transaction, TransactionTable};
use pipeline::{CampaignConfig, ChurnClassifier, CustomerScorer, Selector};

const CUSTOMERS: u64 = 7_000;
const TRANSACTIONS: u64 = 125_000;

fn synthetic_table() -> TransactionTable {
    let start = NaiveDate::from_ymd_opt(2011, 5, 16).unwrap();
    // Deterministic LCG so runs are comparable
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        state >> 33
    };

    let rows = (0..TRANSACTIONS)
        .map(|_| {
            let customer = next() % CUSTOMERS;
            let day = (next() % 3_166) as i64;
            let amount = 10.0 + (next() % 96) as f64;
            Transaction::new(format!("CS{customer:04}"), start + Duration::days(day), amount)
        })
        .collect();
    TransactionTable::from_transactions(rows)
}

fn bench_summarize(c: &mut Criterion) {
    let table = synthetic_table();

    c.bench_function("summarize_customers", |b| {
        b.iter(|| black_box(table.summarize().unwrap()))
    });
}

fn bench_score_and_select(c: &mut Criterion) {
    let table = synthetic_table();
    let config = CampaignConfig::default();
    let customers = table.summarize().unwrap();
    let classifier = ChurnClassifier::from_config(&config, table.latest_date().unwrap()).unwrap();
    let scorer = CustomerScorer::from_config(&config);
    let selector = Selector::from_config(&config);

    c.bench_function("score_all", |b| {
        b.iter(|| black_box(scorer.score_all(black_box(&customers), &classifier).unwrap()))
    });

    c.bench_function("score_and_select", |b| {
        b.iter(|| {
            let scored = scorer.score_all(&customers, &classifier).unwrap();
            black_box(selector.select(scored, black_box(50)).unwrap())
        })
    });
}

criterion_group!(benches, bench_summarize, bench_score_and_select);
criterion_main!(benches);
