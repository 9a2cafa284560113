//! Normalizer and pagination benchmarks.
//!
//! Run with: `cargo bench --package isshist-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use isshist_bench::{MemoryTransport, bond_rows, history_body, share_rows};
use isshist_fetch::{
    BONDS_LAYOUT, FetchConfig, HistoryFetcher, SHARES_LAYOUT, decode_page, normalize_page,
    normalize_rows,
};
use isshist_types::{InstrumentClass, Market};
use std::hint::black_box;
use std::time::Duration;

fn normalize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));

        let shares = share_rows(size);
        group.bench_with_input(BenchmarkId::new("shares", size), &shares, |b, rows| {
            b.iter(|| normalize_rows(black_box(rows), &SHARES_LAYOUT));
        });

        let bonds = bond_rows(size);
        group.bench_with_input(BenchmarkId::new("bonds", size), &bonds, |b, rows| {
            b.iter(|| normalize_rows(black_box(rows), &BONDS_LAYOUT));
        });
    }

    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let body = history_body(&share_rows(100));
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(body.len() as u64));

    group.bench_function("page_100_shares", |b| {
        b.iter(|| {
            let page = decode_page(black_box(&body)).unwrap();
            normalize_page(&page, InstrumentClass::Equity).unwrap()
        });
    });

    group.finish();
}

fn fetch_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let rows = share_rows(5_000);
    let config = FetchConfig {
        page_delay: Duration::ZERO,
        ..Default::default()
    };
    let fetcher = HistoryFetcher::new(MemoryTransport::paged(&rows), config);

    let mut group = c.benchmark_group("fetch");
    group.throughput(Throughput::Elements(rows.len() as u64));

    group.bench_function("full_history_50_pages", |b| {
        b.to_async(&runtime).iter(|| async {
            let outcome = fetcher
                .fetch_instrument_full_history(Market::Shares, "TQBR", "SBER")
                .await;
            assert!(outcome.is_complete());
            outcome.len()
        });
    });

    group.finish();
}

criterion_group!(benches, normalize_benchmark, decode_benchmark, fetch_benchmark);
criterion_main!(benches);
