//! Micro benchmarks for the longest-prefix-match trie: insert throughput
//! when populating millions of routes, and lookup latency once the table
//! is built. Pure CPU - no IO.
//!
//! ```bash
//! cargo bench --bench bench_trie
//! ```

use criterion::{criterion_group, criterion_main, Criterion};
use ringrouter_lib::Trie;

/// Turns a /24-aligned counter into a distinct routable prefix so inserts
/// don't collide and overwrite each other.
fn nth_prefix(n: u32) -> [u8; 4] {
    let base: u32 = 0x0A00_0000; // 10.0.0.0
    (base + (n << 8)).to_be_bytes()
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("trie_insert_100k_slash_24_routes", |b| {
        b.iter(|| {
            let mut trie = Trie::new();
            for n in 0..100_000u32 {
                trie.insert(std::hint::black_box(nth_prefix(n)), 24, 0, 1);
            }
            trie
        });
    });
}

fn bench_search_hit(c: &mut Criterion) {
    let mut trie = Trie::new();
    for n in 0..1_000_000u32 {
        trie.insert(nth_prefix(n), 24, 0, 1);
    }

    c.bench_function("trie_search_hit_among_1m_routes", |b| {
        let key = nth_prefix(500_000);
        b.iter(|| trie.search(std::hint::black_box(key)));
    });
}

fn bench_search_miss(c: &mut Criterion) {
    let mut trie = Trie::new();
    for n in 0..1_000_000u32 {
        trie.insert(nth_prefix(n), 24, 0, 1);
    }

    c.bench_function("trie_search_miss_among_1m_routes", |b| {
        let key = [172, 16, 0, 1];
        b.iter(|| trie.search(std::hint::black_box(key)));
    });
}

criterion_group!(trie_benches, bench_insert, bench_search_hit, bench_search_miss);
criterion_main!(trie_benches);
