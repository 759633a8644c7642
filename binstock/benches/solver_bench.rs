use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use itertools::Itertools;
use rand::prelude::SmallRng;
use rand::{Rng, SeedableRng};

use binstock::entities::{BPInstance, CSInstance, SheetInstance};
use binstock::solvers::{bnb, dp, ffd, genetic, knapsack_2d};
use binstock::util::{BnBConfig, GAConfig};

criterion_main!(benches);
criterion_group!(
    benches,
    ffd_bench,
    subset_sum_bench,
    bnb_bench,
    genetic_bench,
    knapsack_2d_bench
);

const N_ITEMS: [usize; 3] = [100, 1_000, 10_000];
const CAPACITY: u64 = 1000;

fn create_bp_instance(n_items: usize, capacity: u64, seed: u64) -> BPInstance {
    let mut rng = SmallRng::seed_from_u64(seed);
    let sizes = (0..n_items)
        .map(|_| rng.random_range(1..=capacity))
        .collect_vec();
    BPInstance::new(sizes, capacity)
}

/// First-Fit-Decreasing on uniformly distributed item sizes
fn ffd_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("ffd");
    for n_items in N_ITEMS {
        let instance = create_bp_instance(n_items, CAPACITY, 0);
        group.bench_function(BenchmarkId::from_parameter(n_items), |b| {
            b.iter(|| ffd::solve(&instance))
        });
    }
    group.finish();
}

fn subset_sum_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset_sum");
    for capacity in [1_000, 10_000, 100_000] {
        let instance = create_bp_instance(200, capacity, 0);
        group.bench_function(BenchmarkId::from_parameter(capacity), |b| {
            b.iter(|| dp::SubsetSumTable::build(&instance))
        });
    }
    group.finish();
}

/// Branch-and-bound on small instances, the node budget keeps the slowest ones bounded
fn bnb_bench(c: &mut Criterion) {
    let config = BnBConfig {
        node_limit: Some(1_000_000),
        ..Default::default()
    };
    let mut group = c.benchmark_group("bnb");
    group.sample_size(10);
    for n_types in [4, 6, 8] {
        let mut rng = SmallRng::seed_from_u64(0);
        let lengths = (0..n_types)
            .map(|_| rng.random_range(10..=60))
            .collect_vec();
        let demands = (0..n_types).map(|_| rng.random_range(1..=3)).collect_vec();
        let instance = CSInstance::new(&lengths, &demands, 100).unwrap();
        group.bench_function(BenchmarkId::from_parameter(n_types), |b| {
            b.iter(|| bnb::solve(&instance, &config))
        });
    }
    group.finish();
}

fn genetic_bench(c: &mut Criterion) {
    let config = GAConfig {
        generations: 50,
        ..Default::default()
    };
    let mut group = c.benchmark_group("genetic");
    group.sample_size(10);
    for n_items in [50, 200] {
        let instance = create_bp_instance(n_items, CAPACITY, 0);
        let mut rng = SmallRng::seed_from_u64(0);
        group.bench_function(BenchmarkId::from_parameter(n_items), |b| {
            b.iter(|| genetic::solve(&instance, &config, &mut rng))
        });
    }
    group.finish();
}

fn knapsack_2d_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("knapsack_2d");
    for side in [100, 300] {
        let mut rng = SmallRng::seed_from_u64(0);
        let dims = (0..20)
            .map(|_| (rng.random_range(1..=side / 4), rng.random_range(1..=side / 4)))
            .collect_vec();
        let instance = SheetInstance::new(dims, side, side);
        group.bench_function(BenchmarkId::from_parameter(side), |b| {
            b.iter(|| knapsack_2d::solve(&instance))
        });
    }
    group.finish();
}
