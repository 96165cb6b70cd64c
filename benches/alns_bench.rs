//! Criterion benchmarks for the fence-placement search.
//!
//! Uses synthetic instances with known optima (a ladder of cycles sharing
//! one edge, and overlapping bands) to measure engine overhead independent
//! of any litmus-test frontend.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tso_fence::aeg::{AbstractEventGraph, AccessKind, CriticalCycle, Edge, EdgeKind, Node};
use tso_fence::alns::{AlnsConfig, AlnsRunner, DestroyOp, InitialStateGen, RepairOp, StopPolicy};
use tso_fence::ilp::GreedyCoverSolver;
use tso_fence::problem::ProblemInstance;

fn ring_graph(edge_count: usize) -> AbstractEventGraph {
    let nodes = (0..edge_count)
        .map(|i| {
            let kind = if i % 2 == 0 {
                AccessKind::Write
            } else {
                AccessKind::Read
            };
            Node::new(i, kind, format!("t{}", i / 4 + 1), ["x", "y", "z"][i % 3])
        })
        .collect();
    let edges = (0..edge_count)
        .map(|i| Edge::new(i, i, (i + 1) % edge_count, EdgeKind::ProgramOrder))
        .collect();
    AbstractEventGraph::new(nodes, edges).unwrap()
}

/// `k` cycles that all share edge `k`; the optimum is one fence.
fn ladder_instance(k: usize) -> ProblemInstance {
    let graph = ring_graph(k + 1);
    let cycles = (0..k)
        .map(|i| CriticalCycle::new(vec![i, i + 1], vec![i, k]))
        .collect();
    ProblemInstance::new(graph, cycles).unwrap()
}

/// `count` cycles whose candidate bands overlap their `width - 1` neighbors.
fn banded_instance(count: usize, width: usize) -> ProblemInstance {
    let graph = ring_graph(count + width);
    let cycles = (0..count)
        .map(|j| {
            let band: Vec<usize> = (j..j + width).collect();
            CriticalCycle::new(band.clone(), band)
        })
        .collect();
    ProblemInstance::new(graph, cycles).unwrap()
}

fn bench_search_to_optimum(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_to_optimum");
    group.sample_size(10);

    for &k in &[16usize, 64, 256] {
        let instance = ladder_instance(k);
        let config = AlnsConfig::default()
            .with_initial(InitialStateGen::FirstEdges)
            .with_seed(42)
            .with_stop(StopPolicy::until_objective_capped(
                1,
                Duration::from_secs(10),
            ));
        group.bench_with_input(
            BenchmarkId::from_parameter(k),
            &(instance, config),
            |b, (instance, config)| {
                b.iter(|| {
                    let result = AlnsRunner::run(black_box(instance), black_box(config));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_destroy_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("destroy");

    let instance = banded_instance(200, 8);
    let state = InitialStateGen::FirstEdges.generate(&instance, None).unwrap();
    for op in DestroyOp::default_portfolio() {
        group.bench_with_input(BenchmarkId::from_parameter(op), &op, |b, op| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(7);
                black_box(op.apply(black_box(&state), &mut rng))
            })
        });
    }
    group.finish();
}

fn bench_repair_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair");

    let instance = banded_instance(200, 8);
    let seeded = InitialStateGen::FirstEdges.generate(&instance, None).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let torn = DestroyOp::Random { pct: 0.30 }.apply(&seeded, &mut rng);
    let solver = GreedyCoverSolver::new();

    for op in [
        RepairOp::UnbrokenRandom,
        RepairOp::HotEdges,
        RepairOp::InDegrees,
        RepairOp::MostCycles,
        RepairOp::IlpPartial,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(op), &op, |b, op| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(9);
                let repaired = op.apply(black_box(torn.clone()), &mut rng, Some(&solver));
                black_box(repaired)
            })
        });
    }
    group.finish();
}

fn bench_initial_states(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_state");

    let instance = banded_instance(400, 6);
    let solver = GreedyCoverSolver::new();
    for generator in [
        InitialStateGen::FirstEdges,
        InitialStateGen::HotEdges,
        InitialStateGen::Ilp,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(generator.name()),
            &generator,
            |b, generator| {
                b.iter(|| black_box(generator.generate(black_box(&instance), Some(&solver))))
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_search_to_optimum,
    bench_destroy_ops,
    bench_repair_ops,
    bench_initial_states
);
criterion_main!(benches);
