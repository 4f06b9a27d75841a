//! Criterion benchmarks for sweepscope_core reduction and composition
//!
//! Run with: cargo bench -p sweepscope_core

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sweepscope_core::{DatasetBuilder, Dataset, Role, RunSession, SweepGrouping, RoleAssignment, reduce};

/// `variables` readouts over iteration x flux x freq
fn create_sweep(iterations: usize, points: usize, variables: usize) -> Dataset {
    let dims = ["iteration", "flux", "freq"];
    let mut builder = DatasetBuilder::new("bench")
        .counter("iteration", iterations)
        .linspace("flux", "V", -0.5, 0.5, points)
        .linspace("freq", "Hz", 4.0e9, 6.0e9, points);
    for v in 0..variables {
        builder = builder.variable_fn(format!("qubit{v}__state"), &dims, move |i| ((i * (v + 1)) % 97) as f64);
    }
    builder.build().expect("benchmark dataset")
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    for points in [16, 64, 128] {
        let dataset = create_sweep(10, points, 4);
        let grouping = SweepGrouping::from_dataset(&dataset);
        let roles = RoleAssignment::with_defaults(grouping.logical_dimensions(&dataset));

        group.bench_with_input(BenchmarkId::new("average_to_2d", points), &points, |b, _| {
            b.iter(|| reduce(black_box(&dataset), &grouping, &roles))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let dataset = Arc::new(create_sweep(10, 64, 8));
    let mut session = RunSession::open(Arc::clone(&dataset));
    for name in dataset.variable_names().iter().skip(1) {
        session.toggle_variable_selection(name).expect("known variable");
    }

    c.bench_function("render_8_heatmaps", |b| b.iter(|| black_box(session.render())));

    session
        .set_role("flux", Role::FixedIndex, Some(32))
        .expect("index in range");
    c.bench_function("render_8_lines", |b| b.iter(|| black_box(session.render())));
}

criterion_group!(benches, bench_reduce, bench_render);
criterion_main!(benches);
