//! Benchmarks for skin weight operations.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use heft::algo::limit::limit_rows;
use heft::algo::normalize::normalize_rows;
use heft::algo::smooth::{average_weights, AverageOptions};
use heft::prelude::*;

const INFLUENCES: usize = 8;

fn create_grid_skin(n: usize) -> (Topology, WeightMatrix) {
    let mut faces = Vec::with_capacity(n * n * 2);

    // Create triangles
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    let num_vertices = (n + 1) * (n + 1);
    let topo = Topology::from_triangles(num_vertices, &faces).unwrap();

    // Bands of influence along x, with a little noise from the vertex index
    let influences = InfluenceSet::new((0..INFLUENCES).map(|i| format!("bone{}", i))).unwrap();
    let rows: Vec<Vec<f64>> = (0..num_vertices)
        .map(|v| {
            let x = v % (n + 1);
            (0..INFLUENCES)
                .map(|k| {
                    let band = (x * INFLUENCES / (n + 1)) as f64;
                    let d = (band - k as f64).abs();
                    1.0 / (1.0 + d * d) + ((v * 31 + k * 17) % 7) as f64 * 0.01
                })
                .collect()
        })
        .collect();
    let weights = WeightMatrix::from_rows(influences, &rows).unwrap();

    (topo, weights)
}

fn bench_average(c: &mut Criterion) {
    let (topo, weights) = create_grid_skin(100);
    let targets = TargetSet::all(weights.num_vertices());
    let ids: Vec<VertexId> = topo.vertex_ids().collect();
    let snapshot = weights.snapshot(&ids).unwrap();

    c.bench_function("average_grid_100x100_parallel", |b| {
        let options = AverageOptions::default().with_blend(0.5).with_iterations(3);
        b.iter(|| average_weights(&topo, &snapshot, &targets, &options).unwrap());
    });

    c.bench_function("average_grid_100x100_sequential", |b| {
        let options = AverageOptions::default().with_blend(0.5).with_iterations(3).sequential();
        b.iter(|| average_weights(&topo, &snapshot, &targets, &options).unwrap());
    });
}

fn bench_limit_normalize(c: &mut Criterion) {
    let (topo, weights) = create_grid_skin(100);
    let ids: Vec<VertexId> = topo.vertex_ids().collect();
    let snapshot = weights.snapshot(&ids).unwrap();

    c.bench_function("limit4_normalize_grid_100x100", |b| {
        b.iter_batched(
            || snapshot.clone(),
            |mut rows| {
                limit_rows(&mut rows, 4);
                normalize_rows(&mut rows);
                rows
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let (topo, weights) = create_grid_skin(100);
    let influences = weights.influences().clone();
    let targets = TargetSet::all(weights.num_vertices());
    let config = SkinConfig::default().with_blend_factor(0.5).with_max_influences(4);

    c.bench_function("pipeline_grid_100x100", |b| {
        b.iter_batched(
            || weights.clone(),
            |mut weights| run(&topo, &mut weights, &influences, &targets, &config).unwrap(),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_average, bench_limit_normalize, bench_pipeline);
criterion_main!(benches);
