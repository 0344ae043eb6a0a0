//! Placement sampler benchmarks.
//!
//! Measures the near-point sampler in the easy case (first draw accepted) and
//! the worst case (no acceptable point exists, so every attempt up to the
//! cap is made), plus a full resolution pass over generated missions of
//! increasing size.
//!
//! Run with: `cargo bench -p waypoints --bench sampler_bench --features bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use waypoints::geodesy::{sample_near_point, GeoPoint, NearRequest};
use waypoints::mission_rng::MissionRng;
use waypoints::test_harness::{active_mission, doc, generator, kerbin, Terrain, TestEnvironment};

// ---------------------------------------------------------------------------
// Near sampler
// ---------------------------------------------------------------------------

fn bench_near_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("near_sampler");

    let body = kerbin();
    let easy = NearRequest {
        anchor: GeoPoint::new(0.0, 20.0),
        min_distance: 500.0,
        max_distance: 5_000.0,
        underwater: false,
        water_allowed: true,
    };
    group.bench_function("first_draw", |b| {
        let mut rng = MissionRng::from_seed_u64(7);
        b.iter(|| black_box(sample_near_point(&body, black_box(&easy), &mut rng.0)))
    });

    // Dry land is required but the whole body is sea floor.
    let drowned = kerbin().with_terrain(Terrain::Flat(-50.0));
    let impossible = NearRequest {
        water_allowed: false,
        ..easy
    };
    group.sample_size(10);
    group.bench_function("exhausted", |b| {
        let mut rng = MissionRng::from_seed_u64(7);
        b.iter(|| black_box(sample_near_point(&drowned, black_box(&impossible), &mut rng.0)))
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Full resolution
// ---------------------------------------------------------------------------

fn mission_definitions(count: usize) -> String {
    doc(&format!(
        r#"
        {{ "type": "RandomUniform", "icon": "pin", "count": {count} }},
        {{ "type": "RandomNear", "icon": "pin", "nearIndex": 0, "count": {count}, "chained": true,
           "minDistance": 100.0, "maxDistance": 2000.0, "waterAllowed": false }}
        "#
    ))
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_mission");
    let env = TestEnvironment::standard();

    for count in [10usize, 100, 1_000] {
        let json = mission_definitions(count);
        let template = generator(&json, &active_mission(1, 42), &env);
        group.bench_with_input(BenchmarkId::from_parameter(count * 2), &template, |b, template| {
            b.iter(|| {
                let mut gen = template.clone();
                black_box(gen.resolve(&env))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_near_sampler, bench_resolve);
criterion_main!(benches);
