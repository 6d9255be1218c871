//! Sky mask and frame selection benchmarks
//!
//! - Circular mask over HEALPix grids of increasing order
//! - Frame selection over a long catalog
//!
//! Run with: cargo bench --bench sky_mask

use burst_plan::frame::{select_frames, FrameRecord};
use burst_plan::sky::{build_mask, CoordinateMode, SkyGrid};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Benchmark mask construction per HEALPix order
fn bench_build_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_mask_healpix");

    for order in [5_u32, 7] {
        let grid = SkyGrid::healpix(order).unwrap();
        group.bench_with_input(BenchmarkId::new("celestial", order), &grid, |b, grid| {
            b.iter(|| {
                build_mask(
                    black_box(grid),
                    black_box(-30.0),
                    black_box(200.0),
                    black_box(10.0),
                    CoordinateMode::Celestial,
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark frame selection over one day of 4 s frames
fn bench_select_frames(c: &mut Criterion) {
    let frames: Vec<FrameRecord> = (0..21_600_u32)
        .map(|i| {
            let start = 1_200_000_000.0 + f64::from(i) * 4.0;
            FrameRecord::new("H1", format!("/d/H-H1-{start}-4.gwf"), start, 4.0).unwrap()
        })
        .collect();

    c.bench_function("select_frames_21600", |b| {
        b.iter(|| {
            select_frames(
                black_box(&frames),
                black_box(1_200_040_000.0),
                black_box(1_200_040_600.0),
                8.0,
            )
        });
    });
}

criterion_group!(benches, bench_build_mask, bench_select_frames);
criterion_main!(benches);
