use bevy::math::{IVec2, IVec3};
use criterion::{criterion_group, criterion_main, Criterion};

use bevy_seaway::prelude::*;


fn hull() -> Footprint {
    Footprint::rectangle(3, 7, Heading::North)
}

fn channel(size: u32) -> Grid {
    let mut grid = Grid::new(size, size, 1);
    let mid = size as i32 / 2;
    let top = size as i32 - 1;

    // Two staggered walls leaving a gap at opposite ends.
    grid.fill_solid(IVec3::new(mid / 2, 0, 0), IVec3::new(mid / 2 + 2, top - 24, 0));
    grid.fill_solid(IVec3::new(mid + mid / 2, 24, 0), IVec3::new(mid + mid / 2 + 2, top, 0));
    grid
}

fn benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathfinding");

    group.sample_size(10);

    let open = Grid::new(128, 128, 1);
    let pathfinder = Pathfinder::new(&open);
    group.bench_function("open_water_128x128", |b| {
        b.iter(|| pathfinder.find_path(&hull(), IVec3::new(8, 8, 0), IVec3::new(120, 120, 0), None))
    });

    let grid = channel(256);
    let pathfinder = Pathfinder::new(&grid);
    group.bench_function("channel_256x256", |b| {
        b.iter(|| pathfinder.find_path(&hull(), IVec3::new(8, 8, 0), IVec3::new(248, 248, 0), None))
    });

    group.bench_function("build_lattice_256x256", |b| {
        b.iter(|| NavGraph::from_lattice(&grid, IVec2::ZERO, IVec2::splat(255), 0, 16))
    });

    let graph = NavGraph::from_lattice(&grid, IVec2::ZERO, IVec2::splat(255), 0, 16);
    let pathfinder = Pathfinder::new(&grid).with_graph(Some(&graph));
    group.bench_function("channel_256x256_graph", |b| {
        b.iter(|| pathfinder.find_path(&hull(), IVec3::new(8, 8, 0), IVec3::new(248, 248, 0), None))
    });

    let waypoint_path = pathfinder
        .find_path(&hull(), IVec3::new(8, 8, 0), IVec3::new(248, 248, 0), None)
        .map(|path| path.path().to_vec())
        .unwrap_or_default();
    group.bench_function("to_waypoints", |b| b.iter(|| to_waypoints(&waypoint_path)));

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(profiler::FlamegraphProfiler::new(100)).sample_size(10);
    targets = benchmarks
}

criterion_main!(benches);
