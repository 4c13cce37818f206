use criterion::{criterion_group, criterion_main, Criterion};
use nav_grid::{Circle, NavGrid, Rect, Vec2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

fn scattered_obstacles(size: f32, n: usize, rng: &mut StdRng) -> NavGrid {
    let mut grid = NavGrid::new(size, size).unwrap();
    let half = size / 2.0;
    for _ in 0..n {
        let center = Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
        if rng.gen_bool(0.5) {
            grid.mark_obstacle(&Circle::new(center, rng.gen_range(0.5..3.0)));
        } else {
            grid.mark_obstacle(&Rect::centered(
                center,
                rng.gen_range(1.0..6.0),
                rng.gen_range(1.0..6.0),
            ));
        }
    }
    grid
}

fn path_bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    for size in [32.0, 128.0] {
        let grid = scattered_obstacles(size, (size * 0.5) as usize, &mut rng);
        let corner = size / 2.0 - 1.0;
        let start = Vec2::new(-corner, corner);
        let destination = Vec2::new(corner, -corner);
        c.bench_function(format!("{size}x{size}, corner to corner").as_str(), |b| {
            b.iter(|| black_box(grid.search(start, destination)))
        });
    }
}

fn rasterize_bench(c: &mut Criterion) {
    let mut grid = NavGrid::new(128.0, 128.0).unwrap();
    let obstacle = Circle::new(Vec2::new(3.0, -7.0), 20.0);
    c.bench_function("mark and clear circle, r=20", |b| {
        b.iter(|| {
            black_box(grid.mark_obstacle(&obstacle));
            grid.clear();
        })
    });
}

criterion_group!(benches, path_bench, rasterize_bench);
criterion_main!(benches);
