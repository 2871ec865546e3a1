use criterion::{criterion_group, criterion_main, Criterion};
use blockmaze::{
    generators::RecursiveBacktracker,
    grid::MazeGrid,
    units::{Height, Width},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn recursive_backtracker_maze(size: usize) -> usize {
    let mut g = MazeGrid::new(Width(size), Height(size)).unwrap();
    RecursiveBacktracker::new(&mut g, XorShiftRng::seed_from_u64(size as u64))
        .run_to_completion()
        .unwrap()
}

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_32", |b| b.iter(|| recursive_backtracker_maze(32)));
}

fn bench_recursive_backtracker_maze_128(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_128", |b| b.iter(|| recursive_backtracker_maze(128)));
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_128
);
criterion_main!(benches);
