use std::hint::black_box;
use std::time::Instant;

use ringflight_common::{Aabb, GameConfig};
use ringflight_input::ControlFrame;
use ringflight_kernel::{LevelGrid, Simulation};

/// A `rows x cols` level with every cell occupied, cycling through the
/// movement codes.
fn make_level(rows: usize, cols: usize) -> LevelGrid {
    let codes = ['S', 'H', 'V', 'C', 'A'];
    let mut text = format!("{rows} {cols}\n");
    for r in 0..rows {
        for c in 0..cols {
            let height = 1 + (r + c) % 6;
            text.push_str(&format!("{height}{} ", codes[(r * cols + c) % codes.len()]));
        }
        text.push('\n');
    }
    LevelGrid::parse("bench", &text).expect("generated level parses")
}

fn make_sim(rows: usize, cols: usize) -> Simulation {
    Simulation::new(GameConfig::default(), vec![make_level(rows, cols)], Aabb::default())
        .expect("bench simulation")
}

fn bench_autopilot_ticks(rows: usize, cols: usize, iterations: usize) {
    let mut sim = make_sim(rows, cols);
    let frame = ControlFrame::default();

    let start = Instant::now();
    for _ in 0..iterations {
        sim.step(black_box(&frame));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  autopilot step ({} rings, {iterations} ticks): {per_iter:?}/tick, total {elapsed:?}",
        rows * cols
    );
    black_box(sim.drain_events());
}

fn bench_track_rebuild(rows: usize, cols: usize, iterations: usize) {
    let mut sim = make_sim(rows, cols);

    let start = Instant::now();
    for _ in 0..iterations {
        sim.start_demo();
        black_box(sim.track());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  track rebuild ({} rings, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        rows * cols
    );
}

fn main() {
    println!("=== Simulation Tick Benchmarks ===\n");

    println!("Autopilot step:");
    bench_autopilot_ticks(5, 3, 100_000);
    bench_autopilot_ticks(50, 9, 100_000);
    bench_autopilot_ticks(500, 9, 10_000);

    println!("\nTrack rebuild:");
    bench_track_rebuild(5, 3, 10_000);
    bench_track_rebuild(500, 9, 100);

    println!("\n=== Done ===");
}
