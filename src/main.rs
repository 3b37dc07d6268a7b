use std::time::Instant;

use traffic_dodge::{Simulation, SimulationConfig};

/// The simulated frame rate of the host loop.
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);
    let mut sim = match Simulation::with_seed(SimulationConfig::default(), seed) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    println!("Simulating with seed {}...", seed);
    let num_frames = 60 * 60;
    let mut now = 0.0;
    for minute in 1..=5 {
        let (mut collisions, mut lane_changes, mut resets) = (0, 0, 0);
        let start = Instant::now();
        for _ in 0..num_frames {
            now += FRAME_MS;
            let report = sim.step(now);
            collisions += report.collision as usize;
            lane_changes += report.lane_changes;
            resets += report.deadlock_reset as usize;
        }
        let frame = start.elapsed() / num_frames;
        println!(
            "Minute {}: avg. frame {:?}, {} obstacles, speed {:.2}x, {} collision frames, {} lane changes, {} resets",
            minute,
            frame,
            sim.iter_obstacles().count(),
            sim.speed_factor(),
            collisions,
            lane_changes,
            resets,
        );
    }
}
