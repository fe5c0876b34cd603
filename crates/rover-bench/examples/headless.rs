//! Headless lockstep run.
//!
//! Demonstrates: generate a scene → run ticks at the realtime ratio →
//! inspect the trail map → regenerate → repeat.

use rover_bench::{reference_profile, run_rounds};
use rover_core::Classification;
use rover_engine::Simulation;

fn summarize(sim: &Simulation) {
    let trail = sim.trail();
    let rocks = trail
        .obstacles()
        .values()
        .filter(|c| **c == Classification::Rock)
        .count();
    let m = sim.metrics();
    println!(
        "  visited {:>5} | obstacle points {:>4} ({rocks} rock) | revealed {:>2} | reversals {:>3}",
        trail.visited().len(),
        trail.obstacles().len(),
        m.obstacles_revealed,
        m.reversal_episodes,
    );
    for robot in sim.robots() {
        println!(
            "  {} at {} heading {:+.2} ({})",
            robot.id(),
            robot.position(),
            robot.heading(),
            robot.state()
        );
    }
}

fn main() {
    println!("=== Rover Headless Example ===\n");

    let mut sim = Simulation::generate(reference_profile(42)).unwrap();
    if let Some(report) = sim.generation_report() {
        for (kind, summary) in &report.summaries {
            println!(
                "{kind}: placed {} of {} ({} abandoned, {} rejections)",
                summary.placed, summary.target, summary.abandoned, summary.rejections
            );
        }
        println!("satellite hills: {}\n", report.satellites());
    }

    for episode in 1..=3 {
        println!("Episode {episode}: 2000 rounds (one minute of simulated time)");
        run_rounds(&mut sim, 2000);
        summarize(&sim);
        sim.regenerate(42 + episode).unwrap();
        println!();
    }
}
