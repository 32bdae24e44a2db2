//! # Arena Demo
//!
//! Pits a few small programs against each other on a shared core.

use agony_vm::{Arena, ArenaConfig};

fn main() {
    println!("=== Agony Arena Demo ===\n");

    let warriors = [
        // Halts on its first turn
        "$",
        // Walks right forever, overwriting nothing
        "}}}}}}}}}}(}@)",
        // Bombs the cells ahead of it with halts
        "@(}>~@)",
    ];

    let config = ArenaConfig {
        core_size: 2000,
        rounds: 50,
        max_cycles: 5_000,
        seed: Some(7),
        ..ArenaConfig::default()
    };

    let mut arena = match Arena::new(config, warriors) {
        Ok(arena) => arena,
        Err(e) => {
            println!("✗ Error: {}", e);
            return;
        }
    };

    for _ in 0..3 {
        match arena.run_round() {
            Ok(round) => println!(
                "Round {}: {} cycles, survivors {:?}, reward {}",
                round.round, round.cycles, round.survivors, round.reward
            ),
            Err(e) => {
                println!("✗ Error: {}", e);
                return;
            }
        }
    }

    match arena.battle() {
        Ok(report) => {
            println!("\nAfter {} rounds:", report.rounds);
            for (i, score) in report.scores.iter().enumerate() {
                println!("  W{} ({}): {}", i + 1, warriors[i], score);
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }
}
