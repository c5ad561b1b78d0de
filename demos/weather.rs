//! Weighted Weather
//!
//! This example demonstrates probabilistic branching with a shared rule set.
//!
//! Key concepts:
//! - Equal splits with `to_any` and resets with `from_any`
//! - A group summing below 1.0 leaves room to stay put
//! - Several seeded machines sharing one definition
//! - Exporting the declarations as JSON
//!
//! Run with: cargo run --example weather

use flying_fsm::builder::{weighted, StateMachineBuilder};
use flying_fsm::core::{Enumerable, Transition};
use flying_fsm::token_enum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

token_enum! {
    enum Weather {
        Sunny,
        Cloudy,
        Rainy,
        Storm,
    }
}

token_enum! {
    enum Tick {
        Hour,
        Clear,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Weighted Weather ===\n");

    let definition = StateMachineBuilder::new()
        .initial(Weather::Sunny)
        .transitions(
            Transition::to_any(Weather::Sunny, Tick::Hour, [Weather::Cloudy, Weather::Rainy], 0.4)
                .unwrap(),
        )
        .transition(weighted(Weather::Cloudy, Tick::Hour, Weather::Rainy, 0.5))
        .transition(weighted(Weather::Cloudy, Tick::Hour, Weather::Sunny, 0.5))
        .transition(weighted(Weather::Rainy, Tick::Hour, Weather::Storm, 0.1))
        .transitions(Transition::from_any(
            Weather::all(),
            Tick::Clear,
            Weather::Sunny,
            1.0,
        ))
        .definition()
        .unwrap();

    for town in 0..3u64 {
        let mut machine = definition.instantiate_with(Box::new(StdRng::seed_from_u64(town)));
        let mut tally: BTreeMap<Weather, usize> = BTreeMap::new();
        for _ in 0..24 {
            let weather = machine.input(Tick::Hour).unwrap();
            *tally.entry(weather).or_default() += 1;
        }
        machine.input(Tick::Clear).unwrap();
        println!("Town {town}: {tally:?}, cleared to {:?}", machine.current_state());
    }

    println!("\nDeclarations:\n{}", definition.rules().to_json().unwrap());

    println!("\n=== Example Complete ===");
}
