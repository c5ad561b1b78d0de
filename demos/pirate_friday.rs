//! Pirate Friday
//!
//! This example demonstrates a deterministic two-state machine with hooks.
//!
//! Key concepts:
//! - Certain transitions (probability 1.0)
//! - Event hooks that veto a transition
//! - Post-commit hooks attached to a stored rule
//! - Unmatched events leave the machine alone
//!
//! Run with: RUST_LOG=flying_fsm=debug cargo run --example pirate_friday

use flying_fsm::builder::{certain, StateMachineBuilder};
use flying_fsm::core::{EventHook, PostHook, Transition};
use flying_fsm::machine::StateMachine;
use flying_fsm::token_enum;
use tracing_subscriber::EnvFilter;

token_enum! {
    enum Mood {
        Normal,
        Pirate,
    }
}

token_enum! {
    enum Day {
        Friday,
        NotFriday,
        Unrelated,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Pirate Friday ===\n");

    let mut machine = StateMachineBuilder::new()
        .initial(Mood::Normal)
        .transition(certain(Mood::Normal, Day::Friday, Mood::Pirate))
        .transition(certain(Mood::Pirate, Day::NotFriday, Mood::Normal))
        .build()
        .unwrap();

    machine
        .add_transition_hook(
            &Transition::new(Mood::Normal, Day::Friday, Mood::Pirate),
            PostHook::new(|_t: &Transition<Mood, Day>| println!("  Arr! Hoist the colours.")),
        )
        .unwrap();

    println!("Initial mood: {:?}", machine.current_state());
    println!("Friday      -> {:?}", machine.input(Day::Friday).unwrap());
    println!("Unrelated   -> {:?}", machine.input(Day::Unrelated).unwrap());

    // A stubborn pirate refuses to go back.
    let stubborn = EventHook::new(|_d: &Day, m: &StateMachine<Mood, Day>| {
        println!("  Refusing to become {:?}", m.next_state());
        false
    });
    machine.add_event_hook(Day::NotFriday, stubborn.clone());
    println!("NotFriday   -> {:?} (vetoed)", machine.input(Day::NotFriday).unwrap());

    machine.remove_event_hook(&Day::NotFriday, &stubborn);
    println!("NotFriday   -> {:?}", machine.input(Day::NotFriday).unwrap());

    println!("\nPath: {:?}", machine.history().get_path());
    println!("\n{}", machine.touched());

    println!("\n=== Example Complete ===");
}
