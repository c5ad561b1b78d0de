//! Flying FSM: a finite state machine engine with weighted-random branching.
//!
//! A machine is driven one discrete event at a time. Each event is resolved
//! against a declared rule set to at most one committed transition.
//!
//! # Core Concepts
//!
//! - **Token**: opaque, hashable state and event identifiers via the `Token` trait
//! - **Transition**: a `(from, event, to, probability)` rule owning post-commit hooks
//! - **Rule set**: the validated collection of transitions, shareable between machines
//! - **Event hooks**: callbacks consulted before a commit that may veto it
//! - **Weighted selection**: candidates sharing `(state, event)` are drawn by weight
//!   from an injected random source
//!
//! # Example
//!
//! ```rust
//! use flying_fsm::builder::StateMachineBuilder;
//! use flying_fsm::core::{EventHook, Transition};
//! use flying_fsm::machine::StateMachine;
//! use flying_fsm::token_enum;
//!
//! token_enum! {
//!     enum Mood {
//!         Normal,
//!         Pirate,
//!     }
//! }
//!
//! token_enum! {
//!     enum Day {
//!         Friday,
//!         NotFriday,
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::new()
//!     .initial(Mood::Normal)
//!     .transition(Transition::new(Mood::Normal, Day::Friday, Mood::Pirate))
//!     .transition(Transition::new(Mood::Pirate, Day::NotFriday, Mood::Normal))
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(machine.input(Day::Friday).unwrap(), Mood::Pirate);
//!
//! // Refuse to stop being a pirate.
//! machine.add_event_hook(
//!     Day::NotFriday,
//!     EventHook::new(|_day: &Day, _m: &StateMachine<Mood, Day>| false),
//! );
//! assert_eq!(machine.input(Day::NotFriday).unwrap(), Mood::Pirate);
//! assert_eq!(machine.next_state(), Some(&Mood::Normal));
//! ```

pub mod builder;
pub mod codec;
pub mod core;
pub mod error;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineConfig, StateMachineBuilder, TransitionBuilder};
pub use codec::CodecError;
pub use core::{EventHook, HookError, PostHook, RuleSet, Token, Transition};
pub use error::FsmError;
pub use machine::{MachineDefinition, RandomSource, StateMachine};
