//! Event-driven execution of a rule set.
//!
//! A [`StateMachine`] resolves each incoming event to at most one committed
//! transition:
//!
//! - **Resolution**: candidates are the rules matching the current state and
//!   the event
//! - **Selection**: one candidate is drawn by weight from the machine's
//!   [`RandomSource`]
//! - **Veto**: event hooks may refuse the drawn transition
//! - **Commit**: the state moves and the transition's own hooks run
//!
//! Execution is synchronous. `input` takes `&mut self`, so concurrent use of
//! one machine needs external locking such as a `Mutex`.

mod definition;
mod random;
mod render;
mod state_machine;

pub use definition::MachineDefinition;
pub use random::{entropy, from_fn, seeded, FnSource, RandomSource};
pub use state_machine::StateMachine;
