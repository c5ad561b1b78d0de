//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders, configuration and a token macro for
//! creating state machines with minimal boilerplate while keeping rule sets
//! validated up front.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use config::{MachineConfig, DEFAULT_HISTORY_LIMIT};
pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Token, Transition};

/// Create a transition that always fires on `event`.
///
/// # Example
///
/// ```
/// use flying_fsm::builder::certain;
/// use flying_fsm::token_enum;
///
/// token_enum! {
///     enum Light {
///         Red,
///         Green,
///     }
/// }
///
/// token_enum! {
///     enum Signal {
///         Go,
///     }
/// }
///
/// let transition = certain(Light::Red, Signal::Go, Light::Green);
/// assert_eq!(transition.probability(), 1.0);
/// ```
pub fn certain<S: Token, E: Token>(from: S, event: E, to: S) -> Transition<S, E> {
    Transition::new(from, event, to)
}

/// Create a transition with the given weight.
///
/// # Example
///
/// ```
/// use flying_fsm::builder::weighted;
///
/// let transition = weighted("calm".to_string(), "tick".to_string(), "storm".to_string(), 0.1);
/// assert_eq!(transition.probability(), 0.1);
/// ```
pub fn weighted<S: Token, E: Token>(from: S, event: E, to: S, probability: f64) -> Transition<S, E> {
    Transition::new(from, event, to).with_probability(probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::token_enum! {
        enum TestState {
            Start,
            Middle,
        }
    }

    crate::token_enum! {
        enum TestEvent {
            Next,
        }
    }

    #[test]
    fn certain_transition_builds() {
        let transition = certain(TestState::Start, TestEvent::Next, TestState::Middle);

        assert_eq!(transition.from_state(), &TestState::Start);
        assert_eq!(transition.to_state(), &TestState::Middle);
        assert_eq!(transition.probability(), 1.0);
    }

    #[test]
    fn weighted_transition_keeps_probability() {
        let transition = weighted(TestState::Start, TestEvent::Next, TestState::Middle, 0.25);
        assert_eq!(transition.probability(), 0.25);
    }
}
