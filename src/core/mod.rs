//! Core types: tokens, transitions, rule sets, hooks and history.
//!
//! This module holds the declarative side of a state machine:
//! - Identifier tokens via the `Token` trait
//! - Transition declarations with their post-commit hooks
//! - Rule sets with probability validation
//! - History of committed transitions
//!
//! The resolution algorithm that drives a machine lives in `machine`.

mod history;
mod hook;
mod rules;
mod token;
mod transition;

pub use history::{StateHistory, TransitionRecord};
pub use hook::{EventHook, HookError, PostHook};
pub use rules::{RuleSet, RuleViolation, PROBABILITY_TOLERANCE};
pub use token::{Enumerable, Token};
pub use transition::Transition;
