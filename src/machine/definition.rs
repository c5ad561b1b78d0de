//! Validated machine kinds that stamp out instances sharing one rule set.

use super::random::{self, RandomSource};
use super::StateMachine;
use crate::builder::{BuildError, MachineConfig};
use crate::core::{RuleSet, StateHistory, Token};
use std::sync::Arc;
use stillwater::validation::Validation;

/// A checked rule set plus initial state and configuration.
///
/// Plays the role of a machine "kind": build it once, then create as many
/// machines as there are entities to model. All of them share the rule set,
/// so a post-commit hook attached through one machine fires for all of them.
///
/// # Example
///
/// ```rust
/// use flying_fsm::builder::MachineConfig;
/// use flying_fsm::core::{RuleSet, Transition};
/// use flying_fsm::machine::MachineDefinition;
/// use std::sync::Arc;
///
/// let rules: RuleSet<String, String> =
///     [Transition::new("off".into(), "toggle".into(), "on".into())].into_iter().collect();
/// let lamp = MachineDefinition::new(Arc::new(rules), "off".to_string(), MachineConfig::default())
///     .unwrap();
///
/// let mut kitchen = lamp.instantiate();
/// let hallway = lamp.instantiate();
/// kitchen.input("toggle".to_string()).unwrap();
///
/// assert_eq!(kitchen.current_state(), "on");
/// assert_eq!(hallway.current_state(), "off");
/// ```
pub struct MachineDefinition<S: Token, E: Token> {
    rules: Arc<RuleSet<S, E>>,
    initial: S,
    config: MachineConfig,
}

impl<S: Token, E: Token> MachineDefinition<S, E> {
    /// Check the rule set and capture everything needed to create machines.
    pub fn new(
        rules: Arc<RuleSet<S, E>>,
        initial: S,
        config: MachineConfig,
    ) -> Result<Self, BuildError> {
        if rules.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        if config.validate_probabilities {
            if let Validation::Failure(violations) = rules.validate() {
                return Err(BuildError::InvalidRules(violations.iter().cloned().collect()));
            }
        }

        Ok(Self {
            rules,
            initial,
            config,
        })
    }

    pub fn rules(&self) -> &Arc<RuleSet<S, E>> {
        &self.rules
    }

    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// A fresh machine drawing from an OS-seeded generator.
    pub fn instantiate(&self) -> StateMachine<S, E> {
        self.instantiate_with(random::entropy())
    }

    /// A fresh machine drawing from `random`.
    pub fn instantiate_with(&self, random: Box<dyn RandomSource>) -> StateMachine<S, E> {
        let history = match self.config.history_limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };
        StateMachine::new(
            Arc::clone(&self.rules),
            self.initial.clone(),
            history,
            random,
        )
    }
}

impl<S: Token, E: Token> std::fmt::Debug for MachineDefinition<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineDefinition")
            .field("rules", &self.rules.len())
            .field("initial", &self.initial)
            .field("config", &self.config)
            .finish()
    }
}
