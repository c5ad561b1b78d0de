//! Builder for constructing state machines.

use crate::builder::config::MachineConfig;
use crate::builder::error::BuildError;
use crate::core::{RuleSet, Token, Transition};
use crate::machine::{self, MachineDefinition, RandomSource, StateMachine};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// Rules come either from a shared [`RuleSet`] (`.rules(...)`) or from loose
/// transitions (`.transition(...)` / `.transitions(...)`), not both.
pub struct StateMachineBuilder<S: Token, E: Token> {
    initial: Option<S>,
    rules: Option<Arc<RuleSet<S, E>>>,
    transitions: Vec<Transition<S, E>>,
    config: MachineConfig,
    random: Option<Box<dyn RandomSource>>,
}

impl<S: Token, E: Token> StateMachineBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            rules: None,
            transitions: Vec::new(),
            config: MachineConfig::default(),
            random: None,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Use a rule set that other machines may share.
    pub fn rules(mut self, rules: impl Into<Arc<RuleSet<S, E>>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Add a single transition.
    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once, e.g. the output of `to_any`.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition<S, E>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validate_probabilities(mut self, enabled: bool) -> Self {
        self.config.validate_probabilities = enabled;
        self
    }

    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Draw from `random` instead of an OS-seeded generator.
    pub fn random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Draw from a generator seeded with `seed`, for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.random = Some(machine::seeded(seed));
        self
    }

    /// Validate and produce a reusable definition.
    ///
    /// Any random source set on the builder is not part of a definition.
    pub fn definition(self) -> Result<MachineDefinition<S, E>, BuildError> {
        self.split().map(|(definition, _)| definition)
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing or the rules are invalid.
    pub fn build(self) -> Result<StateMachine<S, E>, BuildError> {
        let (definition, random) = self.split()?;
        Ok(match random {
            Some(random) => definition.instantiate_with(random),
            None => definition.instantiate(),
        })
    }

    fn split(self) -> Result<(MachineDefinition<S, E>, Option<Box<dyn RandomSource>>), BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let rules = match self.rules {
            Some(_) if !self.transitions.is_empty() => return Err(BuildError::ConflictingRules),
            Some(rules) => rules,
            None => Arc::new(self.transitions.into_iter().collect()),
        };

        let definition = MachineDefinition::new(rules, initial, self.config)?;
        Ok((definition, self.random))
    }
}

impl<S: Token, E: Token> Default for StateMachineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransitionBuilder;
    use crate::machine::from_fn;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    impl Token for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Processing => "Processing",
                Self::Complete => "Complete",
            }
        }
    }

    fn begin() -> Transition<TestState, String> {
        Transition::new(TestState::Initial, "begin".to_string(), TestState::Processing)
    }

    fn finish() -> Transition<TestState, String> {
        Transition::new(TestState::Processing, "finish".to_string(), TestState::Complete)
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = StateMachineBuilder::<TestState, String>::new().build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_transitions() {
        let result = StateMachineBuilder::<TestState, String>::new()
            .initial(TestState::Initial)
            .build();

        assert!(matches!(result, Err(BuildError::NoTransitions)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(begin())
            .transition(finish())
            .seed(11)
            .build();

        assert!(machine.is_ok());
        let machine = machine.unwrap();
        assert_eq!(machine.current_state(), &TestState::Initial);
        assert_eq!(machine.rules().len(), 2);
    }

    #[test]
    fn add_multiple_transitions() {
        let machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transitions(vec![begin(), finish()])
            .build();

        assert!(machine.is_ok());
    }

    #[test]
    fn shared_rules_are_reused() {
        let rules: Arc<RuleSet<TestState, String>> =
            Arc::new([begin(), finish()].into_iter().collect());

        let a = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .rules(Arc::clone(&rules))
            .build()
            .unwrap();
        let b = StateMachineBuilder::new()
            .initial(TestState::Processing)
            .rules(Arc::clone(&rules))
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(a.rules(), b.rules()));
    }

    #[test]
    fn shared_rules_reject_loose_transitions() {
        let result = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .rules([begin()].into_iter().collect::<RuleSet<_, _>>())
            .transition(finish())
            .build();

        assert!(matches!(result, Err(BuildError::ConflictingRules)));
    }

    #[test]
    fn invalid_probabilities_are_reported() {
        let result = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(begin().with_probability(1.5))
            .build();

        match result {
            Err(BuildError::InvalidRules(violations)) => assert_eq!(violations.len(), 2),
            _ => panic!("Expected InvalidRules"),
        }
    }

    #[test]
    fn scripted_random_source_drives_selection() {
        let mut machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transitions(
                Transition::to_any(
                    TestState::Initial,
                    "roll".to_string(),
                    [TestState::Processing, TestState::Complete],
                    1.0,
                )
                .unwrap(),
            )
            .random_source(from_fn(|| 0.75))
            .build()
            .unwrap();

        assert_eq!(machine.input("roll".to_string()).unwrap(), TestState::Complete);
    }

    #[test]
    fn transition_builder_output_plugs_in() {
        let transition = TransitionBuilder::new()
            .from(TestState::Initial)
            .on("begin".to_string())
            .to(TestState::Processing)
            .build()
            .unwrap();

        let mut machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(transition)
            .history_limit(None)
            .build()
            .unwrap();

        assert_eq!(machine.input("begin".to_string()).unwrap(), TestState::Processing);
        assert_eq!(machine.history().limit(), None);
    }

    #[test]
    fn definition_skips_the_random_source() {
        let definition = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(begin())
            .validate_probabilities(false)
            .definition()
            .unwrap();

        assert!(!definition.config().validate_probabilities);
        assert_eq!(definition.initial_state(), &TestState::Initial);
    }
}
