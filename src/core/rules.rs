//! Rule sets: the collection of transitions a machine resolves events against.

use super::token::Token;
use super::transition::Transition;
use std::collections::{BTreeSet, HashMap};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Slack allowed when summing floating point probabilities.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// A problem found while validating a rule set.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuleViolation {
    #[error("Transition {transition} has probability {probability}, expected a value in [0, 1]")]
    ProbabilityOutOfRange {
        transition: String,
        probability: f64,
    },

    #[error("Transitions from '{from}' on '{event}' sum to {total}, which exceeds 1.0")]
    GroupProbabilityExceeded {
        from: String,
        event: String,
        total: f64,
    },
}

/// An ordered, de-duplicated set of transitions.
///
/// Insertion order is kept and is the order candidates are returned in.
/// A later declaration of a `(from, event, to)` triple already present is
/// dropped.
///
/// # Example
///
/// ```rust
/// use flying_fsm::core::{RuleSet, Transition};
///
/// let rules: RuleSet<String, String> = [
///     Transition::new("normal".into(), "friday".into(), "pirate".into()),
///     Transition::new("pirate".into(), "not friday".into(), "normal".into()),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules.candidates(&"normal".into(), &"friday".into()).len(), 1);
/// ```
pub struct RuleSet<S: Token, E: Token> {
    transitions: Vec<Transition<S, E>>,
    index: HashMap<(S, E), Vec<usize>>,
}

impl<S: Token, E: Token> RuleSet<S, E> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a transition, returning `false` if an equal one is already present.
    ///
    /// Only the `(from, event)` group of `transition` is searched.
    pub fn insert(&mut self, transition: Transition<S, E>) -> bool {
        let key = (
            transition.from_state().clone(),
            transition.event().clone(),
        );
        let group = self.index.entry(key).or_default();
        if group.iter().any(|&i| self.transitions[i] == transition) {
            tracing::warn!(%transition, "duplicate transition dropped from rule set");
            return false;
        }
        group.push(self.transitions.len());
        self.transitions.push(transition);
        true
    }

    /// Every transition leaving `from` on `event`, in declaration order.
    pub fn candidates(&self, from: &S, event: &E) -> Vec<&Transition<S, E>> {
        // The tuple key needs owned values for the lookup.
        let key = (from.clone(), event.clone());
        self.index
            .get(&key)
            .map(|positions| positions.iter().map(|&i| &self.transitions[i]).collect())
            .unwrap_or_default()
    }

    /// The stored transition equal to `probe`, if any.
    ///
    /// Hooks must be attached to the stored instance, not to a probe built by
    /// the caller, so lookups go through here.
    pub fn get(&self, probe: &Transition<S, E>) -> Option<&Transition<S, E>> {
        self.candidates(probe.from_state(), probe.event())
            .into_iter()
            .find(|candidate| *candidate == probe)
    }

    pub fn contains(&self, probe: &Transition<S, E>) -> bool {
        self.get(probe).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition<S, E>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Every state mentioned as a source or a target.
    pub fn states(&self) -> BTreeSet<&S> {
        self.transitions
            .iter()
            .flat_map(|t| [t.from_state(), t.to_state()])
            .collect()
    }

    pub fn events(&self) -> BTreeSet<&E> {
        self.transitions.iter().map(|t| t.event()).collect()
    }

    /// Check every probability rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<RuleViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<RuleViolation>>> = Vec::new();

        for transition in &self.transitions {
            let p = transition.probability();
            let check = if p.is_finite() && (0.0..=1.0).contains(&p) {
                Validation::success(())
            } else {
                Validation::fail(RuleViolation::ProbabilityOutOfRange {
                    transition: transition.to_string(),
                    probability: p,
                })
            };
            checks.push(check);
        }

        // Walk groups in declaration order so reports are reproducible.
        let mut seen = BTreeSet::new();
        for transition in &self.transitions {
            if !seen.insert((transition.from_state(), transition.event())) {
                continue;
            }
            let total: f64 = self
                .candidates(transition.from_state(), transition.event())
                .iter()
                .map(|t| t.probability())
                .sum();
            let check = if total <= 1.0 + PROBABILITY_TOLERANCE || total.is_nan() {
                Validation::success(())
            } else {
                Validation::fail(RuleViolation::GroupProbabilityExceeded {
                    from: transition.from_state().name().to_string(),
                    event: transition.event().name().to_string(),
                    total,
                })
            };
            checks.push(check);
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl<S: Token, E: Token> Default for RuleSet<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Token, E: Token> FromIterator<Transition<S, E>> for RuleSet<S, E> {
    fn from_iter<I: IntoIterator<Item = Transition<S, E>>>(iter: I) -> Self {
        let mut rules = Self::new();
        rules.extend(iter);
        rules
    }
}

impl<S: Token, E: Token> Extend<Transition<S, E>> for RuleSet<S, E> {
    fn extend<I: IntoIterator<Item = Transition<S, E>>>(&mut self, iter: I) {
        for transition in iter {
            self.insert(transition);
        }
    }
}

impl<S: Token, E: Token> std::fmt::Debug for RuleSet<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.transitions.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> String {
        value.to_string()
    }

    fn t(from: &str, event: &str, to: &str, p: f64) -> Transition<String, String> {
        Transition::new(s(from), s(event), s(to)).with_probability(p)
    }

    #[test]
    fn duplicate_triples_keep_the_first_declaration() {
        let rules: RuleSet<String, String> =
            [t("a", "go", "b", 0.3), t("a", "go", "b", 0.9)].into_iter().collect();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules.iter().next().unwrap().probability(), 0.3);
    }

    #[test]
    fn same_pair_with_different_targets_coexist() {
        let rules: RuleSet<String, String> =
            [t("a", "go", "b", 0.5), t("a", "go", "c", 0.5)].into_iter().collect();

        let candidates = rules.candidates(&s("a"), &s("go"));
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].to_state(), "b");
        assert_eq!(candidates[1].to_state(), "c");
    }

    #[test]
    fn candidates_for_unknown_pair_is_empty() {
        let rules: RuleSet<String, String> = [t("a", "go", "b", 1.0)].into_iter().collect();

        assert!(rules.candidates(&s("b"), &s("go")).is_empty());
        assert!(rules.candidates(&s("a"), &s("stop")).is_empty());
    }

    #[test]
    fn get_returns_the_stored_instance() {
        let rules: RuleSet<String, String> = [t("a", "go", "b", 0.7)].into_iter().collect();
        let key = Transition::new(s("a"), s("go"), s("b"));

        let stored = rules.get(&key).unwrap();
        assert_eq!(stored.probability(), 0.7);
        assert!(rules.contains(&key));
        assert!(!rules.contains(&Transition::new(s("a"), s("go"), s("c"))));
    }

    #[test]
    fn states_and_events_are_collected() {
        let rules: RuleSet<String, String> =
            [t("a", "go", "b", 1.0), t("b", "stop", "c", 1.0)].into_iter().collect();

        let states: Vec<&String> = rules.states().into_iter().collect();
        assert_eq!(states, vec!["a", "b", "c"]);
        assert_eq!(rules.events().len(), 2);
    }

    #[test]
    fn validation_succeeds_for_well_formed_rules() {
        let mut rules: RuleSet<String, String> = RuleSet::new();
        rules.extend(Transition::to_any(s("a"), s("roll"), [s("x"), s("y"), s("z")], 1.0).unwrap());
        rules.insert(t("x", "go", "a", 0.25));

        assert!(rules.validate().is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let rules: RuleSet<String, String> = [
            t("a", "go", "b", 0.8),
            t("a", "go", "c", 0.8),
            t("b", "go", "a", -0.1),
            t("c", "go", "a", f64::INFINITY),
        ]
        .into_iter()
        .collect();

        match rules.validate() {
            Validation::Failure(errors) => {
                let out_of_range = errors
                    .iter()
                    .filter(|e| matches!(e, RuleViolation::ProbabilityOutOfRange { .. }))
                    .count();
                let exceeded = errors
                    .iter()
                    .filter(|e| matches!(e, RuleViolation::GroupProbabilityExceeded { .. }))
                    .count();

                assert_eq!(out_of_range, 2);
                // The infinite group is flagged as well.
                assert_eq!(exceeded, 2);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn group_exceeded_message_names_the_group() {
        let violation = RuleViolation::GroupProbabilityExceeded {
            from: s("a"),
            event: s("go"),
            total: 1.6,
        };
        assert_eq!(
            violation.to_string(),
            "Transitions from 'a' on 'go' sum to 1.6, which exceeds 1.0"
        );
    }

    #[test]
    fn duplicates_are_detected_within_their_group_only() {
        let mut rules = RuleSet::new();
        for i in 0..500 {
            assert!(rules.insert(t(&format!("s{i}"), "go", "end", 1.0)));
            assert!(rules.insert(t(&format!("s{i}"), "stop", "end", 1.0)));
        }

        assert!(!rules.insert(t("s250", "go", "end", 0.5)));
        assert!(rules.insert(t("s250", "go", "start", 0.0)));
        assert_eq!(rules.len(), 1001);

        let group = rules.candidates(&s("s250"), &s("go"));
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].probability(), 1.0);
        assert_eq!(group[1].to_state(), "start");
    }
}
