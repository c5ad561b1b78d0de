//! Transition declarations and their post-commit hooks.

use super::hook::{HookError, PostHook};
use super::token::Token;
use crate::error::FsmError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn default_probability() -> f64 {
    1.0
}

/// A declared rule: in `from_state`, `event` leads to `to_state`.
///
/// `probability` is a relative weight among the transitions that share the
/// same `(from_state, event)`. Two transitions are equal when their
/// `(from_state, event, to_state)` triples match. Probability and hooks do
/// not take part in equality or hashing.
///
/// # Example
///
/// ```rust
/// use flying_fsm::core::Transition;
///
/// let fair = Transition::new("heads".to_string(), "flip".to_string(), "tails".to_string())
///     .with_probability(0.5);
/// let probe = Transition::new("heads".to_string(), "flip".to_string(), "tails".to_string());
///
/// assert_eq!(fair, probe);
/// assert_eq!(fair.probability(), 0.5);
/// ```
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: Token, E: Token> {
    from_state: S,
    event: E,
    to_state: S,
    #[serde(default = "default_probability")]
    probability: f64,
    #[serde(skip)]
    hooks: RwLock<Vec<PostHook<S, E>>>,
}

impl<S: Token, E: Token> Transition<S, E> {
    /// Declare a transition with probability 1.0.
    pub fn new(from_state: S, event: E, to_state: S) -> Self {
        Self {
            from_state,
            event,
            to_state,
            probability: default_probability(),
            hooks: RwLock::new(Vec::new()),
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn from_state(&self) -> &S {
        &self.from_state
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn to_state(&self) -> &S {
        &self.to_state
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Register a hook to run after this transition commits.
    ///
    /// Returns `false` without registering anything when the same hook is
    /// already present.
    pub fn add_hook(&self, hook: PostHook<S, E>) -> bool {
        let mut hooks = self.hooks_mut();
        if hooks.contains(&hook) {
            return false;
        }
        hooks.push(hook);
        true
    }

    /// Unregister a hook. Removing a hook that is not registered is a no-op
    /// and returns `false`.
    pub fn remove_hook(&self, hook: &PostHook<S, E>) -> bool {
        let mut hooks = self.hooks_mut();
        let before = hooks.len();
        hooks.retain(|registered| registered != hook);
        hooks.len() != before
    }

    pub fn hook_count(&self) -> usize {
        self.hooks().len()
    }

    /// Run every registered hook in registration order.
    ///
    /// Fails fast: the first hook error is returned and later hooks do not
    /// run. The hook list is copied before the first call, so a hook that
    /// edits this transition's hooks only affects later triggers.
    pub fn trigger(&self) -> Result<(), HookError> {
        self.trigger_with(&())
    }

    /// Like [`trigger`](Self::trigger), handing `payload` to every hook built
    /// with [`PostHook::with_payload`].
    pub fn trigger_with(&self, payload: &dyn Any) -> Result<(), HookError> {
        let hooks: Vec<PostHook<S, E>> = self.hooks().clone();
        for hook in &hooks {
            hook.call(self, payload)?;
        }
        Ok(())
    }

    /// One transition per state in `from_states`, all on `event` to
    /// `to_state` with the same `probability`.
    ///
    /// An empty `from_states` yields an empty list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flying_fsm::core::Transition;
    ///
    /// let states = ["a", "b", "c"].map(String::from);
    /// let reset = Transition::from_any(states, "reset".to_string(), "a".to_string(), 0.4);
    ///
    /// assert_eq!(reset.len(), 3);
    /// assert!(reset.iter().all(|t| t.probability() == 0.4));
    /// ```
    pub fn from_any<I>(from_states: I, event: E, to_state: S, probability: f64) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
    {
        from_states
            .into_iter()
            .map(|from| {
                Self::new(from, event.clone(), to_state.clone()).with_probability(probability)
            })
            .collect()
    }

    /// One transition per state in `to_states`, splitting `total_probability`
    /// equally between them.
    ///
    /// Fails with [`FsmError::InvalidArgument`] when `to_states` is empty or
    /// `total_probability` is negative or not finite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flying_fsm::core::Transition;
    ///
    /// let targets = ["x", "y"].map(String::from);
    /// let split = Transition::to_any("s".to_string(), "roll".to_string(), targets, 1.0).unwrap();
    ///
    /// assert_eq!(split.len(), 2);
    /// assert!(split.iter().all(|t| t.probability() == 0.5));
    /// ```
    pub fn to_any<I>(
        from_state: S,
        event: E,
        to_states: I,
        total_probability: f64,
    ) -> Result<Vec<Self>, FsmError>
    where
        I: IntoIterator<Item = S>,
    {
        let to_states: Vec<S> = to_states.into_iter().collect();
        if to_states.is_empty() {
            return Err(FsmError::InvalidArgument {
                reason: "to_any needs at least one target state".to_string(),
            });
        }
        if !total_probability.is_finite() || total_probability < 0.0 {
            return Err(FsmError::InvalidArgument {
                reason: format!(
                    "total probability must be a finite, non-negative number (got {total_probability})"
                ),
            });
        }

        let probability = total_probability / to_states.len() as f64;
        Ok(to_states
            .into_iter()
            .map(|to| Self::new(from_state.clone(), event.clone(), to).with_probability(probability))
            .collect())
    }

    fn hooks(&self) -> RwLockReadGuard<'_, Vec<PostHook<S, E>>> {
        self.hooks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn hooks_mut(&self) -> RwLockWriteGuard<'_, Vec<PostHook<S, E>>> {
        self.hooks.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Token, E: Token> PartialEq for Transition<S, E> {
    fn eq(&self, other: &Self) -> bool {
        self.from_state == other.from_state
            && self.event == other.event
            && self.to_state == other.to_state
    }
}

impl<S: Token, E: Token> Eq for Transition<S, E> {}

impl<S: Token, E: Token> Hash for Transition<S, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from_state.hash(state);
        self.event.hash(state);
        self.to_state.hash(state);
    }
}

impl<S: Token, E: Token> fmt::Debug for Transition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from_state", &self.from_state)
            .field("event", &self.event)
            .field("to_state", &self.to_state)
            .field("probability", &self.probability)
            .field("hooks", &self.hook_count())
            .finish()
    }
}

impl<S: Token, E: Token> fmt::Display for Transition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.from_state.name(),
            self.event.name(),
            self.to_state.name(),
            self.probability
        )
    }
}
