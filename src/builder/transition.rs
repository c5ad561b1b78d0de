//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{PostHook, Token, Transition};

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use flying_fsm::builder::TransitionBuilder;
///
/// let transition = TransitionBuilder::new()
///     .from("idle".to_string())
///     .on("work".to_string())
///     .to("busy".to_string())
///     .probability(0.8)
///     .build()
///     .unwrap();
///
/// assert_eq!(transition.probability(), 0.8);
/// ```
pub struct TransitionBuilder<S: Token, E: Token> {
    from: Option<S>,
    event: Option<E>,
    to: Option<S>,
    probability: f64,
    hooks: Vec<PostHook<S, E>>,
}

impl<S: Token, E: Token> TransitionBuilder<S, E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            event: None,
            to: None,
            probability: 1.0,
            hooks: Vec::new(),
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the relative weight (defaults to 1.0).
    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Attach a post-commit hook (optional, repeatable).
    pub fn hook(mut self, hook: PostHook<S, E>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, E>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        let transition = Transition::new(from, event, to).with_probability(self.probability);
        for hook in self.hooks {
            transition.add_hook(hook);
        }
        Ok(transition)
    }
}

impl<S: Token, E: Token> Default for TransitionBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
