//! The state machine: resolves events against its rule set and commits at
//! most one transition per event.

use super::random::RandomSource;
use super::render;
use crate::core::{
    EventHook, HookError, PostHook, RuleSet, StateHistory, Token, Transition, TransitionRecord,
    PROBABILITY_TOLERANCE,
};
use crate::error::FsmError;
use chrono::Utc;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single machine instance driven by discrete events.
///
/// The rule set is fixed at construction and may be shared with other
/// machines. Only hooks can be changed afterwards.
///
/// # Example
///
/// ```rust
/// use flying_fsm::builder::StateMachineBuilder;
/// use flying_fsm::core::Transition;
///
/// let mut machine = StateMachineBuilder::new()
///     .initial("normal".to_string())
///     .transition(Transition::new("normal".into(), "friday".into(), "pirate".into()))
///     .transition(Transition::new("pirate".into(), "not friday".into(), "normal".into()))
///     .seed(1)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.input("friday".to_string()).unwrap(), "pirate");
/// assert_eq!(machine.input("unrelated".to_string()).unwrap(), "pirate");
/// assert_eq!(machine.input("not friday".to_string()).unwrap(), "normal");
/// ```
pub struct StateMachine<S: Token, E: Token> {
    rules: Arc<RuleSet<S, E>>,
    initial: S,
    current: S,
    previous: S,
    next: Option<S>,
    event_hooks: HashMap<E, Vec<EventHook<S, E>>>,
    history: StateHistory<S, E>,
    random: Box<dyn RandomSource>,
}

impl<S: Token, E: Token> StateMachine<S, E> {
    /// Create a machine in `initial`, without validating the rules.
    ///
    /// Prefer [`StateMachineBuilder`](crate::builder::StateMachineBuilder) or
    /// [`MachineDefinition`](super::MachineDefinition), which validate
    /// probabilities first.
    pub fn new(
        rules: Arc<RuleSet<S, E>>,
        initial: S,
        history: StateHistory<S, E>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            rules,
            current: initial.clone(),
            previous: initial.clone(),
            initial,
            next: None,
            event_hooks: HashMap::new(),
            history,
            random,
        }
    }

    pub fn rules(&self) -> &Arc<RuleSet<S, E>> {
        &self.rules
    }

    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    pub fn current_state(&self) -> &S {
        &self.current
    }

    pub fn previous_state(&self) -> &S {
        &self.previous
    }

    /// The state a transition under evaluation would enter.
    ///
    /// Set while event hooks run. Cleared once a transition commits; left in
    /// place after a veto so callers can see what was refused.
    pub fn next_state(&self) -> Option<&S> {
        self.next.as_ref()
    }

    pub fn history(&self) -> &StateHistory<S, E> {
        &self.history
    }

    /// Transitions `event` could take from the current state, in rule
    /// declaration order. Does not change anything.
    pub fn would(&self, event: &E) -> Vec<&Transition<S, E>> {
        self.rules.candidates(&self.current, event)
    }

    /// Whether `event` has at least one candidate from the current state.
    pub fn can(&self, event: &E) -> bool {
        !self.would(event).is_empty()
    }

    /// Feed an event, returning the resulting current state.
    ///
    /// 1. No candidates: nothing changes.
    /// 2. One candidate is drawn by weight and becomes `next_state`. A draw
    ///    landing in the unassigned part of a group that sums below 1.0
    ///    leaves `next_state` empty. This holds for a lone candidate too: a
    ///    single rule with probability 0.3 fires on about 30% of inputs.
    /// 3. Every event hook for `event` runs. If any returns `false` the
    ///    machine stays put.
    /// 4. Otherwise the drawn transition commits and its hooks run.
    ///
    /// Hook errors propagate as [`FsmError::Hook`]. An event hook error
    /// leaves the current state untouched; a post-commit hook error arrives
    /// after the new state is already in place.
    pub fn input(&mut self, event: E) -> Result<S, FsmError> {
        self.input_with(event, &())
    }

    /// Like [`input`](Self::input), handing `payload` to every event hook and
    /// post-commit hook built with `with_payload`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flying_fsm::builder::StateMachineBuilder;
    /// use flying_fsm::core::{EventHook, Transition};
    /// use flying_fsm::machine::StateMachine;
    ///
    /// let mut machine = StateMachineBuilder::new()
    ///     .initial("docked".to_string())
    ///     .transition(Transition::new("docked".into(), "sail".into(), "at sea".into()))
    ///     .build()
    ///     .unwrap();
    ///
    /// // Only sail with a full crew.
    /// machine.add_event_hook(
    ///     "sail".to_string(),
    ///     EventHook::with_payload(|_e: &String, _m: &StateMachine<String, String>, crew| {
    ///         Ok(crew.downcast_ref::<u32>().is_some_and(|&n| n >= 10))
    ///     }),
    /// );
    ///
    /// assert_eq!(machine.input_with("sail".to_string(), &4u32).unwrap(), "docked");
    /// assert_eq!(machine.input_with("sail".to_string(), &12u32).unwrap(), "at sea");
    /// ```
    pub fn input_with(&mut self, event: E, payload: &dyn Any) -> Result<S, FsmError> {
        let rules = Arc::clone(&self.rules);
        let candidates = rules.candidates(&self.current, &event);
        if candidates.is_empty() {
            tracing::trace!(state = ?self.current, event = ?event, "no transition for event");
            return Ok(self.current.clone());
        }

        let selected = self.select(&candidates);
        self.next = selected.map(|transition| transition.to_state().clone());

        if !self.run_event_hooks(&event, payload)? {
            tracing::debug!(
                state = ?self.current,
                event = ?event,
                next = ?self.next,
                "transition vetoed by event hook"
            );
            return Ok(self.current.clone());
        }

        let Some(transition) = selected else {
            tracing::debug!(
                state = ?self.current,
                event = ?event,
                "draw fell outside the declared probabilities"
            );
            return Ok(self.current.clone());
        };

        self.commit(transition);
        transition.trigger_with(payload)?;
        Ok(self.current.clone())
    }

    /// Register a hook to run before transitions on `event` commit.
    pub fn add_event_hook(&mut self, event: E, hook: EventHook<S, E>) {
        self.event_hooks.entry(event).or_default().push(hook);
    }

    /// Unregister a hook, returning whether it was registered for `event`.
    pub fn remove_event_hook(&mut self, event: &E, hook: &EventHook<S, E>) -> bool {
        let Some(hooks) = self.event_hooks.get_mut(event) else {
            return false;
        };
        let Some(position) = hooks.iter().position(|registered| registered == hook) else {
            return false;
        };
        hooks.remove(position);
        if hooks.is_empty() {
            self.event_hooks.remove(event);
        }
        true
    }

    pub fn event_hook_count(&self, event: &E) -> usize {
        self.event_hooks.get(event).map_or(0, Vec::len)
    }

    /// Attach a post-commit hook to the rule equal to `transition`.
    ///
    /// Fails with [`FsmError::NotFound`] when no such rule exists. The hook is
    /// attached to the stored rule, so it is shared by every machine using
    /// the same rule set.
    pub fn add_transition_hook(
        &self,
        transition: &Transition<S, E>,
        hook: PostHook<S, E>,
    ) -> Result<bool, FsmError> {
        Ok(self.stored(transition)?.add_hook(hook))
    }

    /// Detach a post-commit hook from the rule equal to `transition`.
    pub fn remove_transition_hook(
        &self,
        transition: &Transition<S, E>,
        hook: &PostHook<S, E>,
    ) -> Result<bool, FsmError> {
        Ok(self.stored(transition)?.remove_hook(hook))
    }

    /// Diagnostic rendering of the machine and its rules.
    ///
    /// Deterministic for a given rule set and machine state.
    pub fn touched(&self) -> String {
        render::touched(self)
    }

    fn stored(&self, transition: &Transition<S, E>) -> Result<&Transition<S, E>, FsmError> {
        self.rules.get(transition).ok_or_else(|| FsmError::NotFound {
            transition: transition.to_string(),
        })
    }

    fn select<'r>(&mut self, candidates: &[&'r Transition<S, E>]) -> Option<&'r Transition<S, E>> {
        let draw = self.random.next_unit();
        let mut cumulative = 0.0;
        for &candidate in candidates {
            cumulative += candidate.probability();
            if draw < cumulative {
                return Some(candidate);
            }
        }

        // A complete group only misses through rounding.
        if cumulative >= 1.0 - PROBABILITY_TOLERANCE {
            return candidates
                .iter()
                .rev()
                .find(|candidate| candidate.probability() > 0.0)
                .copied();
        }
        None
    }

    fn run_event_hooks(&self, event: &E, payload: &dyn Any) -> Result<bool, HookError> {
        let Some(hooks) = self.event_hooks.get(event) else {
            return Ok(true);
        };
        let mut allowed = true;
        for hook in hooks {
            if !hook.call(event, self, payload)? {
                allowed = false;
            }
        }
        Ok(allowed)
    }

    fn commit(&mut self, transition: &Transition<S, E>) {
        let to = transition.to_state().clone();
        tracing::debug!(
            from = ?self.current,
            event = ?transition.event(),
            to = ?to,
            "transition committed"
        );
        self.history.record(TransitionRecord {
            from: self.current.clone(),
            event: transition.event().clone(),
            to: to.clone(),
            probability: transition.probability(),
            timestamp: Utc::now(),
        });
        self.previous = std::mem::replace(&mut self.current, to);
        self.next = None;
    }
}

impl<S: Token, E: Token> fmt::Debug for StateMachine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("initial", &self.initial)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("next", &self.next)
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
