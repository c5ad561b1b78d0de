//! Hook callables for transitions and events.
//!
//! Two kinds of hook exist:
//!
//! - [`EventHook`] runs before a transition commits and may veto it.
//! - [`PostHook`] is owned by a [`Transition`] and runs after it commits.
//!
//! Hooks are compared by identity, never by value. A hook handle is cheap to
//! clone and every clone refers to the same registration.

use super::token::Token;
use super::transition::Transition;
use crate::machine::StateMachine;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error raised from inside a hook.
///
/// The engine does not catch, retry or wrap it: it reaches the caller of
/// `trigger` or `input` as is.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

type PostHookFn<S, E> =
    dyn Fn(&Transition<S, E>, &dyn Any) -> Result<(), HookError> + Send + Sync;

type EventHookFn<S, E> =
    dyn Fn(&E, &StateMachine<S, E>, &dyn Any) -> Result<bool, HookError> + Send + Sync;

/// Callback fired after its transition has been applied.
///
/// # Example
///
/// ```rust
/// use flying_fsm::core::{PostHook, Transition};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let fired = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&fired);
/// let hook = PostHook::new(move |_t: &Transition<String, String>| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// let transition = Transition::new("idle".to_string(), "go".to_string(), "busy".to_string());
/// transition.add_hook(hook);
/// transition.trigger().unwrap();
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
pub struct PostHook<S: Token, E: Token> {
    callback: Arc<PostHookFn<S, E>>,
}

impl<S: Token, E: Token> PostHook<S, E> {
    /// Create a hook from a closure that cannot fail.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Transition<S, E>) + Send + Sync + 'static,
    {
        Self::fallible(move |transition| {
            callback(transition);
            Ok(())
        })
    }

    /// Create a hook whose error aborts the remaining post-commit hooks.
    pub fn fallible<F>(callback: F) -> Self
    where
        F: Fn(&Transition<S, E>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self::with_payload(move |transition, _payload| callback(transition))
    }

    /// Create a hook that also receives the payload handed to
    /// [`StateMachine::input_with`] or [`Transition::trigger_with`].
    ///
    /// Plain `input` and `trigger` pass `()`. Use `downcast_ref` to read it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flying_fsm::core::{PostHook, Transition};
    ///
    /// let hook = PostHook::with_payload(|_t: &Transition<String, String>, payload| {
    ///     if let Some(crew) = payload.downcast_ref::<u32>() {
    ///         println!("{crew} hands on deck");
    ///     }
    ///     Ok(())
    /// });
    ///
    /// let transition = Transition::new("dock".to_string(), "sail".to_string(), "sea".to_string());
    /// transition.add_hook(hook);
    /// transition.trigger_with(&12u32).unwrap();
    /// ```
    pub fn with_payload<F>(callback: F) -> Self
    where
        F: Fn(&Transition<S, E>, &dyn Any) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub(crate) fn call(
        &self,
        transition: &Transition<S, E>,
        payload: &dyn Any,
    ) -> Result<(), HookError> {
        (self.callback)(transition, payload)
    }
}

impl<S: Token, E: Token> Clone for PostHook<S, E> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<S: Token, E: Token> PartialEq for PostHook<S, E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<S: Token, E: Token> Eq for PostHook<S, E> {}

impl<S: Token, E: Token> fmt::Debug for PostHook<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostHook")
            .field("id", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Callback consulted before a transition for its event commits.
///
/// Returning `false` vetoes the transition. The hook sees the machine as it
/// is mid-resolution, so [`StateMachine::next_state`] tells it what would
/// happen.
///
/// # Example
///
/// ```rust
/// use flying_fsm::core::EventHook;
/// use flying_fsm::machine::StateMachine;
///
/// // Refuse to leave the "locked" state.
/// let hook = EventHook::new(|_event: &String, machine: &StateMachine<String, String>| {
///     machine.current_state() != "locked"
/// });
/// # let _ = hook;
/// ```
pub struct EventHook<S: Token, E: Token> {
    callback: Arc<EventHookFn<S, E>>,
}

impl<S: Token, E: Token> EventHook<S, E> {
    /// Create a hook that allows the transition when it returns `true`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&E, &StateMachine<S, E>) -> bool + Send + Sync + 'static,
    {
        Self::fallible(move |event, machine| Ok(callback(event, machine)))
    }

    /// Create a hook that only watches. It never vetoes.
    pub fn observe<F>(callback: F) -> Self
    where
        F: Fn(&E, &StateMachine<S, E>) + Send + Sync + 'static,
    {
        Self::fallible(move |event, machine| {
            callback(event, machine);
            Ok(true)
        })
    }

    /// Create a hook whose error aborts `input` before anything commits.
    pub fn fallible<F>(callback: F) -> Self
    where
        F: Fn(&E, &StateMachine<S, E>) -> Result<bool, HookError> + Send + Sync + 'static,
    {
        Self::with_payload(move |event, machine, _payload| callback(event, machine))
    }

    /// Create a hook that also receives the payload handed to
    /// [`StateMachine::input_with`]; `()` for plain `input`.
    pub fn with_payload<F>(callback: F) -> Self
    where
        F: Fn(&E, &StateMachine<S, E>, &dyn Any) -> Result<bool, HookError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub(crate) fn call(
        &self,
        event: &E,
        machine: &StateMachine<S, E>,
        payload: &dyn Any,
    ) -> Result<bool, HookError> {
        (self.callback)(event, machine, payload)
    }
}

impl<S: Token, E: Token> Clone for EventHook<S, E> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<S: Token, E: Token> PartialEq for EventHook<S, E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<S: Token, E: Token> Eq for EventHook<S, E> {}

impl<S: Token, E: Token> fmt::Debug for EventHook<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHook")
            .field("id", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> Transition<String, String> {
        Transition::new("a".to_string(), "go".to_string(), "b".to_string())
    }

    #[test]
    fn post_hook_equality_is_identity() {
        let hook = PostHook::new(|_t: &Transition<String, String>| {});
        let same = hook.clone();
        let lookalike = PostHook::new(|_t: &Transition<String, String>| {});

        assert_eq!(hook, same);
        assert_ne!(hook, lookalike);
    }

    #[test]
    fn fallible_post_hook_returns_its_error() {
        let hook = PostHook::fallible(|_t: &Transition<String, String>| {
            Err(HookError::new("disk full"))
        });

        let err = hook.call(&transition(), &()).unwrap_err();
        assert_eq!(err.message(), "disk full");
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn event_hook_equality_is_identity() {
        let hook = EventHook::new(|_e: &String, _m: &StateMachine<String, String>| true);
        let lookalike = EventHook::new(|_e: &String, _m: &StateMachine<String, String>| true);

        assert_eq!(hook, hook.clone());
        assert_ne!(hook, lookalike);
    }

    #[test]
    fn post_hook_reads_the_payload() {
        let hook = PostHook::with_payload(|_t: &Transition<String, String>, payload| {
            match payload.downcast_ref::<String>() {
                Some(reason) => Err(HookError::new(reason.clone())),
                None => Ok(()),
            }
        });

        assert!(hook.call(&transition(), &()).is_ok());
        let err = hook.call(&transition(), &"mutiny".to_string()).unwrap_err();
        assert_eq!(err.message(), "mutiny");
    }

    #[test]
    fn plain_hooks_ignore_the_payload() {
        let hook = PostHook::new(|_t: &Transition<String, String>| {});
        assert!(hook.call(&transition(), &42u8).is_ok());
    }
}
