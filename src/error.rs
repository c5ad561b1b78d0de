//! Errors raised while driving a state machine.

use crate::core::HookError;
use thiserror::Error;

/// Errors that can occur when declaring transitions or feeding events.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Transition {transition} is not part of this machine's rules")]
    NotFound { transition: String },

    /// A pre-commit or post-commit hook failed. Passed through unchanged.
    #[error(transparent)]
    Hook(#[from] HookError),
}
