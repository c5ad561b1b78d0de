//! Identifier tokens for states and events.
//!
//! The engine never looks inside a state or event. It only needs to compare,
//! hash and order them, and to print a name for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state and event identifiers.
///
/// # Required Traits
///
/// - `Clone`: tokens are copied into history records and returned from `input`
/// - `Eq` + `Hash`: candidate lookup is keyed by `(state, event)`
/// - `Ord`: gives `touched()` a stable ordering
/// - `Debug`: tokens show up in log fields
/// - `Serialize` + `Deserialize`: rule sets can be exported and imported
///
/// # Example
///
/// ```rust
/// use flying_fsm::core::Token;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl Token for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// assert_eq!("knock".to_string().name(), "knock");
/// ```
pub trait Token:
    Clone + Eq + Hash + Ord + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the token's name for display/logging.
    fn name(&self) -> &str;
}

impl Token for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// A token type whose whole value space can be listed.
///
/// `token_enum!` implements this for the enums it declares, which is what
/// lets `Transition::from_any(State::all(), ...)` read naturally.
pub trait Enumerable: Sized {
    /// Every value of the type, in declaration order.
    fn all() -> Vec<Self>;
}
