//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Records kept by default before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Tunables applied when a machine is created.
///
/// Deserializable, so it can be loaded alongside the rest of an application's
/// settings. Missing fields take their defaults.
///
/// # Example
///
/// ```rust
/// use flying_fsm::builder::MachineConfig;
///
/// let config: MachineConfig = serde_json::from_str(r#"{ "history_limit": 16 }"#).unwrap();
/// assert!(config.validate_probabilities);
/// assert_eq!(config.history_limit, Some(16));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Reject rule sets with out-of-range probabilities or overweight groups
    pub validate_probabilities: bool,

    /// Maximum committed transitions kept in history; `None` keeps all
    pub history_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            validate_probabilities: true,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}
