//! Export and import of rule declarations.
//!
//! Only declarations travel: `(from_state, event, to_state, probability)`.
//! Hooks are code and never serialized, so they must be attached again after
//! an import. Machine state is not covered here.
//!
//! Rule sets are wrapped in a versioned envelope, available as JSON or as
//! compact bincode.

use crate::core::{RuleSet, Token, Transition};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CodecError;

/// Version identifier for the rule-set envelope
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(bound = "")]
struct EnvelopeRef<'a, S: Token, E: Token> {
    version: u32,
    transitions: Vec<&'a Transition<S, E>>,
}

#[derive(Deserialize)]
#[serde(bound = "")]
struct Envelope<S: Token, E: Token> {
    // Checked through `Header` before the body is decoded.
    #[serde(rename = "version")]
    _version: u32,
    transitions: Vec<Transition<S, E>>,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

fn check_version(header: Header) -> Result<(), CodecError> {
    if header.version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: header.version,
            supported: FORMAT_VERSION,
        });
    }
    Ok(())
}

impl<S: Token, E: Token> Transition<S, E> {
    /// Serialize the declaration to bytes. Hooks are not included.
    pub fn pack(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).map_err(|e| CodecError::SerializationFailed(e.to_string()))
    }

    /// Rebuild a declaration from [`pack`](Self::pack) output, with no hooks.
    pub fn unpack(bytes: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::DeserializationFailed(e.to_string()))
    }
}

impl<S: Token, E: Token> RuleSet<S, E> {
    fn envelope(&self) -> EnvelopeRef<'_, S, E> {
        EnvelopeRef {
            version: FORMAT_VERSION,
            transitions: self.iter().collect(),
        }
    }

    /// Export the declarations as pretty-printed JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flying_fsm::core::{RuleSet, Transition};
    ///
    /// let rules: RuleSet<String, String> =
    ///     [Transition::new("a".into(), "go".into(), "b".into())].into_iter().collect();
    /// let json = rules.to_json().unwrap();
    /// let back: RuleSet<String, String> = RuleSet::from_json(&json).unwrap();
    ///
    /// assert_eq!(back.len(), 1);
    /// ```
    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string_pretty(&self.envelope())
            .map_err(|e| CodecError::SerializationFailed(e.to_string()))
    }

    /// Import declarations exported by [`to_json`](Self::to_json).
    ///
    /// A missing `probability` field defaults to 1.0.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let header: Header = serde_json::from_str(json)
            .map_err(|e| CodecError::DeserializationFailed(e.to_string()))?;
        check_version(header)?;

        let envelope: Envelope<S, E> = serde_json::from_str(json)
            .map_err(|e| CodecError::DeserializationFailed(e.to_string()))?;
        Ok(envelope.transitions.into_iter().collect())
    }

    /// Export the declarations as bincode.
    pub fn pack(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(&self.envelope())
            .map_err(|e| CodecError::SerializationFailed(e.to_string()))
    }

    /// Import declarations exported by [`pack`](Self::pack).
    pub fn unpack(bytes: &[u8]) -> Result<Self, CodecError> {
        // The version leads the envelope, so it can be read on its own.
        let header: Header = bincode::deserialize(bytes)
            .map_err(|e| CodecError::DeserializationFailed(e.to_string()))?;
        check_version(header)?;

        let envelope: Envelope<S, E> = bincode::deserialize(bytes)
            .map_err(|e| CodecError::DeserializationFailed(e.to_string()))?;
        Ok(envelope.transitions.into_iter().collect())
    }
}
