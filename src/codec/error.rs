//! Codec error types.

use thiserror::Error;

/// Errors that can occur while exporting or importing rules
#[derive(Debug, Error)]
pub enum CodecError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Envelope version is not supported by this version
    #[error("Unsupported format version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
