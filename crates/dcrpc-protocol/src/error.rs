//! Protocol error types.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for protocol operations.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

/// Failures where a message existed but did not have the shape its call expected.
///
/// These are infrastructure failures: the text they carry is diagnostic, not
/// something a remote endpoint said about the request.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The request envelope could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// A command parameter could not be converted to its wire form.
    #[error("Invalid parameter {index} for '{method}': {reason}")]
    InvalidParameter {
        /// The method the parameter belongs to
        method: String,
        /// Position of the parameter in the command
        index: usize,
        /// Why the conversion failed
        reason: String,
    },

    /// A success payload did not decode into the shape the call-site expects.
    #[error("Result did not match expected shape {expected}: {reason}")]
    ShapeMismatch {
        /// Name of the expected shape
        expected: &'static str,
        /// The raw payload as received, kept for diagnostics
        payload: Value,
        /// Decoder message
        reason: String,
    },

    /// The response carried an error member that is not a `{code, message}` object.
    #[error("Malformed error descriptor: {reason}")]
    MalformedErrorDescriptor {
        /// The raw error member as received
        descriptor: Value,
        /// Decoder message
        reason: String,
    },
}

impl ProtocolError {
    /// Returns the raw payload attached to this error, if any.
    ///
    /// Shape mismatches return the success payload that failed to decode;
    /// malformed descriptors return the error member as received.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::ShapeMismatch { payload, .. } => Some(payload),
            Self::MalformedErrorDescriptor { descriptor, .. } => Some(descriptor),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
