//! # JSON-RPC envelopes
//!
//! Requests go out as JSON-RPC 1.0 objects with positional parameters:
//!
//! ```text
//! {"jsonrpc":"1.0","method":"getwork","params":[],"id":7}
//! ```
//!
//! Responses carry `result`, `error` and `id` members. A non-null `error` is an
//! error descriptor (`{code, message}`); otherwise `result` is the success
//! payload, and a missing `result` is treated as `null`. Accept-style calls such
//! as `submitblock` rely on that: they answer success with `"result": null`.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::command::Command;
use crate::error::ProtocolError;

/// JSON-RPC version constant
pub const JSONRPC_VERSION: &str = "1.0";

/// Correlation identifier for one in-flight request.
///
/// Allocated from a per-client monotonically increasing counter, so an
/// identifier is never handed out twice by the same client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wraps a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// JSON-RPC version type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let version = String::deserialize(deserializer)?;
        if version == JSONRPC_VERSION {
            Ok(JsonRpcVersion)
        } else {
            Err(serde::de::Error::custom(format!(
                "Invalid JSON-RPC version: expected '{JSONRPC_VERSION}', got '{version}'"
            )))
        }
    }
}

/// JSON-RPC request message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version
    pub jsonrpc: JsonRpcVersion,
    /// Request method name
    pub method: String,
    /// Positional request parameters
    pub params: Vec<Value>,
    /// Request identifier
    pub id: RequestId,
}

impl JsonRpcRequest {
    /// Builds the envelope for `command` under correlation identifier `id`.
    pub fn new(id: RequestId, command: Command) -> Self {
        let (method, params) = command.into_parts();
        Self {
            jsonrpc: JsonRpcVersion,
            method,
            params,
            id,
        }
    }

    /// Serializes the envelope to its wire bytes.
    pub fn to_bytes(&self) -> Result<Bytes, ProtocolError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| ProtocolError::Serialization(e.to_string()))
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl JsonRpcError {
    /// Create a new JSON-RPC error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Payload of a parsed response: a success value or an error descriptor, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// Successful response; any JSON value, including `null`
    Success(Value),
    /// Remote-reported failure
    Error(JsonRpcError),
}

/// A response as delivered by a transport, reduced to its identifier and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// Identifier of the request this answers
    pub id: RequestId,
    /// Success value or error descriptor
    pub payload: ResponsePayload,
}

impl RawResponse {
    /// Create a success response
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            id,
            payload: ResponsePayload::Success(result),
        }
    }

    /// Create an error response
    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        Self {
            id,
            payload: ResponsePayload::Error(error),
        }
    }

    /// Renders the response in its wire shape, with both `result` and `error` present.
    pub fn to_json(&self) -> Value {
        match &self.payload {
            ResponsePayload::Success(result) => serde_json::json!({
                "result": result,
                "error": null,
                "id": self.id,
            }),
            ResponsePayload::Error(error) => serde_json::json!({
                "result": null,
                "error": error,
                "id": self.id,
            }),
        }
    }
}

/// Why a delivered response could not be turned into a [`RawResponse`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseParseError {
    /// The bytes were not JSON at all.
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    /// The JSON was not an object.
    #[error("response is not a JSON object")]
    NotAnObject,

    /// The object had no usable `id` member.
    #[error("response has no id")]
    MissingId,

    /// The `id` member was not an identifier this client allocates.
    #[error("response id {0} is not a request identifier")]
    InvalidId(Value),

    /// The identifier was readable but the rest of the envelope was not.
    #[error("response for request {id} is malformed: {error}")]
    Malformed {
        /// Identifier the response was addressed to
        id: RequestId,
        /// What was wrong with it
        error: ProtocolError,
    },
}

impl ResponseParseError {
    /// The identifier the broken response was addressed to, when it could be read.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Malformed { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Parses wire bytes into a [`RawResponse`].
///
/// The identifier is extracted first so that a response with a readable id but
/// an unusable body can still be attributed to its request.
pub fn parse_response(bytes: &[u8]) -> Result<RawResponse, ResponseParseError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ResponseParseError::NotJson(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(ResponseParseError::NotAnObject);
    };

    let id = match object.remove("id") {
        None | Some(Value::Null) => return Err(ResponseParseError::MissingId),
        Some(raw) => match raw.as_u64() {
            Some(id) => RequestId::new(id),
            None => return Err(ResponseParseError::InvalidId(raw)),
        },
    };

    let error = object.remove("error").unwrap_or(Value::Null);
    if !error.is_null() {
        return match serde_json::from_value::<JsonRpcError>(error.clone()) {
            Ok(descriptor) => Ok(RawResponse::error(id, descriptor)),
            Err(e) => Err(ResponseParseError::Malformed {
                id,
                error: ProtocolError::MalformedErrorDescriptor {
                    descriptor: error,
                    reason: e.to_string(),
                },
            }),
        };
    }

    let result = object.remove("result").unwrap_or(Value::Null);
    Ok(RawResponse::success(id, result))
}
