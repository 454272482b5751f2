//! Result decoders.
//!
//! A decoder turns the untyped success payload of a response into the value a
//! call-site promises. Each call-site picks one decoder type; the response
//! future is generic over it.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use dcrpc_protocol::ProtocolError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Converts a success payload into a typed result.
pub trait ResultDecoder {
    /// The typed result.
    type Output;

    /// Decodes `payload`. Mismatched shapes are protocol errors, never panics.
    fn decode(&self, payload: Value) -> ClientResult<Self::Output>;
}

/// Structural decoding into any deserializable type.
pub struct JsonDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    /// Creates the decoder.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonDecoder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JsonDecoder<T> {}

impl<T> fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDecoder")
            .field("output", &type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> ResultDecoder for JsonDecoder<T> {
    type Output = T;

    fn decode(&self, payload: Value) -> ClientResult<T> {
        let decoded = T::deserialize(&payload);
        match decoded {
            Ok(value) => Ok(value),
            Err(e) => Err(ProtocolError::ShapeMismatch {
                expected: type_name::<T>(),
                reason: e.to_string(),
                payload,
            }
            .into()),
        }
    }
}

/// Accepts any success payload and discards it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreResult;

impl ResultDecoder for IgnoreResult {
    type Output = ();

    fn decode(&self, _payload: Value) -> ClientResult<()> {
        Ok(())
    }
}

/// Decoding for accept-style calls such as `submitblock`.
///
/// These answer `null` when they accept and a bare string explaining the
/// rejection otherwise. The string becomes an application error whose reason
/// is exactly that string.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptanceDecoder;

impl ResultDecoder for AcceptanceDecoder {
    type Output = ();

    fn decode(&self, payload: Value) -> ClientResult<()> {
        match payload {
            Value::Null => Ok(()),
            Value::String(reason) => Err(ClientError::Application { code: None, reason }),
            other => Err(ProtocolError::ShapeMismatch {
                expected: "null or rejection string",
                reason: "accept-style result must be null or a string".to_string(),
                payload: other,
            }
            .into()),
        }
    }
}
