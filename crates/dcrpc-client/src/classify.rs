//! Error classification for delivered responses.

use dcrpc_protocol::{RawResponse, RequestId, ResponseParseError, ResponsePayload, parse_response};

use crate::error::ClientError;
use crate::pending::Outcome;

/// Turns a parsed response into the outcome its future resolves to.
///
/// An error descriptor is an application error carrying the remote code and
/// message; everything else is the success payload, left for the call-site's
/// decoder.
pub fn classify(response: RawResponse) -> Outcome {
    match response.payload {
        ResponsePayload::Success(value) => Ok(value),
        ResponsePayload::Error(descriptor) => Err(ClientError::Application {
            code: Some(descriptor.code),
            reason: descriptor.message,
        }),
    }
}

/// Parses and classifies raw response bytes.
///
/// A response whose identifier is readable but whose body is not becomes a
/// protocol error for that identifier. A response with no usable identifier
/// cannot be attributed to any request and is returned as `Err`.
pub fn classify_bytes(bytes: &[u8]) -> Result<(RequestId, Outcome), ResponseParseError> {
    match parse_response(bytes) {
        Ok(response) => {
            let id = response.id;
            Ok((id, classify(response)))
        }
        Err(ResponseParseError::Malformed { id, error }) => Ok((id, Err(error.into()))),
        Err(e) => Err(e),
    }
}
