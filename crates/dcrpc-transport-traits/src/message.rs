//! Transport message types.

use bytes::Bytes;
use dcrpc_protocol::RequestId;

use crate::error::TransportError;

/// A serialized request on its way to the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportMessage {
    /// Correlation identifier embedded in the payload.
    pub id: RequestId,

    /// The serialized JSON-RPC request.
    pub payload: Bytes,
}

impl TransportMessage {
    /// Creates a new `TransportMessage` with a given ID and payload.
    pub fn new(id: RequestId, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Returns the size of the message payload in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Something a transport delivers back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Raw bytes of a response. The correlation identifier is inside the payload.
    Response(Bytes),

    /// The request with this identifier will never be answered.
    Failed {
        /// Identifier of the request that failed
        id: RequestId,
        /// What went wrong
        error: TransportError,
    },
}

impl TransportEvent {
    /// Creates a response event from raw bytes.
    pub fn response(payload: impl Into<Bytes>) -> Self {
        Self::Response(payload.into())
    }

    /// Creates a failure event for one request.
    pub const fn failed(id: RequestId, error: TransportError) -> Self {
        Self::Failed { id, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_creation() {
        let msg = TransportMessage::new(RequestId::new(3), "test payload");
        assert_eq!(msg.id, RequestId::new(3));
        assert_eq!(msg.payload, Bytes::from("test payload"));
        assert_eq!(msg.size(), 12);
    }

    #[test]
    fn test_event_constructors() {
        let event = TransportEvent::failed(RequestId::new(1), TransportError::ConnectionClosed);
        assert!(matches!(
            event,
            TransportEvent::Failed {
                error: TransportError::ConnectionClosed,
                ..
            }
        ));
        assert_eq!(
            TransportEvent::response(&b"{}"[..]),
            TransportEvent::Response(Bytes::from_static(b"{}"))
        );
    }
}
