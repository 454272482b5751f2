//! In-process transport backed by tokio channels.
//!
//! [`ChannelTransport::pair`] returns the client side and a [`RemoteEndpoint`]
//! that plays the node: it sees every submitted request and decides what comes
//! back, in whatever order it likes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use dcrpc_protocol::RequestId;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{TransportError, TransportResult};
use crate::message::{TransportEvent, TransportMessage};
use crate::metrics::{AtomicMetrics, TransportMetrics};
use crate::traits::Transport;

/// Client half of an in-process connection.
#[derive(Debug)]
pub struct ChannelTransport {
    outgoing: mpsc::UnboundedSender<TransportMessage>,
    incoming: Mutex<mpsc::UnboundedReceiver<TransportEvent>>,
    closed: CancellationToken,
    metrics: Arc<AtomicMetrics>,
}

/// Remote half of an in-process connection.
#[derive(Debug)]
pub struct RemoteEndpoint {
    requests: mpsc::UnboundedReceiver<TransportMessage>,
    events: mpsc::UnboundedSender<TransportEvent>,
    closed: CancellationToken,
}

impl ChannelTransport {
    /// Creates a connected transport and its remote endpoint.
    pub fn pair() -> (Self, RemoteEndpoint) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let closed = CancellationToken::new();

        let transport = Self {
            outgoing: request_tx,
            incoming: Mutex::new(event_rx),
            closed: closed.clone(),
            metrics: Arc::new(AtomicMetrics::new()),
        };
        let remote = RemoteEndpoint {
            requests: request_rx,
            events: event_tx,
            closed,
        };
        (transport, remote)
    }

    /// Returns `true` once either side has closed the connection.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

impl Transport for ChannelTransport {
    fn submit(&self, message: TransportMessage) -> TransportResult<()> {
        if self.closed.is_cancelled() {
            return Err(TransportError::ConnectionClosed);
        }
        let size = message.size();
        let id = message.id;
        self.outgoing
            .send(message)
            .map_err(|_| TransportError::ConnectionClosed)?;
        self.metrics.record_sent(size);
        trace!(request_id = %id, size, "Submitted request to channel");
        Ok(())
    }

    fn receive(&self) -> Pin<Box<dyn Future<Output = Option<TransportEvent>> + Send + '_>> {
        Box::pin(async move {
            let mut incoming = self.incoming.lock().await;
            // Deliveries already queued are handed out before the close is observed.
            let event = tokio::select! {
                biased;
                event = incoming.recv() => event,
                () = self.closed.cancelled() => None,
            };
            match &event {
                Some(TransportEvent::Response(bytes)) => self.metrics.record_received(bytes.len()),
                Some(TransportEvent::Failed { .. }) => self.metrics.record_failure(),
                None => debug!("Channel transport closed"),
            }
            event
        })
    }

    fn close(&self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            self.closed.cancel();
            Ok(())
        })
    }

    fn endpoint(&self) -> Option<String> {
        Some("channel://in-process".to_string())
    }

    fn metrics(&self) -> TransportMetrics {
        self.metrics.snapshot()
    }
}

impl RemoteEndpoint {
    /// Waits for the next submitted request.
    ///
    /// Returns `None` once the connection is closed and no requests are queued.
    pub async fn next_request(&mut self) -> Option<TransportMessage> {
        tokio::select! {
            biased;
            message = self.requests.recv() => message,
            () = self.closed.cancelled() => None,
        }
    }

    /// Returns a queued request without waiting.
    pub fn try_next_request(&mut self) -> Option<TransportMessage> {
        self.requests.try_recv().ok()
    }

    /// Delivers raw response bytes to the client.
    pub fn respond(&self, payload: impl Into<Bytes>) -> TransportResult<()> {
        self.deliver(TransportEvent::Response(payload.into()))
    }

    /// Delivers a JSON value as a response.
    pub fn respond_json(&self, response: &serde_json::Value) -> TransportResult<()> {
        let payload =
            serde_json::to_vec(response).map_err(|e| TransportError::Internal(e.to_string()))?;
        self.respond(payload)
    }

    /// Reports that the request with `id` will never be answered.
    pub fn fail(&self, id: RequestId, error: TransportError) -> TransportResult<()> {
        self.deliver(TransportEvent::Failed { id, error })
    }

    /// Closes the connection from the remote side.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Returns `true` once either side has closed the connection.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn deliver(&self, event: TransportEvent) -> TransportResult<()> {
        if self.closed.is_cancelled() {
            return Err(TransportError::ConnectionClosed);
        }
        self.events
            .send(event)
            .map_err(|_| TransportError::ConnectionClosed)
    }
}
