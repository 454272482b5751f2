//! Pending request table.
//!
//! Maps each in-flight correlation identifier to the slot its response future
//! waits on. Whoever removes an entry owns delivering its outcome, so every
//! entry is completed, cancelled or discarded exactly once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use dcrpc_protocol::RequestId;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{error, trace};

use crate::error::{CancelReason, ClientError, ClientResult, UsageError};
use crate::metrics::DispatchMetrics;

/// What a pending entry resolves to: the raw success payload or a classified error.
pub type Outcome = ClientResult<Value>;

/// Why an identifier could not be registered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegisterError {
    /// The identifier is already live.
    #[error("Request id {0} is already pending")]
    Duplicate(RequestId),

    /// The table was closed; carries the error it was closed with.
    #[error("Pending table is closed: {0}")]
    Closed(ClientError),
}

impl From<RegisterError> for ClientError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Duplicate(id) => UsageError::DuplicateRequestId(id).into(),
            RegisterError::Closed(err) => err,
        }
    }
}

/// A completion arrived for an identifier with no live entry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No pending request for id {0}")]
pub struct UnmatchedResponse(pub RequestId);

#[derive(Debug)]
struct PendingEntry {
    method: String,
    registered_at: Instant,
    slot: oneshot::Sender<Outcome>,
}

#[derive(Debug, Default)]
struct TableState {
    entries: HashMap<RequestId, PendingEntry>,
    closed: Option<ClientError>,
}

/// Per-client table of in-flight requests.
#[derive(Debug)]
pub struct PendingRequests {
    state: Mutex<TableState>,
    metrics: Arc<DispatchMetrics>,
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new(Arc::new(DispatchMetrics::new()))
    }
}

impl PendingRequests {
    /// Creates an empty table that reports cancellations to `metrics`.
    pub fn new(metrics: Arc<DispatchMetrics>) -> Self {
        Self {
            state: Mutex::new(TableState::default()),
            metrics,
        }
    }

    /// Registers `id` and returns the receiver its outcome will be delivered on.
    pub fn register(
        &self,
        id: RequestId,
        method: &str,
    ) -> Result<oneshot::Receiver<Outcome>, RegisterError> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.closed {
            return Err(RegisterError::Closed(reason.clone()));
        }
        if state.entries.contains_key(&id) {
            error!(request_id = %id, method, "Request id registered twice");
            return Err(RegisterError::Duplicate(id));
        }

        let (slot, receiver) = oneshot::channel();
        state.entries.insert(
            id,
            PendingEntry {
                method: method.to_string(),
                registered_at: Instant::now(),
                slot,
            },
        );
        trace!(request_id = %id, method, "Registered pending request");
        Ok(receiver)
    }

    /// Removes the entry for `id` and delivers `outcome` to it.
    pub fn complete(&self, id: RequestId, outcome: Outcome) -> Result<(), UnmatchedResponse> {
        let entry = self.state.lock().entries.remove(&id);
        let Some(entry) = entry else {
            return Err(UnmatchedResponse(id));
        };
        trace!(
            request_id = %id,
            method = %entry.method,
            elapsed_ms = entry.registered_at.elapsed().as_millis() as u64,
            "Completed pending request"
        );
        // The waiter may already be gone; the entry is removed either way.
        let _ = entry.slot.send(outcome);
        Ok(())
    }

    /// Removes the entry for `id` and delivers a cancellation to it.
    ///
    /// Returns `false` if the entry was no longer live.
    pub fn cancel(&self, id: RequestId, reason: CancelReason) -> bool {
        let entry = self.state.lock().entries.remove(&id);
        match entry {
            Some(entry) => {
                self.metrics.record_cancellation();
                trace!(
                    request_id = %id,
                    method = %entry.method,
                    %reason,
                    "Cancelled pending request"
                );
                let _ = entry.slot.send(Err(reason.into()));
                true
            }
            None => false,
        }
    }

    /// Removes the entry for `id` without delivering anything.
    pub fn discard(&self, id: RequestId) -> bool {
        self.state.lock().entries.remove(&id).is_some()
    }

    /// Closes the table and completes every outstanding entry with `reason`.
    ///
    /// Later registrations fail with the reason the table was first closed
    /// with. Returns how many entries were outstanding.
    pub fn close(&self, reason: ClientError) -> usize {
        let drained: Vec<(RequestId, PendingEntry)> = {
            let mut state = self.state.lock();
            if state.closed.is_none() {
                state.closed = Some(reason.clone());
            }
            state.entries.drain().collect()
        };

        let outstanding = drained.len();
        for (id, entry) in drained {
            trace!(request_id = %id, method = %entry.method, "Failing pending request on close");
            let _ = entry.slot.send(Err(reason.clone()));
        }
        outstanding
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns `true` if no request is in flight.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Returns `true` if `id` is live.
    pub fn contains(&self, id: RequestId) -> bool {
        self.state.lock().entries.contains_key(&id)
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcrpc_transport_traits::TransportError;
    use serde_json::json;

    fn id(raw: u64) -> RequestId {
        RequestId::new(raw)
    }

    #[tokio::test]
    async fn test_complete_delivers_once() {
        let table = PendingRequests::default();
        let rx = table.register(id(1), "getgenerate").unwrap();
        assert!(table.contains(id(1)));

        table.complete(id(1), Ok(json!(true))).unwrap();
        assert_eq!(rx.await.unwrap(), Ok(json!(true)));
        assert!(table.is_empty());

        assert_eq!(
            table.complete(id(1), Ok(json!(false))),
            Err(UnmatchedResponse(id(1)))
        );
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let table = PendingRequests::default();
        let _rx = table.register(id(7), "getwork").unwrap();
        assert_eq!(
            table.register(id(7), "getwork").unwrap_err(),
            RegisterError::Duplicate(id(7))
        );
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_completion_leaves_others_alone() {
        let table = PendingRequests::default();
        let rx = table.register(id(1), "getwork").unwrap();

        assert!(table.complete(id(99), Ok(json!(null))).is_err());
        assert!(table.contains(id(1)));

        table.complete(id(1), Ok(json!("work"))).unwrap();
        assert_eq!(rx.await.unwrap(), Ok(json!("work")));
    }

    #[tokio::test]
    async fn test_cancel_delivers_reason_and_counts() {
        let metrics = Arc::new(DispatchMetrics::new());
        let table = PendingRequests::new(Arc::clone(&metrics));
        let rx = table.register(id(2), "generate").unwrap();

        assert!(table.cancel(id(2), CancelReason::Cancelled));
        assert!(!table.cancel(id(2), CancelReason::Cancelled));
        assert_eq!(rx.await.unwrap(), Err(CancelReason::Cancelled.into()));
        assert_eq!(metrics.snapshot().cancellations, 1);
    }

    #[test]
    fn test_discard_drops_sender() {
        let table = PendingRequests::default();
        let mut rx = table.register(id(3), "submitblock").unwrap();
        assert!(table.discard(id(3)));
        assert!(!table.discard(id(3)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_close_fails_outstanding_and_later_registrations() {
        let table = PendingRequests::default();
        let rx1 = table.register(id(1), "getwork").unwrap();
        let rx2 = table.register(id(2), "getwork").unwrap();

        let lost: ClientError = TransportError::ConnectionClosed.into();
        assert_eq!(table.close(lost.clone()), 2);
        assert!(table.is_closed());
        assert_eq!(rx1.await.unwrap(), Err(lost.clone()));
        assert_eq!(rx2.await.unwrap(), Err(lost.clone()));

        assert_eq!(
            table.register(id(3), "getwork").unwrap_err(),
            RegisterError::Closed(lost.clone())
        );

        // The first close reason sticks.
        table.close(CancelReason::ClientClosed.into());
        assert_eq!(
            table.register(id(4), "getwork").unwrap_err(),
            RegisterError::Closed(lost)
        );
    }

    #[test]
    fn test_register_error_conversion() {
        let err: ClientError = RegisterError::Duplicate(id(5)).into();
        assert_eq!(err, ClientError::Usage(UsageError::DuplicateRequestId(id(5))));
    }
}
