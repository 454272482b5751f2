//! Response routing.
//!
//! A single background task is the only consumer of `transport.receive()`.
//! It parses each delivery, classifies it and completes the matching pending
//! entry:
//!
//! ```text
//! loop {
//!   event = transport.receive().await
//!   match event {
//!     Response(bytes)    => parse, classify, complete(id)
//!     Failed { id, err } => complete(id) with the transport error
//!     None               => close the table, stop
//!   }
//! }
//! ```
//!
//! Deliveries for identifiers that are no longer pending (cancelled, timed
//! out, or never sent) are dropped with a warning.

use std::sync::Arc;

use dcrpc_transport_traits::{
    LimitsConfig, Transport, TransportError, TransportEvent, validate_response_size,
};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{info, trace, warn};

use crate::classify::classify_bytes;
use crate::metrics::DispatchMetrics;
use crate::pending::PendingRequests;

/// Handle to the background routing task.
#[derive(Debug)]
pub(super) struct Router {
    shutdown: Arc<Notify>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Router {
    /// Starts the routing task. Must be called within a Tokio runtime.
    pub(super) fn spawn<T: Transport + 'static>(
        transport: Arc<T>,
        pending: Arc<PendingRequests>,
        metrics: Arc<DispatchMetrics>,
        limits: LimitsConfig,
    ) -> Self {
        let shutdown = Arc::new(Notify::new());
        let signal = Arc::clone(&shutdown);

        let task = tokio::spawn(async move {
            info!("Response router started");

            loop {
                tokio::select! {
                    biased;

                    () = signal.notified() => {
                        info!("Response router shutting down");
                        break;
                    }

                    event = transport.receive() => match event {
                        Some(event) => route(event, &pending, &metrics, &limits),
                        None => {
                            let outstanding =
                                pending.close(TransportError::ConnectionClosed.into());
                            if outstanding > 0 {
                                warn!(outstanding, "Transport closed with requests in flight");
                            } else {
                                info!("Transport closed");
                            }
                            break;
                        }
                    },
                }
            }

            info!("Response router terminated");
        });

        Self {
            shutdown,
            task: Mutex::new(Some(task)),
        }
    }

    /// Signals the routing task to stop after the current delivery.
    pub(super) fn shutdown(&self) {
        // notify_one stores a permit, so a shutdown before the first poll is not lost.
        self.shutdown.notify_one();
    }

    /// Waits for the routing task to finish.
    pub(super) async fn join(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            warn!(error = %e, "Response router task failed");
        }
    }
}

fn route(
    event: TransportEvent,
    pending: &PendingRequests,
    metrics: &DispatchMetrics,
    limits: &LimitsConfig,
) {
    match event {
        TransportEvent::Response(bytes) => {
            let oversized = validate_response_size(bytes.len(), limits).err();
            match classify_bytes(&bytes) {
                Ok((id, outcome)) => {
                    let outcome = match oversized {
                        Some(e) => Err(e.into()),
                        None => outcome,
                    };
                    match pending.complete(id, outcome) {
                        Ok(()) => {
                            metrics.record_matched();
                            trace!(request_id = %id, "Routed response");
                        }
                        Err(_) => {
                            metrics.record_unmatched();
                            warn!(
                                request_id = %id,
                                "Received response for unknown/expired request ID"
                            );
                        }
                    }
                }
                Err(e) => {
                    metrics.record_unmatched();
                    warn!(
                        error = %e,
                        size = bytes.len(),
                        "Dropping response that names no request"
                    );
                }
            }
        }
        TransportEvent::Failed { id, error } => {
            metrics.record_transport_failure();
            if pending.complete(id, Err(error.into())).is_err() {
                warn!(request_id = %id, "Transport failure for unknown/expired request ID");
            }
        }
    }
}
