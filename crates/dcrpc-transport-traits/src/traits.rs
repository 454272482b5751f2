//! Core transport trait.

use std::future::Future;
use std::pin::Pin;

use crate::error::TransportResult;
use crate::message::{TransportEvent, TransportMessage};
use crate::metrics::TransportMetrics;

/// The boundary between the client and whatever carries its bytes.
///
/// A transport accepts serialized requests and, at some later point, hands
/// back serialized responses or per-request failures. It knows nothing about
/// pending requests; correlation happens in the client.
///
/// `receive` is only ever called from one task at a time.
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Accepts a request for delivery.
    ///
    /// This must not wait for the response. An `Err` means the request was
    /// rejected outright and will never produce an event.
    fn submit(&self, message: TransportMessage) -> TransportResult<()>;

    /// Waits for the next delivery.
    ///
    /// `None` means the transport is closed and no further events will arrive.
    fn receive(&self) -> Pin<Box<dyn Future<Output = Option<TransportEvent>> + Send + '_>>;

    /// Closes the connection to the remote endpoint.
    fn close(&self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Returns the endpoint address or identifier for this transport, if applicable.
    fn endpoint(&self) -> Option<String> {
        None
    }

    /// Returns a snapshot of the transport's traffic counters.
    fn metrics(&self) -> TransportMetrics {
        TransportMetrics::default()
    }
}
