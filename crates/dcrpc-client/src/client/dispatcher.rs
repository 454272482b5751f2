//! Request dispatch.
//!
//! Sending a command never waits for the remote endpoint:
//!
//! ```text
//! Dispatcher::send(command)
//!     ↓
//!   1. Allocate the next correlation identifier
//!   2. Serialize the JSON-RPC request and check its size
//!   3. Register a completion slot in the pending table
//!   4. Hand the bytes to the transport
//!     ↓
//!   ResponseFuture (pending, or already failed)
//! ```
//!
//! The slot is registered before the transport sees the request, so the
//! router can never receive a response it has nowhere to put.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dcrpc_protocol::{Command, JsonRpcRequest, RequestId};
use dcrpc_transport_traits::{Transport, TransportMessage, validate_request_size};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::decode::ResultDecoder;
use crate::error::{ClientError, ClientResult};
use crate::future::{PendingHandle, ResponseFuture};
use crate::metrics::DispatchMetrics;
use crate::pending::PendingRequests;

/// Turns commands into in-flight requests.
#[derive(Debug)]
pub(super) struct Dispatcher<T: Transport> {
    transport: Arc<T>,
    pending: Arc<PendingRequests>,
    metrics: Arc<DispatchMetrics>,
    next_id: AtomicU64,
    config: ClientConfig,
}

impl<T: Transport + 'static> Dispatcher<T> {
    pub(super) fn new(
        transport: Arc<T>,
        pending: Arc<PendingRequests>,
        metrics: Arc<DispatchMetrics>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            pending,
            metrics,
            next_id: AtomicU64::new(1),
            config,
        }
    }

    /// Dispatches `command` and returns its future without waiting.
    ///
    /// Failures before the transport accepts the request resolve the future
    /// immediately and leave nothing in the pending table.
    pub(super) fn send<D: ResultDecoder>(
        &self,
        ctx: &CallContext,
        command: Command,
        decoder: D,
    ) -> ResponseFuture<D> {
        let ctx = self.effective_context(ctx);
        match self.submit(command) {
            Ok(handle) => ResponseFuture::pending(handle, decoder, ctx),
            Err(error) => self.reject(error, decoder, ctx),
        }
    }

    /// Resolves a future to `error` without contacting the transport.
    pub(super) fn reject<D: ResultDecoder>(
        &self,
        error: ClientError,
        decoder: D,
        ctx: CallContext,
    ) -> ResponseFuture<D> {
        self.metrics.record_rejected();
        ResponseFuture::ready(Err(error), decoder, ctx)
    }

    pub(super) fn effective_context(&self, ctx: &CallContext) -> CallContext {
        match (ctx.deadline(), self.config.request_timeout) {
            (None, Some(timeout)) => ctx.clone().with_timeout(timeout),
            _ => ctx.clone(),
        }
    }

    pub(super) const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn submit(&self, command: Command) -> ClientResult<PendingHandle> {
        let id = RequestId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let method = command.method().to_string();

        let payload = JsonRpcRequest::new(id, command).to_bytes()?;
        validate_request_size(payload.len(), &self.config.limits)?;

        let receiver = self.pending.register(id, &method)?;
        let handle = PendingHandle::new(id, method.clone(), receiver, Arc::clone(&self.pending));

        let size = payload.len();
        if let Err(e) = self.transport.submit(TransportMessage::new(id, payload)) {
            warn!(request_id = %id, method = %method, error = %e, "Transport rejected request");
            self.pending.discard(id);
            return Err(e.into());
        }

        self.metrics.record_sent();
        debug!(request_id = %id, method = %method, size, "Dispatched request");
        Ok(handle)
    }
}
