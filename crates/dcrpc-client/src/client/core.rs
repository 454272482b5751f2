//! Core client implementation.
//!
//! [`Client`] owns one transport connection, its pending request table, the
//! dispatcher that feeds the table and the router that drains it. Call-sites
//! live in [`operations`](super::operations) as further `impl Client<T>`
//! blocks.

use std::sync::Arc;

use dcrpc_protocol::{Command, ProtocolResult};
use dcrpc_transport_traits::{Transport, TransportMetrics};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::dispatcher::Dispatcher;
use super::router::Router;
use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::decode::{JsonDecoder, ResultDecoder};
use crate::error::{CancelReason, ClientResult};
use crate::future::ResponseFuture;
use crate::metrics::{DispatchMetrics, DispatchMetricsSnapshot};
use crate::pending::PendingRequests;

/// Shared state behind every clone of a [`Client`].
#[derive(Debug)]
pub(super) struct ClientInner<T: Transport + 'static> {
    dispatcher: Dispatcher<T>,
    router: Router,
    pending: Arc<PendingRequests>,
    metrics: Arc<DispatchMetrics>,
    transport: Arc<T>,
}

/// Client for a JSON-RPC node over a single transport connection.
///
/// Any number of tasks may dispatch concurrently; each gets its own
/// [`ResponseFuture`]. Cloning is cheap and all clones share the same
/// connection and pending table.
///
/// # Examples
///
/// ```rust,no_run
/// use dcrpc_client::{CallContext, Client};
/// use dcrpc_transport_traits::ChannelTransport;
///
/// # async fn example() -> dcrpc_client::ClientResult<()> {
/// let (transport, _node) = ChannelTransport::pair();
/// let client = Client::new(transport);
/// let ctx = CallContext::new();
///
/// // Dispatch both, then wait for both.
/// let mut info = client.get_mining_info_async(&ctx);
/// let mut generating = client.get_generate_async(&ctx);
/// let info = info.receive().await?;
/// let generating = generating.receive().await?;
/// println!("height {} generating {}", info.blocks, generating);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client<T: Transport + 'static> {
    inner: Arc<ClientInner<T>>,
}

impl<T: Transport + 'static> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport + 'static> Drop for ClientInner<T> {
    fn drop(&mut self) {
        // Futures still waiting hold the table, not the client, so they need
        // an answer now.
        debug!("Last Client reference dropped - shutting down response router");
        self.router.shutdown();
        self.pending.close(CancelReason::ClientClosed.into());
    }
}

impl<T: Transport + 'static> Client<T> {
    /// Creates a client with default configuration.
    ///
    /// Starts the response router, so this must be called within a Tokio
    /// runtime.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Creates a client with the given configuration.
    ///
    /// Starts the response router, so this must be called within a Tokio
    /// runtime.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        let transport = Arc::new(transport);
        let metrics = Arc::new(DispatchMetrics::new());
        let pending = Arc::new(PendingRequests::new(Arc::clone(&metrics)));
        let router = Router::spawn(
            Arc::clone(&transport),
            Arc::clone(&pending),
            Arc::clone(&metrics),
            config.limits.clone(),
        );
        let dispatcher = Dispatcher::new(
            Arc::clone(&transport),
            Arc::clone(&pending),
            Arc::clone(&metrics),
            config,
        );

        Self {
            inner: Arc::new(ClientInner {
                dispatcher,
                router,
                pending,
                metrics,
                transport,
            }),
        }
    }

    /// Dispatches `command` and returns its future without waiting.
    ///
    /// The future resolves through `decoder`. Failures before the transport
    /// accepts the request resolve it immediately.
    pub fn send<D: ResultDecoder>(
        &self,
        ctx: &CallContext,
        command: Command,
        decoder: D,
    ) -> ResponseFuture<D> {
        self.inner.dispatcher.send(ctx, command, decoder)
    }

    /// Dispatches `command` and waits for a result of type `R`.
    pub async fn call<R: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        command: Command,
    ) -> ClientResult<R> {
        self.send(ctx, command, JsonDecoder::<R>::new())
            .receive()
            .await
    }

    /// Dispatches a command whose construction may have failed.
    ///
    /// A construction failure becomes an already-resolved future.
    pub(crate) fn dispatch<D: ResultDecoder>(
        &self,
        ctx: &CallContext,
        command: ProtocolResult<Command>,
        decoder: D,
    ) -> ResponseFuture<D> {
        match command {
            Ok(command) => self.send(ctx, command, decoder),
            Err(error) => {
                let dispatcher = &self.inner.dispatcher;
                dispatcher.reject(error.into(), decoder, dispatcher.effective_context(ctx))
            }
        }
    }

    /// Closes the client.
    ///
    /// Outstanding requests fail with [`CancelReason::ClientClosed`], later
    /// commands resolve to the same error without being sent, the router
    /// stops and the transport is closed.
    pub async fn close(&self) -> ClientResult<()> {
        let outstanding = self.inner.pending.close(CancelReason::ClientClosed.into());
        self.inner.router.shutdown();
        self.inner.router.join().await;
        self.inner.transport.close().await?;
        info!(outstanding, "Client closed");
        Ok(())
    }

    /// Returns `true` once the client was closed or its transport went away.
    pub fn is_closed(&self) -> bool {
        self.inner.pending.is_closed()
    }

    /// Number of requests currently in flight.
    pub fn pending_requests(&self) -> usize {
        self.inner.pending.len()
    }

    /// Dispatch counters.
    pub fn metrics(&self) -> DispatchMetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Traffic counters of the underlying transport.
    pub fn transport_metrics(&self) -> TransportMetrics {
        self.inner.transport.metrics()
    }

    /// The transport's endpoint, if it reports one.
    pub fn endpoint(&self) -> Option<String> {
        self.inner.transport.endpoint()
    }

    /// The configuration the client was created with.
    pub fn config(&self) -> &ClientConfig {
        self.inner.dispatcher.config()
    }
}
