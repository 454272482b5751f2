//! # dcrpc client
//!
//! Asynchronous command dispatch for a dcrd-style JSON-RPC node.
//!
//! ## Features
//!
//! - Non-blocking dispatch: every call returns a typed [`ResponseFuture`] at once
//! - Request/response correlation over a single shared connection
//! - Out-of-order responses, any number of requests in flight
//! - Per-call cancellation and deadlines through [`CallContext`]
//! - Error classification into transport, protocol, application, cancellation
//!   and usage failures ([`ClientError`])
//! - Transport-agnostic design (works with any `Transport` implementation)
//!
//! ## Architecture
//!
//! ```text
//! call-site (client::operations)
//!        ↓  Command + decoder
//! Dispatcher ── register ──→ PendingRequests ←── complete ── Router
//!        ↓  submit                                              ↑ receive
//! Transport ────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dcrpc_client::{CallContext, Client};
//! use dcrpc_transport_traits::ChannelTransport;
//! use std::time::Duration;
//!
//! # async fn example() -> dcrpc_client::ClientResult<()> {
//! let (transport, _node) = ChannelTransport::pair();
//! let client = Client::new(transport);
//!
//! let ctx = CallContext::new().with_timeout(Duration::from_secs(5));
//! let mut work = client.get_work_async(&ctx);
//! // ... do other things while the node answers
//! let work = work.receive().await?;
//! println!("work data: {}", work.data);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! # use dcrpc_client::{CallContext, Client, ClientError};
//! # use dcrpc_transport_traits::ChannelTransport;
//! # async fn example() {
//! # let (transport, _node) = ChannelTransport::pair();
//! # let client = Client::new(transport);
//! let block: Vec<u8> = vec![0u8; 180];
//! match client.submit_block(&CallContext::new(), Some(&block), None).await {
//!     Ok(()) => println!("block accepted"),
//!     Err(ClientError::Application { reason, .. }) => eprintln!("block rejected: {reason}"),
//!     Err(e) => eprintln!("submitblock failed: {e}"),
//! }
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod classify;
pub mod client;
pub mod config;
pub mod context;
pub mod decode;
pub mod error;
pub mod future;
pub mod metrics;
pub mod pending;
pub mod prelude;

pub use classify::{classify, classify_bytes};
pub use client::Client;
pub use client::operations::mining::{
    FutureGenerateResult, FutureGetGenerateResult, FutureGetHashesPerSecResult,
    FutureGetMiningInfoResult, FutureGetNetworkHashPs, FutureGetWork, FutureGetWorkSubmit,
    FutureRegenTemplateResult, FutureSetGenerateResult, FutureSubmitBlockResult,
};
pub use config::ClientConfig;
pub use context::CallContext;
pub use decode::{AcceptanceDecoder, IgnoreResult, JsonDecoder, ResultDecoder};
pub use error::{CancelReason, ClientError, ClientResult, ErrorKind, UsageError};
pub use future::ResponseFuture;
pub use metrics::{DispatchMetrics, DispatchMetricsSnapshot};
pub use pending::{Outcome, PendingRequests, RegisterError, UnmatchedResponse};

pub use dcrpc_protocol::types::{
    BlockEncode, BlockHash, GetMiningInfoResult, GetWorkResult, SubmitBlockOptions,
};
pub use dcrpc_protocol::{Command, CommandBuilder, ProtocolError, RequestId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
