//! # dcrpc transport traits
//!
//! The boundary between the dcrpc client and whatever carries its bytes.
//!
//! ## Overview
//!
//! This crate defines:
//! - **Traits**: [`Transport`]
//! - **Types**: [`TransportMessage`], [`TransportEvent`]
//! - **Errors**: [`TransportError`], [`TransportResult`]
//! - **Config**: [`LimitsConfig`]
//! - **Metrics**: [`TransportMetrics`], [`AtomicMetrics`]
//! - **In-process transport**: [`ChannelTransport`] and its [`RemoteEndpoint`]
//!
//! ## Usage
//!
//! A transport only has to accept serialized requests and report what comes
//! back:
//!
//! ```rust,ignore
//! use dcrpc_transport_traits::{Transport, TransportEvent, TransportMessage, TransportResult};
//!
//! #[derive(Debug)]
//! struct MyTransport { /* ... */ }
//!
//! impl Transport for MyTransport {
//!     fn submit(&self, message: TransportMessage) -> TransportResult<()> { /* ... */ }
//!     // ... receive and close
//! }
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

mod channel;
mod config;
mod error;
mod message;
mod metrics;
mod traits;

// Re-export all public items
pub use channel::{ChannelTransport, RemoteEndpoint};
pub use config::LimitsConfig;
pub use error::{TransportError, TransportResult};
pub use message::{TransportEvent, TransportMessage};
pub use metrics::{AtomicMetrics, TransportMetrics};
pub use traits::Transport;

// Re-export validation functions
pub use error::{validate_request_size, validate_response_size};
