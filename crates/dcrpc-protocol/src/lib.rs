//! # dcrpc protocol
//!
//! Wire-level types shared by the dcrpc transport and client crates.
//!
//! This crate defines:
//! - **Commands**: [`Command`] and [`CommandBuilder`], the immutable request values
//!   handed to the dispatcher
//! - **Correlation**: [`RequestId`], the identifier linking a request to its response
//! - **JSON-RPC**: request envelopes, error descriptors and response parsing
//!   ([`parse_response`])
//! - **Errors**: [`ProtocolError`] for serialization and shape failures
//! - **Types**: result shapes for the mining call-sites ([`types`])
//!
//! Nothing here knows about transports or pending requests; it only describes
//! what goes over the wire.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

mod command;
mod error;
pub mod jsonrpc;
pub mod types;

pub use command::{Command, CommandBuilder};
pub use error::{ProtocolError, ProtocolResult};
pub use jsonrpc::{
    JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcVersion, RawResponse, RequestId,
    ResponseParseError, ResponsePayload, parse_response,
};
