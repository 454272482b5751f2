//! Client core implementation
//!
//! - `core`: `Client<T>` and its lifecycle
//! - `dispatcher`: turning commands into in-flight requests
//! - `router`: the single task delivering responses to the pending table
//! - `operations`: call-sites built on `Client::send`

pub mod core;
mod dispatcher;
pub mod operations;
mod router;

pub use self::core::Client;
