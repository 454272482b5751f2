//! Prelude module for convenient imports
//!
//! # Example
//!
//! ```rust,no_run
//! use dcrpc_client::prelude::*;
//!
//! # async fn example() -> ClientResult<()> {
//! let (transport, _node) = ChannelTransport::pair();
//! let client = Client::new(transport);
//! let info = client.get_mining_info(&CallContext::new()).await?;
//! println!("difficulty {}", info.difficulty);
//! # Ok(())
//! # }
//! ```

// Version information
pub use crate::{CRATE_NAME, VERSION};

pub use crate::{
    // Core client types
    CallContext,
    Client,
    ClientConfig,
    // Errors
    CancelReason,
    ClientError,
    ClientResult,
    ErrorKind,
    UsageError,
    // Futures and decoders
    AcceptanceDecoder,
    IgnoreResult,
    JsonDecoder,
    ResponseFuture,
    ResultDecoder,
    // Observability
    DispatchMetricsSnapshot,
};

pub use dcrpc_protocol::types::{
    BlockEncode, BlockHash, GetMiningInfoResult, GetWorkResult, SubmitBlockOptions,
};
pub use dcrpc_protocol::{Command, CommandBuilder};
pub use dcrpc_transport_traits::{ChannelTransport, LimitsConfig, Transport, TransportError};
