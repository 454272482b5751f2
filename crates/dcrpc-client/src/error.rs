//! Client error types.
//!
//! Every outcome a caller can observe falls into one of five classes, so a
//! caller can tell "the node said no" apart from "the node never answered":
//!
//! | class | meaning |
//! |---|---|
//! | [`ClientError::Transport`] | connection or I/O failure before any response |
//! | [`ClientError::Protocol`] | a message existed but did not have the expected shape |
//! | [`ClientError::Application`] | a well-formed response rejecting the request |
//! | [`ClientError::Cancellation`] | the caller stopped waiting |
//! | [`ClientError::Usage`] | the API was misused |

use dcrpc_protocol::{ProtocolError, RequestId};
use dcrpc_transport_traits::TransportError;
use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Classified failure of a remote call.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ClientError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response or request did not have the shape it should.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The remote endpoint understood the request and rejected it.
    ///
    /// Displays exactly the remote reason.
    #[error("{reason}")]
    Application {
        /// Error code from the remote descriptor; `None` for rejections
        /// reported as a bare string result
        code: Option<i32>,
        /// The remote reason, verbatim
        reason: String,
    },

    /// The caller stopped waiting for the response.
    #[error(transparent)]
    Cancellation(#[from] CancelReason),

    /// The client API was used incorrectly.
    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Why a request stopped waiting.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The call's deadline elapsed.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// The client was closed while the request was outstanding.
    #[error("Client closed")]
    ClientClosed,
}

/// Programming errors in how the client is driven.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// `receive` was called again on a spent future.
    #[error("Response future already consumed")]
    FutureConsumed,

    /// A request identifier was registered twice.
    #[error("Request id {0} is already pending")]
    DuplicateRequestId(RequestId),
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ClientError::Transport`]
    Transport,
    /// See [`ClientError::Protocol`]
    Protocol,
    /// See [`ClientError::Application`]
    Application,
    /// See [`ClientError::Cancellation`]
    Cancellation,
    /// See [`ClientError::Usage`]
    Usage,
}

impl ClientError {
    /// Creates an application error.
    pub fn application(code: Option<i32>, reason: impl Into<String>) -> Self {
        Self::Application {
            code,
            reason: reason.into(),
        }
    }

    /// Returns the error class.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Application { .. } => ErrorKind::Application,
            Self::Cancellation(_) => ErrorKind::Cancellation,
            Self::Usage(_) => ErrorKind::Usage,
        }
    }

    /// Returns `true` if sending the same command again could succeed.
    ///
    /// The client itself never retries.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => !matches!(
                err,
                TransportError::RequestTooLarge { .. } | TransportError::ResponseTooLarge { .. }
            ),
            Self::Cancellation(reason) => matches!(reason, CancelReason::DeadlineExceeded),
            _ => false,
        }
    }

    /// The remote reason of an application error.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Application { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// The remote error code of an application error, if it had one.
    pub const fn code(&self) -> Option<i32> {
        match self {
            Self::Application { code, .. } => *code,
            _ => None,
        }
    }

    /// The raw payload kept by a protocol error, for diagnostics.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Protocol(err) => err.payload(),
            _ => None,
        }
    }
}
