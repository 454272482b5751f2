//! Typed response futures.
//!
//! Every dispatched command hands back a [`ResponseFuture`] right away. The
//! caller can keep dispatching and collect outcomes later with
//! [`ResponseFuture::receive`], in any order.

use std::sync::Arc;

use dcrpc_protocol::RequestId;
use dcrpc_transport_traits::TransportError;
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error};

use crate::context::CallContext;
use crate::decode::ResultDecoder;
use crate::error::{CancelReason, ClientError, ClientResult, UsageError};
use crate::pending::{Outcome, PendingRequests};

/// One-shot accessor for the outcome of one dispatched command.
///
/// `receive` has effect once. Dropping the future before that removes the
/// request from the pending table, so a late response is dropped as
/// unmatched.
#[derive(Debug)]
pub struct ResponseFuture<D: ResultDecoder> {
    state: State,
    decoder: D,
    ctx: CallContext,
}

#[derive(Debug)]
enum State {
    Pending(PendingHandle),
    Ready(Outcome),
    Consumed,
}

/// Link between a future and its pending table entry.
#[derive(Debug)]
pub(crate) struct PendingHandle {
    id: RequestId,
    method: String,
    receiver: oneshot::Receiver<Outcome>,
    pending: Arc<PendingRequests>,
}

enum Wake {
    Delivered(Result<Outcome, oneshot::error::RecvError>),
    Cancelled,
    DeadlineExceeded,
}

impl<D: ResultDecoder> ResponseFuture<D> {
    pub(crate) fn pending(handle: PendingHandle, decoder: D, ctx: CallContext) -> Self {
        Self {
            state: State::Pending(handle),
            decoder,
            ctx,
        }
    }

    pub(crate) fn ready(outcome: Outcome, decoder: D, ctx: CallContext) -> Self {
        Self {
            state: State::Ready(outcome),
            decoder,
            ctx,
        }
    }

    /// A future already resolved to `error`.
    ///
    /// Used by call-sites whose arguments fail a conversion before anything
    /// could be sent.
    pub fn failed(error: ClientError) -> Self
    where
        D: Default,
    {
        Self::ready(Err(error), D::default(), CallContext::new())
    }

    /// Waits for the outcome.
    ///
    /// Returns as soon as the response arrives, the call context is cancelled
    /// or its deadline passes, whichever happens first; a response that is
    /// already there wins over a simultaneous cancellation. Later calls fail
    /// with [`UsageError::FutureConsumed`] without waiting.
    pub async fn receive(&mut self) -> ClientResult<D::Output> {
        let outcome = match std::mem::replace(&mut self.state, State::Consumed) {
            State::Consumed => {
                error!("receive called on a consumed response future");
                return Err(UsageError::FutureConsumed.into());
            }
            State::Ready(outcome) => outcome,
            State::Pending(mut handle) => handle.wait(&self.ctx).await,
        };
        outcome.and_then(|payload| self.decoder.decode(payload))
    }

    /// Identifier of the request this future waits on, while it still waits.
    pub fn request_id(&self) -> Option<RequestId> {
        match &self.state {
            State::Pending(handle) => Some(handle.id),
            _ => None,
        }
    }

    /// Method name of the request this future waits on, while it still waits.
    pub fn method(&self) -> Option<&str> {
        match &self.state {
            State::Pending(handle) => Some(&handle.method),
            _ => None,
        }
    }

    /// Returns `true` if the outcome is known without waiting.
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Returns `true` once `receive` has returned.
    pub const fn is_consumed(&self) -> bool {
        matches!(self.state, State::Consumed)
    }

    /// The context the future waits under.
    pub const fn context(&self) -> &CallContext {
        &self.ctx
    }
}

impl PendingHandle {
    pub(crate) fn new(
        id: RequestId,
        method: String,
        receiver: oneshot::Receiver<Outcome>,
        pending: Arc<PendingRequests>,
    ) -> Self {
        Self {
            id,
            method,
            receiver,
            pending,
        }
    }

    async fn wait(&mut self, ctx: &CallContext) -> Outcome {
        let wake = tokio::select! {
            biased;
            delivered = &mut self.receiver => Wake::Delivered(delivered),
            () = ctx.cancelled() => Wake::Cancelled,
            () = sleep_until_deadline(ctx.deadline()) => Wake::DeadlineExceeded,
        };

        match wake {
            Wake::Delivered(Ok(outcome)) => outcome,
            Wake::Delivered(Err(_)) => Err(TransportError::ConnectionLost(
                "Response channel closed".to_string(),
            )
            .into()),
            Wake::Cancelled => self.abandon(CancelReason::Cancelled),
            Wake::DeadlineExceeded => self.abandon(CancelReason::DeadlineExceeded),
        }
    }

    fn abandon(&mut self, reason: CancelReason) -> Outcome {
        if self.pending.cancel(self.id, reason) {
            debug!(
                request_id = %self.id,
                method = %self.method,
                %reason,
                "Stopped waiting for response"
            );
            return Err(reason.into());
        }
        // The entry was completed between the wake-up and the cancel; that
        // outcome is already in the channel.
        match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(reason.into()),
        }
    }
}

impl Drop for PendingHandle {
    fn drop(&mut self) {
        // No-op when the entry was already completed or cancelled.
        if self.pending.discard(self.id) {
            debug!(
                request_id = %self.id,
                method = %self.method,
                "Response future dropped while pending"
            );
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
