//! Business handler contract
//!
//! The server itself holds no business logic. Each operation fans a parsed
//! request out to every registered [`OperationHandler`]; a handler answers
//! `Ok(None)` when the request is not its concern.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::result::OicpResult;
use crate::domain::identifiers::{ProcessId, ProviderId};
use crate::domain::operation::Operation;
use crate::domain::requests::{OicpRequest, OicpResponse};
use crate::support::errors::HandlerError;
use crate::support::shutdown::ShutdownSignal;

pub type HandlerOutcome<R> =
    Result<Option<OicpResult<<R as OicpRequest>::Response>>, HandlerError>;

/// Per-request data handed to handlers and listeners.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub operation: Operation,
    pub process_id: ProcessId,
    /// Provider id taken from the URL
    pub provider_id: ProviderId,
    pub request_timestamp: DateTime<Utc>,
    /// Advisory; the dispatcher does not enforce it.
    pub request_timeout: Duration,
    pub shutdown: ShutdownSignal,
}

impl HandlerContext {
    /// Positive result correlated with this request.
    pub fn success<T: OicpResponse>(&self, response: T) -> OicpResult<T> {
        OicpResult::success(response, self.process_id.clone())
    }

    /// Negative result correlated with this request.
    pub fn failed<T: OicpResponse>(&self, response: T) -> OicpResult<T> {
        OicpResult::failed(response, self.process_id.clone())
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }
}

#[async_trait]
pub trait OperationHandler<R: OicpRequest>: Send + Sync {
    async fn handle(&self, ctx: &HandlerContext, request: &R) -> HandlerOutcome<R>;
}

/// Adapter turning an async closure into an [`OperationHandler`].
pub struct FnHandler<F>(F);

pub fn handler_fn<R, F, Fut>(f: F) -> FnHandler<F>
where
    R: OicpRequest,
    F: Fn(HandlerContext, R) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerOutcome<R>> + Send,
{
    FnHandler(f)
}

#[async_trait]
impl<R, F, Fut> OperationHandler<R> for FnHandler<F>
where
    R: OicpRequest,
    F: Fn(HandlerContext, R) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerOutcome<R>> + Send,
{
    async fn handle(&self, ctx: &HandlerContext, request: &R) -> HandlerOutcome<R> {
        (self.0)(ctx.clone(), request.clone()).await
    }
}
