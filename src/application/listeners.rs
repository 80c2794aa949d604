//! "Request received" and "response sent" notifications
//!
//! Listeners observe the pipeline; they cannot change its outcome. A
//! listener that fails or panics is logged and skipped.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use futures_util::FutureExt;
use tracing::warn;

use super::handlers::HandlerContext;
use super::registry::Registry;
use super::result::OicpResult;
use crate::domain::identifiers::ProcessId;
use crate::domain::operation::Operation;
use crate::domain::requests::OicpRequest;
use crate::support::errors::HandlerError;

pub struct RequestEvent<'a, R> {
    pub timestamp: DateTime<Utc>,
    pub context: &'a HandlerContext,
    pub request: &'a R,
}

pub struct ResponseEvent<'a, R: OicpRequest> {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub process_id: &'a ProcessId,
    /// `None` when the request never got past parsing.
    pub request: Option<&'a R>,
    pub result: &'a OicpResult<R::Response>,
    pub runtime: Duration,
}

#[async_trait]
pub trait RequestListener<R: OicpRequest>: Send + Sync {
    async fn on_request(&self, event: &RequestEvent<'_, R>) -> Result<(), HandlerError>;
}

#[async_trait]
pub trait ResponseListener<R: OicpRequest>: Send + Sync {
    async fn on_response(&self, event: &ResponseEvent<'_, R>) -> Result<(), HandlerError>;
}

/// Synchronous closure listener; build one with [`on_request_fn`] or [`on_response_fn`].
pub struct FnListener<F>(F);

pub fn on_request_fn<R, F>(f: F) -> FnListener<F>
where
    R: OicpRequest,
    F: for<'a, 'b> Fn(&'a RequestEvent<'b, R>) -> Result<(), HandlerError> + Send + Sync,
{
    FnListener(f)
}

pub fn on_response_fn<R, F>(f: F) -> FnListener<F>
where
    R: OicpRequest,
    F: for<'a, 'b> Fn(&'a ResponseEvent<'b, R>) -> Result<(), HandlerError> + Send + Sync,
{
    FnListener(f)
}

#[async_trait]
impl<R, F> RequestListener<R> for FnListener<F>
where
    R: OicpRequest,
    F: for<'a, 'b> Fn(&'a RequestEvent<'b, R>) -> Result<(), HandlerError> + Send + Sync,
{
    async fn on_request(&self, event: &RequestEvent<'_, R>) -> Result<(), HandlerError> {
        (self.0)(event)
    }
}

#[async_trait]
impl<R, F> ResponseListener<R> for FnListener<F>
where
    R: OicpRequest,
    F: for<'a, 'b> Fn(&'a ResponseEvent<'b, R>) -> Result<(), HandlerError> + Send + Sync,
{
    async fn on_response(&self, event: &ResponseEvent<'_, R>) -> Result<(), HandlerError> {
        (self.0)(event)
    }
}

/// Both listener lists of one operation.
pub struct Listeners<R: OicpRequest> {
    pub on_request: Registry<dyn RequestListener<R>>,
    pub on_response: Registry<dyn ResponseListener<R>>,
}

impl<R: OicpRequest> Listeners<R> {
    pub fn new() -> Self {
        Self {
            on_request: Registry::new(),
            on_response: Registry::new(),
        }
    }

    pub async fn notify_request(&self, event: &RequestEvent<'_, R>) {
        let listeners = self.on_request.snapshot();
        if listeners.is_empty() {
            return;
        }
        let outcomes = join_all(
            listeners
                .iter()
                .map(|(_, l)| AssertUnwindSafe(l.on_request(event)).catch_unwind()),
        )
        .await;
        report(R::OPERATION, "request", event.context.process_id.as_str(), outcomes);
    }

    pub async fn notify_response(&self, event: &ResponseEvent<'_, R>) {
        let listeners = self.on_response.snapshot();
        if listeners.is_empty() {
            return;
        }
        let outcomes = join_all(
            listeners
                .iter()
                .map(|(_, l)| AssertUnwindSafe(l.on_response(event)).catch_unwind()),
        )
        .await;
        report(R::OPERATION, "response", event.process_id.as_str(), outcomes);
    }
}

impl<R: OicpRequest> Default for Listeners<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn report(
    operation: Operation,
    kind: &'static str,
    process_id: &str,
    outcomes: Vec<Result<Result<(), HandlerError>, Box<dyn Any + Send>>>,
) {
    for outcome in outcomes {
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                operation = operation.name(),
                process_id,
                error = %e,
                "{} listener failed",
                kind
            ),
            Err(panic) => warn!(
                operation = operation.name(),
                process_id,
                panic = %panic_message(panic.as_ref()),
                "{} listener panicked",
                kind
            ),
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
