//! Per-operation request/response tallies
//!
//! Each increment is mirrored to the `metrics` facade so the Prometheus
//! exporter sees the same numbers the `/health` snapshot reports:
//!
//! - **`oicp_requests_total`**: counter with labels `operation`, `outcome`
//! - **`oicp_responses_total`**: counter with labels `operation`, `outcome`
//! - **`oicp_request_duration_seconds`**: histogram with label `operation`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domain::operation::Operation;

#[derive(Debug)]
pub struct OperationCounters {
    operation: Operation,
    requests_ok: AtomicU64,
    requests_error: AtomicU64,
    responses_ok: AtomicU64,
    responses_error: AtomicU64,
}

impl OperationCounters {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            requests_ok: AtomicU64::new(0),
            requests_error: AtomicU64::new(0),
            responses_ok: AtomicU64::new(0),
            responses_error: AtomicU64::new(0),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn request_ok(&self) {
        self.requests_ok.fetch_add(1, Ordering::Relaxed);
        self.record_request("ok");
    }

    pub fn request_error(&self) {
        self.requests_error.fetch_add(1, Ordering::Relaxed);
        self.record_request("error");
    }

    pub fn response_ok(&self, runtime: Duration) {
        self.responses_ok.fetch_add(1, Ordering::Relaxed);
        self.record_response("ok", runtime);
    }

    pub fn response_error(&self, runtime: Duration) {
        self.responses_error.fetch_add(1, Ordering::Relaxed);
        self.record_response("error", runtime);
    }

    pub fn snapshot(&self) -> OperationCountersSnapshot {
        OperationCountersSnapshot {
            operation: self.operation.name(),
            requests_ok: self.requests_ok.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
            responses_ok: self.responses_ok.load(Ordering::Relaxed),
            responses_error: self.responses_error.load(Ordering::Relaxed),
        }
    }

    fn record_request(&self, outcome: &'static str) {
        metrics::counter!("oicp_requests_total", "operation" => self.operation.name(), "outcome" => outcome)
            .increment(1);
    }

    fn record_response(&self, outcome: &'static str, runtime: Duration) {
        metrics::counter!("oicp_responses_total", "operation" => self.operation.name(), "outcome" => outcome)
            .increment(1);
        metrics::histogram!("oicp_request_duration_seconds", "operation" => self.operation.name())
            .record(runtime.as_secs_f64());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationCountersSnapshot {
    pub operation: &'static str,
    pub requests_ok: u64,
    pub requests_error: u64,
    pub responses_ok: u64,
    pub responses_error: u64,
}

/// One [`OperationCounters`] per [`Operation`].
#[derive(Debug)]
pub struct ApiCounters {
    operations: [Arc<OperationCounters>; 12],
}

impl ApiCounters {
    pub fn new() -> Self {
        Self {
            operations: Operation::ALL.map(|op| Arc::new(OperationCounters::new(op))),
        }
    }

    pub fn get(&self, operation: Operation) -> &Arc<OperationCounters> {
        &self.operations[operation.index()]
    }

    pub fn snapshot(&self) -> Vec<OperationCountersSnapshot> {
        self.operations.iter().map(|c| c.snapshot()).collect()
    }
}

impl Default for ApiCounters {
    fn default() -> Self {
        Self::new()
    }
}
