//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::application::{EmpServerApi, OperationCountersSnapshot};

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub api: Arc<EmpServerApi>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub registered_handlers: usize,
    pub operations: Vec<OperationCountersSnapshot>,
}

/// `GET /health`
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let status = if state.api.settings().shutdown.is_triggered() {
        "shutting_down"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        registered_handlers: state.api.handler_count(),
        operations: state.api.counters().snapshot(),
    })
}
