//! # OICP EMP Server API
//!
//! Server side of the OICP v2.3 e-mobility provider (EMP) interface: the
//! Hubject platform calls these twelve operations and business logic
//! answers them through registered handlers.
//!
//! ## Architecture
//!
//! - **domain**: OICP identifiers, status codes, records and the typed request/response pairs
//! - **application**: per-operation endpoints with handler fan-out, listeners and counters
//! - **interfaces**: axum routes, CORS and `Process-ID` headers
//! - **server**: lifecycle, tracing and metrics recorder
//! - **support**: error types and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export the dispatcher and its router
pub use application::EmpServerApi;
pub use interfaces::http::create_api_router;
