//! HTTP interface of the EMP server API
//!
//! - `modules`: route handlers and middleware
//! - `router`: the axum router wiring all OICP routes

pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiState};
