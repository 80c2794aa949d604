//! The twelve OICP POST routes and their CORS preflight

pub mod handlers;
pub mod headers;

pub use handlers::{dispatch, preflight, OicpState};
pub use headers::{apply_cors_headers, apply_oicp_headers};
