//! Liveness and counter snapshot endpoint

pub mod handlers;

pub use handlers::*;
