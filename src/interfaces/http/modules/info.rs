//! Plain-text service banner on `GET /` and `GET /{file}`

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

#[derive(Clone)]
pub struct InfoState {
    pub service_name: Arc<str>,
}

fn banner(state: &InfoState) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("{} v{}", state.service_name, env!("CARGO_PKG_VERSION")),
    )
}

/// `GET /`
pub async fn index(State(state): State<InfoState>) -> impl IntoResponse {
    banner(&state)
}

/// `GET /{file}`; no files are served, every name gets the banner.
pub async fn file(State(state): State<InfoState>, Path(_file): Path<String>) -> impl IntoResponse {
    banner(&state)
}
