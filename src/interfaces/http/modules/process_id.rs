//! Process-ID middleware
//!
//! Mints a [`ProcessId`] for every HTTP request, stores it in the request
//! extensions, runs the rest of the stack inside a tracing span carrying the
//! id and echoes it back as `Process-ID`.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::domain::identifiers::ProcessId;

/// Header carrying the process id (`Process-ID` on the wire).
pub const PROCESS_ID_HEADER: HeaderName = HeaderName::from_static("process-id");

pub async fn process_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let process_id = ProcessId::new();
    request.extensions_mut().insert(process_id.clone());

    let span = tracing::info_span!(
        "oicp_request",
        process_id = %process_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = next.run(request).instrument(span).await;

    // The OICP handler already set the header for the id it used.
    if !response.headers().contains_key(&PROCESS_ID_HEADER) {
        if let Ok(value) = HeaderValue::from_str(process_id.as_str()) {
            response.headers_mut().insert(PROCESS_ID_HEADER, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};

    async fn echo(Extension(process_id): Extension<ProcessId>) -> String {
        process_id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", get(echo))
            .layer(middleware::from_fn(process_id_middleware))
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn handler_sees_the_echoed_id() {
        let req = Request::builder().uri("/echo").body(Body::empty()).unwrap();
        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let header = resp
            .headers()
            .get(PROCESS_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(header.as_bytes(), &body[..]);
    }

    #[tokio::test]
    async fn every_request_gets_a_fresh_id() {
        let first = send(Request::builder().uri("/echo").body(Body::empty()).unwrap()).await;
        let second = send(Request::builder().uri("/missing").body(Body::empty()).unwrap()).await;
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
        assert_ne!(
            first.headers().get(PROCESS_ID_HEADER),
            second.headers().get(PROCESS_ID_HEADER)
        );
        assert!(second.headers().contains_key(PROCESS_ID_HEADER));
    }
}
