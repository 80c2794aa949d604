//! EMP server API router

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::application::{ApiOperation, EmpServerApi};
use crate::domain::requests::{
    AuthorizeRemoteReservationStartRequest, AuthorizeRemoteReservationStopRequest,
    AuthorizeRemoteStartRequest, AuthorizeRemoteStopRequest, GetChargeDetailRecordsRequest,
    PullEvseDataRequest, PullEvsePricingRequest, PullEvseStatusByIdRequest,
    PullEvseStatusByOperatorIdRequest, PullEvseStatusRequest, PullPricingProductDataRequest,
    PushAuthenticationDataRequest,
};

use super::modules::health::{self, HealthState};
use super::modules::info::{self, InfoState};
use super::modules::metrics::{self, http_metrics_middleware, MetricsState};
use super::modules::oicp::{dispatch, preflight, OicpState};
use super::modules::process_id::process_id_middleware;

/// Unified router state. Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub api: Arc<EmpServerApi>,
    pub started_at: Arc<Instant>,
    pub metrics: Option<PrometheusHandle>,
}

impl ApiState {
    pub fn new(api: Arc<EmpServerApi>, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            api,
            started_at: Arc::new(Instant::now()),
            metrics,
        }
    }
}

impl FromRef<ApiState> for OicpState {
    fn from_ref(s: &ApiState) -> Self {
        OicpState {
            api: Arc::clone(&s.api),
        }
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        HealthState {
            api: Arc::clone(&s.api),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<ApiState> for MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        MetricsState {
            handle: s.metrics.clone(),
        }
    }
}

impl FromRef<ApiState> for InfoState {
    fn from_ref(s: &ApiState) -> Self {
        InfoState {
            service_name: Arc::from(s.api.settings().service_name.as_str()),
        }
    }
}

fn oicp_route<R: ApiOperation>(router: Router<ApiState>) -> Router<ApiState> {
    router.route(
        R::OPERATION.route(),
        post(dispatch::<R>).options(preflight),
    )
}

pub fn create_api_router(state: ApiState, max_body_bytes: usize) -> Router {
    let router = Router::new()
        .route("/", get(info::index))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/{file}", get(info::file));

    // ── OICP operations ────────────────────────────────────────────
    let router = oicp_route::<PullEvseDataRequest>(router);
    let router = oicp_route::<PullEvseStatusRequest>(router);
    let router = oicp_route::<PullEvseStatusByIdRequest>(router);
    let router = oicp_route::<PullEvseStatusByOperatorIdRequest>(router);
    let router = oicp_route::<PullPricingProductDataRequest>(router);
    let router = oicp_route::<PullEvsePricingRequest>(router);
    let router = oicp_route::<PushAuthenticationDataRequest>(router);
    let router = oicp_route::<AuthorizeRemoteReservationStartRequest>(router);
    let router = oicp_route::<AuthorizeRemoteReservationStopRequest>(router);
    let router = oicp_route::<AuthorizeRemoteStartRequest>(router);
    let router = oicp_route::<AuthorizeRemoteStopRequest>(router);
    let router = oicp_route::<GetChargeDetailRecordsRequest>(router);

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(process_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};

    use crate::application::{handler_fn, HandlerContext};
    use crate::domain::paging::Page;
    use crate::domain::requests::PullEvseDataResponse;

    const STATUS_RECORDS: &str = "/api/oicp/evsepull/v21/providers/DE-GDF/status-records";
    const REMOTE_START: &str = "/api/oicp/charging/v21/providers/DE*GDF/authorize-remote/start";

    fn app_with(api: Arc<EmpServerApi>) -> Router {
        create_api_router(ApiState::new(api, None), 64 * 1024)
    }

    async fn send(app: Router, req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app.into_service();
        svc.call(req).await.unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::http::Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_status_request_is_a_data_error_with_200() {
        let api = Arc::new(EmpServerApi::default());
        let resp = send(app_with(Arc::clone(&api)), post_json(STATUS_RECORDS, "{}")).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers().clone();
        assert_eq!(headers["content-type"], "application/json; charset=utf-8");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "POST");
        assert_eq!(
            headers["access-control-allow-headers"],
            "Content-Type, Accept, Authorization"
        );
        assert_eq!(headers["connection"], "close");
        assert!(headers.contains_key("process-id"));

        let body = json_body(resp).await;
        assert_eq!(body["StatusCode"]["Code"], "022");
        assert_eq!(
            body["StatusCode"]["Description"],
            "We could not parse the given PullEVSEStatus request!"
        );

        let counters = api.pull_evse_status.counters().snapshot();
        assert_eq!(counters.requests_error, 1);
    }

    #[tokio::test]
    async fn invalid_provider_id_is_a_system_error_with_200() {
        let api = Arc::new(EmpServerApi::default());
        let resp = send(
            app_with(api),
            post_json(
                "/api/oicp/evsepull/v23/providers/not-a-valid-id/data-records",
                r#"{ "ProviderID": "DE-GDF" }"#,
            ),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["StatusCode"]["Code"], "021");
        assert_eq!(
            body["StatusCode"]["Description"],
            "The expected 'providerId' URL parameter could not be parsed!"
        );
    }

    #[tokio::test]
    async fn registered_handler_answers_with_matching_process_id() {
        let api = Arc::new(EmpServerApi::default());
        api.authorize_remote_start.register_handler(handler_fn(
            |ctx: HandlerContext, req: AuthorizeRemoteStartRequest| async move {
                Ok(Some(ctx.success(req.acknowledge())))
            },
        ));

        let resp = send(
            app_with(api),
            post_json(
                REMOTE_START,
                r#"{
                    "ProviderID": "DE-GDF",
                    "EvseID": "DE*ABC*E1",
                    "Identification": { "RemoteIdentification": { "EvcoID": "DE-GDF-C12345678-X" } }
                }"#,
            ),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("process-id"));
        let body = json_body(resp).await;
        assert_eq!(body["Result"], true);
        assert_eq!(body["StatusCode"]["Code"], "000");
        assert!(body["SessionID"].is_string());
    }

    #[tokio::test]
    async fn paging_query_reaches_the_handler() {
        let api = Arc::new(EmpServerApi::default());
        api.pull_evse_data.register_handler(handler_fn(
            |ctx: HandlerContext, req: PullEvseDataRequest| async move {
                let page = Page::new(Vec::new(), req.paging.page(), req.paging.size(), 0);
                Ok(Some(ctx.success(PullEvseDataResponse::new(page))))
            },
        ));

        let resp = send(
            app_with(api),
            post_json(
                "/api/oicp/evsepull/v23/providers/DE-GDF/data-records?page=2&size=50&sortOrder=EvseID,desc",
                r#"{ "ProviderID": "DE-GDF" }"#,
            ),
        )
        .await;

        let body = json_body(resp).await;
        assert_eq!(body["number"], 2);
        assert_eq!(body["size"], 50);
        assert_eq!(body["content"], json!([]));
    }

    #[tokio::test]
    async fn panicking_serializer_still_answers_200() {
        let api = Arc::new(EmpServerApi::default());
        api.authorize_remote_stop.set_serializer(
            |_: &crate::domain::Acknowledgement| -> Result<Value, serde_json::Error> {
                panic!("serializer exploded")
            },
        );

        let resp = send(
            app_with(api),
            post_json(
                "/api/oicp/charging/v21/providers/DE-GDF/authorize-remote/stop",
                r#"{"ProviderID":"DE-GDF","EvseID":"DE*ABC*E1","SessionID":"b2688855-7f00-0002-6d8e-48d498e8b1f2"}"#,
            ),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("process-id"));
        let body = json_body(resp).await;
        assert_eq!(body["Result"], false);
        assert_eq!(body["StatusCode"]["Code"], "021");
        assert_eq!(
            body["StatusCode"]["Description"],
            "We could not serialize the AuthorizeRemoteStop response!"
        );
    }

    #[tokio::test]
    async fn preflight_returns_cors_headers() {
        let api = Arc::new(EmpServerApi::default());
        let req = Request::builder()
            .method("OPTIONS")
            .uri(REMOTE_START)
            .body(Body::empty())
            .unwrap();

        let resp = send(app_with(api), req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-methods"], "POST");
    }

    #[tokio::test]
    async fn health_reports_counters() {
        let api = Arc::new(EmpServerApi::default());
        send(app_with(Arc::clone(&api)), post_json(STATUS_RECORDS, "{}")).await;

        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = send(app_with(api), req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["status"], "ok");
        let operations = body["operations"].as_array().unwrap();
        assert_eq!(operations.len(), 12);
        let status = operations
            .iter()
            .find(|op| op["operation"] == "PullEVSEStatus")
            .unwrap();
        assert_eq!(status["requests_error"], 1);
    }

    #[tokio::test]
    async fn banner_and_disabled_metrics() {
        let api = Arc::new(EmpServerApi::default());

        let resp = send(
            app_with(Arc::clone(&api)),
            Request::builder().uri("/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).starts_with("OICP v2.3 EMP Server API"));

        let resp = send(
            app_with(Arc::clone(&api)),
            Request::builder().uri("/index.html").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(
            app_with(api),
            Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
