//! Generic OICP route handler
//!
//! One handler, instantiated per request type, serves all twelve routes.
//! Protocol failures never surface as HTTP errors: whatever happens, the
//! answer is `200 OK` with the serialized OICP response.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::headers::{apply_cors_headers, apply_oicp_headers};
use crate::application::listeners::panic_message;
use crate::application::{ApiOperation, EmpServerApi, Endpoint, InboundRequest, OicpResult};
use crate::domain::identifiers::ProcessId;
use crate::domain::paging::PageParams;
use crate::domain::requests::OicpResponse;
use crate::domain::status_code::{StatusCode as OicpStatusCode, StatusCodes};

/// Shared state for the OICP routes
#[derive(Clone)]
pub struct OicpState {
    pub api: Arc<EmpServerApi>,
}

/// `POST` on the route of `R`'s operation.
pub async fn dispatch<R: ApiOperation>(
    State(state): State<OicpState>,
    process_id: Option<Extension<ProcessId>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Bytes,
) -> Response {
    let operation = R::OPERATION;
    let process_id = process_id
        .map(|Extension(id)| id)
        .unwrap_or_default();

    // An undecodable segment is handled like an unparseable provider id.
    let provider_id = match path {
        Ok(Path(provider_id)) => provider_id,
        Err(rejection) => {
            debug!(operation = operation.name(), error = %rejection, "Invalid providerId path segment");
            String::new()
        }
    };

    let paging = if operation.is_paged() {
        match query {
            Ok(Query(params)) => PageParams::from_query(&params),
            Err(rejection) => {
                warn!(operation = operation.name(), error = %rejection, "Ignoring malformed query string");
                PageParams::default()
            }
        }
    } else {
        PageParams::default()
    };

    let endpoint = state.api.endpoint::<R>();
    let result = endpoint
        .process(InboundRequest {
            process_id,
            provider_id: &provider_id,
            body: &body,
            paging,
        })
        .await;

    oicp_response(endpoint, &result)
}

/// `OPTIONS` on any OICP route.
pub async fn preflight() -> Response {
    let mut response = StatusCode::OK.into_response();
    apply_cors_headers(response.headers_mut());
    response
}

fn oicp_response<R: ApiOperation>(
    endpoint: &Endpoint<R>,
    result: &OicpResult<R::Response>,
) -> Response {
    // A custom serializer may panic; the answer is still a 200.
    let serialized = match catch_unwind(AssertUnwindSafe(|| {
        endpoint.serialize_response(&result.response)
    })) {
        Ok(serialized) => serialized.map_err(|e| e.to_string()),
        Err(payload) => Err(format!(
            "serializer panicked: {}",
            panic_message(payload.as_ref())
        )),
    };

    let body = match serialized {
        Ok(json) => json,
        Err(e) => {
            error!(
                operation = R::OPERATION.name(),
                process_id = %result.process_id,
                error = %e,
                "Failed to serialize OICP response"
            );
            serialization_failure::<R>()
        }
    };

    let mut response = (StatusCode::OK, body.to_string()).into_response();
    apply_oicp_headers(response.headers_mut(), &result.process_id);
    response
}

fn serialization_failure<R: ApiOperation>() -> Value {
    let status = OicpStatusCode::system_error(format!(
        "We could not serialize the {} response!",
        R::OPERATION.name()
    ));
    serde_json::to_value(R::Response::from_status(status)).unwrap_or_else(|_| {
        json!({ "StatusCode": { "Code": StatusCodes::SystemError.code() } })
    })
}
