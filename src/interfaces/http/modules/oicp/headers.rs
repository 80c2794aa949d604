//! Response headers every OICP answer carries

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONNECTION, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue};

use crate::domain::identifiers::ProcessId;
use crate::interfaces::http::modules::process_id::PROCESS_ID_HEADER;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Accept, Authorization"),
    );
}

/// JSON content type, `Process-ID`, CORS and `Connection: close`.
pub fn apply_oicp_headers(headers: &mut HeaderMap, process_id: &ProcessId) {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    if let Ok(value) = HeaderValue::from_str(process_id.as_str()) {
        headers.insert(PROCESS_ID_HEADER, value);
    }
    apply_cors_headers(headers);
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
}
