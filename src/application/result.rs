//! The envelope every dispatch produces

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::identifiers::ProcessId;
use crate::domain::requests::OicpResponse;
use crate::domain::status_code::{StatusCode, StatusCodes};

/// Outcome of processing one request.
///
/// `response` is always present: failures carry a response built from the
/// failure status, so the HTTP layer can serialize every outcome the same way.
#[derive(Debug, Clone)]
pub struct OicpResult<T> {
    pub response: T,
    pub success: bool,
    pub process_id: ProcessId,
    pub request_timestamp: DateTime<Utc>,
    pub runtime: Duration,
}

impl<T: OicpResponse> OicpResult<T> {
    pub fn success(response: T, process_id: ProcessId) -> Self {
        Self::build(response, true, process_id)
    }

    pub fn failed(response: T, process_id: ProcessId) -> Self {
        Self::build(response, false, process_id)
    }

    /// Failure whose response carries nothing but `status`.
    pub fn from_status(status: StatusCode, process_id: ProcessId) -> Self {
        Self::failed(T::from_status(status), process_id)
    }

    pub fn system_error(
        description: impl Into<String>,
        additional_info: Option<String>,
        process_id: ProcessId,
    ) -> Self {
        Self::from_status(
            status_with(StatusCodes::SystemError, description, additional_info),
            process_id,
        )
    }

    pub fn data_error(
        description: impl Into<String>,
        additional_info: Option<String>,
        process_id: ProcessId,
    ) -> Self {
        Self::from_status(
            status_with(StatusCodes::DataError, description, additional_info),
            process_id,
        )
    }

    fn build(response: T, success: bool, process_id: ProcessId) -> Self {
        Self {
            response,
            success,
            process_id,
            request_timestamp: Utc::now(),
            runtime: Duration::ZERO,
        }
    }

    pub fn status_code(&self) -> Option<&StatusCode> {
        self.response.status_code()
    }

    /// Stamp the dispatcher's view of when the request arrived and how long it took.
    pub fn with_timing(mut self, request_timestamp: DateTime<Utc>, runtime: Duration) -> Self {
        self.request_timestamp = request_timestamp;
        self.runtime = runtime;
        self
    }
}

fn status_with(
    code: StatusCodes,
    description: impl Into<String>,
    additional_info: Option<String>,
) -> StatusCode {
    let status = StatusCode::new(code).with_description(description);
    match additional_info {
        Some(info) => status.with_additional_info(info),
        None => status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::acknowledgement::Acknowledgement;
    use crate::domain::requests::PullEvseStatusResponse;

    #[test]
    fn system_error_carries_code_and_message() {
        let result: OicpResult<PullEvseStatusResponse> =
            OicpResult::system_error("boom", None, ProcessId::new());
        assert!(!result.success);
        let status = result.status_code().unwrap();
        assert_eq!(status.code, StatusCodes::SystemError);
        assert_eq!(status.description.as_deref(), Some("boom"));
        assert!(status.additional_info.is_none());
    }

    #[test]
    fn data_error_on_acknowledgement_is_negative() {
        let result: OicpResult<Acknowledgement> =
            OicpResult::data_error("bad", Some("details".into()), ProcessId::new());
        assert!(!result.response.result);
        let status = result.status_code().unwrap();
        assert_eq!(status.code, StatusCodes::DataError);
        assert_eq!(status.additional_info.as_deref(), Some("details"));
    }

    #[test]
    fn timing_is_overwritten() {
        let stamp = Utc::now() - chrono::Duration::seconds(5);
        let result = OicpResult::success(Acknowledgement::success(), ProcessId::new())
            .with_timing(stamp, Duration::from_millis(42));
        assert!(result.success);
        assert_eq!(result.request_timestamp, stamp);
        assert_eq!(result.runtime, Duration::from_millis(42));
    }
}
