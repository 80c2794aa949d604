//! Generic OICP acknowledgement

use serde::{Deserialize, Serialize};

use super::identifiers::SessionId;
use super::requests::OicpResponse;
use super::status_code::{StatusCode, StatusCodes};

/// Response of all operations that do not return a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(rename = "Result")]
    pub result: bool,
    #[serde(rename = "StatusCode")]
    pub status_code: StatusCode,
    #[serde(rename = "SessionID", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(rename = "CPOPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub cpo_partner_session_id: Option<String>,
    #[serde(rename = "EMPPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub emp_partner_session_id: Option<String>,
}

impl Acknowledgement {
    pub fn success() -> Self {
        Self {
            result: true,
            status_code: StatusCode::success(),
            session_id: None,
            cpo_partner_session_id: None,
            emp_partner_session_id: None,
        }
    }

    /// Negative acknowledgement; `Result` is false for every non-success code.
    pub fn failed(status_code: StatusCode) -> Self {
        Self {
            result: status_code.is_success(),
            status_code,
            session_id: None,
            cpo_partner_session_id: None,
            emp_partner_session_id: None,
        }
    }

    pub fn with_code(code: StatusCodes, description: impl Into<String>) -> Self {
        Self::failed(StatusCode::new(code).with_description(description))
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_partner_sessions(
        mut self,
        cpo_partner_session_id: Option<String>,
        emp_partner_session_id: Option<String>,
    ) -> Self {
        self.cpo_partner_session_id = cpo_partner_session_id;
        self.emp_partner_session_id = emp_partner_session_id;
        self
    }
}

impl OicpResponse for Acknowledgement {
    fn from_status(status: StatusCode) -> Self {
        Self::failed(status)
    }

    fn status_code(&self) -> Option<&StatusCode> {
        Some(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_wire_shape() {
        let ack = Acknowledgement::success();
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            json!({ "Result": true, "StatusCode": { "Code": "000" } })
        );
    }

    #[test]
    fn failed_ack_is_negative() {
        let ack = Acknowledgement::with_code(StatusCodes::UnknownEvseId, "Unknown EVSE");
        assert!(!ack.result);
        assert_eq!(ack.status_code.code, StatusCodes::UnknownEvseId);
    }
}
