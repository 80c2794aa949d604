//! Remote authorization: reservations and charging sessions
//!
//! All four operations are answered with an [`Acknowledgement`]. The
//! `acknowledge` helpers copy the session identifiers of the request into a
//! positive acknowledgement, which is what a handler usually returns.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::OicpRequest;
use crate::domain::acknowledgement::Acknowledgement;
use crate::domain::identification::Identification;
use crate::domain::identifiers::{EvseId, ProviderId, SessionId};
use crate::domain::operation::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AuthorizeRemoteReservationStartRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "Identification")]
    pub identification: Identification,
    #[serde(rename = "SessionID", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(rename = "CPOPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub cpo_partner_session_id: Option<String>,
    #[serde(rename = "EMPPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub emp_partner_session_id: Option<String>,
    #[serde(rename = "PartnerProductID", skip_serializing_if = "Option::is_none")]
    pub partner_product_id: Option<String>,
    /// Reservation length in minutes
    #[validate(range(min = 1, max = 1440))]
    #[serde(rename = "Duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl AuthorizeRemoteReservationStartRequest {
    /// Positive acknowledgement; a new session id is minted if the request had none.
    pub fn acknowledge(&self) -> Acknowledgement {
        Acknowledgement::success()
            .with_session(self.session_id.unwrap_or_default())
            .with_partner_sessions(
                self.cpo_partner_session_id.clone(),
                self.emp_partner_session_id.clone(),
            )
    }
}

impl OicpRequest for AuthorizeRemoteReservationStartRequest {
    type Response = Acknowledgement;
    const OPERATION: Operation = Operation::AuthorizeRemoteReservationStart;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AuthorizeRemoteReservationStopRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "SessionID")]
    pub session_id: SessionId,
    #[serde(rename = "CPOPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub cpo_partner_session_id: Option<String>,
    #[serde(rename = "EMPPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub emp_partner_session_id: Option<String>,
}

impl AuthorizeRemoteReservationStopRequest {
    pub fn acknowledge(&self) -> Acknowledgement {
        Acknowledgement::success()
            .with_session(self.session_id)
            .with_partner_sessions(
                self.cpo_partner_session_id.clone(),
                self.emp_partner_session_id.clone(),
            )
    }
}

impl OicpRequest for AuthorizeRemoteReservationStopRequest {
    type Response = Acknowledgement;
    const OPERATION: Operation = Operation::AuthorizeRemoteReservationStop;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AuthorizeRemoteStartRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "Identification")]
    pub identification: Identification,
    #[serde(rename = "SessionID", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(rename = "CPOPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub cpo_partner_session_id: Option<String>,
    #[serde(rename = "EMPPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub emp_partner_session_id: Option<String>,
    #[serde(rename = "PartnerProductID", skip_serializing_if = "Option::is_none")]
    pub partner_product_id: Option<String>,
}

impl AuthorizeRemoteStartRequest {
    /// Positive acknowledgement; a new session id is minted if the request had none.
    pub fn acknowledge(&self) -> Acknowledgement {
        Acknowledgement::success()
            .with_session(self.session_id.unwrap_or_default())
            .with_partner_sessions(
                self.cpo_partner_session_id.clone(),
                self.emp_partner_session_id.clone(),
            )
    }
}

impl OicpRequest for AuthorizeRemoteStartRequest {
    type Response = Acknowledgement;
    const OPERATION: Operation = Operation::AuthorizeRemoteStart;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AuthorizeRemoteStopRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "SessionID")]
    pub session_id: SessionId,
    #[serde(rename = "CPOPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub cpo_partner_session_id: Option<String>,
    #[serde(rename = "EMPPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub emp_partner_session_id: Option<String>,
}

impl AuthorizeRemoteStopRequest {
    pub fn acknowledge(&self) -> Acknowledgement {
        Acknowledgement::success()
            .with_session(self.session_id)
            .with_partner_sessions(
                self.cpo_partner_session_id.clone(),
                self.emp_partner_session_id.clone(),
            )
    }
}

impl OicpRequest for AuthorizeRemoteStopRequest {
    type Response = Acknowledgement;
    const OPERATION: Operation = Operation::AuthorizeRemoteStop;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reservation_duration_is_bounded() {
        let req: AuthorizeRemoteReservationStartRequest = serde_json::from_value(json!({
            "ProviderID": "DE-GDF",
            "EvseID": "DE*ABC*E1",
            "Identification": { "RemoteIdentification": { "EvcoID": "DE-GDF-C12345678-X" } },
            "Duration": 2000
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn start_ack_mints_session_when_missing() {
        let req: AuthorizeRemoteStartRequest = serde_json::from_value(json!({
            "ProviderID": "DE-GDF",
            "EvseID": "DE*ABC*E1",
            "Identification": { "RemoteIdentification": { "EvcoID": "DE-GDF-C12345678-X" } },
            "EMPPartnerSessionID": "emp-42"
        }))
        .unwrap();
        let ack = req.acknowledge();
        assert!(ack.result);
        assert!(ack.session_id.is_some());
        assert_eq!(ack.emp_partner_session_id.as_deref(), Some("emp-42"));
    }

    #[test]
    fn stop_requires_session_id() {
        let parsed: Result<AuthorizeRemoteStopRequest, _> = serde_json::from_value(json!({
            "ProviderID": "DE-GDF",
            "EvseID": "DE*ABC*E1"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn stop_ack_echoes_session() {
        let session = SessionId::new();
        let req = AuthorizeRemoteStopRequest {
            provider_id: "DE-GDF".parse().unwrap(),
            evse_id: "DE*ABC*E1".parse().unwrap(),
            session_id: session,
            cpo_partner_session_id: None,
            emp_partner_session_id: None,
        };
        assert_eq!(req.acknowledge().session_id, Some(session));
    }
}
