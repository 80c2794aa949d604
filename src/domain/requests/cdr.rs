//! Charge detail record retrieval

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{OicpRequest, OicpResponse};
use crate::domain::cdr::ChargeDetailRecord;
use crate::domain::identifiers::{OperatorId, ProviderId, SessionId};
use crate::domain::operation::Operation;
use crate::domain::paging::{Page, PageParams};
use crate::domain::status_code::StatusCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GetChargeDetailRecordsRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "From")]
    pub from: DateTime<Utc>,
    #[serde(rename = "To")]
    pub to: DateTime<Utc>,
    #[validate(length(max = 100))]
    #[serde(rename = "SessionID", skip_serializing_if = "Option::is_none")]
    pub session_ids: Option<Vec<SessionId>>,
    #[serde(rename = "OperatorID", skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<OperatorId>,
    #[serde(rename = "CDRForwarded", skip_serializing_if = "Option::is_none")]
    pub cdr_forwarded: Option<bool>,
    #[serde(skip)]
    pub paging: PageParams,
}

impl GetChargeDetailRecordsRequest {
    /// Whether a record falls into the requested period and filters.
    pub fn matches(&self, cdr: &ChargeDetailRecord) -> bool {
        if cdr.charging_end < self.from || cdr.charging_end > self.to {
            return false;
        }
        if let Some(sessions) = &self.session_ids {
            if !sessions.contains(&cdr.session_id) {
                return false;
            }
        }
        if let Some(operator) = &self.operator_id {
            if !cdr
                .evse_id
                .operator_id()
                .is_some_and(|op| op.same_as(operator))
            {
                return false;
            }
        }
        true
    }
}

impl OicpRequest for GetChargeDetailRecordsRequest {
    type Response = GetChargeDetailRecordsResponse;
    const OPERATION: Operation = Operation::GetChargeDetailRecords;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn apply_paging(&mut self, paging: PageParams) {
        self.paging = paging;
    }

    fn check(&self) -> Result<(), String> {
        if self.from > self.to {
            return Err(format!(
                "From ({}) must not be after To ({})",
                self.from.to_rfc3339(),
                self.to.to_rfc3339()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetChargeDetailRecordsResponse {
    #[serde(flatten)]
    pub page: Page<ChargeDetailRecord>,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

impl GetChargeDetailRecordsResponse {
    pub fn new(page: Page<ChargeDetailRecord>) -> Self {
        Self {
            page,
            status_code: Some(StatusCode::success()),
        }
    }
}

impl OicpResponse for GetChargeDetailRecordsResponse {
    fn from_status(status: StatusCode) -> Self {
        Self {
            page: Page::empty(),
            status_code: Some(status),
        }
    }

    fn status_code(&self) -> Option<&StatusCode> {
        self.status_code.as_ref()
    }
}
