//! EVSE data and status pull operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{OicpRequest, OicpResponse};
use crate::domain::evse::{
    Accessibility, AuthenticationMode, EvseDataRecord, EvseStatus, EvseStatusRecord,
    GeoCoordinatesResponseFormat, OperatorEvseStatus, SearchCenter,
};
use crate::domain::identifiers::{EvseId, OperatorId, ProviderId};
use crate::domain::operation::Operation;
use crate::domain::paging::{Page, PageParams};
use crate::domain::status_code::StatusCode;

// ── PullEVSEData ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PullEvseDataRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "LastCall", skip_serializing_if = "Option::is_none")]
    pub last_call: Option<DateTime<Utc>>,
    #[serde(
        rename = "GeoCoordinatesResponseFormat",
        skip_serializing_if = "Option::is_none"
    )]
    pub geo_coordinates_response_format: Option<GeoCoordinatesResponseFormat>,
    #[validate(nested)]
    #[serde(rename = "SearchCenter", skip_serializing_if = "Option::is_none")]
    pub search_center: Option<SearchCenter>,
    #[serde(rename = "EvseStatus", skip_serializing_if = "Option::is_none")]
    pub evse_status: Option<Vec<EvseStatus>>,
    #[serde(rename = "OperatorIds", skip_serializing_if = "Option::is_none")]
    pub operator_ids: Option<Vec<OperatorId>>,
    #[serde(rename = "CountryCodes", skip_serializing_if = "Option::is_none")]
    pub country_codes: Option<Vec<String>>,
    #[serde(rename = "AuthenticationModes", skip_serializing_if = "Option::is_none")]
    pub authentication_modes: Option<Vec<AuthenticationMode>>,
    #[serde(rename = "Accessibility", skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Vec<Accessibility>>,
    #[serde(rename = "RenewableEnergy", skip_serializing_if = "Option::is_none")]
    pub renewable_energy: Option<bool>,
    #[serde(rename = "IsHubjectCompatible", skip_serializing_if = "Option::is_none")]
    pub is_hubject_compatible: Option<bool>,
    #[serde(rename = "IsOpen24Hours", skip_serializing_if = "Option::is_none")]
    pub is_open_24_hours: Option<bool>,
    #[serde(skip)]
    pub paging: PageParams,
}

impl PullEvseDataRequest {
    /// Whether a record passes the optional filters of this request.
    pub fn matches(&self, record: &EvseDataRecord) -> bool {
        if let Some(last_call) = self.last_call {
            if record.last_update.is_some_and(|updated| updated < last_call) {
                return false;
            }
        }
        if let Some(operators) = &self.operator_ids {
            let operator = record
                .operator_id
                .clone()
                .or_else(|| record.evse_id.operator_id());
            if !operator.is_some_and(|op| operators.iter().any(|o| o.same_as(&op))) {
                return false;
            }
        }
        if let Some(countries) = &self.country_codes {
            if !countries
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&record.address.country))
            {
                return false;
            }
        }
        if let Some(modes) = &self.authentication_modes {
            if !modes.iter().any(|m| record.authentication_modes.contains(m)) {
                return false;
            }
        }
        if let Some(accessibility) = &self.accessibility {
            if !accessibility.contains(&record.accessibility) {
                return false;
            }
        }
        if self
            .renewable_energy
            .is_some_and(|v| v != record.renewable_energy)
        {
            return false;
        }
        if self
            .is_hubject_compatible
            .is_some_and(|v| v != record.is_hubject_compatible)
        {
            return false;
        }
        if self
            .is_open_24_hours
            .is_some_and(|v| v != record.is_open_24_hours)
        {
            return false;
        }
        true
    }
}

impl OicpRequest for PullEvseDataRequest {
    type Response = PullEvseDataResponse;
    const OPERATION: Operation = Operation::PullEvseData;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn apply_paging(&mut self, paging: PageParams) {
        self.paging = paging;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullEvseDataResponse {
    #[serde(flatten)]
    pub page: Page<EvseDataRecord>,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

impl PullEvseDataResponse {
    pub fn new(page: Page<EvseDataRecord>) -> Self {
        Self {
            page,
            status_code: Some(StatusCode::success()),
        }
    }
}

impl OicpResponse for PullEvseDataResponse {
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

// ── Shared status containers ───────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvseStatuses {
    #[serde(rename = "OperatorEvseStatus", default)]
    pub operator_evse_status: Vec<OperatorEvseStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvseStatusRecords {
    #[serde(rename = "EvseStatusRecord", default)]
    pub evse_status_record: Vec<EvseStatusRecord>,
}

// ── PullEVSEStatus ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PullEvseStatusRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[validate(nested)]
    #[serde(rename = "SearchCenter", skip_serializing_if = "Option::is_none")]
    pub search_center: Option<SearchCenter>,
    #[serde(rename = "EvseStatus", skip_serializing_if = "Option::is_none")]
    pub evse_status: Option<EvseStatus>,
}

impl OicpRequest for PullEvseStatusRequest {
    type Response = PullEvseStatusResponse;
    const OPERATION: Operation = Operation::PullEvseStatus;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullEvseStatusResponse {
    #[serde(rename = "EvseStatuses")]
    pub evse_statuses: EvseStatuses,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

impl PullEvseStatusResponse {
    pub fn new(operator_evse_status: Vec<OperatorEvseStatus>) -> Self {
        Self {
            evse_statuses: EvseStatuses {
                operator_evse_status,
            },
            status_code: Some(StatusCode::success()),
        }
    }
}

impl OicpResponse for PullEvseStatusResponse {
    fn from_status(status: StatusCode) -> Self {
        Self {
            evse_statuses: EvseStatuses::default(),
            status_code: Some(status),
        }
    }

    fn status_code(&self) -> Option<&StatusCode> {
        self.status_code.as_ref()
    }
}

// ── PullEVSEStatusById ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PullEvseStatusByIdRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[validate(length(min = 1, max = 100))]
    #[serde(rename = "EvseID")]
    pub evse_ids: Vec<EvseId>,
}

impl OicpRequest for PullEvseStatusByIdRequest {
    type Response = PullEvseStatusByIdResponse;
    const OPERATION: Operation = Operation::PullEvseStatusById;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullEvseStatusByIdResponse {
    #[serde(rename = "EVSEStatusRecords")]
    pub evse_status_records: EvseStatusRecords,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

impl PullEvseStatusByIdResponse {
    pub fn new(evse_status_record: Vec<EvseStatusRecord>) -> Self {
        Self {
            evse_status_records: EvseStatusRecords { evse_status_record },
            status_code: Some(StatusCode::success()),
        }
    }
}

impl OicpResponse for PullEvseStatusByIdResponse {
    fn from_status(status: StatusCode) -> Self {
        Self {
            evse_status_records: EvseStatusRecords::default(),
            status_code: Some(status),
        }
    }

    fn status_code(&self) -> Option<&StatusCode> {
        self.status_code.as_ref()
    }
}

// ── PullEVSEStatusByOperatorId ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PullEvseStatusByOperatorIdRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[validate(length(min = 1, max = 100))]
    #[serde(rename = "OperatorID")]
    pub operator_ids: Vec<OperatorId>,
}

impl OicpRequest for PullEvseStatusByOperatorIdRequest {
    type Response = PullEvseStatusByOperatorIdResponse;
    const OPERATION: Operation = Operation::PullEvseStatusByOperatorId;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullEvseStatusByOperatorIdResponse {
    #[serde(rename = "EvseStatuses")]
    pub evse_statuses: EvseStatuses,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

impl PullEvseStatusByOperatorIdResponse {
    pub fn new(operator_evse_status: Vec<OperatorEvseStatus>) -> Self {
        Self {
            evse_statuses: EvseStatuses {
                operator_evse_status,
            },
            status_code: Some(StatusCode::success()),
        }
    }
}

impl OicpResponse for PullEvseStatusByOperatorIdResponse {
    fn from_status(status: StatusCode) -> Self {
        Self {
            evse_statuses: EvseStatuses::default(),
            status_code: Some(status),
        }
    }

    fn status_code(&self) -> Option<&StatusCode> {
        self.status_code.as_ref()
    }
}
