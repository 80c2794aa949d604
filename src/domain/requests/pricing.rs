//! Dynamic pricing pull operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{OicpRequest, OicpResponse};
use crate::domain::identifiers::{EvseId, OperatorId, ProviderId};
use crate::domain::operation::Operation;
use crate::domain::paging::{Page, PageParams};
use crate::domain::pricing::{OperatorEvsePricing, PricingProductData};
use crate::domain::status_code::StatusCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PullPricingProductDataRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[validate(length(min = 1, max = 100))]
    #[serde(rename = "OperatorIDs")]
    pub operator_ids: Vec<OperatorId>,
    #[serde(rename = "LastCall", skip_serializing_if = "Option::is_none")]
    pub last_call: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub paging: PageParams,
}

impl OicpRequest for PullPricingProductDataRequest {
    type Response = PullPricingProductDataResponse;
    const OPERATION: Operation = Operation::PullPricingProductData;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn apply_paging(&mut self, paging: PageParams) {
        self.paging = paging;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullPricingProductDataResponse {
    #[serde(flatten)]
    pub page: Page<PricingProductData>,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

impl PullPricingProductDataResponse {
    pub fn new(page: Page<PricingProductData>) -> Self {
        Self {
            page,
            status_code: Some(StatusCode::success()),
        }
    }
}

impl OicpResponse for PullPricingProductDataResponse {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PullEvsePricingRequest {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[validate(length(min = 1, max = 100))]
    #[serde(rename = "OperatorIDs")]
    pub operator_ids: Vec<OperatorId>,
    #[validate(length(max = 100))]
    #[serde(rename = "EvseIDs", skip_serializing_if = "Option::is_none")]
    pub evse_ids: Option<Vec<EvseId>>,
    #[serde(skip)]
    pub paging: PageParams,
}

impl OicpRequest for PullEvsePricingRequest {
    type Response = PullEvsePricingResponse;
    const OPERATION: Operation = Operation::PullEvsePricing;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn apply_paging(&mut self, paging: PageParams) {
        self.paging = paging;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullEvsePricingResponse {
    #[serde(flatten)]
    pub page: Page<OperatorEvsePricing>,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

impl PullEvsePricingResponse {
    pub fn new(page: Page<OperatorEvsePricing>) -> Self {
        Self {
            page,
            status_code: Some(StatusCode::success()),
        }
    }
}

impl OicpResponse for PullEvsePricingResponse {
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
