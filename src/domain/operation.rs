//! The fixed set of OICP operations served by the EMP server API

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    PullEvseData,
    PullEvseStatus,
    PullEvseStatusById,
    PullEvseStatusByOperatorId,
    PullPricingProductData,
    PullEvsePricing,
    PushAuthenticationData,
    AuthorizeRemoteReservationStart,
    AuthorizeRemoteReservationStop,
    AuthorizeRemoteStart,
    AuthorizeRemoteStop,
    GetChargeDetailRecords,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Self::PullEvseData,
        Self::PullEvseStatus,
        Self::PullEvseStatusById,
        Self::PullEvseStatusByOperatorId,
        Self::PullPricingProductData,
        Self::PullEvsePricing,
        Self::PushAuthenticationData,
        Self::AuthorizeRemoteReservationStart,
        Self::AuthorizeRemoteReservationStop,
        Self::AuthorizeRemoteStart,
        Self::AuthorizeRemoteStop,
        Self::GetChargeDetailRecords,
    ];

    /// Position within [`Operation::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// OICP operation name, as used in logs and metrics labels
    pub fn name(&self) -> &'static str {
        match self {
            Self::PullEvseData => "PullEVSEData",
            Self::PullEvseStatus => "PullEVSEStatus",
            Self::PullEvseStatusById => "PullEVSEStatusById",
            Self::PullEvseStatusByOperatorId => "PullEVSEStatusByOperatorId",
            Self::PullPricingProductData => "PullPricingProductData",
            Self::PullEvsePricing => "PullEVSEPricing",
            Self::PushAuthenticationData => "PushAuthenticationData",
            Self::AuthorizeRemoteReservationStart => "AuthorizeRemoteReservationStart",
            Self::AuthorizeRemoteReservationStop => "AuthorizeRemoteReservationStop",
            Self::AuthorizeRemoteStart => "AuthorizeRemoteStart",
            Self::AuthorizeRemoteStop => "AuthorizeRemoteStop",
            Self::GetChargeDetailRecords => "GetChargeDetailRecords",
        }
    }

    /// axum route template; `{providerId}` is the only path parameter.
    pub fn route(&self) -> &'static str {
        match self {
            Self::PullEvseData => "/api/oicp/evsepull/v23/providers/{providerId}/data-records",
            Self::PullEvseStatus => "/api/oicp/evsepull/v21/providers/{providerId}/status-records",
            Self::PullEvseStatusById => {
                "/api/oicp/evsepull/v21/providers/{providerId}/status-records-by-id"
            }
            Self::PullEvseStatusByOperatorId => {
                "/api/oicp/evsepull/v21/providers/{providerId}/status-records-by-operator-id"
            }
            Self::PullPricingProductData => {
                "/api/oicp/dynamicpricing/v10/providers/{providerId}/pricing-products"
            }
            Self::PullEvsePricing => {
                "/api/oicp/dynamicpricing/v10/providers/{providerId}/evse-pricing"
            }
            Self::PushAuthenticationData => {
                "/api/oicp/authdata/v21/providers/{providerId}/push-request"
            }
            Self::AuthorizeRemoteReservationStart => {
                "/api/oicp/charging/v21/providers/{providerId}/authorize-remote-reservation/start"
            }
            Self::AuthorizeRemoteReservationStop => {
                "/api/oicp/charging/v21/providers/{providerId}/authorize-remote-reservation/stop"
            }
            Self::AuthorizeRemoteStart => {
                "/api/oicp/charging/v21/providers/{providerId}/authorize-remote/start"
            }
            Self::AuthorizeRemoteStop => {
                "/api/oicp/charging/v21/providers/{providerId}/authorize-remote/stop"
            }
            Self::GetChargeDetailRecords => {
                "/api/oicp/cdrmgmt/v22/providers/{providerId}/get-charge-detail-records-request"
            }
        }
    }

    /// Whether the operation honours `page`/`size`/`sortOrder`
    pub fn is_paged(&self) -> bool {
        matches!(
            self,
            Self::PullEvseData
                | Self::PullPricingProductData
                | Self::PullEvsePricing
                | Self::GetChargeDetailRecords
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
