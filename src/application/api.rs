//! The EMP server API: all twelve operation endpoints and their counters

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::operation::Operation;
use crate::domain::requests::{
    AuthorizeRemoteReservationStartRequest, AuthorizeRemoteReservationStopRequest,
    AuthorizeRemoteStartRequest, AuthorizeRemoteStopRequest, GetChargeDetailRecordsRequest,
    OicpRequest, PullEvseDataRequest, PullEvsePricingRequest, PullEvseStatusByIdRequest,
    PullEvseStatusByOperatorIdRequest, PullEvseStatusRequest, PullPricingProductDataRequest,
    PushAuthenticationDataRequest,
};
use crate::support::shutdown::ShutdownSignal;

use super::counters::ApiCounters;
use super::endpoint::Endpoint;

/// Settings shared by every endpoint.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub service_name: String,
    /// Handed to handlers; not enforced by the dispatcher.
    pub request_timeout: Duration,
    /// Put the debug representation of handler errors into `AdditionalInfo`.
    pub include_error_details: bool,
    pub shutdown: ShutdownSignal,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            service_name: "OICP v2.3 EMP Server API".to_string(),
            request_timeout: Duration::from_secs(60),
            include_error_details: cfg!(debug_assertions),
            shutdown: ShutdownSignal::new(),
        }
    }
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig, shutdown: ShutdownSignal) -> Self {
        Self {
            service_name: config.api.service_name.clone(),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            include_error_details: config
                .api
                .include_error_details
                .unwrap_or(cfg!(debug_assertions)),
            shutdown,
        }
    }
}

pub struct EmpServerApi {
    settings: Arc<ApiSettings>,
    counters: Arc<ApiCounters>,

    pub pull_evse_data: Endpoint<PullEvseDataRequest>,
    pub pull_evse_status: Endpoint<PullEvseStatusRequest>,
    pub pull_evse_status_by_id: Endpoint<PullEvseStatusByIdRequest>,
    pub pull_evse_status_by_operator_id: Endpoint<PullEvseStatusByOperatorIdRequest>,
    pub pull_pricing_product_data: Endpoint<PullPricingProductDataRequest>,
    pub pull_evse_pricing: Endpoint<PullEvsePricingRequest>,
    pub push_authentication_data: Endpoint<PushAuthenticationDataRequest>,
    pub authorize_remote_reservation_start: Endpoint<AuthorizeRemoteReservationStartRequest>,
    pub authorize_remote_reservation_stop: Endpoint<AuthorizeRemoteReservationStopRequest>,
    pub authorize_remote_start: Endpoint<AuthorizeRemoteStartRequest>,
    pub authorize_remote_stop: Endpoint<AuthorizeRemoteStopRequest>,
    pub get_charge_detail_records: Endpoint<GetChargeDetailRecordsRequest>,
}

impl EmpServerApi {
    pub fn new(settings: ApiSettings) -> Self {
        let settings = Arc::new(settings);
        let counters = Arc::new(ApiCounters::new());
        let endpoint = |operation: Operation| {
            (Arc::clone(counters.get(operation)), Arc::clone(&settings))
        };

        macro_rules! build {
            ($op:ident) => {{
                let (c, s) = endpoint(Operation::$op);
                Endpoint::new(c, s)
            }};
        }

        Self {
            pull_evse_data: build!(PullEvseData),
            pull_evse_status: build!(PullEvseStatus),
            pull_evse_status_by_id: build!(PullEvseStatusById),
            pull_evse_status_by_operator_id: build!(PullEvseStatusByOperatorId),
            pull_pricing_product_data: build!(PullPricingProductData),
            pull_evse_pricing: build!(PullEvsePricing),
            push_authentication_data: build!(PushAuthenticationData),
            authorize_remote_reservation_start: build!(AuthorizeRemoteReservationStart),
            authorize_remote_reservation_stop: build!(AuthorizeRemoteReservationStop),
            authorize_remote_start: build!(AuthorizeRemoteStart),
            authorize_remote_stop: build!(AuthorizeRemoteStop),
            get_charge_detail_records: build!(GetChargeDetailRecords),
            settings,
            counters,
        }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    pub fn counters(&self) -> &ApiCounters {
        &self.counters
    }

    /// The endpoint serving request type `R`.
    pub fn endpoint<R: ApiOperation>(&self) -> &Endpoint<R> {
        R::endpoint(self)
    }

    pub fn handler_count(&self) -> usize {
        self.pull_evse_data.handler_count()
            + self.pull_evse_status.handler_count()
            + self.pull_evse_status_by_id.handler_count()
            + self.pull_evse_status_by_operator_id.handler_count()
            + self.pull_pricing_product_data.handler_count()
            + self.pull_evse_pricing.handler_count()
            + self.push_authentication_data.handler_count()
            + self.authorize_remote_reservation_start.handler_count()
            + self.authorize_remote_reservation_stop.handler_count()
            + self.authorize_remote_start.handler_count()
            + self.authorize_remote_stop.handler_count()
            + self.get_charge_detail_records.handler_count()
    }
}

impl Default for EmpServerApi {
    fn default() -> Self {
        Self::new(ApiSettings::default())
    }
}

/// Maps a request type to its endpoint, so transport code can stay generic.
pub trait ApiOperation: OicpRequest {
    fn endpoint(api: &EmpServerApi) -> &Endpoint<Self>;
}

macro_rules! api_operation {
    ($($request:ty => $field:ident),+ $(,)?) => {
        $(
            impl ApiOperation for $request {
                fn endpoint(api: &EmpServerApi) -> &Endpoint<Self> {
                    &api.$field
                }
            }
        )+
    };
}

api_operation! {
    PullEvseDataRequest => pull_evse_data,
    PullEvseStatusRequest => pull_evse_status,
    PullEvseStatusByIdRequest => pull_evse_status_by_id,
    PullEvseStatusByOperatorIdRequest => pull_evse_status_by_operator_id,
    PullPricingProductDataRequest => pull_pricing_product_data,
    PullEvsePricingRequest => pull_evse_pricing,
    PushAuthenticationDataRequest => push_authentication_data,
    AuthorizeRemoteReservationStartRequest => authorize_remote_reservation_start,
    AuthorizeRemoteReservationStopRequest => authorize_remote_reservation_stop,
    AuthorizeRemoteStartRequest => authorize_remote_start,
    AuthorizeRemoteStopRequest => authorize_remote_stop,
    GetChargeDetailRecordsRequest => get_charge_detail_records,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::endpoint::InboundRequest;
    use crate::application::handlers::{handler_fn, HandlerContext};
    use crate::domain::identifiers::ProcessId;
    use crate::domain::paging::PageParams;

    #[test]
    fn every_endpoint_serves_its_own_operation() {
        let api = EmpServerApi::default();
        assert_eq!(api.endpoint::<PullEvseDataRequest>().operation(), Operation::PullEvseData);
        assert_eq!(
            api.endpoint::<AuthorizeRemoteReservationStopRequest>().operation(),
            Operation::AuthorizeRemoteReservationStop
        );
        assert_eq!(
            api.endpoint::<GetChargeDetailRecordsRequest>().operation(),
            Operation::GetChargeDetailRecords
        );
    }

    #[tokio::test]
    async fn endpoint_counters_feed_the_api_snapshot() {
        let api = EmpServerApi::default();
        api.authorize_remote_stop.register_handler(handler_fn(
            |ctx: HandlerContext, req: AuthorizeRemoteStopRequest| async move {
                Ok(Some(ctx.success(req.acknowledge())))
            },
        ));
        assert_eq!(api.handler_count(), 1);

        let body = r#"{
            "ProviderID": "DE-GDF",
            "EvseID": "DE*ABC*E1",
            "SessionID": "b2688855-7f00-0002-6d8e-48d498e8b1f2"
        }"#;
        let result = api
            .authorize_remote_stop
            .process(InboundRequest {
                process_id: ProcessId::new(),
                provider_id: "DE-GDF",
                body: body.as_bytes(),
                paging: PageParams::default(),
            })
            .await;
        assert!(result.success);

        let snapshot = api.counters().snapshot();
        let stop = snapshot[Operation::AuthorizeRemoteStop.index()];
        assert_eq!((stop.requests_ok, stop.responses_ok), (1, 1));
        let others: u64 = snapshot
            .iter()
            .filter(|s| s.operation != "AuthorizeRemoteStop")
            .map(|s| s.requests_ok + s.requests_error)
            .sum();
        assert_eq!(others, 0);
    }
}
