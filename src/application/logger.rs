//! Structured request/response logging through `tracing`

use async_trait::async_trait;
use tracing::{info, warn};

use super::api::{ApiOperation, EmpServerApi};
use super::endpoint::ListenerId;
use super::listeners::{RequestEvent, RequestListener, ResponseEvent, ResponseListener};
use crate::domain::requests::{
    AuthorizeRemoteReservationStartRequest, AuthorizeRemoteReservationStopRequest,
    AuthorizeRemoteStartRequest, AuthorizeRemoteStopRequest, GetChargeDetailRecordsRequest,
    OicpRequest, PullEvseDataRequest, PullEvsePricingRequest, PullEvseStatusByIdRequest,
    PullEvseStatusByOperatorIdRequest, PullEvseStatusRequest, PullPricingProductDataRequest,
    PushAuthenticationDataRequest,
};
use crate::support::errors::HandlerError;

/// Logs every request and response of every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiLogger;

impl ApiLogger {
    /// Register the logger on all twelve endpoints. Returns the listener ids
    /// so the caller can detach it again.
    pub fn attach(api: &EmpServerApi) -> Vec<ListenerId> {
        let mut ids = Vec::with_capacity(24);
        attach_to::<PullEvseDataRequest>(api, &mut ids);
        attach_to::<PullEvseStatusRequest>(api, &mut ids);
        attach_to::<PullEvseStatusByIdRequest>(api, &mut ids);
        attach_to::<PullEvseStatusByOperatorIdRequest>(api, &mut ids);
        attach_to::<PullPricingProductDataRequest>(api, &mut ids);
        attach_to::<PullEvsePricingRequest>(api, &mut ids);
        attach_to::<PushAuthenticationDataRequest>(api, &mut ids);
        attach_to::<AuthorizeRemoteReservationStartRequest>(api, &mut ids);
        attach_to::<AuthorizeRemoteReservationStopRequest>(api, &mut ids);
        attach_to::<AuthorizeRemoteStartRequest>(api, &mut ids);
        attach_to::<AuthorizeRemoteStopRequest>(api, &mut ids);
        attach_to::<GetChargeDetailRecordsRequest>(api, &mut ids);
        ids
    }
}

fn attach_to<R: ApiOperation>(api: &EmpServerApi, ids: &mut Vec<ListenerId>) {
    let endpoint = api.endpoint::<R>();
    ids.push(endpoint.on_request(ApiLogger));
    ids.push(endpoint.on_response(ApiLogger));
}

#[async_trait]
impl<R: OicpRequest> RequestListener<R> for ApiLogger {
    async fn on_request(&self, event: &RequestEvent<'_, R>) -> Result<(), HandlerError> {
        info!(
            operation = R::OPERATION.name(),
            process_id = %event.context.process_id,
            provider_id = %event.context.provider_id,
            "📥 OICP request received"
        );
        Ok(())
    }
}

#[async_trait]
impl<R: OicpRequest> ResponseListener<R> for ApiLogger {
    async fn on_response(&self, event: &ResponseEvent<'_, R>) -> Result<(), HandlerError> {
        let status_code = event
            .result
            .status_code()
            .map(|s| s.code.code())
            .unwrap_or("-");
        let runtime_ms = event.runtime.as_millis() as u64;

        if event.result.success {
            info!(
                operation = event.operation.name(),
                process_id = %event.process_id,
                status_code,
                runtime_ms,
                "📤 OICP response sent"
            );
        } else {
            let description = event
                .result
                .status_code()
                .and_then(|s| s.description.as_deref())
                .unwrap_or_default();
            warn!(
                operation = event.operation.name(),
                process_id = %event.process_id,
                status_code,
                runtime_ms,
                parsed = event.request.is_some(),
                description,
                "📤 OICP failure response sent"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn attaches_two_listeners_per_operation() {
        let api = EmpServerApi::default();
        let ids = ApiLogger::attach(&api);
        assert_eq!(ids.len(), 24);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 24);

        let detached = ids
            .iter()
            .filter(|id| api.authorize_remote_start.remove_listener(**id))
            .count();
        assert_eq!(detached, 2);
    }
}
