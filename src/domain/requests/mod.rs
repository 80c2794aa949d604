//! Typed OICP requests and responses, one pair per [`Operation`]
//!
//! Every request knows its operation and response type, and every response
//! can be built from a bare failure [`StatusCode`]. That is all the
//! dispatcher needs to treat the twelve operations uniformly.

pub mod auth_data;
pub mod cdr;
pub mod evse_pull;
pub mod pricing;
pub mod remote;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use super::identifiers::ProviderId;
use super::operation::Operation;
use super::paging::PageParams;
use super::status_code::StatusCode;
use crate::support::errors::ParseError;

pub use auth_data::{
    ActionType, AuthenticationDataRecord, ProviderAuthenticationData,
    PushAuthenticationDataRequest,
};
pub use cdr::{GetChargeDetailRecordsRequest, GetChargeDetailRecordsResponse};
pub use evse_pull::{
    EvseStatusRecords, EvseStatuses, PullEvseDataRequest, PullEvseDataResponse,
    PullEvseStatusByIdRequest, PullEvseStatusByIdResponse, PullEvseStatusByOperatorIdRequest,
    PullEvseStatusByOperatorIdResponse, PullEvseStatusRequest, PullEvseStatusResponse,
};
pub use pricing::{
    PullEvsePricingRequest, PullEvsePricingResponse, PullPricingProductDataRequest,
    PullPricingProductDataResponse,
};
pub use remote::{
    AuthorizeRemoteReservationStartRequest, AuthorizeRemoteReservationStopRequest,
    AuthorizeRemoteStartRequest, AuthorizeRemoteStopRequest,
};

/// A response type of one of the OICP operations.
pub trait OicpResponse: Serialize + std::fmt::Debug + Send + Sync + 'static {
    /// Build a response carrying no payload, only the given status.
    fn from_status(status: StatusCode) -> Self;

    fn status_code(&self) -> Option<&StatusCode>;
}

/// A request type of one of the OICP operations.
pub trait OicpRequest:
    DeserializeOwned + Serialize + Validate + Clone + std::fmt::Debug + Send + Sync + 'static
{
    type Response: OicpResponse;

    const OPERATION: Operation;

    /// The `ProviderID` carried in the request body
    fn provider_id(&self) -> &ProviderId;

    /// Attach query string paging; a no-op for operations that are not paged.
    fn apply_paging(&mut self, _paging: PageParams) {}

    /// Cross-field rules the derive based validation cannot express.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Default request parser: serde, field validation, cross-field checks and
/// the URL/body provider id comparison.
pub fn parse_request<R: OicpRequest>(
    json: &Value,
    provider_id: &ProviderId,
    paging: PageParams,
) -> Result<R, ParseError> {
    let mut request = R::deserialize(json)?;

    request
        .validate()
        .map_err(|errors| ParseError::Validation(format_validation_errors(&errors)))?;
    request.check().map_err(ParseError::Validation)?;

    if !request.provider_id().same_as(provider_id) {
        return Err(ParseError::ProviderMismatch {
            url: provider_id.to_string(),
            body: request.provider_id().to_string(),
        });
    }

    request.apply_paging(paging);
    Ok(request)
}

/// Flatten validator errors into `field: message; field: message`.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut field_errors: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    field_errors.sort();

    if field_errors.is_empty() {
        errors.to_string()
    } else {
        field_errors.join("; ")
    }
}
