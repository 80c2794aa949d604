//! OICP v2.3 domain model: identifiers, status codes, records and the typed
//! request/response pair of every operation.

pub mod acknowledgement;
pub mod cdr;
pub mod evse;
pub mod identification;
pub mod identifiers;
pub mod operation;
pub mod paging;
pub mod pricing;
pub mod requests;
pub mod status_code;

pub use acknowledgement::Acknowledgement;
pub use identification::Identification;
pub use identifiers::{EvseId, OperatorId, ProcessId, ProviderId, SessionId};
pub use operation::Operation;
pub use paging::{Page, PageParams};
pub use requests::{parse_request, OicpRequest, OicpResponse};
pub use status_code::{StatusCode, StatusCodes};
