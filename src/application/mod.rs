pub mod api;
pub mod counters;
pub mod endpoint;
pub mod handlers;
pub mod listeners;
pub mod logger;
pub mod registry;
pub mod result;

// Re-export key types for convenience
pub use api::{ApiOperation, ApiSettings, EmpServerApi};
pub use counters::{ApiCounters, OperationCounters, OperationCountersSnapshot};
pub use endpoint::{Endpoint, HandlerId, InboundRequest, ListenerId, PROVIDER_ID_PARSE_ERROR};
pub use handlers::{handler_fn, HandlerContext, HandlerOutcome, OperationHandler};
pub use listeners::{
    on_request_fn, on_response_fn, RequestEvent, RequestListener, ResponseEvent,
    ResponseListener,
};
pub use logger::ApiLogger;
pub use result::OicpResult;
