//! One OICP operation: parse, notify, fan out to handlers, aggregate
//!
//! [`Endpoint::process`] never fails. Every outcome, including a panic
//! anywhere in the pipeline, is turned into an [`OicpResult`] whose response
//! carries the matching OICP status code.

use std::fmt::Debug;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use futures_util::FutureExt;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::api::ApiSettings;
use super::counters::OperationCounters;
use super::handlers::{HandlerContext, OperationHandler};
use super::listeners::{
    panic_message, Listeners, RequestEvent, RequestListener, ResponseEvent, ResponseListener,
};
use super::registry::{RegistrationId, Registry};
use super::result::OicpResult;
use crate::domain::identifiers::{ProcessId, ProviderId};
use crate::domain::operation::Operation;
use crate::domain::paging::PageParams;
use crate::domain::requests::{parse_request, OicpRequest};
use crate::support::errors::{HandlerError, ParseError};

pub const PROVIDER_ID_PARSE_ERROR: &str =
    "The expected 'providerId' URL parameter could not be parsed!";

pub type HandlerId = RegistrationId;
pub type ListenerId = RegistrationId;

pub type RequestParser<R> =
    Arc<dyn Fn(&Value, &ProviderId, PageParams) -> Result<R, ParseError> + Send + Sync>;
pub type ResponseSerializer<T> =
    Arc<dyn Fn(&T) -> Result<Value, serde_json::Error> + Send + Sync>;

/// Raw input of one dispatch, as received by the transport.
#[derive(Debug, Clone)]
pub struct InboundRequest<'a> {
    pub process_id: ProcessId,
    /// Undecoded `{providerId}` path segment
    pub provider_id: &'a str,
    pub body: &'a [u8],
    pub paging: PageParams,
}

pub struct Endpoint<R: OicpRequest> {
    counters: Arc<OperationCounters>,
    settings: Arc<ApiSettings>,
    handlers: Registry<dyn OperationHandler<R>>,
    listeners: Listeners<R>,
    parser: RwLock<Option<RequestParser<R>>>,
    serializer: RwLock<Option<ResponseSerializer<R::Response>>>,
}

impl<R: OicpRequest> Endpoint<R> {
    pub fn new(counters: Arc<OperationCounters>, settings: Arc<ApiSettings>) -> Self {
        Self {
            counters,
            settings,
            handlers: Registry::new(),
            listeners: Listeners::new(),
            parser: RwLock::new(None),
            serializer: RwLock::new(None),
        }
    }

    pub fn operation(&self) -> Operation {
        R::OPERATION
    }

    pub fn counters(&self) -> &OperationCounters {
        &self.counters
    }

    // ── Registration ───────────────────────────────────────────────

    pub fn register_handler<H>(&self, handler: H) -> HandlerId
    where
        H: OperationHandler<R> + 'static,
    {
        self.handlers.register(Arc::new(handler))
    }

    pub fn register_shared_handler(&self, handler: Arc<dyn OperationHandler<R>>) -> HandlerId {
        self.handlers.register(handler)
    }

    pub fn unregister_handler(&self, id: HandlerId) -> bool {
        self.handlers.unregister(id)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn on_request<L>(&self, listener: L) -> ListenerId
    where
        L: RequestListener<R> + 'static,
    {
        self.listeners.on_request.register(Arc::new(listener))
    }

    pub fn on_response<L>(&self, listener: L) -> ListenerId
    where
        L: ResponseListener<R> + 'static,
    {
        self.listeners.on_response.register(Arc::new(listener))
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.on_request.unregister(id) || self.listeners.on_response.unregister(id)
    }

    /// Replace the default serde based request parser.
    pub fn set_parser<F>(&self, parser: F)
    where
        F: Fn(&Value, &ProviderId, PageParams) -> Result<R, ParseError> + Send + Sync + 'static,
    {
        *self.parser.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(parser));
    }

    /// Replace `serde_json::to_value` for the response body.
    pub fn set_serializer<F>(&self, serializer: F)
    where
        F: Fn(&R::Response) -> Result<Value, serde_json::Error> + Send + Sync + 'static,
    {
        *self.serializer.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(serializer));
    }

    pub fn serialize_response(&self, response: &R::Response) -> Result<Value, serde_json::Error> {
        let custom = self
            .serializer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match custom {
            Some(serialize) => serialize(response),
            None => serde_json::to_value(response),
        }
    }

    // ── Dispatch ───────────────────────────────────────────────────

    pub async fn process(&self, inbound: InboundRequest<'_>) -> OicpResult<R::Response> {
        let started = Instant::now();
        let timestamp = Utc::now();
        let process_id = inbound.process_id.clone();

        match AssertUnwindSafe(self.run(inbound, timestamp, started))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    operation = R::OPERATION.name(),
                    process_id = %process_id,
                    panic = %message,
                    "Request processing panicked"
                );
                let runtime = started.elapsed();
                self.counters.response_error(runtime);
                OicpResult::system_error(self.process_failure(), self.details(&message), process_id)
                    .with_timing(timestamp, runtime)
            }
        }
    }

    async fn run(
        &self,
        inbound: InboundRequest<'_>,
        timestamp: DateTime<Utc>,
        started: Instant,
    ) -> OicpResult<R::Response> {
        let operation = R::OPERATION;
        let InboundRequest {
            process_id,
            provider_id,
            body,
            paging,
        } = inbound;

        let provider_id: ProviderId = match provider_id.parse() {
            Ok(id) => id,
            Err(e) => {
                debug!(
                    operation = operation.name(),
                    process_id = %process_id,
                    error = %e,
                    "Rejected provider id"
                );
                self.counters.request_error();
                let result = OicpResult::system_error(PROVIDER_ID_PARSE_ERROR, None, process_id.clone());
                return self
                    .finish(&process_id, None, result, timestamp, started.elapsed())
                    .await;
            }
        };

        let request = match self.parse(body, &provider_id, paging) {
            Ok(request) => request,
            Err(e) => {
                debug!(
                    operation = operation.name(),
                    process_id = %process_id,
                    error = %e,
                    "Rejected request body"
                );
                self.counters.request_error();
                let result = OicpResult::data_error(
                    format!("We could not parse the given {} request!", operation.name()),
                    Some(e.to_string()),
                    process_id.clone(),
                );
                return self
                    .finish(&process_id, None, result, timestamp, started.elapsed())
                    .await;
            }
        };
        self.counters.request_ok();

        let ctx = HandlerContext {
            operation,
            process_id,
            provider_id,
            request_timestamp: timestamp,
            request_timeout: self.settings.request_timeout,
            shutdown: self.settings.shutdown.clone(),
        };

        self.listeners
            .notify_request(&RequestEvent {
                timestamp: Utc::now(),
                context: &ctx,
                request: &request,
            })
            .await;

        let outcome = self.invoke_handlers(&ctx, &request).await;
        let runtime = started.elapsed();
        let result = match outcome {
            Ok(result) => {
                self.counters.response_ok(runtime);
                result
            }
            Err(result) => {
                self.counters.response_error(runtime);
                result
            }
        };

        self.finish(&ctx.process_id, Some(&request), result, timestamp, runtime)
            .await
    }

    fn parse(
        &self,
        body: &[u8],
        provider_id: &ProviderId,
        paging: PageParams,
    ) -> Result<R, ParseError> {
        let json: Value = serde_json::from_slice(body)?;
        let custom = self.parser.read().unwrap_or_else(|e| e.into_inner()).clone();
        match custom {
            Some(parse) => parse(&json, provider_id, paging),
            None => parse_request(&json, provider_id, paging),
        }
    }

    /// Runs every handler concurrently. `Ok` carries the first non-empty
    /// result in registration order; any handler error wins over results.
    async fn invoke_handlers(
        &self,
        ctx: &HandlerContext,
        request: &R,
    ) -> Result<OicpResult<R::Response>, OicpResult<R::Response>> {
        let operation = R::OPERATION;
        let handlers = self.handlers.snapshot();

        let outcomes = join_all(
            handlers
                .iter()
                .map(|(_, handler)| AssertUnwindSafe(handler.handle(ctx, request)).catch_unwind()),
        )
        .await;

        let mut chosen = None;
        for outcome in outcomes {
            let outcome = outcome.unwrap_or_else(|panic| {
                Err(HandlerError::Panicked {
                    operation,
                    message: panic_message(panic.as_ref()),
                })
            });
            match outcome {
                Err(e) => {
                    warn!(
                        operation = operation.name(),
                        process_id = %ctx.process_id,
                        error = %e,
                        "Handler failed"
                    );
                    return Err(OicpResult::data_error(
                        e.to_string(),
                        self.details(&e),
                        ctx.process_id.clone(),
                    ));
                }
                Ok(Some(result)) if chosen.is_none() => chosen = Some(result),
                Ok(_) => {}
            }
        }

        match chosen {
            Some(mut result) => {
                result.process_id = ctx.process_id.clone();
                Ok(result)
            }
            None => {
                warn!(
                    operation = operation.name(),
                    process_id = %ctx.process_id,
                    handlers = handlers.len(),
                    "No handler produced a result"
                );
                Err(OicpResult::system_error(
                    self.process_failure(),
                    None,
                    ctx.process_id.clone(),
                ))
            }
        }
    }

    async fn finish(
        &self,
        process_id: &ProcessId,
        request: Option<&R>,
        result: OicpResult<R::Response>,
        timestamp: DateTime<Utc>,
        runtime: Duration,
    ) -> OicpResult<R::Response> {
        let result = result.with_timing(timestamp, runtime);
        self.listeners
            .notify_response(&ResponseEvent {
                timestamp: Utc::now(),
                operation: R::OPERATION,
                process_id,
                request,
                result: &result,
                runtime,
            })
            .await;
        result
    }

    fn process_failure(&self) -> String {
        format!("We could not process the given {} request!", R::OPERATION.name())
    }

    fn details(&self, error: &impl Debug) -> Option<String> {
        self.settings
            .include_error_details
            .then(|| format!("{error:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::handler_fn;
    use crate::application::listeners::{on_request_fn, on_response_fn};
    use crate::domain::acknowledgement::Acknowledgement;
    use crate::domain::requests::{
        AuthorizeRemoteStartRequest, OicpResponse, PullEvseStatusRequest, PullEvseStatusResponse,
    };
    use crate::domain::status_code::StatusCodes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Barrier;

    const START_BODY: &str = r#"{
        "ProviderID": "DE-GDF",
        "EvseID": "DE*ABC*E1",
        "Identification": { "RemoteIdentification": { "EvcoID": "DE-GDF-C12345678-X" } }
    }"#;

    fn endpoint<R: OicpRequest>() -> Endpoint<R> {
        Endpoint::new(
            Arc::new(OperationCounters::new(R::OPERATION)),
            Arc::new(ApiSettings::default()),
        )
    }

    fn inbound<'a>(provider_id: &'a str, body: &'a str) -> InboundRequest<'a> {
        InboundRequest {
            process_id: ProcessId::new(),
            provider_id,
            body: body.as_bytes(),
            paging: PageParams::default(),
        }
    }

    /// Records that it ran and answers with a fixed session id (or nothing).
    fn spy(
        calls: &Arc<AtomicUsize>,
        answer: Option<&'static str>,
    ) -> impl OperationHandler<AuthorizeRemoteStartRequest> {
        let calls = Arc::clone(calls);
        handler_fn(move |ctx: HandlerContext, _req: AuthorizeRemoteStartRequest| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(answer.map(|partner| {
                    ctx.success(
                        Acknowledgement::success().with_partner_sessions(None, Some(partner.into())),
                    )
                }))
            }
        })
    }

    fn status(result: &OicpResult<impl OicpResponse>) -> (StatusCodes, String) {
        let status = result.status_code().expect("status code");
        (status.code, status.description.clone().unwrap_or_default())
    }

    #[tokio::test]
    async fn unparseable_provider_id_skips_handlers() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        let calls = Arc::new(AtomicUsize::new(0));
        endpoint.register_handler(spy(&calls, Some("a")));

        let result = endpoint.process(inbound("not-a-valid-id", START_BODY)).await;

        assert!(!result.success);
        assert_eq!(
            status(&result),
            (StatusCodes::SystemError, PROVIDER_ID_PARSE_ERROR.to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let counters = endpoint.counters().snapshot();
        assert_eq!((counters.requests_error, counters.requests_ok), (1, 0));
        assert_eq!(counters.responses_error + counters.responses_ok, 0);
    }

    #[tokio::test]
    async fn invalid_body_is_a_data_error() {
        let endpoint = endpoint::<PullEvseStatusRequest>();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        endpoint.register_handler(handler_fn(move |_: HandlerContext, _: PullEvseStatusRequest| {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Ok(None) }
        }));

        let result = endpoint.process(inbound("DE-GDF", "{}")).await;

        let (code, description) = status(&result);
        assert_eq!(code, StatusCodes::DataError);
        assert_eq!(description, "We could not parse the given PullEVSEStatus request!");
        assert!(result.status_code().unwrap().additional_info.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(endpoint.counters().snapshot().requests_error, 1);
    }

    #[tokio::test]
    async fn no_handlers_means_system_error() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();

        let result = endpoint.process(inbound("DE-GDF", START_BODY)).await;

        assert_eq!(
            status(&result),
            (
                StatusCodes::SystemError,
                "We could not process the given AuthorizeRemoteStart request!".to_string()
            )
        );
        assert!(!result.response.result);
        let counters = endpoint.counters().snapshot();
        assert_eq!((counters.requests_ok, counters.responses_error), (1, 1));
    }

    #[tokio::test]
    async fn first_non_empty_result_in_registration_order_wins() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        let calls = Arc::new(AtomicUsize::new(0));
        endpoint.register_handler(spy(&calls, None));
        endpoint.register_handler(spy(&calls, Some("second")));
        endpoint.register_handler(spy(&calls, Some("third")));

        let inbound = inbound("DE-GDF", START_BODY);
        let process_id = inbound.process_id.clone();
        let result = endpoint.process(inbound).await;

        assert!(result.success);
        assert_eq!(result.process_id, process_id);
        assert_eq!(result.response.emp_partner_session_id.as_deref(), Some("second"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(endpoint.counters().snapshot().responses_ok, 1);
    }

    #[tokio::test]
    async fn all_empty_results_mean_system_error() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        let calls = Arc::new(AtomicUsize::new(0));
        endpoint.register_handler(spy(&calls, None));
        endpoint.register_handler(spy(&calls, None));

        let result = endpoint.process(inbound("DE-GDF", START_BODY)).await;

        assert_eq!(status(&result).0, StatusCodes::SystemError);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn handler_error_becomes_data_error() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        let calls = Arc::new(AtomicUsize::new(0));
        endpoint.register_handler(spy(&calls, Some("ignored")));
        endpoint.register_handler(handler_fn(
            |_: HandlerContext, _: AuthorizeRemoteStartRequest| async {
                Err(HandlerError::failed("backend unavailable"))
            },
        ));

        let result = endpoint.process(inbound("DE-GDF", START_BODY)).await;

        assert_eq!(
            status(&result),
            (StatusCodes::DataError, "backend unavailable".to_string())
        );
        let counters = endpoint.counters().snapshot();
        assert_eq!((counters.responses_ok, counters.responses_error), (0, 1));
    }

    #[tokio::test]
    async fn error_details_follow_settings() {
        let settings = ApiSettings {
            include_error_details: true,
            ..ApiSettings::default()
        };
        let endpoint: Endpoint<AuthorizeRemoteStartRequest> = Endpoint::new(
            Arc::new(OperationCounters::new(Operation::AuthorizeRemoteStart)),
            Arc::new(settings),
        );
        endpoint.register_handler(handler_fn(
            |_: HandlerContext, _: AuthorizeRemoteStartRequest| async {
                Err(HandlerError::failed("backend unavailable"))
            },
        ));

        let result = endpoint.process(inbound("DE-GDF", START_BODY)).await;
        let info = result.status_code().unwrap().additional_info.clone().unwrap();
        assert!(info.contains("Failed"));
    }

    #[tokio::test]
    async fn panicking_handler_is_contained() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        endpoint.register_handler(handler_fn(
            |_: HandlerContext, _: AuthorizeRemoteStartRequest| async {
                if true {
                    panic!("handler bug");
                }
                Ok(None)
            },
        ));

        let result = endpoint.process(inbound("DE-GDF", START_BODY)).await;

        let (code, description) = status(&result);
        assert_eq!(code, StatusCodes::DataError);
        assert!(description.contains("handler bug"));
    }

    #[tokio::test]
    async fn handlers_run_concurrently() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        let barrier = Arc::new(Barrier::new(2));
        for partner in ["a", "b"] {
            let barrier = Arc::clone(&barrier);
            endpoint.register_handler(handler_fn(
                move |ctx: HandlerContext, _: AuthorizeRemoteStartRequest| {
                    let barrier = Arc::clone(&barrier);
                    async move {
                        // Only passes if both handlers are in flight at once.
                        barrier.wait().await;
                        Ok(Some(ctx.success(
                            Acknowledgement::success().with_partner_sessions(None, Some(partner.into())),
                        )))
                    }
                },
            ));
        }

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            endpoint.process(inbound("DE-GDF", START_BODY)),
        )
        .await
        .expect("handlers were not run concurrently");

        assert_eq!(result.response.emp_partner_session_id.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn listeners_see_request_and_response() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        let calls = Arc::new(AtomicUsize::new(0));
        endpoint.register_handler(spy(&calls, Some("x")));

        let requests = Arc::new(AtomicUsize::new(0));
        let responses = Arc::new(Mutex::new(Vec::new()));
        {
            let requests = Arc::clone(&requests);
            endpoint.on_request(on_request_fn::<AuthorizeRemoteStartRequest, _>(move |event| {
                assert_eq!(event.context.provider_id.as_str(), "DE-GDF");
                requests.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
        }
        {
            let responses = Arc::clone(&responses);
            endpoint.on_response(on_response_fn::<AuthorizeRemoteStartRequest, _>(move |event| {
                responses
                    .lock()
                    .unwrap()
                    .push((event.request.is_some(), event.result.success));
                Ok(())
            }));
        }

        endpoint.process(inbound("DE-GDF", START_BODY)).await;
        endpoint.process(inbound("DE-GDF", "not json")).await;

        assert_eq!(requests.load(Ordering::SeqCst), 1);
        assert_eq!(*responses.lock().unwrap(), vec![(true, true), (false, false)]);
    }

    #[tokio::test]
    async fn unregistered_handler_is_not_called() {
        let endpoint = endpoint::<AuthorizeRemoteStartRequest>();
        let calls = Arc::new(AtomicUsize::new(0));
        let id = endpoint.register_handler(spy(&calls, Some("gone")));
        assert!(endpoint.unregister_handler(id));
        assert_eq!(endpoint.handler_count(), 0);

        let result = endpoint.process(inbound("DE-GDF", START_BODY)).await;

        assert_eq!(status(&result).0, StatusCodes::SystemError);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn custom_parser_and_serializer_take_over() {
        let endpoint = endpoint::<PullEvseStatusRequest>();
        endpoint.set_parser(|_json, provider_id, _paging| {
            Ok(PullEvseStatusRequest {
                provider_id: provider_id.clone(),
                search_center: None,
                evse_status: None,
            })
        });
        endpoint.set_serializer(|_response| Ok(serde_json::json!({ "custom": true })));
        endpoint.register_handler(handler_fn(
            |ctx: HandlerContext, _: PullEvseStatusRequest| async move {
                Ok(Some(ctx.success(PullEvseStatusResponse::new(Vec::new()))))
            },
        ));

        let result = endpoint.process(inbound("DE-GDF", "{}")).await;

        assert!(result.success);
        assert_eq!(
            endpoint.serialize_response(&result.response).unwrap(),
            serde_json::json!({ "custom": true })
        );
    }

    #[tokio::test]
    async fn panic_outside_handlers_is_a_system_error() {
        let endpoint = endpoint::<PullEvseStatusRequest>();
        endpoint.set_parser(|_, _, _| panic!("parser bug"));

        let result = endpoint.process(inbound("DE-GDF", "{}")).await;

        assert_eq!(status(&result).0, StatusCodes::SystemError);
        assert_eq!(endpoint.counters().snapshot().responses_error, 1);
    }
}
