//! Per-request tracing: trace id, span, and one completion event.
//!
//! Every request gets a fresh trace id, scoped into [`trace_ctx`] and echoed
//! in the `x-trace-id` response header. Handler logs run inside a `request`
//! span carrying the trace id, method and matched route pattern. When the
//! response is ready a single `request_completed` event records status,
//! latency and, for failures, the problem `code` (`TOKEN_INVALID`,
//! `AUTHENTICATION_FAILED`, ...).

use std::time::Instant;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, StatusCode},
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::web::trace_ctx;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

const UNMATCHED_ROUTE: &str = "<unmatched>";

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let trace_id = Uuid::new_v4().to_string();
        // Route pattern, not the raw path: no ids or query strings in logs.
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            route = %route,
        );

        let fut = trace_ctx::with_trace_id(trace_id.clone(), self.service.call(req));

        Box::pin(
            async move {
                let result = fut.await;

                let (status, code) = outcome(&result);
                log_completed(status, code, started.elapsed().as_micros() as u64);

                let mut res = result?;
                if let Ok(value) = header::HeaderValue::from_str(&trace_id) {
                    res.headers_mut()
                        .insert(header::HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// Final status plus the problem code when the service failed with an
/// [`AppError`].
fn outcome<B>(
    result: &Result<ServiceResponse<B>, actix_web::Error>,
) -> (StatusCode, Option<&'static str>) {
    let (status, err) = match result {
        Ok(res) => (res.status(), res.response().error()),
        Err(err) => (err.as_response_error().status_code(), Some(err)),
    };
    let code = err
        .and_then(|e| e.as_error::<AppError>())
        .map(|e| e.code().as_str());
    (status, code)
}

fn log_completed(status: StatusCode, code: Option<&'static str>, duration_us: u64) {
    let status_code = status.as_u16();
    let code = code.unwrap_or("-");
    if status.is_server_error() {
        error!(status_code, code, duration_us, "request_completed");
    } else if status.is_client_error() {
        warn!(status_code, code, duration_us, "request_completed");
    } else {
        info!(status_code, duration_us, "request_completed");
    }
}
