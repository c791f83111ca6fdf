//! Request/response observation hooks for [`crate::LaptopClient`].
//!
//! Observers see every exchange with the laptops backend but cannot influence
//! it; the client's behaviour is identical whichever observer is installed.

use std::fmt;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone, Copy)]
pub struct OutboundRequest<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    pub payload: Option<&'a Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct InboundResponse<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    pub status: StatusCode,
    pub body: &'a str,
}

/// A request that did not produce a success response. `status` and `body`
/// are absent when the server was never reached.
#[derive(Debug, Clone, Copy)]
pub struct FailedRequest<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    pub payload: Option<&'a Value>,
    pub status: Option<StatusCode>,
    pub body: Option<&'a str>,
    pub error: &'a str,
}

pub trait RequestObserver: Send + Sync {
    fn on_request(&self, request: &OutboundRequest<'_>);
    fn on_response(&self, response: &InboundResponse<'_>);
    fn on_failure(&self, failure: &FailedRequest<'_>);
}

struct Payload<'a>(Option<&'a Value>);

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(payload) => write!(f, "{payload}"),
            None => Ok(()),
        }
    }
}

/// Default observer: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, request: &OutboundRequest<'_>) {
        debug!(
            method = %request.method,
            url = %request.url,
            payload = %Payload(request.payload),
            "laptops api request"
        );
    }

    fn on_response(&self, response: &InboundResponse<'_>) {
        debug!(
            method = %response.method,
            url = %response.url,
            status = response.status.as_u16(),
            body = response.body,
            "laptops api response"
        );
    }

    fn on_failure(&self, failure: &FailedRequest<'_>) {
        warn!(
            method = %failure.method,
            url = %failure.url,
            status = failure.status.map(|status| status.as_u16()),
            body = failure.body.unwrap_or_default(),
            payload = %Payload(failure.payload),
            error = failure.error,
            "laptops api request failed"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {
    fn on_request(&self, _request: &OutboundRequest<'_>) {}

    fn on_response(&self, _response: &InboundResponse<'_>) {}

    fn on_failure(&self, _failure: &FailedRequest<'_>) {}
}
