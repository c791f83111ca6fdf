//! Single request/response exchange with the laptops backend and the failure
//! description it produces.

use std::error::Error as _;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use shared::error::ServerErrorBody;
use url::Url;

use crate::observer::{FailedRequest, InboundResponse, OutboundRequest, RequestObserver};

/// Why an exchange did not yield a success response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    Status { status: StatusCode, body: String },
    Network { message: String },
}

impl TransportFailure {
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    fn server_body(&self) -> Option<ServerErrorBody> {
        match self {
            Self::Status { body, .. } => ServerErrorBody::parse(body),
            Self::Network { .. } => None,
        }
    }

    pub(crate) fn transport_message(&self) -> String {
        match self {
            Self::Status { status, .. } => status_message(*status),
            Self::Network { message } => message.clone(),
        }
    }

    /// Server `message`, else the transport description.
    pub(crate) fn detail(&self) -> String {
        self.server_body()
            .and_then(|body| body.message().map(str::to_string))
            .unwrap_or_else(|| self.transport_message())
    }

    /// Server `title`, then server `message`, then the transport description.
    pub(crate) fn create_detail(&self) -> String {
        self.server_body()
            .and_then(|body| {
                body.title()
                    .or_else(|| body.message())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| self.transport_message())
    }
}

fn status_message(status: StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}

/// Flattens a reqwest error and its sources into one line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

pub(crate) async fn exchange(
    http: &Client,
    observer: &dyn RequestObserver,
    method: Method,
    url: Url,
    payload: Option<&Value>,
) -> Result<String, TransportFailure> {
    observer.on_request(&OutboundRequest {
        method: &method,
        url: &url,
        payload,
    });

    let mut request = http.request(method.clone(), url.clone());
    if let Some(payload) = payload {
        request = request.json(payload);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            let message = describe(&err);
            observer.on_failure(&FailedRequest {
                method: &method,
                url: &url,
                payload,
                status: None,
                body: None,
                error: &message,
            });
            return Err(TransportFailure::Network { message });
        }
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            let message = describe(&err);
            observer.on_failure(&FailedRequest {
                method: &method,
                url: &url,
                payload,
                status: Some(status),
                body: None,
                error: &message,
            });
            return Err(TransportFailure::Network { message });
        }
    };

    if !status.is_success() {
        observer.on_failure(&FailedRequest {
            method: &method,
            url: &url,
            payload,
            status: Some(status),
            body: Some(&body),
            error: &status_message(status),
        });
        return Err(TransportFailure::Status { status, body });
    }

    observer.on_response(&InboundResponse {
        method: &method,
        url: &url,
        status,
        body: &body,
    });
    Ok(body)
}
