//! HTTP transport boundary.
//!
//! The SDK never talks to the network directly. Every client builds an
//! [`HttpRequest`] value and hands it to a [`Transport`], which returns an
//! [`HttpResponse`]. Retries and timeouts are the transport's concern and
//! are invisible to the layers above.
//!
//! `paysdk-http` provides the `reqwest`-backed implementation; tests inject
//! in-process stubs.

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode, header};
use url::Url;

use crate::error::TransportError;

/// Response header carrying the server-side correlation id.
///
/// Lookup is case-insensitive; servers have been observed sending
/// `Paypal-Debug-Id` and `paypal-debug-id` interchangeably.
pub const DEBUG_ID_HEADER: &str = "paypal-debug-id";

/// A fully formed HTTP request, ready for a [`Transport`] to send.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a bodiless GET request for the given URL.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post_json(url: Url, body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        Self {
            method: Method::POST,
            url,
            headers,
            body: Some(body),
        }
    }

    /// Sets the `Authorization` header, replacing any previous value.
    ///
    /// Values that are not valid header text are dropped silently; access
    /// tokens are ASCII in practice.
    #[must_use]
    pub fn with_authorization(mut self, value: &str) -> Self {
        if let Ok(value) = header::HeaderValue::from_str(value) {
            self.headers.insert(header::AUTHORIZATION, value);
        }
        self
    }
}

/// A response as seen by the layers above the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers. [`HeaderMap`] lookup is case-insensitive.
    pub headers: HeaderMap,
    /// Response body, if one was returned.
    pub body: Option<String>,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body when it is present and non-blank.
    #[must_use]
    pub fn non_blank_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.trim().is_empty())
    }

    /// Returns the correlation id from the diagnostic response header.
    ///
    /// Must be read on failure paths too; it is the only way to match a
    /// client-visible error with a server-side trace.
    #[must_use]
    pub fn correlation_id(&self) -> Option<String> {
        self.headers
            .get(DEBUG_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }
}

/// Sends HTTP requests on behalf of the SDK.
///
/// Implementations own retry and timeout policy; if a transport retries, it
/// must do so transparently before returning. No cross-call state is implied
/// and concurrent `send` calls must be safe.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response could be obtained at all.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
