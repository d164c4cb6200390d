//! Typed GraphQL execution layer.
//!
//! Each concrete query implements the [`Query`] capability: it builds its
//! own request body and parses the raw `data` object into a typed result.
//! [`GraphQlClient`] owns dispatch and outcome classification, returning a
//! uniform [`GraphQlResponse`] envelope.
//!
//! Outcome classification is deliberately asymmetric to the REST-style
//! domain clients:
//!
//! - transport failure or a blank body is a hard failure
//!   ([`TransportError`]), carrying the correlation id when one arrived;
//! - HTTP 200 with an unparseable body or no `data` key is a hard failure
//!   ([`ProtocolError`]);
//! - any other non-200 response is a *soft* failure: an empty envelope, so
//!   callers branch on the absence of `data` rather than catching errors.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::CoreConfig;
use crate::error::{CoreError, ProtocolError, TransportError};
use crate::transport::{HttpRequest, Transport};

/// Wire form of a GraphQL request: `{"query": ..., "variables": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequestBody {
    /// The GraphQL operation document.
    pub query: String,
    /// Operation variables as a JSON object.
    pub variables: Value,
}

/// One structured error from a GraphQL response's `errors` array.
///
/// Opaque beyond the message; upstream metadata is kept verbatim for
/// diagnostics.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GraphQlError {
    /// Human-readable error message.
    pub message: String,
    /// Upstream metadata, passed through untouched.
    #[serde(default)]
    pub extensions: Option<Value>,
}

/// Uniform envelope around a GraphQL response.
///
/// For a well-formed 200 response exactly one of `data` or a non-empty
/// `errors` is meaningful. The empty envelope (`data: None`, no errors)
/// signals a non-200 or otherwise unusable response and must itself be
/// treated as a failure by callers.
#[derive(Debug, Clone)]
pub struct GraphQlResponse<T> {
    /// The typed query result, when the server returned one.
    pub data: Option<T>,
    /// Structured errors reported by the server, in server order.
    pub errors: Vec<GraphQlError>,
    /// Correlation id from the diagnostic response header.
    pub correlation_id: Option<String>,
}

impl<T> Default for GraphQlResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            errors: Vec::new(),
            correlation_id: None,
        }
    }
}

impl<T> GraphQlResponse<T> {
    /// Formats the error list for embedding in a domain error message.
    #[must_use]
    pub fn error_summary(&self) -> String {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        format!("{messages:?}")
    }
}

/// Capability implemented by each concrete query type.
///
/// Implementations are stateless: one instance per invocation is
/// sufficient, and nothing is mutated after construction.
pub trait Query {
    /// The typed result this query parses out of the `data` object.
    type Output;

    /// Builds the operation document and variables for this invocation.
    fn request_body(&self) -> GraphQlRequestBody;

    /// Parses the raw `data` object into the typed result.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] when the object cannot be understood.
    fn parse(&self, data: &Value) -> Result<Self::Output, ProtocolError>;
}

/// Builds HTTP requests for GraphQL operations under one configuration.
///
/// Injects the JSON content type and the configuration's bearer credential.
#[derive(Debug, Clone)]
pub struct GraphQlRequestFactory {
    config: CoreConfig,
}

impl GraphQlRequestFactory {
    /// Creates a factory scoped to the given configuration.
    #[must_use]
    pub const fn new(config: CoreConfig) -> Self {
        Self { config }
    }

    /// Builds a POST request to the configured GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the body cannot be serialized.
    pub fn create(&self, body: &GraphQlRequestBody) -> Result<HttpRequest, ProtocolError> {
        let serialized = serde_json::to_string(body)
            .map_err(|e| ProtocolError::new(format!("failed to serialize GraphQL request: {e}")))?;
        Ok(HttpRequest::post_json(self.config.graphql_url(), serialized)
            .with_authorization(&self.config.authorization_header()))
    }
}

/// Dispatches [`Query`] instances over a [`Transport`] and classifies the
/// outcome.
///
/// Holds no cross-call state; concurrent `execute` calls are safe.
pub struct GraphQlClient {
    transport: Arc<dyn Transport>,
    request_factory: GraphQlRequestFactory,
}

impl std::fmt::Debug for GraphQlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQlClient")
            .field("request_factory", &self.request_factory)
            .finish_non_exhaustive()
    }
}

impl GraphQlClient {
    /// Creates a client for the given configuration and transport.
    #[must_use]
    pub fn new(config: CoreConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            request_factory: GraphQlRequestFactory::new(config),
        }
    }

    /// Executes a query and returns the response envelope.
    ///
    /// # Errors
    ///
    /// - [`TransportError`] when no response body was returned; carries the
    ///   correlation id read from the response header when one arrived.
    /// - [`ProtocolError`] when a 200 body is not JSON, lacks a `data` key,
    ///   or the query's own parsing rejects the `data` object.
    ///
    /// Any other non-200 response yields the empty envelope, not an error.
    pub async fn execute<Q: Query>(
        &self,
        query: &Q,
    ) -> Result<GraphQlResponse<Q::Output>, CoreError> {
        let request = self.request_factory.create(&query.request_body())?;
        tracing::debug!(url = %request.url, "dispatching GraphQL request");

        let response = self.transport.send(request).await?;
        let correlation_id = response.correlation_id();

        let Some(body) = response.non_blank_body() else {
            tracing::debug!(?correlation_id, "GraphQL response had no body");
            return Err(TransportError::no_response_data(correlation_id).into());
        };

        if response.status != http::StatusCode::OK {
            // Soft failure: callers branch on the absence of `data`.
            tracing::debug!(status = %response.status, ?correlation_id, "non-200 GraphQL response");
            let errors = serde_json::from_str::<Value>(body)
                .ok()
                .map(|json| parse_errors(&json))
                .unwrap_or_default();
            return Ok(GraphQlResponse {
                data: None,
                errors,
                correlation_id,
            });
        }

        let json: Value = serde_json::from_str(body).map_err(|e| {
            ProtocolError::new(format!("malformed GraphQL response body: {e}"))
                .with_correlation_id(correlation_id.clone())
        })?;
        let errors = parse_errors(&json);
        let data = json.get("data").ok_or_else(|| {
            ProtocolError::new("GraphQL response is missing the 'data' object")
                .with_correlation_id(correlation_id.clone())
        })?;
        let parsed = query
            .parse(data)
            .map_err(|e| e.with_correlation_id(correlation_id.clone()))?;

        Ok(GraphQlResponse {
            data: Some(parsed),
            errors,
            correlation_id,
        })
    }
}

/// Extracts the `errors` array from a response document, tolerating absence
/// and unexpected shapes.
fn parse_errors(json: &Value) -> Vec<GraphQlError> {
    json.get("errors")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}
