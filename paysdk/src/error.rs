//! Error taxonomy shared across the checkout payments SDK.
//!
//! Every failure path in the SDK ends in one of these types. Each carries an
//! optional correlation id — the opaque diagnostic identifier the server
//! returns in a response header — so a client-visible error can be matched
//! against a server-side trace during support escalation.

use std::fmt;

use http::StatusCode;

/// Base error type for SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No response, or a response with an empty body.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Malformed or unexpected response shape despite a success status.
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// Domain-level failure, e.g. an eligibility check that returned no data.
    #[error("{0}")]
    Service(#[from] ServiceError),

    /// Non-2xx status from a domain endpoint.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A second approval attempt started while one was pending.
    #[error("{0}")]
    ConcurrentOperation(#[from] ConcurrentOperationError),
}

impl CoreError {
    /// Returns the correlation id carried by the underlying error, if any.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::Transport(e) => e.correlation_id.as_deref(),
            Self::Protocol(e) => e.correlation_id.as_deref(),
            Self::Service(e) => e.correlation_id.as_deref(),
            Self::Api(e) => e.correlation_id.as_deref(),
            Self::ConcurrentOperation(_) => None,
        }
    }
}

/// No response was received, or the response carried no body.
#[derive(Debug, Clone)]
pub struct TransportError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Correlation id from the response headers, when a response arrived.
    pub correlation_id: Option<String>,
}

impl TransportError {
    /// Creates a new transport error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            correlation_id: None,
        }
    }

    /// The server responded but the body was empty or blank.
    #[must_use]
    pub fn no_response_data(correlation_id: Option<String>) -> Self {
        Self {
            message: "no response data".to_owned(),
            correlation_id,
        }
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.correlation_id {
            Some(id) => write!(f, "{} (correlation id: {id})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// The response had a success status but its shape could not be understood.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// Human-readable description of what failed to parse.
    pub message: String,
    /// Correlation id from the response headers, if present.
    pub correlation_id: Option<String>,
}

impl ProtocolError {
    /// Creates a new protocol error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            correlation_id: None,
        }
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.correlation_id {
            Some(id) => write!(f, "{} (correlation id: {id})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Domain-level failure surfaced to the integrating application.
#[derive(Debug, Clone)]
pub struct ServiceError {
    /// Numeric code identifying the failure class.
    pub code: i32,
    /// Human-readable message, suitable for support escalation.
    pub message: String,
    /// Correlation id from the response headers, if present.
    pub correlation_id: Option<String>,
}

impl ServiceError {
    /// Creates a new service error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>, correlation_id: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            correlation_id,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service error {}: {}", self.code, self.message)?;
        if let Some(id) = &self.correlation_id {
            write!(f, " (correlation id: {id})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

/// Non-2xx status returned by a domain endpoint.
///
/// Unlike the GraphQL layer, REST-style domain calls never soft-fail: every
/// non-success status becomes this error, carrying the status code and the
/// correlation id needed to trace the request server-side.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// The HTTP status code the endpoint returned.
    pub status: StatusCode,
    /// Response body excerpt or a description of the failure.
    pub message: String,
    /// Correlation id from the response headers, if present.
    pub correlation_id: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            correlation_id: None,
        }
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected HTTP status {}: {}", self.status, self.message)?;
        if let Some(id) = &self.correlation_id {
            write!(f, " (correlation id: {id})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// A second approval attempt was started while one was still pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcurrentOperationError;

impl fmt::Display for ConcurrentOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an approval attempt is already in progress")
    }
}

impl std::error::Error for ConcurrentOperationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display_includes_correlation_id() {
        let err = TransportError::no_response_data(Some("debug-123".to_owned()));
        assert_eq!(err.to_string(), "no response data (correlation id: debug-123)");
    }

    #[test]
    fn test_transport_error_display_without_correlation_id() {
        let err = TransportError::no_response_data(None);
        assert_eq!(err.to_string(), "no response data");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST")
            .with_correlation_id(Some("abc".to_owned()));
        assert_eq!(
            err.to_string(),
            "unexpected HTTP status 422 Unprocessable Entity: INVALID_REQUEST (correlation id: abc)"
        );
    }

    #[test]
    fn test_core_error_correlation_id_passthrough() {
        let err: CoreError = ServiceError::new(0, "no data", Some("xyz".to_owned())).into();
        assert_eq!(err.correlation_id(), Some("xyz"));
    }
}
