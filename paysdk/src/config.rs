//! Configuration for the checkout payments SDK.
//!
//! [`CoreConfig`] scopes every request the SDK makes: which environment the
//! endpoints resolve against and which access token is injected into the
//! `Authorization` header.

use url::Url;

/// Target environment for all SDK network calls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    /// Sandbox hosts for integration testing.
    #[default]
    Sandbox,
    /// Production hosts.
    Live,
    /// Explicit endpoints, e.g. a local mock server.
    Custom {
        /// GraphQL endpoint.
        graphql_url: Url,
        /// REST API base URL.
        api_url: Url,
    },
}

impl Environment {
    /// Returns the GraphQL endpoint for this environment.
    ///
    /// # Panics
    ///
    /// Never panics in practice; the endpoint literals are valid URLs.
    #[must_use]
    pub fn graphql_url(&self) -> Url {
        let raw = match self {
            Self::Sandbox => "https://www.sandbox.paypal.com/graphql",
            Self::Live => "https://www.paypal.com/graphql",
            Self::Custom { graphql_url, .. } => return graphql_url.clone(),
        };
        Url::parse(raw).expect("static GraphQL endpoint URL is valid")
    }

    /// Returns the REST API base URL for this environment.
    ///
    /// # Panics
    ///
    /// Never panics in practice; the endpoint literals are valid URLs.
    #[must_use]
    pub fn api_url(&self) -> Url {
        let raw = match self {
            Self::Sandbox => "https://api.sandbox.paypal.com/",
            Self::Live => "https://api.paypal.com/",
            Self::Custom { api_url, .. } => return api_url.clone(),
        };
        Url::parse(raw).expect("static API base URL is valid")
    }
}

/// Configuration scoped to one merchant integration.
///
/// Cheap to clone; clients hold their own copy and no state is shared
/// between calls made with the same configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Access token sent as a bearer credential on every request.
    access_token: String,
    /// Environment the endpoints resolve against.
    environment: Environment,
}

impl CoreConfig {
    /// Creates a configuration for the given access token and environment.
    pub fn new(access_token: impl Into<String>, environment: Environment) -> Self {
        Self {
            access_token: access_token.into(),
            environment,
        }
    }

    /// Returns the configured environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns the `Authorization` header value for this configuration.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Returns the GraphQL endpoint for the configured environment.
    #[must_use]
    pub fn graphql_url(&self) -> Url {
        self.environment.graphql_url()
    }

    /// Returns the REST API base URL for the configured environment.
    #[must_use]
    pub fn api_url(&self) -> Url {
        self.environment.api_url()
    }
}
