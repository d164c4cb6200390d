//! Caching HTTP client-ID resolver.
//!
//! The merchant's public client id is fetched once per resolver lifetime —
//! it is fixed for a given configuration, so no TTL is needed.

use std::sync::Arc;

use async_trait::async_trait;
use paysdk::CoreConfig;
use paysdk::client_id::ClientIdResolver;
use paysdk::error::{ApiError, CoreError, ProtocolError, TransportError};
use paysdk::transport::{HttpRequest, Transport};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Path of the client-configuration endpoint, relative to the API base URL.
const CLIENT_CONFIG_PATH: &str = "v1/oauth2/client-config";

/// Wire form of the client-configuration response.
#[derive(Debug, Deserialize)]
struct ClientConfigBody {
    client_id: String,
}

/// [`ClientIdResolver`] that fetches the client id over HTTP and caches it.
pub struct CachedClientIdResolver {
    transport: Arc<dyn Transport>,
    config: CoreConfig,
    cached: RwLock<Option<String>>,
}

impl std::fmt::Debug for CachedClientIdResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedClientIdResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CachedClientIdResolver {
    /// Creates a resolver for the given configuration and transport.
    #[must_use]
    pub fn new(config: CoreConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config,
            cached: RwLock::new(None),
        }
    }

    async fn fetch_remote(&self) -> Result<String, CoreError> {
        let url = self
            .config
            .api_url()
            .join(CLIENT_CONFIG_PATH)
            .map_err(|e| ProtocolError::new(format!("invalid client-config URL: {e}")))?;
        let request =
            HttpRequest::get(url).with_authorization(&self.config.authorization_header());

        let response = self.transport.send(request).await?;
        let correlation_id = response.correlation_id();

        let Some(body) = response.non_blank_body() else {
            return Err(TransportError::no_response_data(correlation_id).into());
        };
        if !response.is_success() {
            return Err(ApiError::new(response.status, body)
                .with_correlation_id(correlation_id)
                .into());
        }

        let parsed: ClientConfigBody = serde_json::from_str(body).map_err(|e| {
            ProtocolError::new(format!("malformed client-config response: {e}"))
                .with_correlation_id(correlation_id)
        })?;
        Ok(parsed.client_id)
    }
}

#[async_trait]
impl ClientIdResolver for CachedClientIdResolver {
    async fn fetch_cached_or_remote_client_id(&self) -> Result<String, CoreError> {
        if let Some(client_id) = self.cached.read().await.clone() {
            return Ok(client_id);
        }

        let client_id = self.fetch_remote().await?;
        tracing::debug!("client id fetched and cached");
        let mut guard = self.cached.write().await;
        *guard = Some(client_id.clone());
        Ok(client_id)
    }
}
