//! Client-ID resolution boundary.
//!
//! GraphQL operations are keyed by the merchant's public client id rather
//! than the access token. Resolving it may itself require network I/O, so
//! the seam is async; `paysdk-http` provides a caching implementation.

use async_trait::async_trait;

use crate::error::CoreError;

/// Resolves the merchant's public client id for the active configuration.
#[async_trait]
pub trait ClientIdResolver: Send + Sync {
    /// Returns a cached client id, fetching it from the server on first use.
    ///
    /// # Errors
    ///
    /// Propagates the standard SDK error taxonomy on fetch failure.
    async fn fetch_cached_or_remote_client_id(&self) -> Result<String, CoreError>;
}
