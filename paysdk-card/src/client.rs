//! Card confirmation REST client.
//!
//! One network call per invocation: POST the card as the payment source of
//! an order. Unlike the GraphQL layer, this endpoint never soft-fails —
//! every non-2xx response becomes a typed [`ApiError`] carrying the status
//! code and correlation id. Idempotency is the order-management system's
//! concern; callers must not confirm more than once per user action.

use std::sync::Arc;

use paysdk::CoreConfig;
use paysdk::error::{ApiError, CoreError, ProtocolError, TransportError};
use paysdk::transport::{HttpRequest, Transport};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::card::{Card, CardWire};
use crate::types::{CardConfirmationResult, ThreeDsChallenge};

/// Link relation marking the 3DS payer-action URL in a confirm response.
const PAYER_ACTION_REL: &str = "payer-action";

/// Wire form of the confirm-payment-source request body.
#[derive(Debug, Serialize)]
struct ConfirmRequestBody<'a> {
    payment_source: PaymentSourceWire<'a>,
}

#[derive(Debug, Serialize)]
struct PaymentSourceWire<'a> {
    card: CardWire<'a>,
}

/// Wire form of the confirm-payment-source response body.
///
/// Masked-card fields are tolerated when absent; only a malformed document
/// is a protocol error.
#[derive(Debug, Deserialize)]
struct ConfirmResponseBody {
    id: Option<String>,
    status: Option<String>,
    payment_source: Option<PaymentSourceBody>,
    #[serde(default)]
    links: Vec<LinkBody>,
}

#[derive(Debug, Deserialize)]
struct PaymentSourceBody {
    card: Option<CardResponseBody>,
}

#[derive(Debug, Deserialize)]
struct CardResponseBody {
    last_digits: Option<String>,
    brand: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkBody {
    rel: String,
    href: String,
}

/// Confirms a card as the payment source for an order.
///
/// Holds no cross-call state; concurrent calls are safe.
pub struct CardConfirmationClient {
    transport: Arc<dyn Transport>,
    config: CoreConfig,
}

impl std::fmt::Debug for CardConfirmationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardConfirmationClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CardConfirmationClient {
    /// Creates a client for the given configuration and transport.
    #[must_use]
    pub fn new(config: CoreConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    /// Confirms `card` as the payment source for `order_id`.
    ///
    /// # Errors
    ///
    /// - [`TransportError`] on network failure or a blank success body;
    /// - [`ApiError`] for every non-2xx status, with status code and
    ///   correlation id;
    /// - [`ProtocolError`] when a 2xx body cannot be understood.
    pub async fn confirm_payment_source(
        &self,
        order_id: &str,
        card: &Card,
    ) -> Result<CardConfirmationResult, CoreError> {
        let url = self
            .config
            .api_url()
            .join(&format!(
                "v2/checkout/orders/{order_id}/confirm-payment-source"
            ))
            .map_err(|e| ProtocolError::new(format!("invalid confirm URL: {e}")))?;

        let body = ConfirmRequestBody {
            payment_source: PaymentSourceWire {
                card: CardWire::from(card),
            },
        };
        let serialized = serde_json::to_string(&body)
            .map_err(|e| ProtocolError::new(format!("failed to serialize confirm request: {e}")))?;

        tracing::debug!(order_id, "confirming payment source");
        let request = HttpRequest::post_json(url, serialized)
            .with_authorization(&self.config.authorization_header());
        let response = self.transport.send(request).await?;
        let correlation_id = response.correlation_id();

        if !response.is_success() {
            tracing::warn!(
                status = %response.status,
                ?correlation_id,
                "confirm payment source rejected"
            );
            return Err(ApiError::new(
                response.status,
                response.non_blank_body().unwrap_or_default(),
            )
            .with_correlation_id(correlation_id)
            .into());
        }

        let Some(body) = response.non_blank_body() else {
            return Err(TransportError::no_response_data(correlation_id).into());
        };
        let parsed: ConfirmResponseBody = serde_json::from_str(body).map_err(|e| {
            ProtocolError::new(format!("malformed confirm response: {e}"))
                .with_correlation_id(correlation_id.clone())
        })?;

        let challenge = parsed
            .links
            .iter()
            .find(|link| link.rel == PAYER_ACTION_REL)
            .map(|link| {
                Url::parse(&link.href).map(|url| ThreeDsChallenge { url }).map_err(|e| {
                    ProtocolError::new(format!("invalid payer-action URL: {e}"))
                        .with_correlation_id(correlation_id.clone())
                })
            })
            .transpose()?;

        let card_body = parsed.payment_source.and_then(|source| source.card);
        Ok(CardConfirmationResult {
            order_id: parsed.id.unwrap_or_else(|| order_id.to_owned()),
            status: parsed.status.unwrap_or_default(),
            last_digits: card_body
                .as_ref()
                .and_then(|c| c.last_digits.clone())
                .unwrap_or_default(),
            brand: card_body
                .and_then(|c| c.brand)
                .unwrap_or_default(),
            challenge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysdk::Environment;
    use paysdk::transport::HttpResponse;
    use async_trait::async_trait;
    use http::{HeaderMap, StatusCode, header::HeaderName};

    struct StubTransport {
        status: StatusCode,
        body: &'static str,
        debug_id: Option<&'static str>,
    }

    #[async_trait]
    impl paysdk::transport::Transport for StubTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut headers = HeaderMap::new();
            if let Some(id) = self.debug_id {
                let name = HeaderName::from_bytes(b"Paypal-Debug-Id").expect("header name");
                headers.insert(name, id.parse().expect("header value"));
            }
            Ok(HttpResponse {
                status: self.status,
                headers,
                body: Some(self.body.to_owned()),
            })
        }
    }

    fn client(stub: StubTransport) -> CardConfirmationClient {
        let config = CoreConfig::new("fake-token", Environment::Sandbox);
        CardConfirmationClient::new(config, Arc::new(stub))
    }

    fn test_card() -> Card {
        Card::new("4111111111111111", "09", "2027", "123")
    }

    #[tokio::test]
    async fn test_confirm_without_challenge() {
        let body = r#"{
            "id": "ORDER-1",
            "status": "APPROVED",
            "payment_source": {"card": {"last_digits": "1111", "brand": "VISA"}},
            "links": [{"rel": "self", "href": "https://api.sandbox.paypal.com/v2/checkout/orders/ORDER-1"}]
        }"#;
        let client = client(StubTransport {
            status: StatusCode::OK,
            body,
            debug_id: None,
        });

        let result = client
            .confirm_payment_source("ORDER-1", &test_card())
            .await
            .expect("result");
        assert_eq!(result.order_id, "ORDER-1");
        assert_eq!(result.status, "APPROVED");
        assert_eq!(result.last_digits, "1111");
        assert_eq!(result.brand, "VISA");
        assert!(!result.requires_challenge());
    }

    #[tokio::test]
    async fn test_confirm_with_payer_action_link() {
        let body = r#"{
            "id": "ORDER-2",
            "status": "PAYER_ACTION_REQUIRED",
            "payment_source": {"card": {"last_digits": "0002", "brand": "MASTERCARD"}},
            "links": [
                {"rel": "self", "href": "https://api.sandbox.paypal.com/v2/checkout/orders/ORDER-2"},
                {"rel": "payer-action", "href": "https://www.sandbox.paypal.com/webapps/helios?token=3ds-token"}
            ]
        }"#;
        let client = client(StubTransport {
            status: StatusCode::OK,
            body,
            debug_id: None,
        });

        let result = client
            .confirm_payment_source("ORDER-2", &test_card())
            .await
            .expect("result");
        let challenge = result.challenge.expect("challenge");
        assert_eq!(
            challenge.url.as_str(),
            "https://www.sandbox.paypal.com/webapps/helios?token=3ds-token"
        );
    }

    #[tokio::test]
    async fn test_non_2xx_is_api_error_with_status_and_correlation_id() {
        let client = client(StubTransport {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: r#"{"name":"UNPROCESSABLE_ENTITY","details":[{"issue":"CARD_EXPIRED"}]}"#,
            debug_id: Some("debug-card-1"),
        });

        let err = client
            .confirm_payment_source("ORDER-3", &test_card())
            .await
            .expect_err("must fail");
        match err {
            CoreError::Api(e) => {
                assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(e.correlation_id.as_deref(), Some("debug-card-1"));
                assert!(e.message.contains("CARD_EXPIRED"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_masked_fields_default_to_empty() {
        let body = r#"{"id": "ORDER-4", "status": "APPROVED"}"#;
        let client = client(StubTransport {
            status: StatusCode::OK,
            body,
            debug_id: None,
        });

        let result = client
            .confirm_payment_source("ORDER-4", &test_card())
            .await
            .expect("result");
        assert_eq!(result.last_digits, "");
        assert_eq!(result.brand, "");
    }

    #[tokio::test]
    async fn test_malformed_2xx_body_is_protocol_error() {
        let client = client(StubTransport {
            status: StatusCode::OK,
            body: "<html>oops</html>",
            debug_id: Some("debug-card-2"),
        });

        let err = client
            .confirm_payment_source("ORDER-5", &test_card())
            .await
            .expect_err("must fail");
        match err {
            CoreError::Protocol(e) => {
                assert_eq!(e.correlation_id.as_deref(), Some("debug-card-2"));
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_2xx_body_is_transport_error() {
        let client = client(StubTransport {
            status: StatusCode::CREATED,
            body: "  ",
            debug_id: None,
        });

        let err = client
            .confirm_payment_source("ORDER-6", &test_card())
            .await
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Transport(_)));
    }
}
