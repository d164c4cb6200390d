//! Funding-method eligibility.
//!
//! [`EligibilityService`] answers one question for the host application:
//! which funding methods is this merchant eligible to offer at checkout?
//! The answer comes from a GraphQL backend via [`FundingEligibilityQuery`]
//! and is projected into an immutable [`Eligibility`] snapshot.

use serde_json::{Value, json};
use std::sync::Arc;

use crate::client_id::ClientIdResolver;
use crate::error::{CoreError, ProtocolError, ServiceError};
use crate::graphql::{GraphQlClient, GraphQlRequestBody, Query};

/// GraphQL document for the funding-eligibility operation.
const FUNDING_ELIGIBILITY_QUERY: &str = r"
query getEligibility(
    $clientId: String!,
    $intent: FundingEligibilityIntent!,
    $currency: SupportedCountryCurrencyType!,
    $enableFunding: [SupportedPaymentMethodsType]
) {
    fundingEligibility(
        clientId: $clientId,
        intent: $intent,
        currency: $currency,
        enableFunding: $enableFunding
    ) {
        card { eligible }
        payLater { eligible }
        credit { eligible }
        paypal { eligible }
        venmo { eligible }
    }
}
";

/// Merchant eligibility per funding method.
///
/// Immutable snapshot, created once per successful query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Eligibility {
    /// Whether credit and debit cards can be offered.
    pub is_credit_card_eligible: bool,
    /// Whether pay-later offers can be shown.
    pub is_pay_later_eligible: bool,
    /// Whether PayPal Credit can be offered.
    pub is_credit_eligible: bool,
    /// Whether the PayPal wallet can be offered.
    pub is_paypal_eligible: bool,
    /// Whether Venmo can be offered.
    pub is_venmo_eligible: bool,
}

/// Checkout intent the eligibility check is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FundingIntent {
    /// Funds are captured immediately on approval.
    #[default]
    Capture,
    /// Funds are authorized now and captured later.
    Authorize,
}

impl FundingIntent {
    /// Wire name of the intent.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Capture => "CAPTURE",
            Self::Authorize => "AUTHORIZE",
        }
    }
}

/// Concrete [`Query`] requesting funding eligibility for one client id.
#[derive(Debug, Clone)]
pub struct FundingEligibilityQuery {
    client_id: String,
    intent: FundingIntent,
    currency: String,
    enable_funding: Vec<String>,
}

impl FundingEligibilityQuery {
    /// Variable name for the client id.
    pub const VARIABLE_CLIENT_ID: &'static str = "clientId";
    /// Variable name for the checkout intent.
    pub const VARIABLE_INTENT: &'static str = "intent";
    /// Variable name for the currency.
    pub const VARIABLE_CURRENCY: &'static str = "currency";
    /// Variable name for the explicitly enabled funding methods.
    pub const VARIABLE_ENABLE_FUNDING: &'static str = "enableFunding";

    /// Creates the query with the fixed variables the SDK sends today:
    /// capture intent, USD, and Venmo explicitly enabled.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            intent: FundingIntent::Capture,
            currency: "USD".to_owned(),
            enable_funding: vec!["VENMO".to_owned()],
        }
    }
}

impl Query for FundingEligibilityQuery {
    type Output = Eligibility;

    fn request_body(&self) -> GraphQlRequestBody {
        GraphQlRequestBody {
            query: FUNDING_ELIGIBILITY_QUERY.to_owned(),
            variables: json!({
                (Self::VARIABLE_CLIENT_ID): self.client_id,
                (Self::VARIABLE_INTENT): self.intent.as_str(),
                (Self::VARIABLE_CURRENCY): self.currency,
                (Self::VARIABLE_ENABLE_FUNDING): self.enable_funding,
            }),
        }
    }

    fn parse(&self, data: &Value) -> Result<Eligibility, ProtocolError> {
        // Partial data never errors: a missing nested field means the
        // funding method is not eligible.
        let funding = data.get("fundingEligibility");
        let eligible = |method: &str| -> bool {
            funding
                .and_then(|f| f.get(method))
                .and_then(|m| m.get("eligible"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        Ok(Eligibility {
            is_credit_card_eligible: eligible("card"),
            is_pay_later_eligible: eligible("payLater"),
            is_credit_eligible: eligible("credit"),
            is_paypal_eligible: eligible("paypal"),
            is_venmo_eligible: eligible("venmo"),
        })
    }
}

/// Checks a merchant's eligibility for the supported funding methods.
pub struct EligibilityService {
    client_id_resolver: Arc<dyn ClientIdResolver>,
    graphql_client: GraphQlClient,
}

impl std::fmt::Debug for EligibilityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityService")
            .field("graphql_client", &self.graphql_client)
            .finish_non_exhaustive()
    }
}

impl EligibilityService {
    /// Creates a service over the given resolver and GraphQL client.
    #[must_use]
    pub fn new(
        client_id_resolver: Arc<dyn ClientIdResolver>,
        graphql_client: GraphQlClient,
    ) -> Self {
        Self {
            client_id_resolver,
            graphql_client,
        }
    }

    /// Checks whether the merchant is eligible for each funding method.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the envelope carries no data; the
    /// message embeds the server's error list and the correlation id is
    /// preserved for support escalation. Transport and protocol failures
    /// propagate unchanged.
    pub async fn check_eligibility(&self) -> Result<Eligibility, CoreError> {
        let client_id = self
            .client_id_resolver
            .fetch_cached_or_remote_client_id()
            .await?;

        let query = FundingEligibilityQuery::new(client_id);
        let response = self.graphql_client.execute(&query).await?;
        let error_summary = response.error_summary();

        match response.data {
            Some(eligibility) => Ok(eligibility),
            None => {
                tracing::warn!(
                    correlation_id = ?response.correlation_id,
                    "eligibility check returned no data"
                );
                Err(ServiceError::new(
                    0,
                    format!("Error in checking eligibility: {error_summary}"),
                    response.correlation_id,
                )
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoreConfig, Environment};
    use crate::error::TransportError;
    use crate::transport::{HttpRequest, HttpResponse, Transport};
    use async_trait::async_trait;
    use http::{HeaderMap, StatusCode};

    struct StaticResolver;

    #[async_trait]
    impl ClientIdResolver for StaticResolver {
        async fn fetch_cached_or_remote_client_id(&self) -> Result<String, CoreError> {
            Ok("client-id-1".to_owned())
        }
    }

    struct StubTransport {
        status: StatusCode,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: self.status,
                headers: HeaderMap::new(),
                body: Some(self.body.to_owned()),
            })
        }
    }

    fn service(status: StatusCode, body: &'static str) -> EligibilityService {
        let config = CoreConfig::new("fake-token", Environment::Sandbox);
        let graphql = GraphQlClient::new(config, Arc::new(StubTransport { status, body }));
        EligibilityService::new(Arc::new(StaticResolver), graphql)
    }

    const FULL_RESPONSE: &str = r#"{
        "data": {
            "fundingEligibility": {
                "card": {"eligible": true},
                "payLater": {"eligible": false},
                "credit": {"eligible": false},
                "paypal": {"eligible": true},
                "venmo": {"eligible": true}
            }
        }
    }"#;

    #[tokio::test]
    async fn test_check_eligibility_projects_all_flags() {
        let service = service(StatusCode::OK, FULL_RESPONSE);
        let eligibility = service.check_eligibility().await.expect("eligibility");
        assert!(eligibility.is_credit_card_eligible);
        assert!(!eligibility.is_pay_later_eligible);
        assert!(!eligibility.is_credit_eligible);
        assert!(eligibility.is_paypal_eligible);
        assert!(eligibility.is_venmo_eligible);
    }

    #[tokio::test]
    async fn test_missing_venmo_field_defaults_to_not_eligible() {
        let body = r#"{
            "data": {
                "fundingEligibility": {
                    "card": {"eligible": true},
                    "payLater": {"eligible": true},
                    "credit": {"eligible": true},
                    "paypal": {"eligible": true}
                }
            }
        }"#;
        let service = service(StatusCode::OK, body);
        let eligibility = service.check_eligibility().await.expect("eligibility");
        assert!(eligibility.is_credit_card_eligible);
        assert!(!eligibility.is_venmo_eligible);
    }

    #[tokio::test]
    async fn test_empty_envelope_becomes_service_error() {
        let service = service(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"errors":[{"message":"upstream timeout"}]}"#,
        );
        let err = service.check_eligibility().await.expect_err("must fail");
        match err {
            CoreError::Service(e) => {
                assert_eq!(e.code, 0);
                assert!(e.message.contains("upstream timeout"), "message: {}", e.message);
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn test_query_variables_wire_shape() {
        let query = FundingEligibilityQuery::new("client-id-1");
        let body = query.request_body();
        assert_eq!(
            body.variables,
            json!({
                "clientId": "client-id-1",
                "intent": "CAPTURE",
                "currency": "USD",
                "enableFunding": ["VENMO"]
            })
        );
        assert!(body.query.contains("fundingEligibility"));
    }
}
