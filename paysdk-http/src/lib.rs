#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `reqwest`-backed HTTP layer for the checkout payments SDK.
//!
//! Provides the concrete [`paysdk::transport::Transport`] implementation
//! plus the cached client-ID resolver used by the eligibility service.
//!
//! # Modules
//!
//! - [`client_id`] — caching HTTP client-ID resolver
//! - [`transport`] — `reqwest`-backed transport

pub mod client_id;
pub mod transport;

pub use client_id::CachedClientIdResolver;
pub use transport::ReqwestTransport;

#[cfg(test)]
mod tests {
    use super::*;
    use paysdk::eligibility::EligibilityService;
    use paysdk::graphql::GraphQlClient;
    use paysdk::{CoreConfig, CoreError, Environment};
    use std::sync::Arc;
    use url::Url;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(mock_server: &MockServer) -> CoreConfig {
        let api_url = Url::parse(&mock_server.uri()).expect("url");
        CoreConfig::new(
            "fake-token",
            Environment::Custom {
                graphql_url: api_url.join("graphql").expect("url"),
                api_url,
            },
        )
    }

    fn eligibility_service(config: CoreConfig) -> EligibilityService {
        let transport = Arc::new(ReqwestTransport::new());
        let resolver = Arc::new(CachedClientIdResolver::new(
            config.clone(),
            Arc::clone(&transport) as Arc<dyn paysdk::transport::Transport>,
        ));
        let graphql = GraphQlClient::new(config, transport);
        EligibilityService::new(resolver, graphql)
    }

    #[tokio::test]
    async fn test_eligibility_flow_end_to_end() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/oauth2/client-config"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"client_id":"client-e2e"}"#),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("client-e2e"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Paypal-Debug-Id", "debug-e2e")
                    .set_body_string(
                        r#"{"data":{"fundingEligibility":{
                            "card":{"eligible":true},
                            "payLater":{"eligible":false},
                            "credit":{"eligible":false},
                            "paypal":{"eligible":true},
                            "venmo":{"eligible":true}
                        }}}"#,
                    ),
            )
            .mount(&mock_server)
            .await;

        let service = eligibility_service(config_for(&mock_server));
        let eligibility = service.check_eligibility().await.expect("eligibility");
        assert!(eligibility.is_credit_card_eligible);
        assert!(!eligibility.is_pay_later_eligible);
        assert!(eligibility.is_venmo_eligible);
    }

    #[tokio::test]
    async fn test_eligibility_flow_surfaces_service_error_with_correlation_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/oauth2/client-config"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"client_id":"client-e2e"}"#),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(503)
                    .insert_header("Paypal-Debug-Id", "debug-e2e-err")
                    .set_body_string(r#"{"errors":[{"message":"upstream unavailable"}]}"#),
            )
            .mount(&mock_server)
            .await;

        let service = eligibility_service(config_for(&mock_server));
        let err = service.check_eligibility().await.expect_err("must fail");
        match err {
            CoreError::Service(e) => {
                assert_eq!(e.correlation_id.as_deref(), Some("debug-e2e-err"));
                assert!(e.message.contains("upstream unavailable"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }
}
