//! HTTP client for the regulatory requirements endpoint.
//!
//! One `POST` per query, JSON in and JSON out. No retry, no caching, and no
//! explicit timeout: a stalled backend is bounded only by the transport.

mod decode;

use reqfinder_shared::{ApiConfig, ProductQuery, ReqFinderError, RequirementsDocument, Result};
use reqwest::Client;
use tracing::{debug, error, info, instrument};
use url::Url;

/// User-Agent string for requirement lookups.
const USER_AGENT: &str = concat!("ReqFinder/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// RequirementsClient
// ---------------------------------------------------------------------------

/// Client for the requirements endpoint.
#[derive(Debug, Clone)]
pub struct RequirementsClient {
    client: Client,
    endpoint: Url,
}

impl RequirementsClient {
    /// Create a client posting to `endpoint`.
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReqFinderError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    /// Create a client from the `[api]` config section.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(api.endpoint_url()?)
    }

    /// The resolved endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the requirements for a product in a market.
    ///
    /// Fails with [`ReqFinderError::Transport`] when the call cannot complete,
    /// [`ReqFinderError::Server`] on a non-success status, and
    /// [`ReqFinderError::Decode`] when the body is not a requirements document.
    #[instrument(skip_all, fields(product = %query.product_type, market = %query.market))]
    pub async fn fetch_requirements(&self, query: &ProductQuery) -> Result<RequirementsDocument> {
        info!(endpoint = %self.endpoint, detailed = query.detailed, "sending requirements request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(query)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "requirements request failed");
                ReqFinderError::Transport(format!("{}: {e}", self.endpoint))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ReqFinderError::Transport(format!("{}: failed to read body: {e}", self.endpoint))
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "requirements request rejected");
            return Err(ReqFinderError::Server {
                status: status.as_u16(),
                body,
            });
        }

        debug!(body_len = body.len(), "received requirements response");

        let document = decode::decode_document(&body).inspect_err(|e| {
            error!(error = %e, "requirements response could not be decoded");
        })?;

        info!(
            requirements = document.requirements.len(),
            "requirements received"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture_body() -> String {
        std::fs::read_to_string(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("../../../fixtures/json/requirements.fixture.json"),
        )
        .expect("read requirements fixture")
    }

    fn client_for(server: &MockServer) -> RequirementsClient {
        let api = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        RequirementsClient::from_config(&api).unwrap()
    }

    fn wearable_query() -> ProductQuery {
        ProductQuery {
            product_type: "Wearable Tech".into(),
            market: "European Union".into(),
            detailed: true,
        }
    }

    #[tokio::test]
    async fn test_fetch_posts_query_and_decodes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/requirements"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "product_type": "Wearable Tech",
                "market": "European Union",
                "detailed": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture_body()))
            .expect(1)
            .mount(&server)
            .await;

        let doc = client_for(&server)
            .fetch_requirements(&wearable_query())
            .await
            .unwrap();

        assert_eq!(doc.product_type, "Wearable Tech");
        assert_eq!(doc.requirements.len(), 5);
        assert_eq!(doc.requirements[3].source, None);
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/requirements"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string(r#"{"detail":"OpenAI API error: rate limited"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_requirements(&wearable_query())
            .await
            .unwrap_err();

        match err {
            ReqFinderError::Server { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("rate limited"));
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_requirements(&wearable_query())
            .await
            .unwrap_err();

        assert!(matches!(err, ReqFinderError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let client = RequirementsClient::new(
            Url::parse("http://127.0.0.1:1/api/requirements").unwrap(),
        )
        .unwrap();

        let err = client.fetch_requirements(&wearable_query()).await.unwrap_err();

        assert!(matches!(err, ReqFinderError::Transport(_)));
    }

    #[tokio::test]
    async fn test_no_retry_on_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_requirements(&wearable_query()).await;
        assert!(result.is_err());
        // `expect(1)` is verified when the server drops.
    }

    #[test]
    fn test_endpoint_resolution() {
        let api = ApiConfig {
            base_url: "https://compliance.example.com".into(),
            endpoint: "/v2/requirements".into(),
            detailed: false,
        };
        let client = RequirementsClient::from_config(&api).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://compliance.example.com/v2/requirements"
        );
    }
}
