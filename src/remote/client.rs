//! HTTP client for the cat integration API.
//!
//! `GET {base_url}/companies/{tenant_id}/cats` answers with
//! `{"data": [{"id": ..., "name": ..., "breed": ..., "color": ...}, ...]}`.
//! Errors come back as HTTP status codes, 4xx responses optionally carrying
//! `{"meta": {"message": ...}}`.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;

use super::error::ApiError;
use super::CatSource;
use crate::config::RemoteConfig;
use crate::models::RemoteCat;

/// Errors building an [`ApiClient`] from configuration.
#[derive(Error, Debug)]
pub enum ClientConfigError {
    #[error("Remote API not configured. Set remote.base_url in the config file or CATSYNC_REMOTE_URL.")]
    NotConfigured,

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct CatsResponse {
    #[serde(default)]
    data: Option<Vec<RemoteCat>>,
}

/// Integration API client.
///
/// The request timeout is enforced by the underlying reqwest client. No retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientConfigError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            http,
        })
    }

    /// Creates a client from the `remote` section of the config.
    ///
    /// Returns an error if no base URL is configured.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, ClientConfigError> {
        let base_url = config
            .base_url
            .clone()
            .ok_or(ClientConfigError::NotConfigured)?;
        Self::new(
            base_url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists all cats of a tenant.
    pub async fn cats(&self, tenant_id: &str) -> Result<Vec<RemoteCat>, ApiError> {
        let url = self.cats_url(tenant_id);
        tracing::debug!(%url, "requesting cats");

        let mut request = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();

        if !status.is_success() {
            // A body we cannot read is treated the same as an empty one.
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(ApiError::from_status(status, body));
        }

        let body: CatsResponse = response.json().await.map_err(ApiError::from_reqwest)?;
        Ok(body.data.unwrap_or_default())
    }

    fn cats_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/companies/{}/cats",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(tenant_id)
        )
    }
}

impl CatSource for ApiClient {
    async fn fetch_cats(&self, tenant_id: &str) -> Result<Vec<RemoteCat>, ApiError> {
        self.cats(tenant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_cats_url_encodes_tenant() {
        let client =
            ApiClient::new("http://api.example.com/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.cats_url("acme co/1"),
            "http://api.example.com/companies/acme%20co%2F1/cats"
        );
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let config = RemoteConfig::default();
        let err = ApiClient::from_config(&config).unwrap_err();
        assert!(matches!(err, ClientConfigError::NotConfigured));
    }

    #[tokio::test]
    async fn test_cats_returns_records() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/companies/acme/cats"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data": [
                    {"id": "1", "name": "Tom", "breed": "Tabby", "color": "orange"},
                    {"id": "2", "name": "Kit", "extra": true}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let cats = client_for(&server).cats("acme").await.unwrap();

        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].get("name").and_then(|v| v.as_str()), Some("Tom"));
        assert_eq!(cats[1].get("id").and_then(|v| v.as_str()), Some("2"));
    }

    #[tokio::test]
    async fn test_cats_missing_data_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/companies/acme/cats"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": null}"#))
            .mount(&server)
            .await;

        let cats = client_for(&server).cats("acme").await.unwrap();
        assert!(cats.is_empty());
    }

    #[tokio::test]
    async fn test_cats_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/companies/acme/cats"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            ApiClient::new(server.uri(), Some("secret".to_string()), Duration::from_secs(5))
                .unwrap();
        client.cats("acme").await.unwrap();
    }

    #[tokio::test]
    async fn test_cats_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).cats("acme").await.unwrap_err();
        assert!(matches!(err, ApiError::ServerError { status: 503 }));
    }

    #[tokio::test]
    async fn test_cats_not_found_keeps_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"meta":{"message":"tenant not found"}}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).cats("ghost").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.response_message().as_deref(), Some("tenant not found"));
    }

    #[tokio::test]
    async fn test_cats_request_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"data": []}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None, Duration::from_millis(50)).unwrap();
        let err = client.cats("acme").await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
    }

    #[tokio::test]
    async fn test_cats_invalid_json_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).cats("acme").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
