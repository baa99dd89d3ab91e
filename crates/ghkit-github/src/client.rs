//! GitHub REST transport.
//!
//! [`GitHubClient`] owns the HTTP connection pool and issues single requests
//! with the standard GitHub headers. Everything above it (pagination,
//! transfers, endpoint groups) goes through these verb methods.

use std::time::Duration;

use ghkit_core::config::{DEFAULT_GITHUB_API_URL, DEFAULT_TIMEOUT_SECS};
use ghkit_core::{Config, Error, Result};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::transfer::Transfer;

/// Supported GitHub API version.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Query parameters for requests that take none.
pub const NO_PARAMS: &[(&str, &str)] = &[];

const USER_AGENT: &str = "ghkit";

/// GitHub API client.
///
/// Cheap to clone: clones share the underlying connection pool.
#[derive(Clone)]
pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

/// Builder for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubClientBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITHUB_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GitHubClientBuilder {
    /// Token sent as `Authorization: Bearer <token>`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// API base URL (GitHub Enterprise or a test server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Timeout applied to every request made by the client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<GitHubClient> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GitHubClient {
            base_url: self.base_url,
            token: self.token,
            client,
        })
    }
}

impl GitHubClient {
    /// Create a client for the public GitHub API.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder().token(token).build()
    }

    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::default()
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config, token: Option<String>) -> Result<Self> {
        let mut builder = Self::builder()
            .base_url(config.base_url())
            .timeout(config.timeout());
        if let Some(token) = token {
            builder = builder.token(token);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs are used verbatim, API paths are joined to the base URL.
    pub fn request_url(&self, api_or_url: &str) -> String {
        if api_or_url.starts_with("https://") || api_or_url.starts_with("http://") {
            api_or_url.to_string()
        } else {
            format!("{}{}", self.base_url, api_or_url)
        }
    }

    /// Build request with common headers.
    fn request(&self, method: reqwest::Method, api_or_url: &str) -> reqwest::RequestBuilder {
        let url = self.request_url(api_or_url);
        debug!(method = %method, url = %url, "GitHub request");

        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        builder.send().await.map_err(|e| Error::Http(e.to_string()))
    }

    /// GET without checking the response status.
    ///
    /// Used by `exists`-style helpers that interpret 404 themselves.
    pub async fn get_response<Q: Serialize + ?Sized>(
        &self,
        api: &str,
        params: &Q,
    ) -> Result<reqwest::Response> {
        self.send(self.request(reqwest::Method::GET, api).query(params))
            .await
    }

    /// GET, failing on non-success status.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        api: &str,
        params: &Q,
    ) -> Result<reqwest::Response> {
        let response = self.get_response(api, params).await?;
        check_status(response).await
    }

    /// GET with typed deserialization.
    pub async fn get_json<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        api: &str,
        params: &Q,
    ) -> Result<T> {
        let response = self.get(api, params).await?;
        decode_json(response).await
    }

    /// POST a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .send(self.request(reqwest::Method::POST, api).json(body))
            .await?;
        check_status(response).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.post(api, body).await?;
        decode_json(response).await
    }

    /// PUT a JSON body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .send(self.request(reqwest::Method::PUT, api).json(body))
            .await?;
        check_status(response).await
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.put(api, body).await?;
        decode_json(response).await
    }

    /// PATCH a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .send(self.request(reqwest::Method::PATCH, api).json(body))
            .await?;
        check_status(response).await
    }

    /// PATCH a JSON body and decode the JSON response.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.patch(api, body).await?;
        decode_json(response).await
    }

    /// DELETE a resource.
    pub async fn delete(&self, api: &str) -> Result<()> {
        let response = self
            .send(self.request(reqwest::Method::DELETE, api))
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Start a streaming GET. The body is left unread for the caller.
    pub async fn stream(&self, api: &str) -> Result<reqwest::Response> {
        let response = self.send(self.request(reqwest::Method::GET, api)).await?;
        check_status(response).await
    }

    /// POST a streamed binary body, e.g. a release asset.
    pub async fn post_stream<Q: Serialize + ?Sized>(
        &self,
        api: &str,
        params: &Q,
        content_type: &str,
        content_length: Option<u64>,
        body: reqwest::Body,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .request(reqwest::Method::POST, api)
            .query(params)
            .header(CONTENT_TYPE, content_type);
        if let Some(length) = content_length {
            builder = builder.header(CONTENT_LENGTH, length);
        }

        let response = self.send(builder.body(body)).await?;
        check_status(response).await
    }

    /// Download a resource as a progress-tracked chunk stream.
    ///
    /// `known_length` takes precedence over the response's `content-length`.
    pub async fn download(&self, api: &str, known_length: Option<u64>) -> Result<Transfer> {
        let response = self.stream(api).await?;
        Transfer::from_response(response, known_length)
    }
}

/// Map a non-success response to an [`Error`], consuming its body as message.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let url = response.url().to_string();
    let message = response.text().await.unwrap_or_default();
    warn!(
        status = status_code,
        url = url,
        message = message,
        "GitHub API error response"
    );
    Err(Error::from_status(status_code, message))
}

pub(crate) async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn create_test_client(server: &MockServer) -> GitHubClient {
        GitHubClient::builder()
            .base_url(server.base_url())
            .token("test-token")
            .build()
            .unwrap()
    }

    #[test]
    fn test_request_url() {
        let client = GitHubClient::builder()
            .base_url("https://api.github.com/")
            .build()
            .unwrap();

        assert_eq!(
            client.request_url("/repos/foo/bar"),
            "https://api.github.com/repos/foo/bar"
        );
        assert_eq!(
            client.request_url("https://uploads.github.com/repos/foo/bar/releases/1/assets"),
            "https://uploads.github.com/repos/foo/bar/releases/1/assets"
        );
        assert_eq!(
            client.request_url("http://localhost:1234/x"),
            "http://localhost:1234/x"
        );
    }

    #[tokio::test]
    async fn test_standard_headers() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/user")
                .header("Authorization", "Bearer test-token")
                .header("Accept", "application/vnd.github+json")
                .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
                .header("User-Agent", "ghkit");
            then.status(200).json_body(serde_json::json!({"login": "octocat"}));
        });

        let client = create_test_client(&server);
        let user: serde_json::Value = client.get_json("/user", NO_PARAMS).await.unwrap();

        mock.assert();
        assert_eq!(user["login"], "octocat");
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET).path("/meta").header_missing("Authorization");
            then.status(200).json_body(serde_json::json!({}));
        });

        let client = GitHubClient::builder()
            .base_url(server.base_url())
            .build()
            .unwrap();
        let _: serde_json::Value = client.get_json("/meta", NO_PARAMS).await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/missing");
            then.status(404).body("{\"message\":\"Not Found\"}");
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/repos/foo/bar");
            then.status(403).body("{\"message\":\"Must have admin rights\"}");
        });
        server.mock(|when, then| {
            when.method(POST).path("/repos/foo/bar/releases");
            then.status(422).body("{\"message\":\"Validation Failed\"}");
        });

        let client = create_test_client(&server);

        let result: Result<serde_json::Value> =
            client.get_json("/repos/foo/missing", NO_PARAMS).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        let result = client.delete("/repos/foo/bar").await;
        assert!(matches!(result, Err(Error::Forbidden(_))));

        let result = client
            .post("/repos/foo/bar/releases", &serde_json::json!({}))
            .await;
        match result {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 422);
                assert!(message.contains("Validation Failed"));
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.status())),
        }
    }

    #[tokio::test]
    async fn test_get_response_does_not_check_status() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/orgs/nope");
            then.status(404);
        });

        let client = create_test_client(&server);
        let response = client.get_response("/orgs/nope", NO_PARAMS).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_invalid_json_is_invalid_data() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(200).body("not json");
        });

        let client = create_test_client(&server);
        let result: Result<serde_json::Value> = client.get_json("/user", NO_PARAMS).await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let client = GitHubClient::builder()
            .base_url("http://127.0.0.1:1")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let result = client.get("/user", NO_PARAMS).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
