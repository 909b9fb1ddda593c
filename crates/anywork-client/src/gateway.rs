//! AnyWork REST API gateway client.
//!
//! Single point of outbound HTTP traffic:
//! - Bearer token attachment from the session store
//! - Query serialization and JSON decoding
//! - Error normalization with server-message extraction
//! - Observability (tracing spans, metrics)
//!
//! No retries happen at this layer; retrying is a caller decision.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info_span, Instrument};
use url::Url;

use anywork_models::ResumeUpload;

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_request;
use crate::store::SessionStore;

// =============================================================================
// Configuration
// =============================================================================

/// Default API base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Gateway client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the API prefix, e.g. "http://localhost:8000/api"
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        let base_url =
            std::env::var("ANYWORK_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Url::parse(&base_url).map_err(|e| {
            ApiError::validation(format!("ANYWORK_API_BASE_URL is not a valid URL: {}", e))
        })?;

        let timeout_secs: u64 = std::env::var("ANYWORK_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let connect_timeout_secs: u64 = std::env::var("ANYWORK_API_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// AnyWork REST API client.
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl Clone for ApiClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl ApiClient {
    /// Create a new gateway client backed by `store` for token lookup.
    pub fn new(config: ApiConfig, store: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("anywork-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            store,
        })
    }

    /// Create from environment variables.
    pub fn from_env(store: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let config = ApiConfig::from_env()?;
        Self::new(config, store)
    }

    /// Build a full endpoint URL. Paths are expected to start with `/`.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when the store has one.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // =========================================================================
    // Request Methods
    // =========================================================================

    /// GET `path` with query parameters. Empty pairs should already be
    /// filtered out by the caller's filter types.
    pub async fn get<T>(&self, path: &str, query: &[(String, String)]) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);

        self.execute("GET", path, async {
            let mut request = self.http.get(&url);
            if !query.is_empty() {
                request = request.query(query);
            }
            let response = self.authorize(request).send().await?;
            Self::decode(response).await
        })
        .await
    }

    /// POST a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);

        self.execute("POST", path, async {
            let response = self
                .authorize(self.http.post(&url))
                .json(body)
                .send()
                .await?;
            Self::decode(response).await
        })
        .await
    }

    /// PUT a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);

        self.execute("PUT", path, async {
            let response = self
                .authorize(self.http.put(&url))
                .json(body)
                .send()
                .await?;
            Self::decode(response).await
        })
        .await
    }

    /// PATCH a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);

        self.execute("PATCH", path, async {
            let response = self
                .authorize(self.http.patch(&url))
                .json(body)
                .send()
                .await?;
            Self::decode(response).await
        })
        .await
    }

    /// DELETE `path`. Success bodies are discarded.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.endpoint(path);

        self.execute("DELETE", path, async {
            let response = self.authorize(self.http.delete(&url)).send().await?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(Self::error_from_response(status, response).await)
            }
        })
        .await
    }

    /// POST a file as `multipart/form-data` under the field name "file".
    ///
    /// The multipart boundary sets its own content type; no JSON header is
    /// attached.
    pub async fn upload<T>(&self, path: &str, upload: ResumeUpload) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);

        self.execute("UPLOAD", path, async move {
            let part = multipart::Part::bytes(upload.bytes)
                .file_name(upload.file_name)
                .mime_str(&upload.content_type)?;
            let form = multipart::Form::new().part("file", part);

            let response = self
                .authorize(self.http.post(&url))
                .multipart(form)
                .send()
                .await?;
            Self::decode(response).await
        })
        .await
    }

    // =========================================================================
    // Response Handling
    // =========================================================================

    /// Decode a successful body or normalize the error.
    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from_response(status, response).await)
        }
    }

    async fn error_from_response(status: StatusCode, response: Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        ApiError::from_status(status.as_u16(), Self::extract_error_message(&body))
    }

    /// Pull a display-worthy message out of an error body.
    ///
    /// The API reports errors under "message", "detail", or "error"
    /// depending on the endpoint. Empty strings fall through to the next
    /// key.
    fn extract_error_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["message", "detail", "error"].iter().find_map(|key| {
            value
                .get(*key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    }

    /// Wrap a request future with a tracing span and request metrics.
    async fn execute<T, F>(&self, method: &str, path: &str, fut: F) -> ApiResult<T>
    where
        F: std::future::Future<Output = ApiResult<T>>,
    {
        let span = info_span!("api_request", method = %method, path = %path);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(method, status, latency_ms);

        result
    }
}

// =============================================================================
// Tests
// =============================================================================
