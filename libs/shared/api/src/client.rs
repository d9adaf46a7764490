use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::AppError;

/// JSON client for the remote booking API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.api_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            AppError::Configuration(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Returns a client that authenticates every request with `token`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    fn get_headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AppError::Configuration(format!("invalid auth token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url)
            .headers(self.get_headers()?);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            AppError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(AppError::from_status(status.as_u16(), error_text));
        }

        let bytes = response.bytes().await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let data = serde_json::from_slice::<T>(&bytes)?;
        Ok(data)
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<T>(&self, path: &str, body: Value) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], Some(body)).await
    }
}
