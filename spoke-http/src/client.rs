//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{HttpMethod, HttpRequest, HttpResponse};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, warn};

/// HTTP client trait for making JSON requests
///
/// Non-2xx statuses are not errors at this layer: callers decide which
/// status they expect. `Err` means the exchange itself failed.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;

    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, HttpError> {
        let mut request = HttpRequest::get(url);
        if let Some(token) = bearer {
            request = request.bearer(token);
        }
        self.send(request).await
    }

    async fn post_json(&self, url: &str, body: JsonValue) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::post(url, body)).await
    }

    async fn patch_json(
        &self,
        url: &str,
        body: JsonValue,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let mut request = HttpRequest::patch(url, body);
        if let Some(token) = bearer {
            request = request.bearer(token);
        }
        self.send(request).await
    }
}

/// HTTP Manager backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
    config: HttpConfig,
}

impl HttpManager {
    /// Create a new HttpManager with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager with timeout: {}s",
            config.timeout.as_secs()
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, HttpError> {
        let mut header_map = HeaderMap::new();
        for (key, value) in headers {
            let header_name = HeaderName::from_str(key)
                .map_err(|_| HttpError::InvalidHeader(key.to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeader(format!("value for {}", key)))?;
            header_map.insert(header_name, header_value);
        }
        Ok(header_map)
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        ::url::Url::parse(&url).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Building {} request to {}", method, url);
        let mut builder = self
            .client
            .request(reqwest::Method::from(method), &url)
            .headers(Self::header_map(&headers)?);

        if let Some(ref body) = body {
            builder = builder.json(body);
        } else if method != HttpMethod::Get {
            builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        let status_code = status.as_u16();

        let response_headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();

        // Read once as text, then try JSON, so non-JSON bodies are kept verbatim
        let text = response.text().await?;
        let elapsed = started.elapsed();

        let response_body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            match serde_json::from_str::<JsonValue>(&text) {
                Ok(json_data) => json_data,
                Err(_) => {
                    warn!(
                        "{} {} returned a non-JSON body ({} bytes)",
                        method,
                        url,
                        text.len()
                    );
                    JsonValue::String(text)
                }
            }
        };

        debug!(
            "{} {} -> {} {} in {}ms",
            method,
            url,
            status_code,
            status.canonical_reason().unwrap_or("Unknown Status"),
            elapsed.as_millis()
        );

        Ok(HttpResponse {
            status: status_code,
            headers: response_headers,
            body: response_body,
            elapsed,
        })
    }
}
