//! HTTP request/response types

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// HTTP methods the suite sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    /// Get the string representation of the HTTP method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// An outgoing JSON request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<JsonValue>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>, body: JsonValue) -> Self {
        Self::new(HttpMethod::Post, url).json(body)
    }

    pub fn patch(url: impl Into<String>, body: JsonValue) -> Self {
        Self::new(HttpMethod::Patch, url).json(body)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach an `Authorization: Bearer <token>` header
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

/// A response with its body decoded as JSON when possible.
///
/// Bodies that are not valid JSON are kept as a JSON string so diagnostics
/// can still show them.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: JsonValue,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn new(status: u16, body: JsonValue) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Top-level field of a JSON object body
    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.body.get(name)
    }

    /// Best-effort error message: `message`, then `error`, then a raw text body
    pub fn error_message(&self) -> Option<String> {
        for key in ["message", "error"] {
            if let Some(text) = self.body.get(key).and_then(JsonValue::as_str) {
                return Some(text.to_string());
            }
        }
        match &self.body {
            JsonValue::String(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}
