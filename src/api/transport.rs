//! HTTP transport seam
//!
//! Services never touch reqwest directly. They build an [`ApiRequest`] and
//! hand it to a [`Transport`]; the real one is [`HttpTransport`], tests use
//! an in-memory fake.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::error::{CabinetError, CabinetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
}

/// One outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Body,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            bearer: None,
            body: Body::Empty,
        }
    }

    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_string);
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        self.body = Body::Form(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    /// URL without the query string, safe to log
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

/// Raw response: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Map a non-2xx response to a typed error
    pub fn error_for_status(self) -> CabinetResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = error_message(&self.body);
        Err(match self.status {
            400 => CabinetError::Validation(message),
            401 => CabinetError::Unauthorized(message),
            404 => CabinetError::NotFound {
                entity_type: "Resource",
                identifier: message,
            },
            status => CabinetError::Api { status, message },
        })
    }
}

/// Pull a readable message out of an error body
///
/// Understands `{"message": ...}` and the identity provider's
/// `{"error": {"message": ...}}`; falls back to the raw text.
pub fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let message = value
            .get("message")
            .or_else(|| value.get("error").and_then(|e| e.get("message")))
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str());
        if let Some(message) = message {
            return message.to_string();
        }
    }
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sends requests somewhere and returns whatever came back
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> CabinetResult<ApiResponse>;
}

/// Blocking reqwest transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> CabinetResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cabinet-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CabinetError::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> CabinetResult<ApiResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };

        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(pairs) => builder.form(pairs),
        };

        debug!(method = %request.method, path = request.path(), "sending request");
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(method = %request.method, path = request.path(), status, "response received");

        Ok(ApiResponse { status, body })
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &ApiRequest) -> CabinetResult<ApiResponse> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(ApiResponse::new(204, "").error_for_status().is_ok());

        let err = ApiResponse::new(400, r#"{"message":"CIN already exists"}"#)
            .error_for_status()
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: CIN already exists");

        let err = ApiResponse::new(401, "").error_for_status().unwrap_err();
        assert!(err.needs_login());

        let err = ApiResponse::new(404, "Patient not found").error_for_status().unwrap_err();
        assert!(err.is_not_found());

        let err = ApiResponse::new(503, "down").error_for_status().unwrap_err();
        assert!(matches!(err, CabinetError::Api { status: 503, .. }));
    }

    #[test]
    fn test_identity_error_unwrapped() {
        let body = r#"{"error":{"code":400,"message":"INVALID_PASSWORD"}}"#;
        assert_eq!(error_message(body), "INVALID_PASSWORD");
    }

    #[test]
    fn test_path_hides_query() {
        let req = ApiRequest::new(Method::Post, "https://id.example/v1/accounts:signIn?key=secret");
        assert_eq!(req.path(), "https://id.example/v1/accounts:signIn");
    }
}
