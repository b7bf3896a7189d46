//! HTTP transport abstraction used by provider adapters.
//!
//! Adapters speak [`HttpRequest`]/[`HttpResponse`] against the [`HttpClient`]
//! trait so tests can swap in scripted transports; production wires in
//! [`ReqwestHttpClient`].

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Authentication strategy applied to outgoing requests.
///
/// Both quote vendors used here key access off a secret carried either as a
/// query parameter or a request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    QueryParam { name: String, value: String },
    Header { name: String, value: String },
}

impl HttpAuth {
    pub fn api_key_param(value: impl Into<String>) -> Self {
        Self::QueryParam {
            name: String::from("apikey"),
            value: value.into(),
        }
    }
}

/// Request envelope used by adapter transport calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: 4_000,
        }
    }

    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        match auth {
            HttpAuth::None => {}
            HttpAuth::QueryParam { name, value } => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                self.url = format!(
                    "{}{}{}={}",
                    self.url,
                    sep,
                    name,
                    urlencoding::encode(value)
                );
            }
            HttpAuth::Header { name, value } => {
                self.headers
                    .insert(name.to_ascii_lowercase(), value.clone());
            }
        }
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
    timed_out: bool,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Adapter transport contract.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// No-op transport that answers every request with an empty JSON object.
/// Useful as a stand-in where a transport is required but never exercised.
#[derive(Debug, Default)]
pub struct NoopHttpClient;

impl HttpClient for NoopHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let _ = request;
        Box::pin(async move { Ok(HttpResponse::ok_json("{}")) })
    }
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent("tickscan/0.1.0")
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self.client.get(&request.url);

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            builder = builder.timeout(std::time::Duration::from_millis(request.timeout_ms));

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::timeout(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {e}")))?;

            Ok(HttpResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_auth_appends_to_bare_url() {
        let request = HttpRequest::get("https://example.test/quote")
            .with_auth(&HttpAuth::api_key_param("secret-123"));

        assert_eq!(request.url, "https://example.test/quote?apikey=secret-123");
    }

    #[test]
    fn query_param_auth_extends_existing_query() {
        let request = HttpRequest::get("https://example.test/prev?adjusted=true")
            .with_auth(&HttpAuth::api_key_param("k"));

        assert_eq!(
            request.url,
            "https://example.test/prev?adjusted=true&apikey=k"
        );
    }

    #[test]
    fn header_auth_lowercases_header_name() {
        let request = HttpRequest::get("https://example.test/quote").with_auth(&HttpAuth::Header {
            name: String::from("X-API-Key"),
            value: String::from("demo"),
        });

        assert_eq!(
            request.headers.get("x-api-key").map(String::as_str),
            Some("demo")
        );
    }
}
