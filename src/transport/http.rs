//! Blocking HTTP transport backed by `reqwest`.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::transport::{ApiError, ApiRequest, ApiResult, Method, Transport};

/// Talks to the REST backend at `base_url`, attaching the bearer token to
/// every request when one is set.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidParams("api base url is empty".to_string()));
        }

        let http = Client::builder()
            .user_agent(concat!("mehfil-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Replaces the bearer token; blank tokens are treated as absent.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Headers shared by every request.
    fn prepare_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(err) => log::warn!("Skipping malformed bearer token: {err}"),
            }
        }
        headers
    }

    fn builder(&self, request: &ApiRequest) -> RequestBuilder {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
            Method::Delete => self.http.delete(url),
        };
        let builder = builder.headers(self.prepare_headers());
        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(&request.query)
        };
        match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> ApiResult<Value> {
        log::debug!("{} {}", request.method, request.path);

        let response = self
            .builder(request)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            log::warn!(
                "{} {} failed with status {}",
                request.method,
                request.path,
                status.as_u16()
            );
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(ApiError::from)
    }
}
