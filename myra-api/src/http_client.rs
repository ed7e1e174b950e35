//! HTTP plumbing
//!
//! [`HttpUtils`] wraps the reqwest send/read/log cycle; [`ReqwestTransport`] applies the
//! connection policy the Myra API is called with:
//! - at most 3 redirects
//! - 20 second timeout per request
//! - IPv4 only
//! - body attached to every method except GET

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::request::SignedRequest;
use crate::traits::Transport;
use crate::utils::log_sanitizer::{redact_header, truncate_for_log};

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// Maximum number of redirects followed
pub const MAX_REDIRECTS: usize = 3;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status and response text
    ///
    /// # Arguments
    /// * `request_builder` - configured request constructor (URL, headers, body)
    /// * `method_name` - request method name (for logs)
    /// * `url` - request URL (for logs)
    ///
    /// # Returns
    /// * `Ok(RawResponse)` - for every status code, including errors
    /// * `Err(ApiError::Timeout)` - the request timed out
    /// * `Err(ApiError::Transport)` - any other failure to complete the exchange
    pub async fn execute_request(
        request_builder: reqwest::RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<RawResponse> {
        log::debug!("[myra] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ApiError::Transport {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[myra] Response Status: {status}");

        let body = response.text().await.map_err(|e| ApiError::Transport {
            detail: format!("Failed to read response body: {e}"),
        })?;

        log::debug!("[myra] Response Body: {}", truncate_for_log(&body));

        Ok(RawResponse { status, body })
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ApiError::MalformedResponse)` - parsing failed
    pub fn parse_json<T>(response_text: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[myra] JSON parse failed: {e}");
            log::error!("[myra] Raw response: {}", truncate_for_log(response_text));
            ApiError::MalformedResponse {
                detail: e.to_string(),
            }
        })
    }
}

/// Connection settings for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    /// Skip TLS certificate and hostname verification. Off unless explicitly enabled.
    pub danger_accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            danger_accept_invalid_certs: false,
        }
    }
}

/// [`Transport`] backed by a reqwest connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(options: &TransportOptions) -> Result<Self> {
        let builder = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(options.timeout)
            .local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        if options.danger_accept_invalid_certs {
            log::warn!("[myra] TLS certificate verification is disabled");
        }
        #[cfg(any(feature = "native-tls", feature = "rustls"))]
        let builder = builder.danger_accept_invalid_certs(options.danger_accept_invalid_certs);

        let client = builder.build().map_err(|e| ApiError::Transport {
            detail: format!("Failed to create HTTP client: {e}"),
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &SignedRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());

        for (name, value) in &request.headers {
            log::debug!("[myra] {name}: {}", redact_header(name, value));
            builder = builder.header(name.as_str(), value.as_str());
        }

        if request.method != reqwest::Method::GET
            && let Some(body) = &request.body
        {
            builder = builder.body(body.clone());
        }

        HttpUtils::execute_request(builder, request.method.as_str(), &request.url).await
    }
}
