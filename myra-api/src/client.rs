//! Myra API client

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::http_client::{ReqwestTransport, TransportOptions};
use crate::request::{Operation, RequestBuilder};
use crate::response::{ApiResponse, ResponseInterpreter};
use crate::sign::RequestDate;
use crate::traits::Transport;

/// Myra API host.
pub const DEFAULT_API_HOST: &str = "app.myracloud.com";
/// Language of API messages (violations are localized).
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SCHEME: &str = "https";

/// Per-call switches.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Log application errors and return the flagged response instead of failing.
    pub skip_errors: bool,
    /// Sent after the generated headers. Names colliding with a generated header are dropped.
    pub extra_headers: Vec<(String, String)>,
}

impl CallOptions {
    pub fn skip_errors() -> Self {
        Self {
            skip_errors: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}

/// Entry point to the Myra API.
///
/// Every operation runs its HTTP round-trips one after another; nothing is retried or cached.
///
/// # Construction
///
/// ```rust,no_run
/// use myra_api::{Credentials, MyraClient};
///
/// # fn example() -> myra_api::Result<()> {
/// let client = MyraClient::builder(Credentials::new("api-key", "api-secret"))
///     .language("de")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct MyraClient {
    pub(crate) requests: RequestBuilder,
    pub(crate) transport: Arc<dyn Transport>,
}

/// Builder for [`MyraClient`].
pub struct MyraClientBuilder {
    credentials: Credentials,
    scheme: String,
    host: String,
    language: String,
    transport_options: TransportOptions,
    transport: Option<Arc<dyn Transport>>,
}

impl MyraClientBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_API_HOST.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            transport_options: TransportOptions::default(),
            transport: None,
        }
    }

    /// API host, optionally with port (default: `app.myracloud.com`).
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// URL scheme (default: `https`).
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Language path segment (default: `en`).
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Per-request timeout (default: 20s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_options.timeout = timeout;
        self
    }

    /// Disable TLS certificate verification.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.transport_options.danger_accept_invalid_certs = accept;
        self
    }

    /// Replace the reqwest transport. Timeout and TLS settings are then ignored.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<MyraClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.transport_options)?),
        };
        Ok(MyraClient {
            requests: RequestBuilder::new(self.credentials, self.scheme, self.host, self.language),
            transport,
        })
    }
}

impl MyraClient {
    /// Creates a client for the production API with default settings.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(credentials: Credentials) -> MyraClientBuilder {
        MyraClientBuilder::new(credentials)
    }

    /// Sign, send and interpret one operation.
    pub async fn call(&self, operation: &Operation, options: &CallOptions) -> Result<ApiResponse> {
        log::debug!(
            "[myra] {} {} '{}'",
            operation.target,
            operation.action,
            operation.scope
        );
        let date = RequestDate::now();
        let request = self
            .requests
            .build(operation, &options.extra_headers, &date)?;
        let raw = self.transport.execute(&request).await?;
        ResponseInterpreter::interpret(&raw, operation.target, operation.action, options.skip_errors)
    }

    /// [`call`](Self::call) with untyped target and action names.
    ///
    /// Unknown names fail before anything is sent.
    pub async fn call_named(
        &self,
        target: &str,
        action: &str,
        scope: &str,
        payload: Option<Value>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let mut operation = Operation::parse(target, action, scope)?;
        operation.payload = payload;
        self.call(&operation, options).await
    }
}
