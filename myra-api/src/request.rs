//! Operation → signed HTTP request

use serde_json::Value;

use crate::credentials::Credentials;
use crate::error::{ApiError, Result};
use crate::sign::{CONTENT_TYPE, RequestDate, authorization_header, sign};
use crate::types::{Action, Target};
use crate::utils::log_sanitizer::redact_header;

/// One logical API call: what to do, on which resource, with which payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub target: Target,
    pub action: Action,
    /// Path below the target, e.g. `example.com` or `example.com/2`.
    pub scope: String,
    pub payload: Option<Value>,
}

impl Operation {
    pub fn new(target: Target, action: Action, scope: impl Into<String>) -> Self {
        Self {
            target,
            action,
            scope: scope.into(),
            payload: None,
        }
    }

    /// Build an operation from untyped target/action names.
    ///
    /// The target is validated first, so an unknown target wins over an unknown action.
    pub fn parse(target: &str, action: &str, scope: impl Into<String>) -> Result<Self> {
        let target = target.parse::<Target>()?;
        let action = action.parse::<Action>()?;
        Ok(Self::new(target, action, scope))
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Fully prepared request, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: reqwest::Method,
    /// Canonical path the signature covers.
    pub uri: String,
    pub url: String,
    pub body: Option<String>,
    /// Generated headers first, caller extras after.
    pub headers: Vec<(String, String)>,
}

impl SignedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Turns [`Operation`]s into [`SignedRequest`]s for one API endpoint and key pair.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    credentials: Credentials,
    scheme: String,
    host: String,
    language: String,
}

impl RequestBuilder {
    pub fn new(
        credentials: Credentials,
        scheme: impl Into<String>,
        host: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            scheme: scheme.into(),
            host: host.into(),
            language: language.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `/<language>/rapi/<target>/<scope>` without trailing slashes.
    pub fn uri(&self, target: Target, scope: &str) -> String {
        format!("/{}/rapi/{}/{scope}", self.language, target.as_str())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn build(
        &self,
        operation: &Operation,
        extra_headers: &[(String, String)],
        date: &RequestDate,
    ) -> Result<SignedRequest> {
        let method = operation.action.http_method();
        let uri = self.uri(operation.target, &operation.scope);

        let body = if operation.action.carries_payload() {
            operation
                .payload
                .as_ref()
                .filter(|payload| !payload.is_null())
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| ApiError::Serialization {
                    detail: e.to_string(),
                })?
        } else {
            None
        };

        let signature = sign(
            self.credentials.api_secret(),
            method.as_str(),
            &uri,
            body.as_deref(),
            CONTENT_TYPE,
            date,
        );

        let mut headers = vec![
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            (
                "Content-Length".to_string(),
                body.as_deref().map_or(0, str::len).to_string(),
            ),
            ("Host".to_string(), self.host.clone()),
            ("Date".to_string(), date.as_str().to_string()),
            (
                "Authorization".to_string(),
                authorization_header(self.credentials.api_key(), &signature),
            ),
        ];
        let generated = headers.len();

        for (name, value) in extra_headers {
            if headers[..generated]
                .iter()
                .any(|(existing, _)| existing.eq_ignore_ascii_case(name))
            {
                log::warn!(
                    "Ignoring extra header '{name}: {}', it would override a signed header",
                    redact_header(name, value)
                );
                continue;
            }
            headers.push((name.clone(), value.clone()));
        }

        Ok(SignedRequest {
            url: format!("{}://{}{uri}", self.scheme, self.host),
            method,
            uri,
            body,
            headers,
        })
    }
}
