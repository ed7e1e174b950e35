use async_trait::async_trait;

use crate::error::Result;
use crate::http_client::RawResponse;
use crate::request::SignedRequest;

/// Executes one signed HTTP request and hands back the raw status and body.
///
/// [`ReqwestTransport`](crate::ReqwestTransport) is the production implementation; tests
/// substitute in-memory recorders.
///
/// Implementations must not interpret the status code: a 404 or 500 is still `Ok`.
/// Only failures to complete the exchange (connect, TLS, timeout, body read) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &SignedRequest) -> Result<RawResponse>;
}
