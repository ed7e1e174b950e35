//! # myra-api
//!
//! Client for the Myra Security API: DNS records, redirects, caching, WAF and the other
//! domain settings exposed under `/<lang>/rapi/`.
//!
//! Each request is signed with a per-request HMAC chain derived from the API secret and the
//! request timestamp (see [`sign`]). Responses are JSON envelopes; an envelope with `error: true`
//! becomes [`ApiError::Application`] carrying every reported violation.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use myra_api::{Action, CallOptions, Credentials, MyraClient, Operation, Target};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MyraClient::new(Credentials::new("api-key", "api-secret"))?;
//!
//!     // Every DNS record of a domain, across all pages
//!     let records = client.list_all(Target::DnsRecords, "example.com").await?;
//!     println!("{} records", records.items.len());
//!
//!     // A single call
//!     let op = Operation::new(Target::CacheClear, Action::Create, "example.com")
//!         .with_payload(serde_json::json!({"fqdn": "www.example.com", "resource": "/*"}));
//!     client.call(&op, &CallOptions::default()).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Dynamic DNS
//!
//! ```rust,no_run
//! # use myra_api::*;
//! # async fn example(client: MyraClient) -> Result<()> {
//! let report = DynDnsUpdater::new(&client)
//!     .update_addresses(
//!         "example.com",
//!         "media.example.com",
//!         "192.0.2.10".parse().unwrap(),
//!         "2001:db8::10".parse().unwrap(),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ApiError>`](ApiError). Nothing is retried: transport
//! failures, non-200 statuses and application errors surface on the first occurrence.

mod client;
mod credentials;
mod dyndns;
mod error;
mod http_client;
mod pagination;
mod request;
mod response;
pub mod sign;
mod traits;
mod types;
mod utils;

pub use client::{
    CallOptions, DEFAULT_API_HOST, DEFAULT_LANGUAGE, DEFAULT_SCHEME, MyraClient,
    MyraClientBuilder,
};
pub use credentials::{Credentials, FileCredentialSource};
pub use dyndns::{DEFAULT_TTL, DynDnsUpdater, RecordUpdate, UpdateReport};
pub use error::{ApiError, Result, format_violations};
pub use http_client::{RawResponse, ReqwestTransport, TransportOptions};
pub use pagination::{project_redirect, select_dns_records};
pub use request::{Operation, RequestBuilder, SignedRequest};
pub use response::{ApiResponse, ResponseInterpreter};
pub use sign::RequestDate;
pub use traits::Transport;
pub use types::{
    Action, DnsRecord, DnsRecordSelection, PagedResult, RecordType, Redirect, Target, Violation,
};
