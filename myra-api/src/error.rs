use serde::{Deserialize, Serialize};

use crate::types::Violation;

/// Unified error type for all Myra API operations.
///
/// Configuration errors (unsupported target or action, missing credentials) are raised before
/// any request leaves the process. Transport and protocol errors are surfaced as soon as they
/// occur; nothing is retried. All variants are serializable for structured error reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// The target name is not one of the whitelisted API resources.
    UnsupportedTarget {
        /// The rejected target string.
        target: String,
    },

    /// The action name is not one of `create`, `update`, `list`, `delete`, `query`.
    UnsupportedAction {
        /// The rejected action string.
        action: String,
    },

    /// A network-level error occurred (connection refused, TLS failure, DNS resolution, etc.).
    Transport {
        /// Error details.
        detail: String,
    },

    /// The HTTP request did not complete within the transport timeout.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API answered with a status other than 200.
    ///
    /// The response body is not decoded in this case.
    HttpStatus {
        /// HTTP status code returned by the API.
        status: u16,
    },

    /// The response body was not valid JSON, or lacked fields the operation depends on.
    MalformedResponse {
        /// Details about the decode failure.
        detail: String,
    },

    /// The response envelope had `error` set.
    Application {
        /// Target of the failed call.
        target: String,
        /// Action of the failed call.
        action: String,
        /// Every violation reported by the API, in response order.
        violations: Vec<Violation>,
    },

    /// Failed to serialize a request payload.
    Serialization {
        /// Details about the serialization failure.
        detail: String,
    },

    /// No A or AAAA record with the given name exists in the domain.
    NoMatchingRecords {
        /// Domain whose records were listed.
        domain: String,
        /// Fully qualified record name that was looked for.
        subdomain: String,
    },

    /// One of the record types required for an update is absent.
    MissingRecordType {
        /// `A` or `AAAA`.
        record_type: String,
        /// Fully qualified record name that was looked for.
        subdomain: String,
    },

    /// The redirect listing for a subdomain came back empty.
    NoRedirects {
        /// Subdomain whose redirects were listed.
        subdomain: String,
    },

    /// A credential file could not be read or was empty.
    MissingCredential {
        /// Path of the credential file.
        path: String,
    },

    /// A caller-supplied argument is invalid (e.g., malformed IP address).
    InvalidArgument {
        /// Name of the invalid argument.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },
}

impl ApiError {
    /// Whether the error stems from caller input or a definitive API answer rather than
    /// an infrastructure fault. Used to pick the log level.
    ///
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedTarget { .. }
                | Self::UnsupportedAction { .. }
                | Self::Application { .. }
                | Self::NoMatchingRecords { .. }
                | Self::MissingRecordType { .. }
                | Self::NoRedirects { .. }
                | Self::MissingCredential { .. }
                | Self::InvalidArgument { .. }
        )
    }
}

/// Render the violation block the API operators are used to reading:
///
/// ```text
/// [ERROR] dnsRecords update
/// Message: required
/// Path:    value
/// ```
pub fn format_violations(target: &str, action: &str, violations: &[Violation]) -> String {
    let mut out = format!("[ERROR] {target} {action}");
    for violation in violations {
        out.push_str("\nMessage: ");
        out.push_str(&violation.message);
        out.push_str("\nPath:    ");
        out.push_str(&violation.property_path);
    }
    out
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedTarget { target } => {
                write!(f, "[myra] Unsupported target: {target}")
            }
            Self::UnsupportedAction { action } => {
                write!(f, "[myra] Unsupported action: {action}")
            }
            Self::Transport { detail } => write!(f, "[myra] Transport error: {detail}"),
            Self::Timeout { detail } => write!(f, "[myra] Request timeout: {detail}"),
            Self::HttpStatus { status } => {
                write!(f, "[myra] API call returned HTTP status: {status}")
            }
            Self::MalformedResponse { detail } => {
                write!(f, "[myra] Malformed response: {detail}")
            }
            Self::Application {
                target,
                action,
                violations,
            } => f.write_str(&format_violations(target, action, violations)),
            Self::Serialization { detail } => {
                write!(f, "[myra] Serialization error: {detail}")
            }
            Self::NoMatchingRecords { domain, subdomain } => {
                write!(
                    f,
                    "[myra] No A/AAAA records named '{subdomain}' in domain '{domain}'"
                )
            }
            Self::MissingRecordType {
                record_type,
                subdomain,
            } => {
                write!(f, "[myra] No {record_type} record named '{subdomain}'")
            }
            Self::NoRedirects { subdomain } => {
                write!(f, "[myra] No redirects for '{subdomain}' found")
            }
            Self::MissingCredential { path } => {
                write!(f, "[myra] Missing credential: cannot read '{path}'")
            }
            Self::InvalidArgument { param, detail } => {
                write!(f, "[myra] Invalid argument '{param}': {detail}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Result type alias for Myra API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
