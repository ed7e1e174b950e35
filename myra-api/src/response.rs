//! Response envelope interpretation
//!
//! Every endpoint answers with a JSON object. `error: true` marks an application error and
//! comes with a `violationList`; some endpoints omit `error` entirely on success.

use serde_json::Value;

use crate::error::{ApiError, Result, format_violations};
use crate::http_client::{HttpUtils, RawResponse};
use crate::types::{Action, Target, Violation};

/// Decoded API answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub http_status: u16,
    /// Whole decoded envelope, including `error` when present.
    pub body: Value,
    /// Only ever `true` when the call was made with `skip_errors`.
    pub is_application_error: bool,
    pub violations: Vec<Violation>,
}

impl ApiResponse {
    /// Top-level envelope field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }
}

/// Loose truthiness of the envelope's `error` field.
///
/// Booleans are taken as-is, numbers are true when non-zero, strings when non-empty and not `"0"`.
fn is_error_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        _ => false,
    }
}

fn parse_violations(body: &Value) -> Result<Vec<Violation>> {
    match body.get("violationList") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => {
            serde_json::from_value(list.clone()).map_err(|e| ApiError::MalformedResponse {
                detail: format!("violationList: {e}"),
            })
        }
    }
}

pub struct ResponseInterpreter;

impl ResponseInterpreter {
    /// Turn a raw exchange into an [`ApiResponse`].
    ///
    /// With `skip_errors`, an application error is logged and returned flagged instead of
    /// failing the call.
    pub fn interpret(
        raw: &RawResponse,
        target: Target,
        action: Action,
        skip_errors: bool,
    ) -> Result<ApiResponse> {
        if raw.status != 200 {
            log::error!("[myra] {target} {action} returned HTTP status {}", raw.status);
            return Err(ApiError::HttpStatus { status: raw.status });
        }

        let body: Value = HttpUtils::parse_json(&raw.body)?;

        if !is_error_flag(body.get("error")) {
            return Ok(ApiResponse {
                http_status: raw.status,
                body,
                is_application_error: false,
                violations: Vec::new(),
            });
        }

        let violations = parse_violations(&body)?;

        if !skip_errors {
            return Err(ApiError::Application {
                target: target.to_string(),
                action: action.to_string(),
                violations,
            });
        }

        log::warn!(
            "{}",
            format_violations(target.as_str(), action.as_str(), &violations)
        );
        Ok(ApiResponse {
            http_status: raw.status,
            body,
            is_application_error: true,
            violations,
        })
    }
}
