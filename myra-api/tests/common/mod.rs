//! Shared test fixtures: mock-server clients, a recording transport, envelope builders

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use myra_api::{ApiError, Credentials, MyraClient, RawResponse, SignedRequest, Transport};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Assert that a `Result` is `Err` and unwrap the error (fails the test otherwise).
#[macro_export]
macro_rules! require_err {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_err(), "expected Err(..), got {res:?}");
        let Err(err) = res else {
            return;
        };
        err
    }};
}

/// Client pointed at a wiremock server over plain HTTP, language `en`.
pub fn mock_client(server: &MockServer) -> MyraClient {
    MyraClient::builder(Credentials::new(API_KEY, API_SECRET))
        .scheme("http")
        .host(server.address().to_string())
        .language("en")
        .build()
        .unwrap()
}

/// Client whose requests go to a [`RecordingTransport`].
pub fn recording_client(transport: &Arc<RecordingTransport>) -> MyraClient {
    MyraClient::builder(Credentials::new(API_KEY, API_SECRET))
        .language("en")
        .transport(transport.clone())
        .build()
        .unwrap()
}

/// In-memory transport: replays queued responses and keeps every request it was given.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<SignedRequest>>,
}

impl RecordingTransport {
    pub fn new(responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<SignedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn uris(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.uri).collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: &SignedRequest) -> myra_api::Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport {
                detail: "no response queued".to_string(),
            })
    }
}

/// 200 response with a JSON body.
pub fn ok_json(body: &Value) -> RawResponse {
    RawResponse::new(200, body.to_string())
}

/// List page envelope.
pub fn page(count: u64, page_size: u64, list: Vec<Value>) -> Value {
    json!({
        "error": false,
        "count": count,
        "pageSize": page_size,
        "list": list
    })
}

/// DNS record as listed by the API.
pub fn dns_record(id: u64, record_type: &str, name: &str, value: &str, modified: &str) -> Value {
    json!({
        "id": id,
        "objectType": "DnsRecordVO",
        "recordType": record_type,
        "name": name,
        "value": value,
        "ttl": 300,
        "priority": 0,
        "enabled": true,
        "active": true,
        "created": "2023-06-01T12:00:00+0200",
        "modified": modified
    })
}

/// Successful update envelope.
pub fn updated(id: u64) -> Value {
    json!({"error": false, "targetObject": [{"id": id}]})
}

/// Application error envelope with one violation.
pub fn violation(message: &str, property_path: &str) -> Value {
    json!({
        "error": true,
        "violationList": [{"message": message, "propertyPath": property_path}]
    })
}
