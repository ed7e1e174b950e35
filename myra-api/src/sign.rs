//! Myra request signature (`MYRA <apiKey>:<signature>`)
//!
//! ```text
//! signing_string = md5_hex(body) # METHOD # uri # content_type # date
//! date_key       = hex(HMAC-SHA256("MYRA" + secret, date))
//! signing_key    = hex(HMAC-SHA256(date_key, "myra-api-request"))
//! signature      = base64(HMAC-SHA512(signing_key, signing_string))
//! ```
//!
//! Both intermediate keys are used as their lowercase hex text, not as raw digest bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::{Sha256, Sha512};

use crate::utils::log_sanitizer::truncate_for_log;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Content type every request is sent and signed with.
pub const CONTENT_TYPE: &str = "application/json";

/// Salt prepended to the API secret for the date key.
const SECRET_PREFIX: &str = "MYRA";

/// Fixed message of the second derivation step.
const SIGNING_KEY_MESSAGE: &str = "myra-api-request";

/// `YYYY-MM-DDTHH:MM:SS+HH:MM`
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Timestamp of a single request.
///
/// Generated once and shared by the signature and the `Date` header, so both always
/// carry the same second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDate(String);

impl RequestDate {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(DATE_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[allow(clippy::expect_used)]
fn hmac_sha256_hex(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

#[allow(clippy::expect_used)]
fn hmac_sha512(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Build the canonical string the signature is computed over.
///
/// An absent body hashes like the empty string.
pub fn signing_string(
    method: &str,
    uri: &str,
    body: Option<&str>,
    content_type: &str,
    date: &RequestDate,
) -> String {
    let body_hash = hex::encode(Md5::digest(body.unwrap_or_default().as_bytes()));
    format!(
        "{body_hash}#{method}#{uri}#{content_type}#{}",
        date.as_str()
    )
}

/// Compute the base64 request signature.
pub fn sign(
    secret: &str,
    method: &str,
    uri: &str,
    body: Option<&str>,
    content_type: &str,
    date: &RequestDate,
) -> String {
    let canonical = signing_string(method, uri, body, content_type, date);
    log::debug!("SigningString: {}", truncate_for_log(&canonical));

    let date_key = hmac_sha256_hex(
        format!("{SECRET_PREFIX}{secret}").as_bytes(),
        date.as_str().as_bytes(),
    );
    let signing_key = hmac_sha256_hex(date_key.as_bytes(), SIGNING_KEY_MESSAGE.as_bytes());
    let signature = hmac_sha512(signing_key.as_bytes(), canonical.as_bytes());

    BASE64.encode(signature)
}

/// `Authorization` header value.
pub fn authorization_header(api_key: &str, signature: &str) -> String {
    format!("MYRA {api_key}:{signature}")
}
