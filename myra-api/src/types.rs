use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

// ============ Targets & Actions ============

/// Resource endpoint exposed by the Myra API.
///
/// The set is closed: anything else is rejected with [`ApiError::UnsupportedTarget`]
/// before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    CacheClear,
    CacheSettings,
    Certificates,
    DnsRecords,
    Domains,
    ErrorPages,
    IpFilter,
    Maintenance,
    Networks,
    Permissions,
    Redirects,
    Statistic,
    StatisticQuery,
    SubdomainSetting,
    Tag,
    Waf,
    WafRule,
    WafRules,
    WafRulesDomain,
}

impl Target {
    /// Every supported target, in path-segment order.
    pub const ALL: [Self; 19] = [
        Self::CacheClear,
        Self::CacheSettings,
        Self::Certificates,
        Self::DnsRecords,
        Self::Domains,
        Self::ErrorPages,
        Self::IpFilter,
        Self::Maintenance,
        Self::Networks,
        Self::Permissions,
        Self::Redirects,
        Self::Statistic,
        Self::StatisticQuery,
        Self::SubdomainSetting,
        Self::Tag,
        Self::Waf,
        Self::WafRule,
        Self::WafRules,
        Self::WafRulesDomain,
    ];

    /// Path segment used in the request URI.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CacheClear => "cacheClear",
            Self::CacheSettings => "cacheSettings",
            Self::Certificates => "certificates",
            Self::DnsRecords => "dnsRecords",
            Self::Domains => "domains",
            Self::ErrorPages => "errorpages",
            Self::IpFilter => "ipfilter",
            Self::Maintenance => "maintenance",
            Self::Networks => "networks",
            Self::Permissions => "permissions",
            Self::Redirects => "redirects",
            Self::Statistic => "statistic",
            Self::StatisticQuery => "statistic/query",
            Self::SubdomainSetting => "subdomainSetting",
            Self::Tag => "tag",
            Self::Waf => "waf",
            Self::WafRule => "waf/rule",
            Self::WafRules => "waf/rules",
            Self::WafRulesDomain => "waf/rules/domain",
        }
    }
}

impl FromStr for Target {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| ApiError::UnsupportedTarget {
                target: s.to_string(),
            })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD-style verb of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    List,
    Delete,
    Query,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::List => "list",
            Self::Delete => "delete",
            Self::Query => "query",
        }
    }

    /// HTTP method the API expects for this action.
    pub fn http_method(self) -> reqwest::Method {
        match self {
            Self::Create => reqwest::Method::PUT,
            Self::Update | Self::Query => reqwest::Method::POST,
            Self::List => reqwest::Method::GET,
            Self::Delete => reqwest::Method::DELETE,
        }
    }

    /// List requests never carry a body.
    pub const fn carries_payload(self) -> bool {
        !matches!(self, Self::List)
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "list" => Ok(Self::List),
            "delete" => Ok(Self::Delete),
            "query" => Ok(Self::Query),
            _ => Err(ApiError::UnsupportedAction {
                action: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Response Envelope ============

/// One entry of the envelope's `violationList`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Human-readable message, localized per the client language.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// Request field the violation refers to.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub property_path: String,
}

/// `null` decodes like a missing string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============ Pagination ============

/// Items aggregated across every page of a list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Items in provider order, page 1 first.
    pub items: Vec<T>,
    /// `count` reported by the first page.
    pub total_count: u64,
    /// `pageSize` reported by the first page.
    pub page_size: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_size: u64) -> Self {
        Self {
            items,
            total_count,
            page_size,
        }
    }

    /// Number of pages needed to cover `total_count`. Zero when there is nothing to list.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }
}

// ============ DNS Records ============

/// DNS record type as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    /// Any other type (CNAME, MX, TXT, ...), kept verbatim.
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            _ => Self::Other(s),
        }
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DNS record as listed by the `dnsRecords` endpoint.
///
/// `modified` is the optimistic-concurrency token: an update must echo the value last
/// observed, otherwise the API rejects the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub id: u64,
    pub record_type: RecordType,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, deserialize_with = "lenient_ttl")]
    pub ttl: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub active: bool,
    pub modified: String,
}

/// TTL listed as a number or a numeric string; `null` counts as 0.
fn lenient_ttl<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ttl {
        Number(u32),
        Text(String),
    }

    match Option::<Ttl>::deserialize(deserializer)? {
        Some(Ttl::Number(ttl)) => Ok(ttl),
        Some(Ttl::Text(s)) => s
            .trim()
            .parse()
            .map_err(|e| Error::custom(format!("invalid ttl '{s}': {e}"))),
        None => Ok(0),
    }
}

/// The A and AAAA records found for one fully qualified name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecordSelection {
    pub a: Option<DnsRecord>,
    pub aaaa: Option<DnsRecord>,
}

impl DnsRecordSelection {
    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.aaaa.is_none()
    }

    pub fn get(&self, record_type: &RecordType) -> Option<&DnsRecord> {
        match record_type {
            RecordType::A => self.a.as_ref(),
            RecordType::Aaaa => self.aaaa.as_ref(),
            RecordType::Other(_) => None,
        }
    }
}

// ============ Redirects ============

/// Redirect rule of a subdomain, projected to the fields operators work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub created: String,
    pub destination: String,
    pub enabled: bool,
    pub id: u64,
    pub matching_type: String,
    pub modified: String,
    pub object_type: String,
    pub sort: i64,
    pub source: String,
    pub sub_domain_name: String,
    /// `"301"` for permanent redirects, `"302"` otherwise.
    #[serde(rename = "type")]
    pub redirect_type: String,
}
