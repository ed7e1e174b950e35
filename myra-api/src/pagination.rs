//! List aggregation across pages, and projections of listed items
//!
//! List endpoints take the page number as the last scope segment (`example.com/2`) and
//! report `count` and `pageSize` on every page.

use serde::Deserialize;
use serde_json::Value;

use crate::client::{CallOptions, MyraClient};
use crate::error::{ApiError, Result};
use crate::request::Operation;
use crate::types::{
    Action, DnsRecord, DnsRecordSelection, PagedResult, RecordType, Redirect, Target,
};

fn page_scope(scope: &str, page: u64) -> String {
    if scope.is_empty() {
        page.to_string()
    } else {
        format!("{scope}/{page}")
    }
}

/// Non-negative integer field of the envelope. Numeric strings are accepted.
fn envelope_count(body: &Value, field: &str) -> Result<u64> {
    let value = body.get(field).ok_or_else(|| ApiError::MalformedResponse {
        detail: format!("missing '{field}' in list response"),
    })?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| ApiError::MalformedResponse {
            detail: format!("'{field}' is not a non-negative integer: {value}"),
        })
}

/// `ceil(count / page_size)`.
pub(crate) fn page_count(total_count: u64, page_size: u64) -> Result<u64> {
    match (total_count, page_size) {
        (0, _) => Ok(0),
        (_, 0) => Err(ApiError::MalformedResponse {
            detail: format!("pageSize is 0 but count is {total_count}"),
        }),
        _ => Ok(total_count.div_ceil(page_size)),
    }
}

/// Take the `list` array out of a page envelope.
fn page_items(body: Value, page: u64) -> Vec<Value> {
    let list = match body {
        Value::Object(mut map) => map.remove("list"),
        _ => None,
    };
    match list {
        Some(Value::Array(items)) => items,
        _ => {
            log::warn!("[myra] Page {page} has no 'list' array, treating it as empty");
            Vec::new()
        }
    }
}

impl MyraClient {
    /// Fetch every page of a list endpoint and concatenate the items in provider order.
    ///
    /// Page 1 is read first to learn `count` and `pageSize`; it is not requested again, so a
    /// listing costs `max(1, pages)` requests.
    /// Application errors always fail the listing.
    pub async fn list_all(&self, target: Target, scope: &str) -> Result<PagedResult<Value>> {
        let scope = scope.trim_end_matches('/');
        let options = CallOptions::default();

        let first = self
            .call(
                &Operation::new(target, Action::List, page_scope(scope, 1)),
                &options,
            )
            .await?;
        let total_count = envelope_count(&first.body, "count")?;
        let page_size = envelope_count(&first.body, "pageSize")?;
        let pages = page_count(total_count, page_size)?;

        log::debug!(
            "[myra] {target} '{scope}': {total_count} items, pageSize {page_size}, {pages} pages"
        );

        let mut items = Vec::new();
        if pages == 0 {
            return Ok(PagedResult::new(items, total_count, page_size));
        }

        items.extend(page_items(first.body, 1));
        for page in 2..=pages {
            let response = self
                .call(
                    &Operation::new(target, Action::List, page_scope(scope, page)),
                    &options,
                )
                .await?;
            items.extend(page_items(response.body, page));
        }

        Ok(PagedResult::new(items, total_count, page_size))
    }

    /// Every redirect of a subdomain. An empty listing is an error.
    pub async fn list_redirects(&self, subdomain: &str) -> Result<Vec<Redirect>> {
        let listed = self.list_all(Target::Redirects, subdomain).await?;
        let redirects = listed
            .items
            .iter()
            .map(project_redirect)
            .collect::<Result<Vec<_>>>()?;

        if redirects.is_empty() {
            return Err(ApiError::NoRedirects {
                subdomain: subdomain.to_string(),
            });
        }
        Ok(redirects)
    }
}

/// Pick the A and AAAA records named exactly `subdomain`.
///
/// When a type occurs more than once, the last one listed wins.
pub fn select_dns_records(items: &[Value], subdomain: &str) -> DnsRecordSelection {
    let mut selection = DnsRecordSelection::default();

    for item in items {
        let is_address_record = matches!(
            item.get("recordType").and_then(Value::as_str),
            Some("A" | "AAAA")
        );
        if !is_address_record || item.get("name").and_then(Value::as_str) != Some(subdomain) {
            continue;
        }

        let record = match DnsRecord::deserialize(item) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("[myra] Skipping unreadable record for '{subdomain}': {e}");
                continue;
            }
        };

        let slot = match record.record_type {
            RecordType::A => &mut selection.a,
            RecordType::Aaaa => &mut selection.aaaa,
            RecordType::Other(_) => continue,
        };
        let (record_type, id) = (record.record_type.clone(), record.id);
        if let Some(previous) = slot.replace(record) {
            log::warn!(
                "[myra] Duplicate {record_type} record for '{subdomain}': {id} replaces {}",
                previous.id
            );
        }
    }

    selection
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedRedirect {
    id: u64,
    #[serde(default)]
    created: String,
    #[serde(default)]
    destination: String,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    matching_type: String,
    #[serde(default)]
    modified: String,
    #[serde(default)]
    object_type: String,
    #[serde(default)]
    sort: i64,
    #[serde(default)]
    source: String,
    #[serde(default)]
    sub_domain_name: String,
    #[serde(default, rename = "type")]
    redirect_type: String,
}

/// Project a listed redirect; `permanent` becomes `"301"`, anything else `"302"`.
pub fn project_redirect(item: &Value) -> Result<Redirect> {
    let listed = ListedRedirect::deserialize(item).map_err(|e| ApiError::MalformedResponse {
        detail: format!("redirect: {e}"),
    })?;

    let redirect_type = if listed.redirect_type == "permanent" {
        "301"
    } else {
        "302"
    };

    Ok(Redirect {
        created: listed.created,
        destination: listed.destination,
        enabled: listed.enabled,
        id: listed.id,
        matching_type: listed.matching_type,
        modified: listed.modified,
        object_type: listed.object_type,
        sort: listed.sort,
        source: listed.source,
        sub_domain_name: listed.sub_domain_name,
        redirect_type: redirect_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(id: u64, record_type: &str, name: &str, value: &str) -> Value {
        json!({
            "id": id,
            "recordType": record_type,
            "name": name,
            "value": value,
            "ttl": 300,
            "enabled": true,
            "active": true,
            "modified": format!("2024-01-0{id}T00:00:00+0100")
        })
    }

    // ============ Page arithmetic ============

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 50).unwrap(), 0);
        assert_eq!(page_count(1, 50).unwrap(), 1);
        assert_eq!(page_count(100, 50).unwrap(), 2);
        assert_eq!(page_count(101, 50).unwrap(), 3);
    }

    #[test]
    fn page_count_zero_page_size() {
        assert_eq!(page_count(0, 0).unwrap(), 0);
        assert!(matches!(
            page_count(3, 0).unwrap_err(),
            ApiError::MalformedResponse { .. }
        ));
    }

    #[test]
    fn page_scope_appends_page() {
        assert_eq!(page_scope("example.com", 2), "example.com/2");
        assert_eq!(page_scope("", 1), "1");
    }

    #[test]
    fn envelope_count_accepts_numeric_strings() {
        let body = json!({"count": "12", "pageSize": 50});
        assert_eq!(envelope_count(&body, "count").unwrap(), 12);
        assert_eq!(envelope_count(&body, "pageSize").unwrap(), 50);
    }

    #[test]
    fn envelope_count_rejects_missing_and_negative() {
        let body = json!({"count": -1});
        assert!(envelope_count(&body, "count").is_err());
        assert!(envelope_count(&body, "pageSize").is_err());
    }

    #[test]
    fn page_without_list_is_empty() {
        assert!(page_items(json!({"error": false}), 1).is_empty());
        assert_eq!(page_items(json!({"list": [1, 2]}), 1), vec![json!(1), json!(2)]);
    }

    // ============ DNS record selection ============

    #[test]
    fn selects_a_and_aaaa_for_exact_name() {
        let items = vec![
            record(1, "A", "media.example.com", "192.0.2.1"),
            record(2, "AAAA", "media.example.com", "2001:db8::1"),
            record(3, "A", "www.example.com", "192.0.2.9"),
            record(4, "CNAME", "media.example.com", "example.com"),
        ];
        let selection = select_dns_records(&items, "media.example.com");
        assert_eq!(selection.a.as_ref().map(|r| r.id), Some(1));
        assert_eq!(selection.aaaa.as_ref().map(|r| r.id), Some(2));
    }

    #[test]
    fn name_match_is_exact() {
        let items = vec![record(1, "A", "media.example.com.", "192.0.2.1")];
        assert!(select_dns_records(&items, "media.example.com").is_empty());
    }

    #[test]
    fn last_duplicate_wins() {
        let items = vec![
            record(1, "A", "media.example.com", "192.0.2.1"),
            record(5, "A", "media.example.com", "192.0.2.5"),
        ];
        let selection = select_dns_records(&items, "media.example.com");
        let a = selection.a.unwrap();
        assert_eq!(a.id, 5);
        assert_eq!(a.value, "192.0.2.5");
        assert!(selection.aaaa.is_none());
    }

    #[test]
    fn string_ttl_record_selected() {
        let mut listed = record(3, "A", "media.example.com", "192.0.2.3");
        listed["ttl"] = json!("300");
        let selection = select_dns_records(&[listed], "media.example.com");
        assert_eq!(selection.a.map(|r| r.ttl), Some(300));
    }

    #[test]
    fn unreadable_candidate_skipped() {
        let items = vec![
            json!({"recordType": "A", "name": "media.example.com"}),
            record(2, "AAAA", "media.example.com", "2001:db8::1"),
        ];
        let selection = select_dns_records(&items, "media.example.com");
        assert!(selection.a.is_none());
        assert!(selection.aaaa.is_some());
    }

    // ============ Redirect projection ============

    #[test]
    fn permanent_redirect_is_301() {
        let item = json!({
            "id": 7,
            "created": "2024-01-01T00:00:00+0100",
            "modified": "2024-01-02T00:00:00+0100",
            "objectType": "RedirectVO",
            "source": "/old",
            "destination": "/new",
            "type": "permanent",
            "matchingType": "exact",
            "subDomainName": "www.example.com",
            "enabled": true,
            "sort": 2
        });
        let redirect = project_redirect(&item).unwrap();
        assert_eq!(redirect.redirect_type, "301");
        assert_eq!(redirect.object_type, "RedirectVO");
        assert_eq!(redirect.sort, 2);
    }

    #[test]
    fn other_redirect_types_are_302() {
        let redirect = project_redirect(&json!({"id": 8, "type": "redirect"})).unwrap();
        assert_eq!(redirect.redirect_type, "302");
        let redirect = project_redirect(&json!({"id": 9})).unwrap();
        assert_eq!(redirect.redirect_type, "302");
    }

    #[test]
    fn redirect_without_id_is_malformed() {
        assert!(matches!(
            project_redirect(&json!({"type": "permanent"})).unwrap_err(),
            ApiError::MalformedResponse { .. }
        ));
    }

    #[test]
    fn redirect_serializes_type_key() {
        let redirect = project_redirect(&json!({"id": 1, "type": "permanent"})).unwrap();
        let json = serde_json::to_value(&redirect).unwrap();
        assert_eq!(json["type"], "301");
        assert_eq!(json["subDomainName"], "");
    }
}
