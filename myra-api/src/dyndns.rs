//! Dynamic DNS update
//!
//! Points the A and AAAA records of one fully qualified name at new addresses. Records are
//! looked up by listing the whole domain; each update echoes the `modified` token that was
//! listed, so a record changed in between is rejected by the API instead of overwritten.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use crate::client::{CallOptions, MyraClient};
use crate::error::{ApiError, Result};
use crate::pagination::select_dns_records;
use crate::request::Operation;
use crate::types::{Action, DnsRecord, DnsRecordSelection, RecordType, Target};

/// TTL written with every update (seconds).
pub const DEFAULT_TTL: u32 = 300;

/// Body of a `dnsRecords` update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordUpdateBody<'a> {
    id: u64,
    value: String,
    name: &'a str,
    active: bool,
    enabled: bool,
    record_type: &'a str,
    ttl: u32,
    modified: &'a str,
}

/// One record write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub record_type: RecordType,
    pub id: u64,
    pub previous_value: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// A first, then AAAA.
    pub updates: Vec<RecordUpdate>,
}

pub struct DynDnsUpdater<'a> {
    client: &'a MyraClient,
    ttl: u32,
}

impl<'a> DynDnsUpdater<'a> {
    pub fn new(client: &'a MyraClient) -> Self {
        Self {
            client,
            ttl: DEFAULT_TTL,
        }
    }

    #[must_use]
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// A and AAAA records named `subdomain` within `domain`.
    pub async fn find_records(&self, domain: &str, subdomain: &str) -> Result<DnsRecordSelection> {
        let listed = self.client.list_all(Target::DnsRecords, domain).await?;
        let selection = select_dns_records(&listed.items, subdomain);

        if selection.is_empty() {
            return Err(ApiError::NoMatchingRecords {
                domain: domain.to_string(),
                subdomain: subdomain.to_string(),
            });
        }
        Ok(selection)
    }

    /// Write `ipv4` to the A record and `ipv6` to the AAAA record of `subdomain`.
    ///
    /// Both records must exist; nothing is written otherwise. The first failed write aborts.
    pub async fn update_addresses(
        &self,
        domain: &str,
        subdomain: &str,
        ipv4: Ipv4Addr,
        ipv6: Ipv6Addr,
    ) -> Result<UpdateReport> {
        let selection = self.find_records(domain, subdomain).await?;

        let a = require(&selection, &RecordType::A, subdomain)?;
        let aaaa = require(&selection, &RecordType::Aaaa, subdomain)?;

        let mut report = UpdateReport::default();
        for (record, value) in [(a, ipv4.to_string()), (aaaa, ipv6.to_string())] {
            report
                .updates
                .push(self.update_record(domain, subdomain, record, value).await?);
        }
        Ok(report)
    }

    async fn update_record(
        &self,
        domain: &str,
        subdomain: &str,
        record: &DnsRecord,
        value: String,
    ) -> Result<RecordUpdate> {
        let body = RecordUpdateBody {
            id: record.id,
            value,
            name: subdomain,
            active: true,
            enabled: true,
            record_type: record.record_type.as_str(),
            ttl: self.ttl,
            modified: &record.modified,
        };
        let payload = serde_json::to_value(&body).map_err(|e| ApiError::Serialization {
            detail: e.to_string(),
        })?;

        log::info!(
            "[myra] Updating {} record {} of '{subdomain}': {} -> {}",
            record.record_type,
            record.id,
            record.value,
            body.value
        );

        let operation =
            Operation::new(Target::DnsRecords, Action::Update, domain).with_payload(payload);
        self.client.call(&operation, &CallOptions::default()).await?;

        Ok(RecordUpdate {
            record_type: record.record_type.clone(),
            id: record.id,
            previous_value: record.value.clone(),
            value: body.value,
        })
    }
}

fn require<'s>(
    selection: &'s DnsRecordSelection,
    record_type: &RecordType,
    subdomain: &str,
) -> Result<&'s DnsRecord> {
    selection
        .get(record_type)
        .ok_or_else(|| ApiError::MissingRecordType {
            record_type: record_type.to_string(),
            subdomain: subdomain.to_string(),
        })
}
