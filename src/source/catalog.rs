//! Instance-catalog source with mirror fallback.
//!
//! Tries a list of mirrors in priority order and keeps the first that
//! yields records. Mirrors disagree on shape (object keyed by instance id
//! vs. plain array) and on the processor field name; both are normalized
//! here, at the boundary.

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::http::HttpClient;
use crate::vendor::{self, CpuVendor};

use super::FetchReport;

/// Catalog mirrors tried in order.
pub const DEFAULT_CATALOG_MIRRORS: [&str; 2] = [
    "https://ec2instances.info/instances.json",
    "https://raw.githubusercontent.com/powdahound/ec2instances.info/master/www/instances.json",
];

/// Field names that may carry the processor description.
const PROCESSOR_FIELDS: [&str; 2] = ["processor", "Processor"];

/// One instance record: the source fields as-is plus the vendor
/// classified from its processor description.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    pub vendor: CpuVendor,
    pub fields: Map<String, Value>,
}

/// Instance catalog source with ordered mirror fallback.
pub struct CatalogSource {
    http: HttpClient,
}

impl CatalogSource {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Tries each mirror in order and returns the records of the first
    /// one that yields a non-empty normalized sequence. A failing or
    /// empty mirror is logged and the next one is tried; exhausting all
    /// mirrors reports "no data available" rather than an error.
    #[tracing::instrument(skip(self, urls))]
    pub async fn fetch_instances(&self, urls: &[String]) -> FetchReport<CatalogRecord> {
        for url in urls {
            debug!("Trying catalog mirror {}...", url);

            let body: Value = match self.http.get_json(url).await {
                Ok(body) => body,
                Err(err) => {
                    warn!("Catalog mirror {} failed: {}", url, err);
                    continue;
                }
            };

            let Some(instances) = normalize(body) else {
                warn!("Catalog mirror {} returned an unexpected shape", url);
                continue;
            };
            if instances.is_empty() {
                warn!("Catalog mirror {} returned no records", url);
                continue;
            }

            let records: Vec<CatalogRecord> = instances.into_iter().map(classify_record).collect();
            info!("Instance catalog records collected: {}", records.len());
            return FetchReport::complete(records);
        }

        warn!("No instance catalog data available from any mirror");
        FetchReport::degraded(Vec::new(), "no data available")
    }
}

/// Normalizes the two body shapes a mirror may serve into one sequence:
/// an object keyed by instance id yields its values, an array its
/// elements. Non-object entries are dropped; any other top-level shape is
/// unexpected.
fn normalize(body: Value) -> Option<Vec<Map<String, Value>>> {
    let entries: Vec<Value> = match body {
        Value::Object(map) => map.into_iter().map(|(_, value)| value).collect(),
        Value::Array(items) => items,
        _ => return None,
    };
    Some(
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(fields) => Some(fields),
                _ => None,
            })
            .collect(),
    )
}

/// Attaches the vendor classified from whichever processor field the
/// record carries; Unknown when neither is present.
fn classify_record(fields: Map<String, Value>) -> CatalogRecord {
    let vendor = PROCESSOR_FIELDS
        .iter()
        .find_map(|name| fields.get(*name))
        .map(vendor::classify_value)
        .unwrap_or(CpuVendor::Unknown);
    CatalogRecord { vendor, fields }
}
