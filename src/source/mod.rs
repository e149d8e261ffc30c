//! Data sources for VM pricing and capability records.
//!
//! Both sources share one [`HttpClient`](crate::http::HttpClient) session
//! and report best-effort outcomes: a fetch never fails outright, it
//! returns whatever was collected plus the reason it stopped early.

mod catalog;
mod retail;

pub use catalog::{CatalogRecord, CatalogSource, DEFAULT_CATALOG_MIRRORS};
pub use retail::{DEFAULT_PRICING_URL, DEFAULT_SERIES_PREFIXES, RetailSource};

use serde::Serialize;

use crate::vendor::CpuVendor;

/// Outcome of a best-effort fetch.
#[derive(Debug)]
pub struct FetchReport<T> {
    /// Records collected before the source ended or gave up.
    pub records: Vec<T>,
    /// Why collection stopped early, if it did.
    pub failure: Option<String>,
}

impl<T> FetchReport<T> {
    /// A fetch that ran to its natural end (last page, limit, or first
    /// winning mirror).
    pub fn complete(records: Vec<T>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    /// A fetch cut short; `records` holds whatever was collected first.
    pub fn degraded(records: Vec<T>, reason: impl Into<String>) -> Self {
        Self {
            records,
            failure: Some(reason.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalized pricing row handed to the report writer. The serde renames
/// are the report column headers.
#[derive(Debug, Clone, Serialize)]
pub struct PricedRecord {
    #[serde(rename = "VM Name")]
    pub sku: String,
    #[serde(rename = "Product Name")]
    pub product_name: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Unit Price (USD)")]
    pub unit_price: Option<f64>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "Meter Region")]
    pub meter_region: Option<String>,
    #[serde(rename = "CPU Vendor")]
    pub vendor: CpuVendor,
    #[serde(rename = "Series")]
    pub series: String,
    #[serde(rename = "Service Family")]
    pub service_family: Option<String>,
    #[serde(rename = "Type")]
    pub price_type: Option<String>,
    #[serde(rename = "Arm SKU")]
    pub raw_sku: String,
}
