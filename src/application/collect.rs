//! Collect action - one session, both sources, the benchmark table, then
//! the CSV export.
//!
//! Fetch degradation (timeouts, dead mirrors, partial pages) is logged
//! and reported in the summary; only local I/O problems fail the run.

use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};

use crate::dataset;
use crate::http::HttpClient;
use crate::report;
use crate::source::{
    CatalogSource, DEFAULT_CATALOG_MIRRORS, DEFAULT_PRICING_URL, DEFAULT_SERIES_PREFIXES,
    RetailSource,
};

/// Options for one collection run.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Upper bound on pricing records collected.
    pub limit: usize,
    /// Directory the CSV reports are written into.
    pub out_dir: PathBuf,
    /// Retail pricing start URL.
    pub pricing_url: String,
    /// Catalog mirrors in fallback order.
    pub catalog_urls: Vec<String>,
    /// SKU series prefixes kept by the pricing fetch.
    pub series_prefixes: Vec<String>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            limit: 2000,
            out_dir: PathBuf::from("cloud-vm-report"),
            pricing_url: DEFAULT_PRICING_URL.to_string(),
            catalog_urls: DEFAULT_CATALOG_MIRRORS
                .iter()
                .map(|url| url.to_string())
                .collect(),
            series_prefixes: DEFAULT_SERIES_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }
}

/// What a run produced, for display by the caller.
#[derive(Debug)]
pub struct CollectSummary {
    pub pricing_records: usize,
    pub catalog_records: usize,
    pub benchmark_records: usize,
    /// Report files actually written.
    pub files: Vec<PathBuf>,
}

/// Runs the whole pipeline sequentially over one shared session.
pub async fn collect(options: CollectOptions) -> Result<CollectSummary> {
    let http = HttpClient::with_defaults()?;

    info!("Fetching retail VM pricing data...");
    let pricing = RetailSource::with_start_url(http.clone(), &options.pricing_url)
        .fetch_priced(options.limit, &options.series_prefixes)
        .await;
    if let Some(reason) = &pricing.failure {
        warn!("Retail pricing fetch degraded: {}", reason);
    }

    info!("Fetching instance catalog data...");
    let catalog = CatalogSource::new(http)
        .fetch_instances(&options.catalog_urls)
        .await;
    if let Some(reason) = &catalog.failure {
        warn!("Instance catalog fetch degraded: {}", reason);
    }

    let benchmarks = dataset::coremark_samples();

    let files = report::export_all(
        &options.out_dir,
        &pricing.records,
        &catalog.records,
        &benchmarks,
    )?;

    Ok(CollectSummary {
        pricing_records: pricing.len(),
        catalog_records: catalog.len(),
        benchmark_records: benchmarks.len(),
        files,
    })
}
