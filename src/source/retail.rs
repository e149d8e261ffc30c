//! Paginated retail-pricing source.
//!
//! Follows the cursor-style next-page link of a retail pricing API,
//! keeping rows whose SKU matches the configured series prefixes and
//! projecting them into [`PricedRecord`]s.

use std::time::Duration;

use log::{debug, info, warn};

use crate::http::{FetchError, HttpClient};
use crate::vendor;

use super::{FetchReport, PricedRecord};

/// Retail pricing endpoint, pre-filtered to virtual machines.
pub const DEFAULT_PRICING_URL: &str =
    "https://prices.azure.com/api/retail/prices?$filter=serviceName eq 'Virtual Machines'";

/// SKU series collected by default.
pub const DEFAULT_SERIES_PREFIXES: [&str; 6] = ["P", "T", "B", "D", "H", "F"];

/// Pause between page requests, to stay polite to the source.
const PAGE_DELAY: Duration = Duration::from_millis(1500);

/// Consecutive timeouts tolerated on one cursor before the fetch gives up.
const MAX_TIMEOUT_RETRIES: u32 = 5;

/// API response shapes (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Page {
        #[serde(rename = "Items", default)]
        pub items: Vec<Item>,
        #[serde(rename = "NextPageLink")]
        pub next_page_link: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Item {
        #[serde(rename = "armSkuName", default)]
        pub arm_sku_name: String,
        #[serde(rename = "productName")]
        pub product_name: Option<String>,
        #[serde(rename = "armRegionName")]
        pub arm_region_name: Option<String>,
        #[serde(rename = "unitPrice")]
        pub unit_price: Option<f64>,
        #[serde(rename = "currencyCode")]
        pub currency_code: Option<String>,
        #[serde(rename = "meterRegion")]
        pub meter_region: Option<String>,
        #[serde(rename = "serviceFamily")]
        pub service_family: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }
}

/// Retail pricing source following cursor pagination.
pub struct RetailSource {
    http: HttpClient,
    start_url: String,
}

impl RetailSource {
    /// Creates a source against the default pricing endpoint.
    pub fn new(http: HttpClient) -> Self {
        Self::with_start_url(http, DEFAULT_PRICING_URL)
    }

    /// Creates a source against a custom start URL.
    pub fn with_start_url(http: HttpClient, start_url: impl Into<String>) -> Self {
        Self {
            http,
            start_url: start_url.into(),
        }
    }

    /// Collects up to `limit` priced records whose SKU starts with one of
    /// `prefixes`, following next-page links until the limit or the last
    /// page is reached.
    ///
    /// A timed-out page is retried at the same cursor, up to
    /// [`MAX_TIMEOUT_RETRIES`] times in a row. Any other fetch or parse
    /// error stops pagination. In both cases the records collected so far
    /// are returned, never an error.
    #[tracing::instrument(skip(self, prefixes))]
    pub async fn fetch_priced(
        &self,
        limit: usize,
        prefixes: &[String],
    ) -> FetchReport<PricedRecord> {
        let mut collected: Vec<PricedRecord> = Vec::new();
        if limit == 0 {
            return FetchReport::complete(collected);
        }

        let mut cursor = Some(self.start_url.clone());
        let mut page = 0u32;
        let mut consecutive_timeouts = 0u32;

        while let Some(url) = cursor.clone() {
            if collected.len() >= limit {
                break;
            }

            let body: api::Page = match self.http.get_json(&url).await {
                Ok(body) => body,
                Err(err) if is_timeout(&err) => {
                    consecutive_timeouts += 1;
                    if consecutive_timeouts > MAX_TIMEOUT_RETRIES {
                        warn!(
                            "Giving up on page {} after {} consecutive timeouts",
                            page + 1,
                            MAX_TIMEOUT_RETRIES
                        );
                        return FetchReport::degraded(
                            collected,
                            format!(
                                "page {} timed out {} times in a row",
                                page + 1,
                                MAX_TIMEOUT_RETRIES
                            ),
                        );
                    }
                    warn!(
                        "Timeout on page {} (retry {}/{}), retrying the same page...",
                        page + 1,
                        consecutive_timeouts,
                        MAX_TIMEOUT_RETRIES
                    );
                    continue;
                }
                Err(err) => {
                    warn!("Stopping pagination on page {}: {}", page + 1, err);
                    return FetchReport::degraded(collected, err.to_string());
                }
            };
            consecutive_timeouts = 0;
            page += 1;

            let total = body.items.len();
            let before = collected.len();
            for item in body.items {
                if collected.len() >= limit {
                    break;
                }
                if item.arm_sku_name.is_empty()
                    || !prefixes
                        .iter()
                        .any(|prefix| item.arm_sku_name.starts_with(prefix.as_str()))
                {
                    continue;
                }
                collected.push(project(item));
            }
            debug!(
                "Page {}: {} accepted / {} total",
                page,
                collected.len() - before,
                total
            );

            cursor = body.next_page_link;
            if cursor.is_some() && collected.len() < limit {
                tokio::time::sleep(PAGE_DELAY).await;
            }
        }

        info!("Retail pricing records collected: {}", collected.len());
        FetchReport::complete(collected)
    }
}

/// Projects one source item into the normalized record shape.
fn project(item: api::Item) -> PricedRecord {
    let sku = item.arm_sku_name;
    let vendor = vendor::classify(item.product_name.as_deref().unwrap_or(""));
    let series: String = sku.chars().take(2).collect();
    PricedRecord {
        product_name: item.product_name,
        location: item.arm_region_name,
        unit_price: item.unit_price,
        currency: item.currency_code,
        meter_region: item.meter_region,
        vendor,
        series,
        service_family: item.service_family,
        price_type: item.kind,
        raw_sku: sku.clone(),
        sku,
    }
}

fn is_timeout(err: &anyhow::Error) -> bool {
    err.downcast_ref::<FetchError>()
        .is_some_and(FetchError::is_timeout)
}
