use anyhow::Result;
use clap::Parser;
use cloudsku::application::{CollectOptions, collect};
use std::path::PathBuf;

/// cloudsku - Cloud VM data collector
///
/// Collects VM retail pricing and instance capability data from public
/// sources and writes one CSV report per source, alongside a built-in
/// CPU benchmark table.
///
/// Examples:
///   cloudsku collect                 # Collect with defaults
///   cloudsku collect --limit 500     # Cap the pricing records
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Collect pricing and capability data and write the CSV reports
    Collect(CollectArgs),
}

#[derive(clap::Args, Debug)]
pub struct CollectArgs {
    /// Maximum number of pricing records to collect
    #[arg(long, default_value_t = 2000)]
    pub limit: usize,

    /// Output directory for the CSV reports (also via CLOUDSKU_OUT)
    #[arg(
        long = "out",
        short = 'o',
        env = "CLOUDSKU_OUT",
        value_name = "DIR",
        default_value = "cloud-vm-report"
    )]
    pub out_dir: PathBuf,

    /// Retail pricing endpoint (defaults to the Azure retail prices API)
    #[arg(long = "pricing-url", value_name = "URL")]
    pub pricing_url: Option<String>,

    /// Instance catalog mirror; repeat to set the fallback order
    #[arg(long = "catalog-url", value_name = "URL")]
    pub catalog_urls: Vec<String>,

    /// SKU series prefix to keep; repeat for several
    #[arg(long = "series", value_name = "PREFIX")]
    pub series: Vec<String>,
}

impl CollectArgs {
    fn into_options(self) -> CollectOptions {
        let defaults = CollectOptions::default();
        CollectOptions {
            limit: self.limit,
            out_dir: self.out_dir,
            pricing_url: self.pricing_url.unwrap_or(defaults.pricing_url),
            catalog_urls: if self.catalog_urls.is_empty() {
                defaults.catalog_urls
            } else {
                self.catalog_urls
            },
            series_prefixes: if self.series.is_empty() {
                defaults.series_prefixes
            } else {
                self.series
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Collect(args) => {
            let summary = collect(args.into_options()).await?;
            println!("Pricing records: {}", summary.pricing_records);
            println!("Catalog records: {}", summary.catalog_records);
            println!("Benchmark records: {}", summary.benchmark_records);
            for file in &summary.files {
                println!("Wrote {}", file.display());
            }
        }
    }
    Ok(())
}
