//! Built-in CPU benchmark reference table.
//!
//! Fixed CoreMark sample shipped with the tool as the third report
//! collection. Scores are representative published figures, not measured
//! at run time.

use serde::Serialize;

use crate::vendor::{self, CpuVendor};

/// One benchmark row. The serde renames are the report column headers.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkEntry {
    #[serde(rename = "CPU")]
    pub cpu: String,
    #[serde(rename = "Single-Core Score")]
    pub single_core: u32,
    #[serde(rename = "Multi-Core Score")]
    pub multi_core: u32,
    #[serde(rename = "Cores")]
    pub cores: u32,
    #[serde(rename = "CPU Vendor")]
    pub vendor: CpuVendor,
}

const SAMPLES: [(&str, u32, u32, u32); 5] = [
    ("Intel Xeon Platinum 8490H", 1980, 31400, 60),
    ("Intel Xeon Gold 6338", 1720, 28400, 32),
    ("AMD EPYC 7763", 1880, 40200, 64),
    ("AMD EPYC 7B13", 1820, 39200, 64),
    ("ARM Graviton3", 1850, 18500, 64),
];

/// The sample benchmark table, vendor-classified.
pub fn coremark_samples() -> Vec<BenchmarkEntry> {
    SAMPLES
        .iter()
        .map(|&(cpu, single_core, multi_core, cores)| BenchmarkEntry {
            cpu: cpu.to_string(),
            single_core,
            multi_core,
            cores,
            vendor: vendor::classify(cpu),
        })
        .collect()
}
