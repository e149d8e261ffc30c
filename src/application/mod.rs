//! Collection run orchestration.

mod collect;

pub use collect::{CollectOptions, CollectSummary, collect};
