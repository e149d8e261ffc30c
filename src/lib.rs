pub mod application;
pub mod dataset;
pub mod http;
pub mod report;
pub mod source;
pub mod vendor;
