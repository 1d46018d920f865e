pub mod config;
pub mod error;
pub mod leads;
pub mod scoring;
pub mod telemetry;
