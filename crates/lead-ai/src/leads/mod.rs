//! Lead intake, scoring, and CRUD workflow for the sales pipeline.

pub(crate) mod csv;
pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use csv::CsvImportError;
pub use domain::{LeadId, LeadProfile, LeadRecord, LeadStatus, LeadSubmission, LeadView};
pub use intake::{LeadIntakeGuard, ValidationViolation};
pub use repository::{LeadRepository, RepositoryError};
pub use router::lead_router;
pub use service::{CsvImportSummary, LeadService, LeadServiceError};
