use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::csv::{parse_submissions, render_leads, CsvImportError};
use super::domain::{LeadId, LeadRecord, LeadSubmission};
use super::intake::{LeadIntakeGuard, ValidationViolation};
use super::repository::{LeadRepository, RepositoryError};
use crate::scoring::LeadScoringService;

/// Service composing the intake guard, repository, and scoring facade.
pub struct LeadService<R> {
    guard: LeadIntakeGuard,
    repository: Arc<R>,
    scorer: Arc<LeadScoringService>,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<R> LeadService<R>
where
    R: LeadRepository + 'static,
{
    pub fn new(repository: Arc<R>, scorer: Arc<LeadScoringService>) -> Self {
        Self {
            guard: LeadIntakeGuard,
            repository,
            scorer,
        }
    }

    pub fn scorer(&self) -> &Arc<LeadScoringService> {
        &self.scorer
    }

    /// Validate, score, and store a new lead.
    pub fn create(&self, submission: LeadSubmission) -> Result<LeadRecord, LeadServiceError> {
        let (mut profile, status) = self.guard.profile_from_submission(submission)?;
        profile.lead_id = next_lead_id();

        let outcome = self.scorer.score_lead(&profile.snapshot());
        info!(
            lead_id = %profile.lead_id.0,
            source = outcome.label(),
            score = outcome.value(),
            "scored new lead"
        );

        let now = Utc::now();
        let record = LeadRecord {
            profile,
            status,
            quality_score: outcome.value(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Fetch one lead for API responses.
    pub fn get(&self, lead_id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        let record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// All stored leads, ordered by identifier.
    pub fn list(&self) -> Result<Vec<LeadRecord>, LeadServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|a, b| a.profile.lead_id.0.cmp(&b.profile.lead_id.0));
        Ok(records)
    }

    /// Replace a lead's fields and re-score it, keeping its identity and
    /// creation time.
    pub fn update(
        &self,
        lead_id: &LeadId,
        submission: LeadSubmission,
    ) -> Result<LeadRecord, LeadServiceError> {
        let existing = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        let (mut profile, status) = self.guard.profile_from_submission(submission)?;
        profile.lead_id = lead_id.clone();

        let outcome = self.scorer.score_lead(&profile.snapshot());
        let record = LeadRecord {
            profile,
            status,
            quality_score: outcome.value(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.repository.update(record.clone())?;
        Ok(record)
    }

    pub fn delete(&self, lead_id: &LeadId) -> Result<(), LeadServiceError> {
        self.repository.delete(lead_id)?;
        Ok(())
    }

    /// Import leads from an uploaded CSV. Rows failing intake validation are
    /// skipped and counted; repository failures abort the import.
    pub fn import_csv<Rd: Read>(&self, reader: Rd) -> Result<CsvImportSummary, LeadServiceError> {
        let submissions = parse_submissions(reader).map_err(CsvImportError::Csv)?;

        let mut created = 0usize;
        let mut skipped = 0usize;
        for submission in submissions {
            match self.create(submission) {
                Ok(_) => created += 1,
                Err(LeadServiceError::Validation(err)) => {
                    warn!(error = %err, "skipping invalid lead row in CSV import");
                    skipped += 1;
                }
                Err(other) => return Err(other),
            }
        }

        Ok(CsvImportSummary { created, skipped })
    }

    /// Render every stored lead as the downloadable CSV export.
    pub fn export_csv(&self) -> Result<String, LeadServiceError> {
        let records = self.list()?;
        let rendered = render_leads(&records).map_err(CsvImportError::Csv)?;
        Ok(rendered)
    }
}

/// Outcome counts for one CSV import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CsvImportSummary {
    pub created: usize,
    pub skipped: usize,
}

/// Error raised by the lead service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Import(#[from] CsvImportError),
}
