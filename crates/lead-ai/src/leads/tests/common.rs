use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::leads::domain::{LeadId, LeadRecord, LeadStatus, LeadSubmission};
use crate::leads::repository::{LeadRepository, RepositoryError};
use crate::leads::service::LeadService;
use crate::scoring::{LeadScoringService, SampleLead};

pub(super) fn sample_leads() -> Vec<SampleLead> {
    vec![
        SampleLead {
            name: "Dana Reed".to_string(),
            email: "dana@signalworks.com".to_string(),
            company: "Signalworks Technology".to_string(),
            score: 0.82,
            converted: 1,
        },
        SampleLead {
            name: "Morgan Wu".to_string(),
            email: "morgan@brightpath.io".to_string(),
            company: "Brightpath Digital".to_string(),
            score: 0.74,
            converted: 1,
        },
        SampleLead {
            name: "Pat Doyle".to_string(),
            email: "pat@plainmail.biz".to_string(),
            company: "Doyle Farms".to_string(),
            score: 0.2,
            converted: 0,
        },
        SampleLead {
            name: "Sam Hill".to_string(),
            email: "sam@hillside.biz".to_string(),
            company: "Hillside Goods".to_string(),
            score: 0.1,
            converted: 0,
        },
    ]
}

pub(super) fn submission() -> LeadSubmission {
    LeadSubmission {
        name: Some("Avery Quinn".to_string()),
        email: Some("avery@quantumgrid.com".to_string()),
        company: Some("Quantumgrid Systems".to_string()),
        phone: Some("+1-515-555-0188".to_string()),
        status: Some("new".to_string()),
        notes: Some("met at the downtown expo".to_string()),
    }
}

pub(super) fn build_service() -> (
    LeadService<MemoryRepository>,
    Arc<MemoryRepository>,
    Arc<LeadScoringService>,
) {
    let scorer = Arc::new(LeadScoringService::from_samples(sample_leads()));
    build_service_with(scorer)
}

pub(super) fn build_untrained_service() -> (
    LeadService<MemoryRepository>,
    Arc<MemoryRepository>,
    Arc<LeadScoringService>,
) {
    let scorer = Arc::new(LeadScoringService::untrained(sample_leads()));
    build_service_with(scorer)
}

pub(super) fn build_service_with(
    scorer: Arc<LeadScoringService>,
) -> (
    LeadService<MemoryRepository>,
    Arc<MemoryRepository>,
    Arc<LeadScoringService>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = LeadService::new(repository.clone(), scorer.clone());
    (service, repository, scorer)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl LeadRepository for MemoryRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile.lead_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile.lead_id) {
            guard.insert(record.profile.lead_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl LeadRepository for UnavailableRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &LeadId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn qualified_submission(name: &str, email: &str, company: &str) -> LeadSubmission {
    LeadSubmission {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        company: Some(company.to_string()),
        status: Some(LeadStatus::Qualified.label().to_string()),
        ..LeadSubmission::default()
    }
}
