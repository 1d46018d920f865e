use std::io::Cursor;
use std::sync::Arc;

use super::common::*;
use crate::leads::domain::{LeadId, LeadRecord, LeadStatus};
use crate::leads::repository::{LeadRepository, RepositoryError};
use crate::leads::service::{LeadService, LeadServiceError};
use crate::leads::ValidationViolation;
use crate::scoring::LeadScoringService;

fn submit_ok(service: &LeadService<MemoryRepository>) -> LeadRecord {
    service.create(submission()).expect("submission succeeds")
}

#[test]
fn create_assigns_an_id_and_a_quality_score() {
    let (service, repository, _) = build_service();

    let record = submit_ok(&service);
    assert!(record.profile.lead_id.0.starts_with("lead-"));
    assert!((0.0..=1.0).contains(&record.quality_score));
    assert_eq!(record.status, LeadStatus::New);
    assert_eq!(record.created_at, record.updated_at);

    let stored = repository
        .fetch(&record.profile.lead_id)
        .expect("repo fetch")
        .expect("record present");
    assert_eq!(stored, record);
}

#[test]
fn create_rejects_invalid_submissions_before_scoring() {
    let (service, repository, _) = build_service();

    let mut bad = submission();
    bad.email = Some("not-an-email".to_string());

    match service.create(bad) {
        Err(LeadServiceError::Validation(ValidationViolation::InvalidEmail(_))) => {}
        other => panic!("expected email validation error, got {other:?}"),
    }
    assert!(repository.list().expect("list").is_empty());
}

#[test]
fn get_returns_not_found_for_unknown_ids() {
    let (service, _, _) = build_service();

    match service.get(&LeadId("lead-999999".to_string())) {
        Err(LeadServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn list_orders_leads_by_identifier() {
    let (service, _, _) = build_service();

    let first = submit_ok(&service);
    let second = service
        .create(qualified_submission(
            "Blair Chen",
            "blair@keystone.net",
            "Keystone Analytics",
        ))
        .expect("second submission succeeds");

    let listed = service.list().expect("list succeeds");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].profile.lead_id, first.profile.lead_id);
    assert_eq!(listed[1].profile.lead_id, second.profile.lead_id);
}

#[test]
fn update_rescores_and_keeps_identity() {
    let (service, repository, scorer) = build_untrained_service();

    let record = service.create(submission()).expect("submission succeeds");

    let mut replacement = qualified_submission("Avery Quinn", "", "Quantumgrid Systems");
    replacement.email = None;

    let updated = service
        .update(&record.profile.lead_id, replacement)
        .expect("update succeeds");

    assert_eq!(updated.profile.lead_id, record.profile.lead_id);
    assert_eq!(updated.created_at, record.created_at);
    assert_eq!(updated.status, LeadStatus::Qualified);
    assert_eq!(
        updated.quality_score,
        scorer.score_lead(&updated.profile.snapshot()).value()
    );

    let stored = repository
        .fetch(&record.profile.lead_id)
        .expect("repo fetch")
        .expect("record present");
    assert_eq!(stored.profile.email, None);
}

#[test]
fn update_of_missing_lead_is_not_found() {
    let (service, _, _) = build_service();

    match service.update(&LeadId("lead-999999".to_string()), submission()) {
        Err(LeadServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn delete_removes_the_record() {
    let (service, repository, _) = build_service();

    let record = submit_ok(&service);
    service
        .delete(&record.profile.lead_id)
        .expect("delete succeeds");

    assert!(repository
        .fetch(&record.profile.lead_id)
        .expect("repo fetch")
        .is_none());
    assert!(matches!(
        service.delete(&record.profile.lead_id),
        Err(LeadServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn repository_failures_surface_as_service_errors() {
    let scorer = Arc::new(LeadScoringService::untrained(Vec::new()));
    let service = LeadService::new(Arc::new(UnavailableRepository), scorer);

    match service.create(submission()) {
        Err(LeadServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository error, got {other:?}"),
    }
}

#[test]
fn csv_import_counts_created_and_skipped_rows() {
    let (service, repository, _) = build_service();

    let csv_data = "name,email,company\n\
Avery Quinn,avery@quantumgrid.com,Quantumgrid Systems\n\
X,,\n\
Blair Chen,blair@keystone.net,Keystone Analytics\n";

    let summary = service
        .import_csv(Cursor::new(csv_data))
        .expect("import succeeds");

    assert_eq!(summary.created, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(repository.list().expect("list").len(), 2);
}

#[test]
fn csv_import_propagates_malformed_payloads() {
    let (service, repository, _) = build_service();

    let ragged = "name,email,company\nAvery Quinn,avery@quantumgrid.com\n";
    match service.import_csv(Cursor::new(ragged)) {
        Err(LeadServiceError::Import(_)) => {}
        other => panic!("expected import error, got {other:?}"),
    }
    assert!(repository.list().expect("list").is_empty());
}

#[test]
fn csv_export_includes_every_stored_lead() {
    let (service, _, _) = build_service();

    let first = submit_ok(&service);
    let second = service
        .create(qualified_submission(
            "Blair Chen",
            "blair@keystone.net",
            "Keystone Analytics",
        ))
        .expect("second submission succeeds");

    let rendered = service.export_csv().expect("export succeeds");
    let mut lines = rendered.lines();

    assert_eq!(
        lines.next(),
        Some("name,email,company,status,quality_score")
    );
    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), 2);
    assert!(body[0].contains(&first.profile.name));
    assert!(body[1].contains(&second.profile.name));
    assert!(body[1].contains("qualified"));
}
