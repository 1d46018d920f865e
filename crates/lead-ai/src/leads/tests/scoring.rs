use std::sync::Arc;

use super::common::*;
use crate::leads::repository::LeadRepository;
use crate::scoring::{rules, ConversionModel, LeadScoringService, ScoreOutcome};

#[test]
fn trained_service_persists_model_scores() {
    let (service, repository, scorer) = build_service();
    assert!(scorer.is_model_trained());

    let record = service.create(submission()).expect("submission succeeds");
    let outcome = scorer.score_lead(&record.profile.snapshot());

    assert!(matches!(outcome, ScoreOutcome::Model(_)));
    assert_eq!(record.quality_score, outcome.value());

    let stored = repository
        .fetch(&record.profile.lead_id)
        .expect("repo fetch")
        .expect("record present");
    assert_eq!(stored.quality_score, record.quality_score);
}

#[test]
fn untrained_service_persists_the_rule_based_score_exactly() {
    let (service, _, scorer) = build_untrained_service();
    assert!(!scorer.is_model_trained());

    let record = service.create(submission()).expect("submission succeeds");
    let expected = rules::score(&record.profile.snapshot(), scorer.reference());

    assert_eq!(record.quality_score, expected);
}

#[test]
fn degraded_scoring_still_creates_the_lead_with_the_minimum_score() {
    let scorer = Arc::new(LeadScoringService::with_model_for_tests(
        ConversionModel::poisoned_for_tests(),
        sample_leads(),
    ));
    let (service, repository, _) = build_service_with(scorer);

    let record = service.create(submission()).expect("submission succeeds");
    assert_eq!(record.quality_score, 0.0);

    let stored = repository
        .fetch(&record.profile.lead_id)
        .expect("repo fetch")
        .expect("record present");
    assert_eq!(stored.quality_score, 0.0);
}

#[test]
fn exact_reference_match_carries_through_to_the_stored_lead() {
    let (service, _, _) = build_untrained_service();

    let record = service
        .create(qualified_submission(
            "Someone Else",
            "DANA@SIGNALWORKS.COM",
            "Unrelated Holdings",
        ))
        .expect("submission succeeds");

    // Case-insensitive email match against the reference entry wins
    // outright and its curated score is persisted verbatim.
    assert_eq!(record.quality_score, 0.82);
}

#[test]
fn batch_scoring_matches_per_lead_creation_scores() {
    let (service, _, scorer) = build_untrained_service();

    let submissions = vec![
        qualified_submission("Avery Quinn", "avery@quantumgrid.com", "Quantumgrid Systems"),
        qualified_submission("Blair Chen", "blair@keystone.net", "Keystone Analytics"),
    ];

    let mut snapshots = Vec::new();
    let mut persisted = Vec::new();
    for submission in submissions {
        let record = service.create(submission).expect("submission succeeds");
        snapshots.push(record.profile.snapshot());
        persisted.push(record.quality_score);
    }

    let batch = scorer.batch_score(&snapshots);
    let batch_values: Vec<f64> = batch.iter().map(|outcome| outcome.value()).collect();
    assert_eq!(batch_values, persisted);
}
