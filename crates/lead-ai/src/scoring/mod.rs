//! Lead quality scoring: a trained conversion model when historical data
//! is available, with a deterministic rule-based backstop. The facade never
//! surfaces an error; internal failures degrade to a low-confidence score.

pub mod dataset;
pub mod features;
pub mod model;
pub mod rules;

pub use dataset::{load_samples, samples_from_reader, SampleLead, TrainingDataError, TrainingExample};
pub use features::{encode, FeatureVector, LeadSnapshot, FEATURE_COUNT};
pub use model::{ConversionModel, ModelConfig, ScoringError};

use std::path::Path;

use tracing::{debug, warn};

/// How a quality score was produced. Kept as an explicit branch so the
/// fallback paths are first-class, testable outcomes rather than side
/// effects of error handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    /// Probability from the trained conversion model.
    Model(f64),
    /// Heuristic score; no trained model was available.
    RuleBased(f64),
    /// A trained prediction failed transiently; pinned to the minimum.
    Degraded,
}

impl ScoreOutcome {
    /// The score to persist, always inside [0, 1] for non-short-circuit
    /// outcomes.
    pub fn value(self) -> f64 {
        match self {
            ScoreOutcome::Model(probability) => probability,
            ScoreOutcome::RuleBased(score) => score,
            ScoreOutcome::Degraded => 0.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreOutcome::Model(_) => "model",
            ScoreOutcome::RuleBased(_) => "rule_based",
            ScoreOutcome::Degraded => "degraded",
        }
    }
}

/// Scoring entry point shared across the process. Constructed once at the
/// composition root and handed to callers behind an `Arc`; after
/// construction the trained state never changes, so no further locking is
/// required.
pub struct LeadScoringService {
    model: ConversionModel,
    reference: Vec<SampleLead>,
}

impl LeadScoringService {
    /// Build the service from already-loaded samples, training the model
    /// best-effort. A failed training is logged and leaves the service in
    /// rule-based mode; the samples still serve as the reference dataset.
    pub fn from_samples(samples: Vec<SampleLead>) -> Self {
        let mut model = ConversionModel::default();
        let examples: Vec<TrainingExample> =
            samples.iter().map(SampleLead::training_example).collect();

        match model.train(&examples) {
            Ok(()) => debug!(samples = samples.len(), "conversion model trained"),
            Err(err) => warn!(
                error = %err,
                "could not train conversion model; scoring falls back to rules"
            ),
        }

        Self {
            model,
            reference: samples,
        }
    }

    /// Build the service from a JSON sample file, best-effort: an unreadable
    /// or malformed file is logged and the service starts untrained with an
    /// empty reference dataset.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match dataset::load_samples(&path) {
            Ok(samples) => Self::from_samples(samples),
            Err(err) => {
                warn!(
                    path = %path.as_ref().display(),
                    error = %err,
                    "could not load lead samples; scoring falls back to rules"
                );
                Self::untrained(Vec::new())
            }
        }
    }

    /// A service with no trained model, scoring purely by rules against the
    /// given reference dataset.
    pub fn untrained(reference: Vec<SampleLead>) -> Self {
        Self {
            model: ConversionModel::default(),
            reference,
        }
    }

    pub fn is_model_trained(&self) -> bool {
        self.model.is_trained()
    }

    pub fn reference(&self) -> &[SampleLead] {
        &self.reference
    }

    /// Score one lead. Never fails: an untrained model falls back to the
    /// rule-based scorer, and a transient prediction failure degrades to
    /// the minimum score for this record only.
    pub fn score_lead(&self, snapshot: &LeadSnapshot) -> ScoreOutcome {
        match self.model.predict_probability(snapshot) {
            Ok(probability) => ScoreOutcome::Model(probability),
            Err(ScoringError::NotTrained) => {
                ScoreOutcome::RuleBased(rules::score(snapshot, &self.reference))
            }
            Err(err) => {
                warn!(error = %err, "conversion model prediction failed; degrading score");
                ScoreOutcome::Degraded
            }
        }
    }

    /// Score each lead independently, preserving input order. One record's
    /// degradation never affects the others.
    pub fn batch_score(&self, snapshots: &[LeadSnapshot]) -> Vec<ScoreOutcome> {
        snapshots
            .iter()
            .map(|snapshot| self.score_lead(snapshot))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn with_model_for_tests(model: ConversionModel, reference: Vec<SampleLead>) -> Self {
        Self { model, reference }
    }
}
