use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::features::LeadSnapshot;

/// One historical lead from the external sample file: the fields consulted
/// during scoring, a curated reference score, and an optional conversion
/// label. A missing `converted` field counts as "did not convert".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleLead {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub converted: u8,
}

impl SampleLead {
    pub fn snapshot(&self) -> LeadSnapshot {
        LeadSnapshot {
            name: optional(&self.name),
            email: optional(&self.email),
            company: optional(&self.company),
            ..LeadSnapshot::default()
        }
    }

    pub fn training_example(&self) -> TrainingExample {
        TrainingExample {
            snapshot: self.snapshot(),
            converted: self.converted != 0,
        }
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// A lead snapshot paired with its historical conversion outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub snapshot: LeadSnapshot,
    pub converted: bool,
}

/// Errors raised while obtaining or consuming training data.
#[derive(Debug, thiserror::Error)]
pub enum TrainingDataError {
    #[error("failed to read training data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid training data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("training data contains no samples")]
    Empty,
}

/// Load sample leads from a JSON file on disk.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<SampleLead>, TrainingDataError> {
    let file = std::fs::File::open(path)?;
    samples_from_reader(file)
}

/// Load sample leads from any reader producing a JSON array.
pub fn samples_from_reader<R: Read>(reader: R) -> Result<Vec<SampleLead>, TrainingDataError> {
    let samples = serde_json::from_reader(reader)?;
    Ok(samples)
}
