use super::dataset::{TrainingDataError, TrainingExample};
use super::features::{encode, FeatureVector, LeadSnapshot, FEATURE_COUNT};

/// Errors raised while predicting with the conversion model.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("conversion model has not been trained")]
    NotTrained,
    #[error("prediction produced a non-finite probability")]
    NonFiniteProbability,
}

/// Ensemble dials. The defaults grow one hundred bootstrap trees from a
/// fixed seed so repeated trainings over the same examples are
/// bit-for-bit reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub tree_count: usize,
    pub max_depth: usize,
    pub min_leaf_size: usize,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            tree_count: 100,
            max_depth: 6,
            min_leaf_size: 2,
            seed: 42,
        }
    }
}

/// Number of candidate features examined per split.
const SPLIT_FEATURE_SAMPLE: usize = 3;

/// Binary conversion classifier over encoded lead features. Starts
/// untrained; a successful `train` call replaces the whole forest, after
/// which the model is immutable until the next `train`.
#[derive(Debug, Default)]
pub struct ConversionModel {
    config: ModelConfig,
    forest: Option<Vec<DecisionTree>>,
}

impl ConversionModel {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            forest: None,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.forest.is_some()
    }

    /// Fit the forest against the examples' conversion labels. The example
    /// set must be non-empty; class-imbalanced sets train fine and yield
    /// constant probabilities in the degenerate single-class case.
    pub fn train(&mut self, examples: &[TrainingExample]) -> Result<(), TrainingDataError> {
        if examples.is_empty() {
            return Err(TrainingDataError::Empty);
        }

        let rows: Vec<(FeatureVector, bool)> = examples
            .iter()
            .map(|example| (encode(&example.snapshot), example.converted))
            .collect();

        let mut rng = SplitMix64::new(self.config.seed);
        let mut forest = Vec::with_capacity(self.config.tree_count);
        for _ in 0..self.config.tree_count {
            let sample: Vec<usize> = (0..rows.len())
                .map(|_| rng.next_index(rows.len()))
                .collect();
            forest.push(DecisionTree {
                root: grow(&rows, &sample, 0, &self.config, &mut rng),
            });
        }

        self.forest = Some(forest);
        Ok(())
    }

    /// Probability of the positive (converted) class for one snapshot.
    pub fn predict_probability(&self, snapshot: &LeadSnapshot) -> Result<f64, ScoringError> {
        let forest = self.forest.as_ref().ok_or(ScoringError::NotTrained)?;
        let features = encode(snapshot);

        let total: f64 = forest
            .iter()
            .map(|tree| tree.probability(features.values()))
            .sum();
        let probability = total / forest.len() as f64;

        if !probability.is_finite() {
            return Err(ScoringError::NonFiniteProbability);
        }

        Ok(probability.clamp(0.0, 1.0))
    }

    /// Elementwise `predict_probability`, preserving input order.
    pub fn predict_probability_batch(
        &self,
        snapshots: &[LeadSnapshot],
    ) -> Result<Vec<f64>, ScoringError> {
        snapshots
            .iter()
            .map(|snapshot| self.predict_probability(snapshot))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn poisoned_for_tests() -> Self {
        Self {
            config: ModelConfig::default(),
            forest: Some(vec![DecisionTree {
                root: TreeNode::Leaf {
                    probability: f64::NAN,
                },
            }]),
        }
    }
}

#[derive(Debug)]
struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    fn probability(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { probability } => return *probability,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

#[derive(Debug)]
enum TreeNode {
    Leaf {
        probability: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

fn grow(
    rows: &[(FeatureVector, bool)],
    indices: &[usize],
    depth: usize,
    config: &ModelConfig,
    rng: &mut SplitMix64,
) -> TreeNode {
    let positives = indices.iter().filter(|&&index| rows[index].1).count();
    let probability = positives as f64 / indices.len() as f64;

    if depth >= config.max_depth
        || positives == 0
        || positives == indices.len()
        || indices.len() < config.min_leaf_size * 2
    {
        return TreeNode::Leaf { probability };
    }

    let features = sample_features(rng);
    match best_split(rows, indices, &features, config.min_leaf_size) {
        Some(split) => {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&index| rows[index].0.values()[split.feature] <= split.threshold);

            TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(grow(rows, &left, depth + 1, config, rng)),
                right: Box::new(grow(rows, &right, depth + 1, config, rng)),
            }
        }
        None => TreeNode::Leaf { probability },
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn best_split(
    rows: &[(FeatureVector, bool)],
    indices: &[usize],
    features: &[usize],
    min_leaf_size: usize,
) -> Option<SplitCandidate> {
    let mut best: Option<SplitCandidate> = None;

    for &feature in features {
        let mut values: Vec<f64> = indices
            .iter()
            .map(|&index| rows[index].0.values()[feature])
            .collect();
        values.sort_unstable_by(|a, b| a.total_cmp(b));
        values.dedup();

        for window in values.windows(2) {
            let threshold = (window[0] + window[1]) / 2.0;

            let mut left_total = 0usize;
            let mut left_positive = 0usize;
            let mut right_total = 0usize;
            let mut right_positive = 0usize;
            for &index in indices {
                let (vector, converted) = &rows[index];
                if vector.values()[feature] <= threshold {
                    left_total += 1;
                    left_positive += usize::from(*converted);
                } else {
                    right_total += 1;
                    right_positive += usize::from(*converted);
                }
            }

            if left_total < min_leaf_size || right_total < min_leaf_size {
                continue;
            }

            let total = (left_total + right_total) as f64;
            let impurity = (left_total as f64 * gini(left_positive, left_total)
                + right_total as f64 * gini(right_positive, right_total))
                / total;

            let improves = match &best {
                Some(candidate) => impurity < candidate.impurity,
                None => true,
            };
            if improves {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}

fn gini(positives: usize, total: usize) -> f64 {
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

fn sample_features(rng: &mut SplitMix64) -> Vec<usize> {
    let mut all: Vec<usize> = (0..FEATURE_COUNT).collect();
    for i in 0..SPLIT_FEATURE_SAMPLE {
        let j = i + rng.next_index(FEATURE_COUNT - i);
        all.swap(i, j);
    }
    all.truncate(SPLIT_FEATURE_SAMPLE);
    all.sort_unstable();
    all
}

/// SplitMix64 sequence; small and fully deterministic, which is all the
/// bootstrap sampling needs.
struct SplitMix64(u64);

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_index(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}
