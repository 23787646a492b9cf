use std::collections::HashSet;

use crate::catalog::index::DerivedIndex;
use crate::core::types::Threshold;
use crate::matching::scoring::MatchScore;

/// Result of matching a selection against one disease
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseMatch {
    /// Index of the disease in rule-set order
    pub disease_index: usize,

    /// Score details
    pub score: MatchScore,

    /// `score.percentage >= threshold`
    pub matched: bool,
}

impl DiseaseMatch {
    pub fn percentage(&self) -> f64 {
        self.score.percentage
    }
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingConfig {
    /// Minimum percentage (inclusive) for a disease to count as matched
    pub threshold: Threshold,
}

/// Score every disease against a set of selected symptom positions.
///
/// Output follows the order of `disease_positions` and contains every disease,
/// matched or not. Callers reject empty selections and empty rule sets before
/// getting here.
pub fn diagnose(
    selected: &HashSet<usize>,
    disease_positions: &[Vec<usize>],
    threshold: Threshold,
) -> Vec<DiseaseMatch> {
    disease_positions
        .iter()
        .enumerate()
        .map(|(disease_index, positions)| {
            let score = MatchScore::calculate(positions, selected);
            DiseaseMatch {
                disease_index,
                matched: threshold.accepts(score.percentage),
                score,
            }
        })
        .collect()
}

/// The main matching engine, bound to a derived index
pub struct MatchingEngine<'a> {
    index: &'a DerivedIndex,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with the default threshold
    pub fn new(index: &'a DerivedIndex) -> Self {
        Self {
            index,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(index: &'a DerivedIndex, config: MatchingConfig) -> Self {
        Self { index, config }
    }

    /// Score every disease in the index against the selection
    pub fn find_matches(&self, selected: &HashSet<usize>) -> Vec<DiseaseMatch> {
        diagnose(
            selected,
            self.index.disease_positions(),
            self.config.threshold,
        )
    }
}
