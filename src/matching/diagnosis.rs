use serde::Serialize;
use thiserror::Error;

use crate::core::types::Threshold;

/// Preconditions checked before the engine runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisError {
    #[error("Select at least one symptom to run a diagnosis")]
    EmptySelection,

    #[error("No disease rules are defined; add rules before running a diagnosis")]
    NoRules,
}

/// Verdict for a single disease
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseOutcome {
    /// Disease name
    pub disease: String,

    /// Match percentage in `0..=100`
    pub percentage: f64,

    /// Whether the percentage reached the threshold
    pub matched: bool,

    /// Required symptoms present in the selection
    pub matched_symptoms: usize,

    /// Symptoms required by the disease that still exist
    pub total_symptoms: usize,
}

/// Full result of a diagnosis run
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    /// Threshold the verdicts were computed against
    pub threshold: Threshold,

    /// Number of selected symptoms that resolved to known symptoms
    pub selected_count: usize,

    /// Every disease in rule order, matched or not
    pub outcomes: Vec<DiseaseOutcome>,
}

impl Diagnosis {
    /// Diseases that reached the threshold, in rule order
    pub fn matched(&self) -> impl Iterator<Item = &DiseaseOutcome> {
        self.outcomes.iter().filter(|o| o.matched)
    }

    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    /// Look up the outcome for a disease by name
    pub fn outcome(&self, disease: &str) -> Option<&DiseaseOutcome> {
        self.outcomes.iter().find(|o| o.disease == disease)
    }
}
