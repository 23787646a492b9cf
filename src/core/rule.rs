use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::types::SymptomId;

/// Disease rules: disease name -> ordered symptom ids.
///
/// Iteration order is insertion order and survives a JSON round trip, which
/// keeps disease indices stable between the persisted document and the
/// derived index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: IndexMap<String, Vec<SymptomId>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the symptom list for a disease, replacing any previous list.
    ///
    /// An existing disease keeps its position. Returns `true` when the
    /// disease was not present before.
    pub fn insert(&mut self, disease: impl Into<String>, symptom_ids: Vec<SymptomId>) -> bool {
        self.rules.insert(disease.into(), symptom_ids).is_none()
    }

    /// Remove a disease, preserving the order of the remaining ones
    pub fn remove(&mut self, disease: &str) -> Option<Vec<SymptomId>> {
        self.rules.shift_remove(disease)
    }

    /// Remove a symptom id from every rule. Returns the number of rules changed.
    pub fn strip_symptom(&mut self, id: &SymptomId) -> usize {
        let mut changed = 0;
        for symptom_ids in self.rules.values_mut() {
            let before = symptom_ids.len();
            symptom_ids.retain(|sid| sid != id);
            if symptom_ids.len() != before {
                changed += 1;
            }
        }
        changed
    }

    pub fn get(&self, disease: &str) -> Option<&[SymptomId]> {
        self.rules.get(disease).map(Vec::as_slice)
    }

    pub fn contains(&self, disease: &str) -> bool {
        self.rules.contains_key(disease)
    }

    /// Disease name at a given index
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.rules.get_index(index).map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SymptomId])> {
        self.rules
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<SymptomId>)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (S, Vec<SymptomId>)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
