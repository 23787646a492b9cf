use std::collections::{HashMap, HashSet};

use crate::core::rule::RuleSet;
use crate::core::symptom::Symptom;
use crate::core::types::SymptomId;

/// Position-based lookup tables used by the matching engine.
///
/// Never persisted. Always rebuilt from scratch with [`DerivedIndex::build`]
/// so it cannot drift from the symptom list and rule set it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedIndex {
    /// Symptom id -> position in the symptom list
    symptom_position: HashMap<SymptomId, usize>,

    /// One entry per disease, in rule-set order: positions of its symptoms
    /// that still exist in the symptom list
    disease_positions: Vec<Vec<usize>>,
}

impl DerivedIndex {
    /// Derive the index from the current symptom list and rules.
    ///
    /// Rule entries pointing at ids missing from the symptom list are dropped.
    pub fn build(symptoms: &[Symptom], rules: &RuleSet) -> Self {
        let symptom_position: HashMap<SymptomId, usize> = symptoms
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        let disease_positions = rules
            .iter()
            .map(|(disease, symptom_ids)| {
                let positions: Vec<usize> = symptom_ids
                    .iter()
                    .filter_map(|sid| symptom_position.get(sid).copied())
                    .collect();
                if positions.len() != symptom_ids.len() {
                    tracing::debug!(
                        "Rule '{}' references {} unknown symptom id(s)",
                        disease,
                        symptom_ids.len() - positions.len()
                    );
                }
                positions
            })
            .collect();

        Self {
            symptom_position,
            disease_positions,
        }
    }

    /// Position of a symptom id, if it exists
    pub fn position(&self, id: &SymptomId) -> Option<usize> {
        self.symptom_position.get(id).copied()
    }

    /// Positions for every disease, indexed like the rule set
    pub fn disease_positions(&self) -> &[Vec<usize>] {
        &self.disease_positions
    }

    /// Positions for the disease at `index`
    pub fn positions_for(&self, index: usize) -> Option<&[usize]> {
        self.disease_positions.get(index).map(Vec::as_slice)
    }

    /// Resolve selected symptom ids to positions, skipping unknown ids
    pub fn resolve_selection<'a, I>(&self, ids: I) -> HashSet<usize>
    where
        I: IntoIterator<Item = &'a SymptomId>,
    {
        ids.into_iter()
            .filter_map(|id| {
                let pos = self.position(id);
                if pos.is_none() {
                    tracing::debug!("Ignoring unknown symptom id '{}' in selection", id);
                }
                pos
            })
            .collect()
    }

    pub fn symptom_count(&self) -> usize {
        self.symptom_position.len()
    }

    pub fn disease_count(&self) -> usize {
        self.disease_positions.len()
    }
}
