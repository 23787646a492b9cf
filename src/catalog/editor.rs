//! Mutations of the knowledge base.
//!
//! Every operation updates the in-memory documents, rebuilds the derived index
//! and rewrites the affected JSON document(s) before returning. A failed write
//! is reported as `CatalogError::Persistence`; the in-memory change is kept.

use crate::catalog::store::{CatalogError, KnowledgeBase};
use crate::core::symptom::Symptom;
use crate::core::types::SymptomId;

/// What `save_rule` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleChange {
    Created,
    Updated,
}

fn require(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        Err(CatalogError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

impl KnowledgeBase {
    /// Append a new symptom.
    ///
    /// Ids are compared exactly; callers normalize case and whitespace first.
    ///
    /// # Errors
    ///
    /// `Validation` if `id` or `name` is blank, `DuplicateId` if the id is
    /// taken, `Persistence` if the symptom document cannot be written.
    pub fn add_symptom(&mut self, id: &str, name: &str) -> Result<&Symptom, CatalogError> {
        require("Symptom id", id)?;
        require("Symptom name", name)?;

        let id = SymptomId::new(id);
        if self.index.position(&id).is_some() {
            return Err(CatalogError::DuplicateId(id.0));
        }

        tracing::info!("Adding symptom {} ({})", id, name);
        self.symptoms.push(Symptom {
            id,
            name: name.to_string(),
        });
        self.rebuild_index();
        self.save_symptoms()?;

        Ok(&self.symptoms[self.symptoms.len() - 1])
    }

    /// Delete a symptom and strip its id from every rule.
    ///
    /// Rules left without symptoms are kept. Deleting an unknown id does
    /// nothing and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// `Persistence` if either document cannot be written.
    pub fn delete_symptom(&mut self, id: &str) -> Result<bool, CatalogError> {
        let id = SymptomId::new(id);
        let Some(pos) = self.index.position(&id) else {
            tracing::debug!("Symptom {} not found, nothing to delete", id);
            return Ok(false);
        };

        let removed = self.symptoms.remove(pos);
        let touched = self.rules.strip_symptom(&id);
        tracing::info!(
            "Deleted symptom {} ({}), removed from {} rule(s)",
            removed.id,
            removed.name,
            touched
        );

        self.rebuild_index();
        self.save_symptoms()?;
        self.save_rules()?;
        Ok(true)
    }

    /// Create or replace the rule for a disease.
    ///
    /// The name is trimmed and the symptom list stored exactly as given.
    /// `is_new` only records the caller's intent; whether the rule was created
    /// or replaced is decided by the rule set itself.
    ///
    /// # Errors
    ///
    /// `Validation` if the name is blank or `symptom_ids` is empty,
    /// `Persistence` if the rule document cannot be written.
    pub fn save_rule(
        &mut self,
        disease: &str,
        symptom_ids: Vec<SymptomId>,
        is_new: bool,
    ) -> Result<RuleChange, CatalogError> {
        require("Disease name", disease)?;
        if symptom_ids.is_empty() {
            return Err(CatalogError::Validation(
                "Select at least one symptom for the rule".to_string(),
            ));
        }

        let disease = disease.trim();
        let change = if self.rules.insert(disease, symptom_ids) {
            RuleChange::Created
        } else {
            RuleChange::Updated
        };
        if is_new && change == RuleChange::Updated {
            tracing::warn!("Rule '{}' already existed and was replaced", disease);
        }
        tracing::info!("Saved rule '{}' ({:?})", disease, change);

        self.rebuild_index();
        self.save_rules()?;
        Ok(change)
    }

    /// Delete the rule for a disease. Unknown names return `Ok(false)`.
    ///
    /// # Errors
    ///
    /// `Persistence` if the rule document cannot be written.
    pub fn delete_disease(&mut self, disease: &str) -> Result<bool, CatalogError> {
        if self.rules.remove(disease).is_none() {
            tracing::debug!("Disease '{}' not found, nothing to delete", disease);
            return Ok(false);
        }
        tracing::info!("Deleted disease '{}'", disease);

        self.rebuild_index();
        self.save_rules()?;
        Ok(true)
    }
}
