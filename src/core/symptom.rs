use serde::{Deserialize, Serialize};

use crate::core::types::SymptomId;

/// A symptom that can be selected during diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    /// Stable identifier; identity of the record
    pub id: SymptomId,

    /// Human-readable name, may change independently of the id
    pub name: String,
}

impl Symptom {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SymptomId::new(id),
            name: name.into(),
        }
    }

    /// Numbered display label derived from the id, e.g. `G001` / `Fever` -> `1. Fever`.
    ///
    /// The leading `G` and any leading zeros are dropped. Ids that reduce to
    /// nothing (such as `G000`) keep their full form.
    #[must_use]
    pub fn display_label(&self) -> String {
        let raw = self.id.as_str();
        let number = raw.strip_prefix('G').unwrap_or(raw).trim_start_matches('0');
        let number = if number.is_empty() { raw } else { number };
        format!("{number}. {}", self.name)
    }
}
