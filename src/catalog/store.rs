use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::catalog::index::DerivedIndex;
use crate::core::rule::RuleSet;
use crate::core::symptom::Symptom;
use crate::core::types::{SymptomId, Threshold};
use crate::matching::diagnosis::{Diagnosis, DiagnosisError, DiseaseOutcome};
use crate::matching::engine::{MatchingConfig, MatchingEngine};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Symptom id '{0}' already exists")]
    DuplicateId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {}: {source}", .path.display())]
    MalformedData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File name of the symptom document inside the data directory
pub const SYMPTOMS_FILE: &str = "symptoms.json";

/// File name of the rule document inside the data directory
pub const RULES_FILE: &str = "rules.json";

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Read a JSON document, returning `T::default()` when the file does not exist
pub fn load_document<T>(path: &Path) -> Result<T, CatalogError>
where
    T: DeserializeOwned + Default,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} does not exist, starting empty", path.display());
            return Ok(T::default());
        }
        Err(source) => {
            return Err(CatalogError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| CatalogError::MalformedData {
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrite a JSON document in full.
///
/// The document is written to a temporary file next to `path`, flushed and
/// synced, then renamed over the target. The temporary file is removed on any
/// failure.
pub fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CatalogError> {
    let persistence = |source: std::io::Error| CatalogError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    buf.push(b'\n');

    let mut tmp = NamedTempFile::new_in(&parent).map_err(persistence)?;
    tmp.write_all(&buf).map_err(persistence)?;
    tmp.flush().map_err(persistence)?;
    tmp.as_file().sync_all().map_err(persistence)?;
    tmp.persist(path).map_err(|e| persistence(e.error))?;

    tracing::debug!("Wrote {} ({} bytes)", path.display(), buf.len());
    Ok(())
}

/// The symptom knowledge base: both persisted documents plus the derived index.
///
/// This is the explicit session state passed to every operation. Mutations
/// live in [`crate::catalog::editor`].
#[derive(Debug)]
pub struct KnowledgeBase {
    pub(crate) data_dir: PathBuf,

    /// All symptoms, in display order
    pub(crate) symptoms: Vec<Symptom>,

    /// Disease rules, in insertion order
    pub(crate) rules: RuleSet,

    /// Rebuilt after every load and mutation
    pub(crate) index: DerivedIndex,

    /// Problems found while loading (corrupt or unreadable files)
    warnings: Vec<String>,
}

impl KnowledgeBase {
    /// Open the knowledge base stored in `data_dir`.
    ///
    /// A missing directory is created together with empty documents. Corrupt
    /// or unreadable documents load as empty and are reported through
    /// [`KnowledgeBase::warnings`] instead of failing. Repeated symptom ids
    /// keep their first record; later ones are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Persistence` if the directory or the empty
    /// documents cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let data_dir = data_dir.into();

        if !data_dir.exists() {
            tracing::info!("Creating data directory {}", data_dir.display());
            std::fs::create_dir_all(&data_dir).map_err(|source| CatalogError::Persistence {
                path: data_dir.clone(),
                source,
            })?;
            write_document(&data_dir.join(SYMPTOMS_FILE), &Vec::<Symptom>::new())?;
            write_document(&data_dir.join(RULES_FILE), &RuleSet::new())?;
        }

        let mut warnings = Vec::new();
        let symptoms_path = data_dir.join(SYMPTOMS_FILE);
        let symptoms: Vec<Symptom> = load_or_warn(&symptoms_path, &mut warnings);
        let symptoms = drop_duplicate_ids(symptoms, &symptoms_path, &mut warnings);
        let rules: RuleSet = load_or_warn(&data_dir.join(RULES_FILE), &mut warnings);

        let mut kb = Self::from_parts(data_dir, symptoms, rules);
        kb.warnings = warnings;

        tracing::info!(
            "Loaded {} symptoms and {} disease rules",
            kb.symptoms.len(),
            kb.rules.len()
        );
        Ok(kb)
    }

    /// Build a knowledge base from in-memory data without touching disk.
    /// Mutations will still persist into `data_dir`.
    pub fn from_parts(data_dir: impl Into<PathBuf>, symptoms: Vec<Symptom>, rules: RuleSet) -> Self {
        let index = DerivedIndex::build(&symptoms, &rules);
        Self {
            data_dir: data_dir.into(),
            symptoms,
            rules,
            index,
            warnings: Vec::new(),
        }
    }

    /// Re-read both documents from disk, discarding in-memory state
    ///
    /// # Errors
    ///
    /// Same as [`KnowledgeBase::open`].
    pub fn reload(&mut self) -> Result<(), CatalogError> {
        *self = Self::open(self.data_dir.clone())?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn symptoms_path(&self) -> PathBuf {
        self.data_dir.join(SYMPTOMS_FILE)
    }

    pub fn rules_path(&self) -> PathBuf {
        self.data_dir.join(RULES_FILE)
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn index(&self) -> &DerivedIndex {
        &self.index
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get a symptom by id
    pub fn symptom(&self, id: &SymptomId) -> Option<&Symptom> {
        self.index.position(id).and_then(|pos| self.symptoms.get(pos))
    }

    /// Get a rule's symptom ids by disease name
    pub fn rule(&self, disease: &str) -> Option<&[SymptomId]> {
        self.rules.get(disease)
    }

    /// Like [`KnowledgeBase::rule`], but a missing disease is an error
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no rule exists for `disease`.
    pub fn require_rule(&self, disease: &str) -> Result<&[SymptomId], CatalogError> {
        self.rule(disease)
            .ok_or_else(|| CatalogError::NotFound(format!("disease '{disease}'")))
    }

    /// Names of the symptoms a rule refers to, in symptom-list order.
    /// Ids that no longer exist are skipped.
    pub fn rule_symptom_names(&self, disease: &str) -> Vec<&str> {
        let Some(ids) = self.rules.get(disease) else {
            return Vec::new();
        };
        self.symptoms
            .iter()
            .filter(|s| ids.contains(&s.id))
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Run a diagnosis for the selected symptom ids.
    ///
    /// Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DiagnosisError::EmptySelection` if no selected id resolves to
    /// a known symptom, or `DiagnosisError::NoRules` if no rules are defined.
    pub fn diagnose(
        &self,
        selected: &[SymptomId],
        threshold: Threshold,
    ) -> Result<Diagnosis, DiagnosisError> {
        let positions = self.index.resolve_selection(selected);
        if positions.is_empty() {
            return Err(DiagnosisError::EmptySelection);
        }
        if self.rules.is_empty() {
            return Err(DiagnosisError::NoRules);
        }

        let engine = MatchingEngine::with_config(&self.index, MatchingConfig { threshold });
        let outcomes = engine
            .find_matches(&positions)
            .into_iter()
            .filter_map(|m| {
                self.rules.name_at(m.disease_index).map(|name| DiseaseOutcome {
                    disease: name.to_string(),
                    percentage: m.score.percentage,
                    matched: m.matched,
                    matched_symptoms: m.score.matched_symptoms,
                    total_symptoms: m.score.total_symptoms,
                })
            })
            .collect();

        Ok(Diagnosis {
            threshold,
            selected_count: positions.len(),
            outcomes,
        })
    }

    /// Recompute the derived index from the current documents
    pub(crate) fn rebuild_index(&mut self) {
        self.index = DerivedIndex::build(&self.symptoms, &self.rules);
    }

    pub(crate) fn save_symptoms(&self) -> Result<(), CatalogError> {
        write_document(&self.symptoms_path(), &self.symptoms)
    }

    pub(crate) fn save_rules(&self) -> Result<(), CatalogError> {
        write_document(&self.rules_path(), &self.rules)
    }
}

/// Load a document, falling back to the empty default and recording a warning
fn load_or_warn<T>(path: &Path, warnings: &mut Vec<String>) -> T
where
    T: DeserializeOwned + Default,
{
    match load_document(path) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{e}; using empty data");
            warnings.push(format!("{e}. Using empty data."));
            T::default()
        }
    }
}

/// Keep the first symptom for each id, recording a warning for every dropped record
fn drop_duplicate_ids(
    symptoms: Vec<Symptom>,
    path: &Path,
    warnings: &mut Vec<String>,
) -> Vec<Symptom> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(symptoms.len());
    for symptom in symptoms {
        if seen.insert(symptom.id.clone()) {
            kept.push(symptom);
        } else {
            let msg = format!(
                "Malformed data in {}: duplicate symptom id '{}' ({}). Keeping the first record.",
                path.display(),
                symptom.id,
                symptom.name
            );
            tracing::warn!("{msg}");
            warnings.push(msg);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn sample_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            SYMPTOMS_FILE,
            r#"[{"id": "G001", "name": "Fever"}, {"id": "G002", "name": "Cough"}, {"id": "G003", "name": "Rash"}]"#,
        );
        write(dir.path(), RULES_FILE, r#"{"Flu": ["G001", "G002"]}"#);
        dir
    }

    #[test]
    fn test_open_existing() {
        let dir = sample_dir();
        let kb = KnowledgeBase::open(dir.path()).unwrap();

        assert_eq!(kb.symptoms().len(), 3);
        assert_eq!(kb.rules().len(), 1);
        assert!(kb.warnings().is_empty());
        assert_eq!(kb.index().disease_positions(), &[vec![0, 1]]);
        assert_eq!(
            kb.symptom(&SymptomId::new("G003")).map(|s| s.name.as_str()),
            Some("Rash")
        );
    }

    #[test]
    fn test_open_bootstraps_missing_dir() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");

        let kb = KnowledgeBase::open(&data_dir).unwrap();
        assert!(kb.symptoms().is_empty());
        assert!(kb.rules().is_empty());

        let symptoms = std::fs::read_to_string(data_dir.join(SYMPTOMS_FILE)).unwrap();
        let rules = std::fs::read_to_string(data_dir.join(RULES_FILE)).unwrap();
        assert_eq!(symptoms.trim(), "[]");
        assert_eq!(rules.trim(), "{}");
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let kb = KnowledgeBase::open(dir.path()).unwrap();
        assert!(kb.symptoms().is_empty());
        assert!(kb.rules().is_empty());
        assert!(kb.warnings().is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first_record() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            SYMPTOMS_FILE,
            r#"[{"id": "G001", "name": "Fever"}, {"id": "G002", "name": "Cough"}, {"id": "G001", "name": "Fever again"}]"#,
        );
        write(dir.path(), RULES_FILE, r#"{"Flu": ["G001", "G002"]}"#);

        let kb = KnowledgeBase::open(dir.path()).unwrap();
        assert_eq!(kb.symptoms().len(), 2);
        assert_eq!(kb.warnings().len(), 1);
        assert!(kb.warnings()[0].contains("duplicate symptom id 'G001'"));
        assert_eq!(kb.index().disease_positions(), &[vec![0, 1]]);
        assert_eq!(
            kb.symptom(&SymptomId::new("G001")).map(|s| s.name.as_str()),
            Some("Fever")
        );
    }

    #[test]
    fn test_malformed_files_warn_and_load_empty() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), SYMPTOMS_FILE, "[{not json");
        write(dir.path(), RULES_FILE, r#"["wrong", "shape"]"#);

        let kb = KnowledgeBase::open(dir.path()).unwrap();
        assert!(kb.symptoms().is_empty());
        assert!(kb.rules().is_empty());
        assert_eq!(kb.warnings().len(), 2);
        assert!(kb.warnings()[0].contains(SYMPTOMS_FILE));
    }

    #[test]
    fn test_load_document_reports_malformed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), RULES_FILE, "{");
        let result: Result<RuleSet, _> = load_document(&dir.path().join(RULES_FILE));
        assert!(matches!(result, Err(CatalogError::MalformedData { .. })));
    }

    #[test]
    fn test_write_document_is_pretty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SYMPTOMS_FILE);
        write_document(&path, &vec![Symptom::new("G001", "Fever")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    {\n        \"id\": \"G001\""));

        // No stray temporary files left behind
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_document_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join(RULES_FILE);
        let result = write_document(&path, &RuleSet::new());
        assert!(matches!(result, Err(CatalogError::Persistence { .. })));
    }

    #[test]
    fn test_rule_symptom_names_follow_symptom_order() {
        let dir = sample_dir();
        write(dir.path(), RULES_FILE, r#"{"Flu": ["G002", "G404", "G001"]}"#);
        let kb = KnowledgeBase::open(dir.path()).unwrap();

        assert_eq!(kb.rule_symptom_names("Flu"), vec!["Fever", "Cough"]);
        assert!(kb.rule_symptom_names("Unknown").is_empty());
        assert!(matches!(
            kb.require_rule("Unknown"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_diagnose_scenario() {
        let dir = sample_dir();
        let kb = KnowledgeBase::open(dir.path()).unwrap();
        let selected = vec![SymptomId::new("G001")];

        let diagnosis = kb.diagnose(&selected, Threshold::new(50.0).unwrap()).unwrap();
        let flu = diagnosis.outcome("Flu").unwrap();
        assert!((flu.percentage - 50.0).abs() < f64::EPSILON);
        assert!(flu.matched);
        assert_eq!(flu.matched_symptoms, 1);
        assert_eq!(flu.total_symptoms, 2);

        let diagnosis = kb.diagnose(&selected, Threshold::new(50.01).unwrap()).unwrap();
        assert!(!diagnosis.outcome("Flu").unwrap().matched);
        assert_eq!(diagnosis.matched_count(), 0);
    }

    #[test]
    fn test_diagnose_preconditions() {
        let dir = sample_dir();
        let kb = KnowledgeBase::open(dir.path()).unwrap();
        assert_eq!(
            kb.diagnose(&[], Threshold::default()).unwrap_err(),
            DiagnosisError::EmptySelection
        );
        assert_eq!(
            kb.diagnose(&[SymptomId::new("G999")], Threshold::default())
                .unwrap_err(),
            DiagnosisError::EmptySelection
        );

        let empty_rules = KnowledgeBase::from_parts(
            dir.path(),
            kb.symptoms().to_vec(),
            RuleSet::new(),
        );
        assert_eq!(
            empty_rules
                .diagnose(&[SymptomId::new("G001")], Threshold::default())
                .unwrap_err(),
            DiagnosisError::NoRules
        );
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let dir = sample_dir();
        let mut kb = KnowledgeBase::open(dir.path()).unwrap();
        write(dir.path(), RULES_FILE, r#"{"Flu": ["G001"], "Measles": ["G003"]}"#);

        kb.reload().unwrap();
        assert_eq!(kb.rules().len(), 2);
        assert_eq!(kb.index().disease_positions(), &[vec![0], vec![2]]);
    }
}
