//! # symptom-solver
//!
//! A small rule-based expert system for matching observed symptoms against
//! known diseases.
//!
//! Each disease is described by a rule listing the symptoms it presents with.
//! Given a selection of observed symptoms, every disease is scored by the share
//! of its symptoms that were selected, and reported as matched when that share
//! reaches a configurable percentage threshold.
//!
//! The symptom list and the rules are editable and persisted as two JSON
//! documents in a data directory.
//!
//! ## Features
//!
//! - **Threshold matching**: inclusive percentage threshold, every disease reported
//! - **Editable knowledge base**: add/delete symptoms, create/replace/delete rules
//! - **Consistent index**: positions re-derived from scratch after every edit
//! - **Crash-safe saves**: documents rewritten atomically through a temp file
//! - **CLI and web UI**: scripted use or a browser front end
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_solver::{KnowledgeBase, SymptomId, Threshold};
//!
//! let kb = KnowledgeBase::open("data").unwrap();
//! let selected = vec![SymptomId::new("G001"), SymptomId::new("G004")];
//!
//! match kb.diagnose(&selected, Threshold::default()) {
//!     Ok(diagnosis) => {
//!         for outcome in &diagnosis.outcomes {
//!             println!("{}: {:.2}% matched={}", outcome.disease, outcome.percentage, outcome.matched);
//!         }
//!     }
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Knowledge base storage, derived index and editing operations
//! - [`core`]: Core data types for symptoms and rules
//! - [`matching`]: Matching engine and scoring
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for the browser front end

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::editor::RuleChange;
pub use catalog::index::DerivedIndex;
pub use catalog::store::{CatalogError, KnowledgeBase};
pub use core::rule::RuleSet;
pub use core::symptom::Symptom;
pub use core::types::*;
pub use matching::diagnosis::{Diagnosis, DiagnosisError, DiseaseOutcome};
pub use matching::engine::{DiseaseMatch, MatchingEngine};
