//! Knowledge base storage, indexing and editing.
//!
//! The knowledge base lives in a data directory holding two JSON documents:
//!
//! - `symptoms.json`: array of `{"id": ..., "name": ...}` records
//! - `rules.json`: object mapping disease name to an array of symptom ids
//!
//! Both are read when a [`KnowledgeBase`] is opened and rewritten in full after
//! every mutation. A missing document loads as empty; a corrupt one loads as
//! empty and is reported through [`KnowledgeBase::warnings`].
//!
//! The [`DerivedIndex`] maps symptom ids and rules onto list positions for the
//! matching engine. It is never persisted and never patched in place: every
//! load and every edit rebuilds it from the two documents.
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_solver::{KnowledgeBase, SymptomId, Threshold};
//!
//! let mut kb = KnowledgeBase::open("data").unwrap();
//! kb.add_symptom("G001", "Fever").unwrap();
//! kb.add_symptom("G002", "Cough").unwrap();
//! kb.save_rule("Flu", vec![SymptomId::new("G001"), SymptomId::new("G002")], true)
//!     .unwrap();
//!
//! let diagnosis = kb
//!     .diagnose(&[SymptomId::new("G001")], Threshold::new(50.0).unwrap())
//!     .unwrap();
//! for outcome in diagnosis.matched() {
//!     println!("{}: {:.2}%", outcome.disease, outcome.percentage);
//! }
//! ```
//!
//! [`KnowledgeBase`]: store::KnowledgeBase
//! [`KnowledgeBase::warnings`]: store::KnowledgeBase::warnings
//! [`DerivedIndex`]: index::DerivedIndex

pub mod editor;
pub mod index;
pub mod store;
