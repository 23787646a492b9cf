//! Core data types for the symptom knowledge base.
//!
//! - [`Symptom`]: a selectable symptom with a stable id and a display name
//! - [`RuleSet`]: ordered mapping from disease name to the symptom ids it requires
//! - [`SymptomId`], [`Threshold`]: identifier and percentage newtypes
//!
//! ## Ordering
//!
//! Both collections are ordered. The position of a symptom in the symptom list
//! and the position of a disease in the rule set are what the matching engine
//! works with, so neither is ever re-sorted:
//!
//! | Collection | Order defined by | Changes on |
//! |------------|------------------|------------|
//! | symptoms   | list order       | append, delete |
//! | rules      | insertion order  | insert of a new disease, delete |
//!
//! [`Symptom`]: symptom::Symptom
//! [`RuleSet`]: rule::RuleSet
//! [`SymptomId`]: types::SymptomId
//! [`Threshold`]: types::Threshold

pub mod rule;
pub mod symptom;
pub mod types;
