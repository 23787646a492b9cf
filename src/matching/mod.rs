//! Symptom matching engine and scoring.
//!
//! - [`MatchingEngine`] / [`diagnose`]: score every disease against a selection
//! - [`MatchScore`]: matched / required symptom counts and the percentage
//! - [`Diagnosis`]: named, per-disease verdicts returned to callers
//!
//! ## Scoring
//!
//! For a disease whose rule resolves to symptom positions `P` and a selection `S`:
//!
//! ```text
//! percentage = 100 * |P ∩ S| / |P|     (0.0 when P is empty)
//! matched    = percentage >= threshold
//! ```
//!
//! Every disease is reported, in rule order, whether it matched or not.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use symptom_solver::matching::engine::diagnose;
//! use symptom_solver::Threshold;
//!
//! let disease_positions = vec![vec![0, 1], vec![2]];
//! let selected: HashSet<usize> = [0].into_iter().collect();
//!
//! let results = diagnose(&selected, &disease_positions, Threshold::new(50.0).unwrap());
//! assert!(results[0].matched);
//! assert!(!results[1].matched);
//! ```
//!
//! [`MatchingEngine`]: engine::MatchingEngine
//! [`diagnose`]: engine::diagnose
//! [`MatchScore`]: scoring::MatchScore
//! [`Diagnosis`]: diagnosis::Diagnosis

pub mod diagnosis;
pub mod engine;
pub mod scoring;

pub use diagnosis::{Diagnosis, DiagnosisError, DiseaseOutcome};
