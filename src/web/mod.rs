//! Web server for the browser front end.
//!
//! This module serves a single HTML page and a small JSON API using Axum.
//! All handlers share one [`KnowledgeBase`] behind a mutex, so every request
//! sees a consistent snapshot and edits are applied one at a time.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! symptom-solver serve
//!
//! # Custom port, custom data directory, auto-open browser
//! symptom-solver --data-dir ./kb serve --port 3000 --open
//!
//! # Bind to all interfaces
//! symptom-solver serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Diagnosis and expert editing page
//! - `GET /api/symptoms`, `POST /api/symptoms` - List or add symptoms
//! - `DELETE /api/symptoms/{id}` - Delete a symptom
//! - `GET /api/rules`, `PUT /api/rules` - List or save disease rules
//! - `DELETE /api/rules/{name}` - Delete a disease
//! - `POST /api/diagnose` - Score diseases against selected symptoms
//! - `GET /api/warnings` - Problems found while loading the data files
//!
//! [`KnowledgeBase`]: crate::catalog::store::KnowledgeBase

pub mod server;
