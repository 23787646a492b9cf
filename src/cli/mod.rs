//! Command-line interface for symptom-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **diagnose**: Score every disease against a set of selected symptoms
//! - **symptom**: List, add, or delete symptoms
//! - **rule**: List, show, save, or delete disease rules
//! - **serve**: Start the interactive web interface
//!
//! ## Usage
//!
//! ```text
//! # Add symptoms and a rule
//! symptom-solver symptom add G001 "Fever"
//! symptom-solver symptom add G002 "Cough"
//! symptom-solver rule save "Flu" -s G001 -s G002 --new
//!
//! # Diagnose with a 50% threshold
//! symptom-solver diagnose -s G001 --threshold 50
//!
//! # JSON output for scripting
//! symptom-solver --format json diagnose -s G001
//!
//! # Start web UI
//! symptom-solver serve --port 8080 --open
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::store::{KnowledgeBase, DEFAULT_DATA_DIR};

pub mod diagnose;
pub mod rule;
pub mod symptom;

#[derive(Parser)]
#[command(name = "symptom-solver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Match observed symptoms against an editable set of disease rules")]
#[command(
    long_about = "symptom-solver is a small rule-based expert system.\n\nEach disease is described by the symptoms it presents with. Select the symptoms you observe and every disease is scored by the share of its symptoms you selected:\n- Diseases at or above the threshold are reported as matched\n- Symptoms and rules can be edited and are saved to JSON files in the data directory"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding symptoms.json and rules.json
    #[arg(
        long,
        global = true,
        env = "SYMPTOM_SOLVER_DATA_DIR",
        default_value = DEFAULT_DATA_DIR
    )]
    pub data_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score diseases against selected symptoms
    Diagnose(diagnose::DiagnoseArgs),

    /// Manage the symptom list
    Symptom(symptom::SymptomArgs),

    /// Manage disease rules
    Rule(rule::RuleArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Open the knowledge base and print any load warnings to stderr
pub(crate) fn open_knowledge_base(data_dir: &std::path::Path) -> anyhow::Result<KnowledgeBase> {
    let kb = KnowledgeBase::open(data_dir)?;
    for warning in kb.warnings() {
        eprintln!("Warning: {warning}");
    }
    Ok(kb)
}
