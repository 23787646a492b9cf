use std::path::Path;

use clap::{Args, Subcommand};

use crate::catalog::store::KnowledgeBase;
use crate::cli::{open_knowledge_base, OutputFormat};
use crate::utils::validation::{check_field_length, normalize_name, normalize_symptom_id};

#[derive(Args)]
pub struct SymptomArgs {
    #[command(subcommand)]
    pub command: SymptomCommands,
}

#[derive(Subcommand)]
pub enum SymptomCommands {
    /// List all symptoms in display order
    List,

    /// Add a new symptom
    Add {
        /// Symptom id (e.g. "G020"); trimmed and upper-cased
        #[arg(required = true)]
        id: String,

        /// Display name (e.g. "Stomach cramps")
        #[arg(required = true)]
        name: String,
    },

    /// Delete a symptom and remove it from every rule
    Delete {
        /// Symptom id
        #[arg(required = true)]
        id: String,
    },
}

pub fn run(
    args: SymptomArgs,
    data_dir: &Path,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut kb = open_knowledge_base(data_dir)?;

    match args.command {
        SymptomCommands::List => run_list(&kb, format, verbose),
        SymptomCommands::Add { id, name } => {
            let id = normalize_symptom_id(&id);
            let name = normalize_name(&name);
            for (field, value) in [("Symptom id", &id), ("Symptom name", &name)] {
                if let Some(msg) = check_field_length(field, value) {
                    anyhow::bail!(msg);
                }
            }
            let added = kb.add_symptom(&id, &name)?;
            println!("Added symptom '{}' (ID: {})", added.name, added.id);
            Ok(())
        }
        SymptomCommands::Delete { id } => {
            let id = id.trim();
            let name = kb.symptom(&id.into()).map(|s| s.name.clone());
            if kb.delete_symptom(id)? {
                println!(
                    "Deleted symptom '{}' (ID: {})",
                    name.unwrap_or_default(),
                    id
                );
            } else {
                println!("Symptom {id} not found; nothing deleted");
            }
            Ok(())
        }
    }
}

fn run_list(kb: &KnowledgeBase, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if kb.symptoms().is_empty() {
                println!("No symptoms defined. Add one with `symptom-solver symptom add`.");
                return Ok(());
            }

            let id_width = kb
                .symptoms()
                .iter()
                .map(|s| s.id.as_str().len())
                .max()
                .unwrap_or(2)
                .max(2);

            println!("Symptoms ({})\n", kb.symptoms().len());
            println!("{:<id_w$} {}", "ID", "Name", id_w = id_width);
            println!("{}", "-".repeat(id_width + 30));
            for symptom in kb.symptoms() {
                println!("{:<id_w$} {}", symptom.id.as_str(), symptom.name, id_w = id_width);
                if verbose {
                    println!("  └─ label: {}", symptom.display_label());
                }
            }
        }
        OutputFormat::Json => {
            let symptoms: Vec<_> = kb
                .symptoms()
                .iter()
                .enumerate()
                .map(|(position, s)| {
                    serde_json::json!({
                        "id": s.id,
                        "name": s.name,
                        "label": s.display_label(),
                        "position": position,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "count": symptoms.len(),
                    "symptoms": symptoms,
                }))?
            );
        }
        OutputFormat::Tsv => {
            println!("position\tid\tname");
            for (position, s) in kb.symptoms().iter().enumerate() {
                println!("{}\t{}\t{}", position, s.id, s.name);
            }
        }
    }
    Ok(())
}
