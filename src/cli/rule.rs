use std::path::Path;

use clap::{Args, Subcommand};

use crate::catalog::editor::RuleChange;
use crate::catalog::store::KnowledgeBase;
use crate::cli::{open_knowledge_base, OutputFormat};
use crate::utils::validation::{check_field_length, collect_symptom_ids, normalize_name};

#[derive(Args)]
pub struct RuleArgs {
    #[command(subcommand)]
    pub command: RuleCommands,
}

#[derive(Subcommand)]
pub enum RuleCommands {
    /// List all disease rules
    List,

    /// Show the symptoms of one disease rule
    Show {
        /// Disease name
        #[arg(required = true)]
        name: String,
    },

    /// Create or replace the rule for a disease
    Save {
        /// Disease name
        #[arg(required = true)]
        name: String,

        /// Symptom id; repeat for several. Replaces the existing list.
        #[arg(short = 's', long = "symptom", required = true, num_args = 1..)]
        symptoms: Vec<String>,

        /// Mark this as a new disease (warns if it already exists)
        #[arg(long)]
        new: bool,
    },

    /// Delete a disease rule
    Delete {
        /// Disease name
        #[arg(required = true)]
        name: String,
    },
}

pub fn run(
    args: RuleArgs,
    data_dir: &Path,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut kb = open_knowledge_base(data_dir)?;

    match args.command {
        RuleCommands::List => run_list(&kb, format, verbose),
        RuleCommands::Show { name } => run_show(&kb, &normalize_name(&name), format),
        RuleCommands::Save {
            name,
            symptoms,
            new,
        } => {
            let name = normalize_name(&name);
            if let Some(msg) = check_field_length("Disease name", &name) {
                anyhow::bail!(msg);
            }
            let ids = collect_symptom_ids(symptoms.iter().map(String::as_str));

            for id in &ids {
                if kb.symptom(id).is_none() {
                    eprintln!("Warning: symptom {id} does not exist and will be ignored when matching");
                }
            }

            match kb.save_rule(&name, ids, new)? {
                RuleChange::Created => println!("Created rule for '{name}'"),
                RuleChange::Updated => println!("Updated rule for '{name}'"),
            }
            Ok(())
        }
        RuleCommands::Delete { name } => {
            let name = normalize_name(&name);
            if kb.delete_disease(&name)? {
                println!("Deleted disease '{name}'");
            } else {
                println!("Disease '{name}' not found; nothing deleted");
            }
            Ok(())
        }
    }
}

fn run_list(kb: &KnowledgeBase, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if kb.rules().is_empty() {
                println!("No disease rules defined. Add one with `symptom-solver rule save`.");
                return Ok(());
            }

            println!("Disease Rules ({})\n", kb.rules().len());
            for (name, ids) in kb.rules().iter() {
                let names = kb.rule_symptom_names(name);
                let summary = if names.is_empty() {
                    "no associated symptoms".to_string()
                } else {
                    names.join(", ")
                };
                println!("{name}: {summary}");
                if verbose {
                    let raw: Vec<_> = ids.iter().map(|id| id.as_str()).collect();
                    println!("  └─ ids: {}", raw.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let rules: Vec<_> = kb
                .rules()
                .iter()
                .map(|(name, ids)| {
                    serde_json::json!({
                        "name": name,
                        "symptom_ids": ids,
                        "symptom_names": kb.rule_symptom_names(name),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "count": rules.len(),
                    "rules": rules,
                }))?
            );
        }
        OutputFormat::Tsv => {
            println!("disease\tsymptom_ids");
            for (name, ids) in kb.rules().iter() {
                let raw: Vec<_> = ids.iter().map(|id| id.as_str()).collect();
                println!("{}\t{}", name, raw.join(","));
            }
        }
    }
    Ok(())
}

fn run_show(kb: &KnowledgeBase, name: &str, format: OutputFormat) -> anyhow::Result<()> {
    let ids = kb.require_rule(name)?;

    match format {
        OutputFormat::Text => {
            println!("{name}");
            println!("{}", "=".repeat(name.len().max(10)));
            for id in ids {
                match kb.symptom(id) {
                    Some(s) => println!("  {:<8} {}", id.as_str(), s.name),
                    None => println!("  {:<8} (unknown symptom)", id.as_str()),
                }
            }
        }
        OutputFormat::Json => {
            let symptoms: Vec<_> = ids
                .iter()
                .map(|id| {
                    serde_json::json!({
                        "id": id,
                        "name": kb.symptom(id).map(|s| s.name.as_str()),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "name": name,
                    "symptoms": symptoms,
                }))?
            );
        }
        OutputFormat::Tsv => {
            println!("id\tname");
            for id in ids {
                let symptom_name = kb.symptom(id).map_or("", |s| s.name.as_str());
                println!("{}\t{}", id, symptom_name);
            }
        }
    }
    Ok(())
}
