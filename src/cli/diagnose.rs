use std::path::Path;

use clap::Args;

use crate::cli::{open_knowledge_base, OutputFormat};
use crate::core::types::Threshold;
use crate::matching::diagnosis::Diagnosis;
use crate::utils::validation::{collect_symptom_ids, parse_threshold};

#[derive(Args)]
pub struct DiagnoseArgs {
    /// Selected symptom id; repeat for several (e.g. -s G001 -s G004)
    #[arg(short = 's', long = "symptom", required = true, num_args = 1..)]
    pub symptoms: Vec<String>,

    /// Minimum match percentage (0-100, inclusive)
    #[arg(short, long, default_value = "20", value_parser = parse_threshold)]
    pub threshold: Threshold,

    /// Only list diseases that reached the threshold
    #[arg(long)]
    pub matched_only: bool,
}

pub fn run(
    args: DiagnoseArgs,
    data_dir: &Path,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let kb = open_knowledge_base(data_dir)?;

    let selected = collect_symptom_ids(args.symptoms.iter().map(String::as_str));

    if verbose {
        for id in &selected {
            match kb.symptom(id) {
                Some(s) => eprintln!("Selected: {}", s.display_label()),
                None => eprintln!("Ignoring unknown symptom id: {id}"),
            }
        }
    }

    let diagnosis = kb.diagnose(&selected, args.threshold)?;

    match format {
        OutputFormat::Text => print_text(&diagnosis, args.matched_only),
        OutputFormat::Json => print_json(&diagnosis, args.matched_only)?,
        OutputFormat::Tsv => print_tsv(&diagnosis, args.matched_only),
    }

    Ok(())
}

fn print_text(diagnosis: &Diagnosis, matched_only: bool) {
    println!("Diagnosis Results (threshold {})", diagnosis.threshold);
    println!("{}", "=".repeat(60));

    let mut shown = 0usize;
    for outcome in &diagnosis.outcomes {
        if matched_only && !outcome.matched {
            continue;
        }
        shown += 1;
        let verdict = if outcome.matched { "MATCH" } else { "no match" };
        println!(
            "  {:<8} {}: {:.2}% ({}/{} symptoms)",
            verdict,
            outcome.disease,
            outcome.percentage,
            outcome.matched_symptoms,
            outcome.total_symptoms
        );
    }

    if shown == 0 {
        println!("  No disease reached the threshold for the selected symptoms.");
    }

    println!(
        "\n{} of {} diseases matched",
        diagnosis.matched_count(),
        diagnosis.outcomes.len()
    );
}

fn print_json(diagnosis: &Diagnosis, matched_only: bool) -> anyhow::Result<()> {
    let outcomes: Vec<_> = diagnosis
        .outcomes
        .iter()
        .filter(|o| !matched_only || o.matched)
        .collect();

    let output = serde_json::json!({
        "threshold": diagnosis.threshold.value(),
        "selected_count": diagnosis.selected_count,
        "matched_count": diagnosis.matched_count(),
        "outcomes": outcomes,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(diagnosis: &Diagnosis, matched_only: bool) {
    println!("disease\tpercentage\tmatched\tmatched_symptoms\ttotal_symptoms");
    for outcome in &diagnosis.outcomes {
        if matched_only && !outcome.matched {
            continue;
        }
        println!(
            "{}\t{:.4}\t{}\t{}\t{}",
            outcome.disease,
            outcome.percentage,
            outcome.matched,
            outcome.matched_symptoms,
            outcome.total_symptoms
        );
    }
}
