use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod matching;
mod utils;
mod web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("symptom_solver=debug,info")
    } else {
        EnvFilter::new("symptom_solver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Diagnose(args) => {
            cli::diagnose::run(args, &cli.data_dir, cli.format, cli.verbose)?;
        }
        cli::Commands::Symptom(args) => {
            cli::symptom::run(args, &cli.data_dir, cli.format, cli.verbose)?;
        }
        cli::Commands::Rule(args) => {
            cli::rule::run(args, &cli.data_dir, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args, cli.data_dir)?;
        }
    }

    Ok(())
}
