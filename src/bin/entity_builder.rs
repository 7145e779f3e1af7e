//! Entity Builder CLI
//!
//! Resolves a parsed model (JSON) into entity documents and writes them
//! next to the documents of earlier runs.

use anyhow::Context;
use clap::Parser;
use model_entities::export::{to_json, write_entities};
use model_entities::{DatabaseType, EntityRequest, GeneratorConfig, ParsedModel, PriorEntities};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "entity-builder")]
#[command(about = "Resolve a parsed domain model into entity descriptors")]
struct Cli {
    /// Parsed model (JSON)
    #[arg(short, long)]
    model: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Target storage family, overrides the configuration
    #[arg(short, long)]
    database: Option<DatabaseType>,

    /// Output directory, overrides the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the entities instead of writing them
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GeneratorConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    let model = ParsedModel::from_path(&cli.model)
        .with_context(|| format!("failed to read model {}", cli.model.display()))?;
    let prior = PriorEntities::from_directory(config.prior_state_dir()).context("failed to read prior state")?;
    let database = cli.database.unwrap_or(config.generation.database_type);

    let output = EntityRequest::new()
        .model(&model)
        .database_type(database)
        .options(config.options.clone())
        .prior_state(&prior)
        .create()?;

    if !output.diagnostics.is_empty() {
        eprint!("{}", output.diagnostics);
    }

    if cli.dry_run {
        for entry in &output.entities {
            println!("// {}", entry.class_name);
            println!("{}", to_json(&entry.descriptor, config.export.output_format)?);
        }
        return Ok(());
    }

    let dir = cli.output.unwrap_or_else(|| config.output_dir());
    let written = write_entities(&output.entities, &dir, config.export.output_format)?;
    println!("Wrote {} entities to {}", written.len(), dir.display());
    Ok(())
}
