//! Verbalize CLI
//!
//! Reads one query record (JSON) and prints it back with the generated
//! question fields added.
//!
//! Usage:
//!   cargo run --features cli --bin verbalize -- record.json
//!   cat record.json | cargo run --features cli --bin verbalize -- --seed 7
//!   cargo run --features cli --bin verbalize -- record.json --labels sparql
//!
//! Settings not given on the command line come from `VERBALIZER_*`
//! environment variables (a `.env` file is honoured) or `--config`.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sparql_verbalizer::{LabelSource, QueryRecord, VerbalizerBuilder, VerbalizerConfig};

#[derive(Parser, Debug)]
#[command(name = "verbalize")]
#[command(about = "Generate a natural-language question for one SPARQL query record")]
struct Args {
    /// Record file (JSON); reads stdin when omitted
    record: Option<PathBuf>,

    /// YAML settings file (overrides VERBALIZER_* environment variables)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Seed for template choice
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// YAML template catalog replacing the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Label source: local | sparql
    #[arg(long, value_parser = parse_label_source)]
    labels: Option<LabelSource>,

    /// Print only the question instead of the full record
    #[arg(long, short = 'q')]
    question_only: bool,
}

fn parse_label_source(s: &str) -> std::result::Result<LabelSource, String> {
    s.parse()
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VerbalizerConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => VerbalizerConfig::from_env().context("Invalid VERBALIZER_* settings")?,
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(catalog) = args.catalog {
        config.catalog_path = Some(catalog);
    }
    if let Some(labels) = args.labels {
        config.label_source = labels;
    }

    let input = match &args.record {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read record from stdin")?;
            buf
        }
    };
    let mut record: QueryRecord =
        serde_json::from_str(&input).context("Input is not a query record")?;

    let mut verbalizer = VerbalizerBuilder::from_config(&config)?.build();
    tracing::info!(
        template_id = record.template_id,
        labels = ?config.label_source,
        "verbalizing record"
    );
    verbalizer
        .verbalize(&mut record)
        .with_context(|| format!("Failed to verbalize template {}", record.template_id))?;

    if args.question_only {
        println!("{}", record.question_verbalized.unwrap_or_default());
    } else {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}
