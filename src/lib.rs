pub mod band;
pub mod batch;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod highlight;
pub mod patterns;
pub mod process;
pub mod report;
pub mod sheet;
pub mod table;
pub mod writer;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use serde::Serialize;

use crate::{
    cli::{Cli, Commands},
    config::Config,
    detect::{ColumnScore, Field},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("roster_sort", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => batch::execute(&args),
        Commands::File(args) => process::execute(&args),
        Commands::Detect(args) => handle_detect(&args),
        Commands::InitConfig(args) => handle_init_config(&args),
    }
}

#[derive(Debug, Serialize)]
struct ScoredColumn<'a> {
    column: &'a str,
    #[serde(flatten)]
    score: ColumnScore,
}

#[derive(Debug, Serialize)]
struct DetectionReport<'a> {
    columns: Vec<ScoredColumn<'a>>,
    name: Option<&'a str>,
    phone: Option<&'a str>,
    id: Option<&'a str>,
    missing: Vec<Field>,
}

fn handle_detect(args: &cli::DetectArgs) -> Result<()> {
    let encoding = sheet::resolve_encoding(args.input_encoding.as_deref())?;
    let table = sheet::read_table(&args.input, encoding)
        .with_context(|| format!("Reading roster from {:?}", args.input))?;
    let scores = detect::score_columns(&table);
    let resolved = detect::resolve(&scores);

    let assigned = |field: Field| {
        resolved
            .as_ref()
            .ok()
            .map(|assignment| table.column_name(assignment.column(field)))
    };
    let report = DetectionReport {
        columns: table
            .columns
            .iter()
            .zip(scores.iter())
            .map(|(column, score)| ScoredColumn {
                column: &column.name,
                score: *score,
            })
            .collect(),
        name: assigned(Field::Name),
        phone: assigned(Field::Phone),
        id: assigned(Field::Id),
        missing: resolved
            .as_ref()
            .err()
            .map(|err| err.missing_fields().to_vec())
            .unwrap_or_default(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let headers = ["column", "name", "phone", "id", "field"].map(String::from);
        let rows = report
            .columns
            .iter()
            .map(|scored| {
                let field = [Field::Name, Field::Phone, Field::Id]
                    .into_iter()
                    .find(|field| assigned(*field) == Some(scored.column))
                    .map(|field| field.to_string())
                    .unwrap_or_default();
                vec![
                    scored.column.to_string(),
                    format!("{:.2}", scored.score.name),
                    format!("{:.2}", scored.score.phone),
                    format!("{:.2}", scored.score.id),
                    field,
                ]
            })
            .collect::<Vec<_>>();
        table::print_table(&headers, &rows);
    }

    let assignment = resolved?;
    info!("Detected columns: {}", assignment.describe(&table));
    Ok(())
}

fn handle_init_config(args: &cli::InitConfigArgs) -> Result<()> {
    Config::default()
        .save(&args.output)
        .with_context(|| format!("Writing config to {:?}", args.output))?;
    info!("Default configuration written to {:?}", args.output);
    Ok(())
}
