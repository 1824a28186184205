//! Directory batch driver.
//!
//! Every `.xlsx` file in the input directory is processed independently into
//! a same-named file in the output directory. Files whose output already
//! exists are skipped, and a failure in one file is recorded and reported
//! without stopping the rest of the batch.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use encoding_rs::UTF_8;
use log::{error, info, warn};

use crate::{
    cli::RunArgs,
    config::{Config, Overrides},
    process::{self, FileReport},
};

#[derive(Debug)]
pub enum FileOutcome {
    Processed(FileReport),
    Skipped,
    Failed(String),
}

#[derive(Debug)]
pub struct BatchEntry {
    pub file_name: String,
    pub outcome: FileOutcome,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Processed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

/// `.xlsx` files directly inside `dir`, sorted by file name.
pub fn list_workbooks(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Listing input directory {dir:?}"))? {
        let path = entry?.path();
        let is_xlsx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
        if is_xlsx && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn run_batch(config: &Config) -> Result<BatchSummary> {
    if !config.input_dir.is_dir() {
        bail!("Input directory {:?} does not exist", config.input_dir);
    }
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Creating output directory {:?}", config.output_dir))?;

    let mut summary = BatchSummary::default();
    let inputs = list_workbooks(&config.input_dir)?;
    if inputs.is_empty() {
        info!("No .xlsx files found in {:?}", config.input_dir);
        return Ok(summary);
    }

    for input in inputs {
        let file_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = config.output_dir.join(&file_name);
        let outcome = if output.exists() {
            warn!("Skipping {file_name}: output already exists");
            FileOutcome::Skipped
        } else {
            match process::process_file(&input, &output, config, UTF_8) {
                Ok(report) => FileOutcome::Processed(report),
                Err(err) => {
                    error!("Failed to process {file_name}: {err:#}");
                    FileOutcome::Failed(format!("{err:#}"))
                }
            }
        };
        summary.entries.push(BatchEntry { file_name, outcome });
    }
    Ok(summary)
}

pub fn execute(args: &RunArgs) -> Result<()> {
    let config = Config::load_or_default(args.config.as_deref())?.apply(Overrides {
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        manual: args.columns.manual,
        name_column: args.columns.name_column.clone(),
        phone_column: args.columns.phone_column.clone(),
        id_column: args.columns.id_column.clone(),
    });
    info!(
        "Processing {:?} -> {:?} ({} columns)",
        config.input_dir,
        config.output_dir,
        if config.auto_detect { "detected" } else { "configured" }
    );
    let summary = run_batch(&config)?;
    info!(
        "Batch complete: {} processed, {} skipped, {} failed",
        summary.processed(),
        summary.skipped(),
        summary.failed()
    );
    Ok(())
}
