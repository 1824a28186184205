//! Single-file pipeline: read, resolve columns, extract, assemble, write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use encoding_rs::Encoding;
use log::info;

use crate::{
    band::AgeBand,
    cli::FileArgs,
    config::{Config, Overrides},
    detect::{self, FieldAssignment},
    error::RosterError,
    extract,
    report::{self, OutputRow},
    sheet::{self, RawTable},
    writer,
};

/// What happened to one successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub columns: String,
    pub records: usize,
    pub bands: Vec<(AgeBand, usize)>,
}

/// Picks the name/phone/ID columns either by detection or by configured name.
pub fn resolve_columns(table: &RawTable, config: &Config) -> Result<FieldAssignment, RosterError> {
    if config.auto_detect {
        detect::detect(table)
    } else {
        detect::resolve_manual(table, &config.manual_names)
    }
}

/// Runs the in-memory part of the pipeline against a fixed date.
pub fn build_report(
    table: &RawTable,
    config: &Config,
    today: NaiveDate,
) -> Result<(FieldAssignment, Vec<OutputRow>), RosterError> {
    let assignment = resolve_columns(table, config)?;
    let records = extract::extract_as_of(table, &assignment, today);
    Ok((assignment, report::assemble(&records)))
}

pub fn process_file(
    input: &Path,
    output: &Path,
    config: &Config,
    encoding: &'static Encoding,
) -> Result<FileReport> {
    info!("Processing {:?}", input);
    let table = sheet::read_table(input, encoding)
        .with_context(|| format!("Reading roster from {input:?}"))?;
    let (assignment, rows) = build_report(&table, config, Local::now().date_naive())
        .with_context(|| format!("Resolving columns in {input:?}"))?;
    let columns = assignment.describe(&table);
    if config.auto_detect {
        info!("Detected columns: {columns}");
    }
    writer::write_report(output, &rows)
        .with_context(|| format!("Writing report to {output:?}"))?;
    let report = FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        columns,
        records: table.row_count(),
        bands: report::band_counts(&rows),
    };
    info!("✓ Wrote {} record(s) to {:?}", report.records, output);
    Ok(report)
}

pub fn execute(args: &FileArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Output {:?} already exists; pass --force to overwrite it",
            args.output
        );
    }
    let encoding = sheet::resolve_encoding(args.input_encoding.as_deref())?;
    let config = Config::load_or_default(args.config.as_deref())?.apply(Overrides {
        manual: args.columns.manual,
        name_column: args.columns.name_column.clone(),
        phone_column: args.columns.phone_column.clone(),
        id_column: args.columns.id_column.clone(),
        ..Overrides::default()
    });
    let report = process_file(&args.input, &args.output, &config, encoding)?;
    for (band, count) in &report.bands {
        info!("  {band}: {count}");
    }
    Ok(())
}
