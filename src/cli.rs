use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Regroup roster spreadsheets by age band", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process every .xlsx file in the input directory
    Run(RunArgs),
    /// Process a single roster file into a report workbook
    File(FileArgs),
    /// Show per-column scores and the detected name/phone/ID columns
    Detect(DetectArgs),
    /// Write the default configuration as YAML
    InitConfig(InitConfigArgs),
}

/// Explicit column names; supplying any of them disables detection.
#[derive(Debug, Args, Default)]
pub struct ColumnArgs {
    /// Use the configured column names instead of detecting them
    #[arg(long)]
    pub manual: bool,
    /// Header of the name column
    #[arg(long = "name-column")]
    pub name_column: Option<String>,
    /// Header of the phone column
    #[arg(long = "phone-column")]
    pub phone_column: Option<String>,
    /// Header of the ID-number column
    #[arg(long = "id-column")]
    pub id_column: Option<String>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding the original rosters (overrides the config file)
    #[arg(short = 'i', long = "input-dir")]
    pub input_dir: Option<PathBuf>,
    /// Directory receiving the reports (overrides the config file)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Debug, Args)]
pub struct FileArgs {
    /// Roster to process (.xlsx, .xls, .ods, .csv or .tsv)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Report workbook to create
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Character encoding of CSV/TSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Overwrite the output if it already exists
    #[arg(long)]
    pub force: bool,
    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Roster to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Character encoding of CSV/TSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Destination YAML file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}
