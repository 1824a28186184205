use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::detect::Field;

/// Failures that abort processing of a single file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error(
        "Could not detect the {} column(s); check the data or configure the column names manually",
        .missing.iter().join(", ")
    )]
    AmbiguousColumns { missing: Vec<Field> },
    #[error(
        "Configured column(s) not found in the table: {}",
        .missing.iter().map(|name| format!("'{name}'")).join(", ")
    )]
    ManualColumnNotFound { missing: Vec<String> },
    #[error("Workbook {path:?} does not contain any worksheet")]
    EmptyWorkbook { path: PathBuf },
}

impl RosterError {
    /// Field names that could not be resolved, if this is a detection failure.
    pub fn missing_fields(&self) -> &[Field] {
        match self {
            RosterError::AmbiguousColumns { missing } => missing,
            _ => &[],
        }
    }
}
