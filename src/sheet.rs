//! Input side of the pipeline: turns a spreadsheet file into a [`RawTable`].
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read through
//! `calamine`; only the first worksheet is used and its first row supplies the
//! column names. Delimited text (`.csv`, `.tsv`) is read with the `csv` crate and
//! decoded with `encoding_rs`, which matters for rosters exported as GBK.

use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};

use crate::error::RosterError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// One named column of raw cell text. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Convenience constructor treating empty strings as missing cells.
    pub fn from_strs(name: impl Into<String>, cells: &[&str]) -> Self {
        let cells = cells
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
            .collect();
        Self::new(name, cells)
    }

    pub fn cell(&self, row: usize) -> Option<&str> {
        self.cells.get(row).and_then(|cell| cell.as_deref())
    }
}

/// Rectangular table of cell text, ordered by column then row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: Vec<Column>,
}

impl RawTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Builds a table from a header row and data rows, giving empty or
    /// repeated headers a synthetic `column_{n}` name.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(headers.len());
        let names = unique_headers(headers, width);
        let mut columns = names
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect::<Vec<_>>();
        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.cells.push(cells.next().flatten());
            }
        }
        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|column| column.cells.len())
            .max()
            .unwrap_or(0)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn column_name(&self, index: usize) -> &str {
        self.columns
            .get(index)
            .map(|column| column.name.as_str())
            .unwrap_or("")
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&str> {
        self.columns.get(column).and_then(|c| c.cell(row))
    }
}

fn unique_headers(headers: Vec<String>, width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(width);
    let mut raw = headers.into_iter();
    for idx in 0..width {
        let candidate = raw.next().map(|h| h.trim().to_string()).unwrap_or_default();
        let mut name = if candidate.is_empty() || seen.contains(&candidate) {
            format!("column_{}", idx + 1)
        } else {
            candidate
        };
        let mut suffix = 2;
        while seen.contains(&name) {
            name = format!("column_{}_{suffix}", idx + 1);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Reads `path` into a [`RawTable`], choosing the reader from the extension.
pub fn read_table(path: &Path, encoding: &'static Encoding) -> Result<RawTable> {
    match extension(path).as_deref() {
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook(path),
        Some("tsv") => read_delimited(path, DEFAULT_TSV_DELIMITER, encoding),
        Some("csv") => read_delimited(path, DEFAULT_CSV_DELIMITER, encoding),
        _ => bail!("Unsupported input format for {path:?}"),
    }
}

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Opening workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RosterError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .with_context(|| format!("Reading first worksheet of {}", path.display()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default())
            .collect(),
        None => return Ok(RawTable::default()),
    };
    let data = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(RawTable::from_rows(headers, data))
}

fn read_delimited(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<RawTable> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(BufReader::new(file));
    let headers = reader
        .byte_headers()
        .with_context(|| format!("Reading header row of {path:?}"))?
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record =
            record.with_context(|| format!("Reading row {} in {:?}", row_idx + 2, path))?;
        let row = record
            .iter()
            .map(|field| {
                decode_bytes(field, encoding).map(|text| (!text.is_empty()).then_some(text))
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(RawTable::from_rows(headers, rows))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

/// Text form of a workbook cell; empty cells and empty strings are missing.
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

// Phone numbers typed into numeric cells come back as floats. Anything past
// 15 significant digits has already lost precision in the workbook, so it is
// rendered in exponent form and can no longer pass for an ID number.
fn format_float(value: f64) -> String {
    if value.abs() >= 1e15 {
        format!("{value:e}")
    } else if value.fract() == 0.0 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(cell_text(&Data::Float(13912345678.0)).unwrap(), "13912345678");
        assert_eq!(cell_text(&Data::Float(2.5)).unwrap(), "2.5");
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String(String::new())), None);
    }

    #[test]
    fn numeric_id_cells_do_not_yield_an_id() {
        for value in [110101199001011234.0, 1.10101199001011e17] {
            let text = cell_text(&Data::Float(value)).unwrap();
            assert!(text.contains('e'), "{text}");
            assert_eq!(crate::patterns::extract_id(&text), "");
        }
        assert_eq!(cell_text(&Data::Float(-13912345678.0)).unwrap(), "-13912345678");
    }

    #[test]
    fn blank_and_duplicate_headers_get_synthetic_names() {
        let table = RawTable::from_rows(
            vec!["姓名".into(), "".into(), "姓名".into()],
            vec![vec![Some("张三".into()), None, Some("x".into()), Some("extra".into())]],
        );
        let names = table
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["姓名", "column_2", "column_3", "column_4"]);
        assert_eq!(table.cell(3, 0), Some("extra"));
        assert_eq!(table.cell(1, 0), None);
    }

    #[test]
    fn short_rows_are_padded_with_missing_cells() {
        let table = RawTable::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Some("1".into())], vec![Some("2".into()), Some("3".into())]],
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), None);
        assert_eq!(table.cell(1, 1), Some("3"));
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        assert!(resolve_encoding(Some("gbk")).is_ok());
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
    }
}
