//! Output side of the pipeline: renders assembled rows into an `.xlsx` file.
//!
//! The sheet always has five columns. Every cell of the grid, blank
//! separators included, carries a thin border and centred alignment. Phone and
//! ID cells use the text number format so Excel keeps leading digits intact,
//! and data rows are filled according to their [`HighlightClass`].

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::{extract::Record, highlight::HighlightClass, report::OutputRow};

pub const SHEET_NAME: &str = "Sheet1";
pub const HEADERS: [&str; 5] = ["姓名", "手机", "身份证号", "年龄", "年龄段"];
pub const COLUMN_WIDTHS: [f64; 5] = [10.0, 15.0, 30.0, 10.0, 12.0];

const PHONE_COL: u16 = 1;
const ID_COL: u16 = 2;
const AGE_COL: u16 = 3;

enum Cell<'a> {
    Text(&'a str),
    Owned(String),
    Number(f64),
    Empty,
}

pub fn write_report(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    render(worksheet, rows)?;
    workbook
        .save(path)
        .with_context(|| format!("Saving report {path:?}"))?;
    Ok(())
}

/// Writes the header row and `rows` into `worksheet`.
pub fn render(worksheet: &mut Worksheet, rows: &[OutputRow]) -> Result<()> {
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(cast_col(col)?, *width)?;
    }

    let header_format = base_format().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, cast_col(col)?, *header, &header_format)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let row_num = cast_row(idx + 1)?;
        let class = row.highlight();
        for (col, cell) in row_cells(row).into_iter().enumerate() {
            let col = cast_col(col)?;
            let format = cell_format(col, class);
            match cell {
                Cell::Text(text) if !text.is_empty() => {
                    worksheet.write_string_with_format(row_num, col, text, &format)?;
                }
                Cell::Owned(text) => {
                    worksheet.write_string_with_format(row_num, col, &text, &format)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number_with_format(row_num, col, value, &format)?;
                }
                Cell::Text(_) | Cell::Empty => {
                    worksheet.write_blank(row_num, col, &format)?;
                }
            }
        }
    }
    Ok(())
}

fn row_cells(row: &OutputRow) -> [Cell<'_>; 5] {
    match row {
        OutputRow::Data(record) => data_cells(record),
        OutputRow::Count { count, .. } => [
            Cell::Owned(format!("人数：{count}")),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ],
        OutputRow::Blank => [Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
    }
}

fn data_cells(record: &Record) -> [Cell<'_>; 5] {
    [
        Cell::Text(&record.name),
        Cell::Text(&record.phone),
        Cell::Text(&record.id_number),
        record
            .age
            .map(|age| Cell::Number(f64::from(age)))
            .unwrap_or(Cell::Empty),
        Cell::Text(record.band.label()),
    ]
}

fn base_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

fn cell_format(col: u16, class: HighlightClass) -> Format {
    let mut format = base_format();
    if col == PHONE_COL || col == ID_COL {
        format = format.set_num_format("@");
    } else if col == AGE_COL {
        format = format.set_num_format("0");
    }
    if let Some(color) = class.fill_color() {
        format = format.set_background_color(color);
    }
    format
}

fn cast_row(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("row index overflow: {value}"))
}

fn cast_col(value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| anyhow!("column index overflow: {value}"))
}
