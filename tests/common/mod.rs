#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use calamine::{Reader, open_workbook_auto};
use roster_sort::sheet::{Column, RawTable, cell_text};
use rust_xlsxwriter::Workbook;
use tempfile::{TempDir, tempdir};

/// A roster cell written into a fixture workbook.
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Empty,
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Creates (if needed) and returns a subdirectory of the workspace.
    pub fn dir(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::create_dir_all(&path).expect("create workspace subdirectory");
        path
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes a single-sheet workbook with a header row under the workspace.
    pub fn write_xlsx(&self, name: &str, headers: &[&str], rows: &[Vec<Cell>]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        write_xlsx(&path, headers, rows);
        path
    }
}

pub fn write_xlsx(path: &Path, headers: &[&str], rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *header)
            .expect("write header");
    }
    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    sheet
                        .write_string(row_num, col as u16, *text)
                        .expect("write text cell");
                }
                Cell::Number(value) => {
                    sheet
                        .write_number(row_num, col as u16, *value)
                        .expect("write number cell");
                }
                Cell::Empty => {}
            }
        }
    }
    workbook.save(path).expect("save fixture workbook");
}

/// Reads every row of the first worksheet as text, header included.
pub fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).expect("open report");
    let range = workbook
        .worksheet_range_at(0)
        .expect("report has a sheet")
        .expect("read report sheet");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell_text(cell).unwrap_or_default()).collect())
        .collect()
}

/// Raw `xl/styles.xml` of a saved workbook, for checking fills and borders.
pub fn read_styles(path: &Path) -> String {
    let file = File::open(path).expect("open report");
    let mut archive = zip::ZipArchive::new(file).expect("report is a zip archive");
    let mut styles = archive.by_name("xl/styles.xml").expect("report has styles");
    let mut xml = String::new();
    styles.read_to_string(&mut xml).expect("read styles");
    xml
}

/// The three-column table used throughout the detection scenarios.
pub fn scenario_table() -> RawTable {
    RawTable::new(vec![
        Column::from_strs("X", &["张三", "李四"]),
        Column::from_strs("Y", &["13912345678", "not a phone"]),
        Column::from_strs("Z", &["110101199001011234", "bad"]),
    ])
}
