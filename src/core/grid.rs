//! Sheet grid reading
//!
//! Every assembly spreadsheet is reduced to the rows of its first sheet, each
//! row an ordered list of cells. Workbooks (xlsx, xlsm, xlsb, xls, ods) are
//! read with calamine; comma and tab delimited files with the csv crate.

use calamine::{open_workbook_auto, Data, Reader};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions recognised as spreadsheets
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "tsv"];

static EMPTY_CELL: Cell = Cell::Empty;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// True for empty cells and cells holding only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// String form of the cell with surrounding whitespace removed
    pub fn trimmed(&self) -> String {
        self.to_string().trim().to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Rows of one sheet in sheet order. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col); missing cells read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

impl<R, C> FromIterator<R> for SheetGrid
where
    R: IntoIterator<Item = C>,
    C: Into<Cell>,
{
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// Errors raised while reading a spreadsheet file
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("cannot read delimited file {path:?}: {source}")]
    Delimited {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot open workbook {path:?}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {0:?} contains no sheets")]
    NoSheets(PathBuf),

    #[error("unsupported spreadsheet format '{extension}' for {path:?}")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// True if the path has one of the supported spreadsheet extensions
pub fn is_spreadsheet(path: &Path) -> bool {
    extension_of(path).map_or(false, |ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Read the first sheet of a spreadsheet file. Other sheets are ignored.
pub fn read_first_sheet(path: &Path) -> Result<SheetGrid, SheetError> {
    let extension = extension_of(path).unwrap_or_default();
    match extension.as_str() {
        "csv" => read_delimited(path, b','),
        "tsv" => read_delimited(path, b'\t'),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        _ => Err(SheetError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}

fn read_workbook(path: &Path) -> Result<SheetGrid, SheetError> {
    let workbook_error = |source| SheetError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::NoSheets(path.to_path_buf()))?
        .map_err(workbook_error)?;

    Ok(SheetGrid::new(
        range
            .rows()
            .map(|row| row.iter().map(convert_workbook_cell).collect())
            .collect(),
    ))
}

fn convert_workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<SheetGrid, SheetError> {
    let delimited_error = |source| SheetError::Delimited {
        path: path.to_path_buf(),
        source,
    };

    let contents = std::fs::read_to_string(path)
        .map_err(|e| delimited_error(csv::Error::from(e)))?;
    let contents = contents.trim_start_matches('\u{feff}');

    // The csv reader skips empty lines, but they terminate sections, so lines
    // are grouped here and only complete records are handed to it. A group
    // stays open while it holds an odd number of quotes (a quoted field
    // spanning lines).
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut pending = String::new();

    for line in contents.lines() {
        if pending.is_empty() && line.is_empty() {
            rows.push(Vec::new());
            continue;
        }
        if !pending.is_empty() {
            pending.push('\n');
        }
        pending.push_str(line);

        if pending.matches('"').count() % 2 == 0 {
            parse_records(&pending, delimiter, &mut rows).map_err(delimited_error)?;
            pending.clear();
        }
    }
    if !pending.is_empty() {
        parse_records(&pending, delimiter, &mut rows).map_err(delimited_error)?;
    }

    Ok(SheetGrid::new(rows))
}

fn parse_records(text: &str, delimiter: u8, rows: &mut Vec<Vec<Cell>>) -> Result<(), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    for result in reader.records() {
        // Delimited files carry no types; every value stays text and
        // quantities are parsed on demand.
        rows.push(result?.iter().map(Cell::from).collect());
    }
    Ok(())
}
