//! Tabular upload reader.
//!
//! Sniffs the file format: ZIP magic means a workbook (xlsx/ods, read via
//! `calamine`, first sheet only); anything else is parsed as CSV with
//! RFC 4180 quoting. Either way the result is a header row plus data rows
//! keyed by exact column name.

use std::{collections::HashMap, path::Path};

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;

use crate::error::{Error, Result};

// ─── Cell values ─────────────────────────────────────────────────────────────

/// A raw cell as provided by the spreadsheet library.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
  Text(String),
  Number(f64),
  Date(NaiveDate),
  Empty,
}

impl CellValue {
  /// Empty cell, or text that is blank after trimming.
  pub fn is_blank(&self) -> bool {
    match self {
      CellValue::Empty => true,
      CellValue::Text(s) => s.trim().is_empty(),
      _ => false,
    }
  }

  /// Coerce to a string the way the legacy importer did (`String(value)`).
  /// Integral floats render without a decimal point.
  pub fn to_text(&self) -> String {
    match self {
      CellValue::Text(s) => s.clone(),
      CellValue::Number(n) => format!("{n}"),
      CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
      CellValue::Empty => String::new(),
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One data row: a mapping of column name to raw value. Column names are
/// case- and whitespace-sensitive exact matches against the header row.
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
  columns: HashMap<String, CellValue>,
}

impl SheetRow {
  pub fn new(columns: HashMap<String, CellValue>) -> Self { Self { columns } }

  pub fn get(&self, column: &str) -> Option<&CellValue> {
    self.columns.get(column)
  }

  /// Trimmed text for a column; `None` when the cell is missing or blank.
  pub fn text(&self, column: &str) -> Option<String> {
    let cell = self.columns.get(column)?;
    if cell.is_blank() {
      return None;
    }
    Some(cell.to_text().trim().to_string())
  }
}

/// A parsed upload: the header row plus every data row beneath it.
#[derive(Debug, Clone)]
pub struct Sheet {
  pub header: Vec<String>,
  pub rows:   Vec<SheetRow>,
}

// ─── Reading ─────────────────────────────────────────────────────────────────

/// Read an uploaded file into a [`Sheet`].
///
/// Returns [`Error::EmptyFile`] when there is no header row at all.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
  let bytes = std::fs::read(path)?;
  if bytes.starts_with(b"PK") {
    read_workbook(path)
  } else {
    let text = String::from_utf8_lossy(&bytes);
    read_csv(&text)
  }
}

fn read_workbook(path: &Path) -> Result<Sheet> {
  let mut workbook =
    open_workbook_auto(path).map_err(|e| Error::Workbook(e.to_string()))?;

  // First sheet only.
  let sheet_name = workbook
    .sheet_names()
    .first()
    .cloned()
    .ok_or(Error::EmptyFile)?;
  let range = workbook
    .worksheet_range(&sheet_name)
    .map_err(|e| Error::Workbook(e.to_string()))?;

  let mut rows = range.rows();
  let header: Vec<String> = rows
    .next()
    .ok_or(Error::EmptyFile)?
    .iter()
    .map(|cell| cell_to_value(cell).to_text().trim().to_string())
    .collect();

  let data = rows
    .map(|cells| build_row(&header, cells.iter().map(cell_to_value).collect()))
    .collect();

  Ok(Sheet { header, rows: data })
}

fn cell_to_value(cell: &Data) -> CellValue {
  match cell {
    Data::Empty => CellValue::Empty,
    Data::String(s) => CellValue::Text(s.clone()),
    Data::Int(n) => CellValue::Number(*n as f64),
    Data::Float(f) => CellValue::Number(*f),
    Data::Bool(b) => CellValue::Text(b.to_string()),
    Data::DateTime(dt) => match dt.as_datetime() {
      Some(ndt) => CellValue::Date(ndt.date()),
      None => CellValue::Empty,
    },
    Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    // Formula errors degrade to blanks rather than failing the row.
    Data::Error(_) => CellValue::Empty,
  }
}

fn build_row(header: &[String], cells: Vec<CellValue>) -> SheetRow {
  let columns = header
    .iter()
    .zip(cells)
    .filter(|(name, _)| !name.is_empty())
    .map(|(name, cell)| (name.clone(), cell))
    .collect();
  SheetRow::new(columns)
}

// ─── CSV ─────────────────────────────────────────────────────────────────────

fn read_csv(text: &str) -> Result<Sheet> {
  let mut records = parse_csv(text).into_iter();
  let header: Vec<String> = records
    .next()
    .ok_or(Error::EmptyFile)?
    .into_iter()
    .map(|field| field.trim().to_string())
    .collect();

  let rows = records
    .map(|fields| {
      let cells = fields
        .into_iter()
        .map(|f| {
          if f.is_empty() { CellValue::Empty } else { CellValue::Text(f) }
        })
        .collect();
      build_row(&header, cells)
    })
    .collect();

  Ok(Sheet { header, rows })
}

/// Split CSV text into records of fields, honouring RFC 4180 quoting:
/// quoted fields may contain commas, newlines, and doubled-quote escapes.
fn parse_csv(text: &str) -> Vec<Vec<String>> {
  let mut records: Vec<Vec<String>> = Vec::new();
  let mut record: Vec<String> = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;

  let mut chars = text.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes => {
        if chars.peek() == Some(&'"') {
          chars.next();
          field.push('"');
        } else {
          in_quotes = false;
        }
      }
      '"' if field.is_empty() => in_quotes = true,
      ',' if !in_quotes => {
        record.push(std::mem::take(&mut field));
      }
      '\r' if !in_quotes => {} // swallow; LF ends the record
      '\n' if !in_quotes => {
        record.push(std::mem::take(&mut field));
        // Skip blank lines entirely.
        if record.len() > 1 || !record[0].is_empty() {
          records.push(std::mem::take(&mut record));
        } else {
          record.clear();
        }
      }
      _ => field.push(c),
    }
  }

  if !field.is_empty() || !record.is_empty() {
    record.push(field);
    records.push(record);
  }

  records
}

// ─── Tests ───────────────────────────────────────────────────────────────────
