//! Error types for `caredesk-import`.

use thiserror::Error;

/// A structural problem with one input row, reported by row number.
/// `row` is the 1-based spreadsheet row (the header is row 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
  pub row:     usize,
  pub message: String,
}

impl std::fmt::Display for RowError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "row {}: {}", self.row, self.message)
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("cannot open workbook: {0}")]
  Workbook(String),

  /// The upload has no header row (zero-byte file, or a workbook whose
  /// first sheet is blank).
  #[error("file is empty")]
  EmptyFile,

  #[error("password hashing failed: {0}")]
  Credential(String),
}

/// Why a whole batch was rejected before anything was written.
#[derive(Debug, Error)]
pub enum BatchError {
  /// A header row exists but there are no data rows beneath it.
  #[error("file is empty")]
  EmptySheet,

  /// Every data row was skipped by the Name/Phone skip rule.
  #[error("no valid rows found")]
  NoValidRows,

  /// One or more rows failed structural validation. The batch is rejected
  /// in full; the transaction is never opened.
  #[error("{} row(s) failed validation", .0.len())]
  RowErrors(Vec<RowError>),

  #[error("password hashing failed: {0}")]
  Credential(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
