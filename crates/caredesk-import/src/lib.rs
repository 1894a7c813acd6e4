//! Bulk roster import pipeline.
//!
//! Pipeline:
//!   uploaded file
//!     └─ sheet::read_sheet()        → Sheet (header + rows)
//!          └─ normalize::normalize_rows() → paired drafts or row errors
//!               └─ credentials::provision_passwords() → hashed credentials
//!                    └─ (storage layer) import_batch → one transaction
//!
//! Everything here is pure with respect to storage: the transactional write
//! lives in `caredesk-store-sqlite`.

pub mod credentials;
pub mod error;
pub mod normalize;
pub mod sheet;

pub use error::{BatchError, Error, RowError};
pub use normalize::NormalizedBatch;

use sheet::Sheet;

/// Validate and normalise a parsed sheet into a ready-to-write batch.
///
/// The full row set is checked before credentials are provisioned, so a
/// rejected batch never opens a transaction and never pays the argon2 cost.
pub fn prepare_batch(sheet: &Sheet) -> Result<NormalizedBatch, BatchError> {
  if sheet.rows.is_empty() {
    return Err(BatchError::EmptySheet);
  }

  let mut batch =
    normalize::normalize_rows(&sheet.rows).map_err(BatchError::RowErrors)?;

  if batch.drafts.is_empty() {
    return Err(BatchError::NoValidRows);
  }

  credentials::provision_passwords(&mut batch.drafts)
    .map_err(|e| BatchError::Credential(e.to_string()))?;

  Ok(batch)
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use sheet::{CellValue, SheetRow};

  fn row(pairs: &[(&str, &str)]) -> SheetRow {
    let columns: HashMap<String, CellValue> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), CellValue::Text(v.to_string())))
      .collect();
    SheetRow::new(columns)
  }

  fn sheet(rows: Vec<SheetRow>) -> Sheet {
    Sheet {
      header: vec!["Name".into(), "Phone".into(), "Status".into()],
      rows,
    }
  }

  #[test]
  fn empty_sheet_is_rejected() {
    let result = prepare_batch(&sheet(vec![]));
    assert!(matches!(result, Err(BatchError::EmptySheet)));
  }

  #[test]
  fn all_rows_skipped_is_no_valid_rows() {
    let rows = vec![row(&[("Name", "Arthur Morgan")])]; // no Phone
    let result = prepare_batch(&sheet(rows));
    assert!(matches!(result, Err(BatchError::NoValidRows)));
  }

  #[test]
  fn row_errors_reject_before_credentials() {
    let rows = vec![row(&[("Name", "Arthur Morgan"), ("Phone", "0161")])];
    match prepare_batch(&sheet(rows)) {
      Err(BatchError::RowErrors(errors)) => {
        assert_eq!(errors[0].row, 2);
        assert!(errors[0].message.contains("Status"));
      }
      other => panic!("expected row errors, got {other:?}"),
    }
  }

  #[test]
  fn valid_batch_comes_back_provisioned() {
    let rows = vec![
      row(&[("Name", "Arthur Morgan"), ("Phone", "0161"), ("Status", "Active")]),
      row(&[("Name", "Cher"), ("Phone", "07000"), ("Status", "pending")]),
      row(&[("Phone", "0161")]), // skipped
    ];
    let batch = prepare_batch(&sheet(rows)).unwrap();
    assert_eq!(batch.total_rows, 3);
    assert_eq!(batch.skipped, 1);
    assert_eq!(batch.drafts.len(), 2);
    // created ≤ total_rows, equality only when nothing was skipped
    assert!(batch.drafts.len() <= batch.total_rows);
    for draft in &batch.drafts {
      assert!(draft.account.password_hash.starts_with("$argon2"));
    }
  }
}
