//! Row normaliser — turns one raw spreadsheet row into an account draft
//! paired with a profile draft. Never touches storage.
//!
//! The whole row set is validated before any write: structural errors are
//! collected per row, and a batch with any error is rejected outright rather
//! than discovered mid-transaction.

use caredesk_core::{
  account::Role,
  draft::{AccountDraft, ImportDraft, ProfileDraft},
  profile::{Address, ContactEntry, Finance},
};
use chrono::NaiveDate;

use crate::{
  credentials::{synth_email, synth_external_id},
  error::RowError,
  sheet::{CellValue, SheetRow},
};

// Recognised source columns. Matches are case- and whitespace-sensitive.
const COL_NAME: &str = "Name";
const COL_PHONE: &str = "Phone";
const COL_NO: &str = "No.";
const COL_DOB: &str = "DOB";
const COL_STATUS: &str = "Status";
const COL_DETAILS: &str = "Details";
const COL_ADDRESS: &str = "Address";
const COL_AREA: &str = "Area";
const COL_COUNTY: &str = "County";
const COL_COUNCIL_ID: &str = "Council ID";
const COL_JOB_TYPE: &str = "Job Type";
const COL_TAGS: &str = "Tags";
const COL_SCHEDULE: &str = "Schedule";

/// The normalised output for a whole upload.
#[derive(Debug)]
pub struct NormalizedBatch {
  pub drafts:     Vec<ImportDraft>,
  /// Count of data rows in the source, including skipped ones.
  pub total_rows: usize,
  pub skipped:    usize,
}

/// Normalise every row, collecting structural errors instead of failing at
/// the first one. `Err` means at least one row is bad and nothing should be
/// written.
pub fn normalize_rows(rows: &[SheetRow]) -> Result<NormalizedBatch, Vec<RowError>> {
  let mut drafts = Vec::new();
  let mut errors = Vec::new();
  let mut skipped = 0usize;

  for (index, row) in rows.iter().enumerate() {
    // Header is spreadsheet row 1; data starts at row 2.
    let row_number = index + 2;
    match normalize_row(row) {
      Ok(Some(draft)) => drafts.push(draft),
      Ok(None) => skipped += 1,
      Err(message) => errors.push(RowError { row: row_number, message }),
    }
  }

  if !errors.is_empty() {
    return Err(errors);
  }

  Ok(NormalizedBatch { drafts, total_rows: rows.len(), skipped })
}

/// Normalise a single row.
///
/// `Ok(None)` means the row was skipped under the Name/Phone skip rule
/// (silently: not an error, not counted as created). `Err` carries a
/// structural problem with a row that was not skipped.
pub fn normalize_row(row: &SheetRow) -> Result<Option<ImportDraft>, String> {
  // Skip rule: no Name or no Phone means the row never existed.
  let (Some(name), Some(phone)) = (row.text(COL_NAME), row.text(COL_PHONE))
  else {
    return Ok(None);
  };

  let (first_name, last_name) = split_name(&name);
  let contacts = parse_contacts(&phone);

  // The legacy source lower-cased Status unconditionally, so a blank Status
  // on an included row sank the whole import. Report it per row instead.
  let status = row
    .text(COL_STATUS)
    .ok_or_else(|| format!("missing required {COL_STATUS}"))?
    .to_lowercase();

  let external_id = match row.text(COL_NO) {
    Some(id) => id,
    None => synth_external_id(),
  };

  let contact_number = contacts.first().map(|c| c.number.clone());
  let mobile_number = contacts.get(1).map(|c| c.number.clone());

  let tags_raw = row.text(COL_TAGS);
  let tags = tags_raw
    .as_deref()
    .map(split_tags)
    .unwrap_or_default();

  let account = AccountDraft {
    display_name:  name,
    email:         synth_email(),
    password_hash: String::new(),
    role:          Role::Client,
  };

  let profile = ProfileDraft {
    external_id,
    first_name,
    last_name,
    known_as: None,
    contacts,
    contact_number,
    mobile_number,
    address: Address {
      address_line1: row.text(COL_ADDRESS),
      area:          row.text(COL_AREA),
      // Intentional passthrough: the source column is named "County".
      country:       row.text(COL_COUNTY),
    },
    finance: Finance {
      council_id_no: row.text(COL_COUNCIL_ID),
      job_type:      row.text(COL_JOB_TYPE),
    },
    date_of_birth: parse_dob(row.get(COL_DOB)),
    status,
    tags,
    additional_info: row.text(COL_DETAILS),
    // The unsplit Tags value, not the parsed list.
    referral_reason: tags_raw,
    referral_by: row.text(COL_SCHEDULE),
  };

  Ok(Some(ImportDraft { account, profile }))
}

// ─── Field parsers ───────────────────────────────────────────────────────────

/// First whitespace token is the first name; the rest, joined by single
/// spaces, is the last name. A one-token name yields the legacy single-space
/// last name, not an empty string.
fn split_name(name: &str) -> (String, String) {
  let mut parts = name.split_whitespace();
  let first = parts.next().unwrap_or_default().to_string();
  let rest: Vec<&str> = parts.collect();
  let last = if rest.is_empty() { " ".to_string() } else { rest.join(" ") };
  (first, last)
}

/// Comma-separated phone list. Each piece is either `Label-Number` (split on
/// the first hyphen) or a bare number; missing labels default to `Primary`
/// for the first entry and `Secondary` for the rest.
fn parse_contacts(phone: &str) -> Vec<ContactEntry> {
  phone
    .split(',')
    .map(str::trim)
    .filter(|piece| !piece.is_empty())
    .enumerate()
    .map(|(index, piece)| {
      let default_label = if index == 0 { "Primary" } else { "Secondary" };
      match piece.split_once('-') {
        Some((label, number)) => {
          let label = label.trim();
          ContactEntry {
            label:  if label.is_empty() { default_label } else { label }
              .to_string(),
            number: number.trim().to_string(),
          }
        }
        None => ContactEntry {
          label:  default_label.to_string(),
          number: piece.to_string(),
        },
      }
    })
    .collect()
}

/// Pipe-delimited tag list; entries are trimmed and empties dropped, so
/// leading or trailing pipes never produce empty-string tags.
fn split_tags(raw: &str) -> Vec<String> {
  raw
    .split('|')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect()
}

/// Malformed or missing dates degrade to `None`, never fail the row.
fn parse_dob(cell: Option<&CellValue>) -> Option<NaiveDate> {
  match cell? {
    CellValue::Date(d) => Some(*d),
    CellValue::Text(s) => {
      let s = s.trim();
      NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
    }
    _ => None,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn row(pairs: &[(&str, &str)]) -> SheetRow {
    let columns: HashMap<String, CellValue> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), CellValue::Text(v.to_string())))
      .collect();
    SheetRow::new(columns)
  }

  fn valid_row() -> SheetRow {
    row(&[
      ("Name", "Arthur Morgan"),
      ("Phone", "Primary-0161 111 2222, 07000 111222"),
      ("Status", "Active"),
    ])
  }

  // ── Skip rule ─────────────────────────────────────────────────────────────

  #[test]
  fn row_without_name_is_skipped() {
    let r = row(&[("Phone", "0161 111 2222"), ("Status", "active")]);
    assert!(normalize_row(&r).unwrap().is_none());
  }

  #[test]
  fn row_without_phone_is_skipped() {
    let r = row(&[("Name", "Arthur Morgan"), ("Status", "active")]);
    assert!(normalize_row(&r).unwrap().is_none());
  }

  #[test]
  fn skipped_rows_count_toward_total_but_not_drafts() {
    let rows = vec![
      valid_row(),
      row(&[("Phone", "0161")]), // no Name: skipped before Status matters
      valid_row(),
    ];
    let batch = normalize_rows(&rows).unwrap();
    assert_eq!(batch.total_rows, 3);
    assert_eq!(batch.skipped, 1);
    assert_eq!(batch.drafts.len(), 2);
  }

  // ── Name split ────────────────────────────────────────────────────────────

  #[test]
  fn name_splits_into_first_and_joined_last() {
    assert_eq!(
      split_name("Arthur Morgan"),
      ("Arthur".to_string(), "Morgan".to_string())
    );
    assert_eq!(
      split_name("  Mary  Beth  Gaskill "),
      ("Mary".to_string(), "Beth Gaskill".to_string())
    );
  }

  #[test]
  fn single_token_name_keeps_single_space_last_name() {
    // Legacy quirk, preserved deliberately: " " and not "".
    assert_eq!(split_name("Cher"), ("Cher".to_string(), " ".to_string()));
  }

  // ── Phone parsing ─────────────────────────────────────────────────────────

  #[test]
  fn phone_list_with_labels_and_defaults() {
    let contacts = parse_contacts("Primary-0161 111 2222, 07000 111222");
    assert_eq!(contacts, vec![
      ContactEntry { label: "Primary".into(), number: "0161 111 2222".into() },
      ContactEntry { label: "Secondary".into(), number: "07000 111222".into() },
    ]);
  }

  #[test]
  fn empty_label_before_hyphen_gets_positional_default() {
    let contacts = parse_contacts("-0161 111 2222, -07000 111222");
    assert_eq!(contacts[0].label, "Primary");
    assert_eq!(contacts[0].number, "0161 111 2222");
    assert_eq!(contacts[1].label, "Secondary");
  }

  #[test]
  fn empty_phone_pieces_are_dropped() {
    let contacts = parse_contacts("0161 111 2222,, ,07000 111222");
    assert_eq!(contacts.len(), 2);
  }

  #[test]
  fn contact_and_mobile_numbers_come_from_first_two_entries() {
    let draft = normalize_row(&valid_row()).unwrap().unwrap();
    assert_eq!(draft.profile.contact_number.as_deref(), Some("0161 111 2222"));
    assert_eq!(draft.profile.mobile_number.as_deref(), Some("07000 111222"));
  }

  #[test]
  fn single_number_leaves_mobile_unset() {
    let r = row(&[
      ("Name", "Arthur Morgan"),
      ("Phone", "0161 111 2222"),
      ("Status", "active"),
    ]);
    let draft = normalize_row(&r).unwrap().unwrap();
    assert_eq!(draft.profile.contact_number.as_deref(), Some("0161 111 2222"));
    assert!(draft.profile.mobile_number.is_none());
  }

  // ── External identifier ───────────────────────────────────────────────────

  #[test]
  fn explicit_identifier_passes_through_verbatim() {
    let r = row(&[
      ("Name", "Arthur Morgan"),
      ("Phone", "0161"),
      ("No.", "C-900"),
      ("Status", "active"),
    ]);
    let draft = normalize_row(&r).unwrap().unwrap();
    assert_eq!(draft.profile.external_id, "C-900");
  }

  #[test]
  fn missing_identifier_is_synthesised() {
    let draft = normalize_row(&valid_row()).unwrap().unwrap();
    let id = &draft.profile.external_id;
    assert!(id.starts_with("CLI-"), "unexpected id: {id}");
    assert_eq!(id.len(), "CLI-".len() + 6);
    assert!(id["CLI-".len()..].chars().all(|c| c.is_ascii_alphanumeric()));
  }

  // ── Status ────────────────────────────────────────────────────────────────

  #[test]
  fn status_is_lowercased_not_validated() {
    let r = row(&[
      ("Name", "Arthur Morgan"),
      ("Phone", "0161"),
      ("Status", "NOT-A-REAL-STATUS"),
    ]);
    // Bad values pass through; the storage schema rejects them later.
    let draft = normalize_row(&r).unwrap().unwrap();
    assert_eq!(draft.profile.status, "not-a-real-status");
  }

  #[test]
  fn blank_status_is_a_row_error() {
    let r = row(&[("Name", "Arthur Morgan"), ("Phone", "0161")]);
    assert!(normalize_row(&r).is_err());
  }

  #[test]
  fn one_bad_row_rejects_the_batch_with_its_row_number() {
    let rows = vec![
      valid_row(),
      row(&[("Name", "Cher"), ("Phone", "0161")]), // blank Status
    ];
    let errors = normalize_rows(&rows).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, 3); // header is row 1
  }

  // ── Tags & referral ───────────────────────────────────────────────────────

  #[test]
  fn tags_are_split_trimmed_and_never_empty() {
    assert_eq!(split_tags("falls|diabetes| mobility "), vec![
      "falls".to_string(),
      "diabetes".into(),
      "mobility".into(),
    ]);
    assert_eq!(split_tags("|falls||mobility|"), vec![
      "falls".to_string(),
      "mobility".into(),
    ]);
  }

  #[test]
  fn referral_reason_is_the_unsplit_tags_value() {
    let r = row(&[
      ("Name", "Arthur Morgan"),
      ("Phone", "0161"),
      ("Status", "active"),
      ("Tags", "falls|diabetes"),
      ("Schedule", "Mon AM"),
    ]);
    let draft = normalize_row(&r).unwrap().unwrap();
    assert_eq!(draft.profile.tags, vec!["falls".to_string(), "diabetes".into()]);
    assert_eq!(draft.profile.referral_reason.as_deref(), Some("falls|diabetes"));
    assert_eq!(draft.profile.referral_by.as_deref(), Some("Mon AM"));
  }

  // ── Address / finance / DOB ───────────────────────────────────────────────

  #[test]
  fn address_and_finance_passthrough() {
    let r = row(&[
      ("Name", "Arthur Morgan"),
      ("Phone", "0161"),
      ("Status", "active"),
      ("Address", "12 Rose Lane"),
      ("Area", "Didsbury"),
      ("County", "Greater Manchester"),
      ("Council ID", "GM-4471"),
      ("Job Type", "Domiciliary"),
    ]);
    let draft = normalize_row(&r).unwrap().unwrap();
    assert_eq!(draft.profile.address.address_line1.as_deref(), Some("12 Rose Lane"));
    assert_eq!(draft.profile.address.area.as_deref(), Some("Didsbury"));
    // "County" lands in `country`, matching the legacy mapping.
    assert_eq!(
      draft.profile.address.country.as_deref(),
      Some("Greater Manchester")
    );
    assert_eq!(draft.profile.finance.council_id_no.as_deref(), Some("GM-4471"));
    assert_eq!(draft.profile.finance.job_type.as_deref(), Some("Domiciliary"));
  }

  #[test]
  fn dob_parses_iso_and_uk_formats_or_degrades_to_none() {
    let expected = NaiveDate::from_ymd_opt(1957, 3, 14).unwrap();
    assert_eq!(
      parse_dob(Some(&CellValue::Text("1957-03-14".into()))),
      Some(expected)
    );
    assert_eq!(
      parse_dob(Some(&CellValue::Text("14/03/1957".into()))),
      Some(expected)
    );
    assert_eq!(parse_dob(Some(&CellValue::Date(expected))), Some(expected));
    assert_eq!(parse_dob(Some(&CellValue::Text("last spring".into()))), None);
    assert_eq!(parse_dob(None), None);
  }

  // ── Account draft ─────────────────────────────────────────────────────────

  #[test]
  fn account_draft_is_client_with_synthetic_email() {
    let draft = normalize_row(&valid_row()).unwrap().unwrap();
    assert_eq!(draft.account.role, Role::Client);
    assert_eq!(draft.account.display_name, "Arthur Morgan");
    assert!(draft.account.email.starts_with("cli-"));
    assert!(draft.account.email.ends_with("@caredesk.invalid"));
    // Credentials are provisioned in a later pass.
    assert!(draft.account.password_hash.is_empty());
  }
}
