//! Draft types — the importer's in-memory output, before anything is stored.
//!
//! An account draft and its profile draft travel together as one
//! [`ImportDraft`]; the pairing is structural, so the account/profile linkage
//! can never drift the way index-aligned parallel lists could.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  account::Role,
  profile::{Address, ContactEntry, Finance},
};

/// Input to the store for one new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDraft {
  pub display_name:  String,
  pub email:         String,
  /// Empty until credentials are provisioned; the store never sees an
  /// unprovisioned draft when going through the import pipeline.
  pub password_hash: String,
  pub role:          Role,
}

/// Input to the store for one new profile. `account_id` is assigned by the
/// store when the paired account record is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
  pub external_id:     String,
  pub first_name:      String,
  pub last_name:       String,
  pub known_as:        Option<String>,
  pub contacts:        Vec<ContactEntry>,
  pub contact_number:  Option<String>,
  pub mobile_number:   Option<String>,
  pub address:         Address,
  pub finance:         Finance,
  pub date_of_birth:   Option<NaiveDate>,
  pub status:          String,
  pub tags:            Vec<String>,
  pub additional_info: Option<String>,
  pub referral_reason: Option<String>,
  pub referral_by:     Option<String>,
}

/// One normalised spreadsheet row: an account draft paired with its profile
/// draft. Exactly one pair is produced per valid input row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportDraft {
  pub account: AccountDraft,
  pub profile: ProfileDraft,
}
