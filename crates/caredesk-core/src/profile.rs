//! Profile — the domain record describing a served customer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A labelled phone entry, e.g. `{ label: "Primary", number: "0161 111 2222" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
  pub label:  String,
  pub number: String,
}

/// Free-form postal address. `country` is fed from the source's `County`
/// column — an intentional passthrough of the legacy naming mismatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub address_line1: Option<String>,
  pub area:          Option<String>,
  pub country:       Option<String>,
}

/// Free-form finance details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finance {
  pub council_id_no: Option<String>,
  pub job_type:      Option<String>,
}

/// Lifecycle statuses accepted by the storage schema's CHECK constraint.
/// The importer deliberately does not validate against this list; a bad
/// status is rejected at insert time and aborts the whole batch.
pub const ALLOWED_STATUSES: [&str; 4] = ["active", "inactive", "pending", "archived"];

/// A persisted customer record. Created in lock-step with its paired
/// [`Account`](crate::account::Account); both are discarded together if the
/// import transaction aborts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:      Uuid,
  /// Human-facing reference code, e.g. `CLI-AB12C3`. Unique across profiles.
  pub external_id:     String,
  /// Foreign key to the account created in the same import batch.
  pub account_id:      Uuid,
  pub first_name:      String,
  pub last_name:       String,
  pub known_as:        Option<String>,
  pub contacts:        Vec<ContactEntry>,
  /// Denormalised copy of `contacts[0].number`.
  pub contact_number:  Option<String>,
  /// Denormalised copy of `contacts[1].number`, when present.
  pub mobile_number:   Option<String>,
  pub address:         Address,
  pub finance:         Finance,
  pub date_of_birth:   Option<NaiveDate>,
  /// Lower-cased lifecycle status; see [`ALLOWED_STATUSES`].
  pub status:          String,
  pub tags:            Vec<String>,
  pub additional_info: Option<String>,
  pub referral_reason: Option<String>,
  pub referral_by:     Option<String>,
  pub created_at:      DateTime<Utc>,
}
