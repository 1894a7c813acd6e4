//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates of birth as `YYYY-MM-DD`.
//! Structured fields (contacts, address, finance, tags) are stored as compact
//! JSON. UUIDs are stored as hyphenated lowercase strings.

use caredesk_core::{
  account::{Account, Role},
  profile::{Address, ContactEntry, Finance, Profile},
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_contacts(contacts: &[ContactEntry]) -> Result<String> {
  Ok(serde_json::to_string(contacts)?)
}

pub fn decode_contacts(s: &str) -> Result<Vec<ContactEntry>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_address(a: &Address) -> Result<String> {
  Ok(serde_json::to_string(a)?)
}

pub fn decode_address(s: &str) -> Result<Address> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_finance(f: &Finance) -> Result<String> {
  Ok(serde_json::to_string(f)?)
}

pub fn decode_finance(s: &str) -> Result<Finance> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:    String,
  pub display_name:  String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:    decode_uuid(&self.account_id)?,
      display_name:  self.display_name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          Role::parse(&self.role).map_err(Error::Core)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id:      String,
  pub external_id:     String,
  pub account_id:      String,
  pub first_name:      String,
  pub last_name:       String,
  pub known_as:        Option<String>,
  pub contacts:        String,
  pub contact_number:  Option<String>,
  pub mobile_number:   Option<String>,
  pub address:         String,
  pub finance:         String,
  pub date_of_birth:   Option<String>,
  pub status:          String,
  pub tags:            String,
  pub additional_info: Option<String>,
  pub referral_reason: Option<String>,
  pub referral_by:     Option<String>,
  pub created_at:      String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id:      decode_uuid(&self.profile_id)?,
      external_id:     self.external_id,
      account_id:      decode_uuid(&self.account_id)?,
      first_name:      self.first_name,
      last_name:       self.last_name,
      known_as:        self.known_as,
      contacts:        decode_contacts(&self.contacts)?,
      contact_number:  self.contact_number,
      mobile_number:   self.mobile_number,
      address:         decode_address(&self.address)?,
      finance:         decode_finance(&self.finance)?,
      date_of_birth:   self
        .date_of_birth
        .as_deref()
        .map(decode_date)
        .transpose()?,
      status:          self.status,
      tags:            decode_tags(&self.tags)?,
      additional_info: self.additional_info,
      referral_reason: self.referral_reason,
      referral_by:     self.referral_by,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
