//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use caredesk_core::{
  account::Account,
  draft::ImportDraft,
  profile::Profile,
  store::RosterStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawProfile, encode_address, encode_contacts, encode_date,
    encode_dt, encode_finance, encode_tags, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Caredesk roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Encoded insert rows ─────────────────────────────────────────────────────

// Fully-encoded column values, built before entering the write closure so the
// closure captures only owned, Send data.

struct AccountRow {
  account_id:    String,
  display_name:  String,
  email:         String,
  password_hash: String,
  role:          String,
  created_at:    String,
}

struct ProfileRow {
  profile_id:      String,
  external_id:     String,
  account_id:      String,
  first_name:      String,
  last_name:       String,
  known_as:        Option<String>,
  contacts:        String,
  contact_number:  Option<String>,
  mobile_number:   Option<String>,
  address:         String,
  finance:         String,
  date_of_birth:   Option<String>,
  status:          String,
  tags:            String,
  additional_info: Option<String>,
  referral_reason: Option<String>,
  referral_by:     Option<String>,
  created_at:      String,
}

fn encode_pair(
  draft: ImportDraft,
  created_at: &str,
) -> Result<(AccountRow, ProfileRow)> {
  let account_id = encode_uuid(Uuid::new_v4());
  let profile_id = encode_uuid(Uuid::new_v4());

  let account = AccountRow {
    account_id:    account_id.clone(),
    display_name:  draft.account.display_name,
    email:         draft.account.email,
    password_hash: draft.account.password_hash,
    role:          draft.account.role.as_str().to_owned(),
    created_at:    created_at.to_owned(),
  };

  let p = draft.profile;
  let profile = ProfileRow {
    profile_id,
    external_id: p.external_id,
    account_id,
    first_name: p.first_name,
    last_name: p.last_name,
    known_as: p.known_as,
    contacts: encode_contacts(&p.contacts)?,
    contact_number: p.contact_number,
    mobile_number: p.mobile_number,
    address: encode_address(&p.address)?,
    finance: encode_finance(&p.finance)?,
    date_of_birth: p.date_of_birth.map(encode_date),
    status: p.status,
    tags: encode_tags(&p.tags)?,
    additional_info: p.additional_info,
    referral_reason: p.referral_reason,
    referral_by: p.referral_by,
    created_at: created_at.to_owned(),
  };

  Ok((account, profile))
}

// ─── Row mapping helpers ─────────────────────────────────────────────────────

const ACCOUNT_COLS: &str =
  "account_id, display_name, email, password_hash, role, created_at";

const PROFILE_COLS: &str = "profile_id, external_id, account_id, first_name, \
   last_name, known_as, contacts, contact_number, mobile_number, address, \
   finance, date_of_birth, status, tags, additional_info, referral_reason, \
   referral_by, created_at";

fn map_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAccount> {
  Ok(RawAccount {
    account_id:    row.get(0)?,
    display_name:  row.get(1)?,
    email:         row.get(2)?,
    password_hash: row.get(3)?,
    role:          row.get(4)?,
    created_at:    row.get(5)?,
  })
}

fn map_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    profile_id:      row.get(0)?,
    external_id:     row.get(1)?,
    account_id:      row.get(2)?,
    first_name:      row.get(3)?,
    last_name:       row.get(4)?,
    known_as:        row.get(5)?,
    contacts:        row.get(6)?,
    contact_number:  row.get(7)?,
    mobile_number:   row.get(8)?,
    address:         row.get(9)?,
    finance:         row.get(10)?,
    date_of_birth:   row.get(11)?,
    status:          row.get(12)?,
    tags:            row.get(13)?,
    additional_info: row.get(14)?,
    referral_reason: row.get(15)?,
    referral_by:     row.get(16)?,
    created_at:      row.get(17)?,
  })
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  async fn import_batch(&self, drafts: Vec<ImportDraft>) -> Result<usize> {
    // One timestamp per batch: every record from one import carries the
    // same creation instant.
    let created_at = encode_dt(Utc::now());

    let mut accounts = Vec::with_capacity(drafts.len());
    let mut profiles = Vec::with_capacity(drafts.len());
    for draft in drafts {
      let (account, profile) = encode_pair(draft, &created_at)?;
      accounts.push(account);
      profiles.push(profile);
    }

    let created = self
      .conn
      .call(move |conn| {
        // The transaction is the unit of work: dropped unfinished on any
        // error, which rolls back every insert below.
        let tx = conn.transaction()?;

        for a in &accounts {
          tx.execute(
            "INSERT INTO accounts (
               account_id, display_name, email, password_hash, role, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              a.account_id,
              a.display_name,
              a.email,
              a.password_hash,
              a.role,
              a.created_at,
            ],
          )?;
        }

        for p in &profiles {
          tx.execute(
            "INSERT INTO profiles (
               profile_id, external_id, account_id, first_name, last_name,
               known_as, contacts, contact_number, mobile_number, address,
               finance, date_of_birth, status, tags, additional_info,
               referral_reason, referral_by, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                       ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            rusqlite::params![
              p.profile_id,
              p.external_id,
              p.account_id,
              p.first_name,
              p.last_name,
              p.known_as,
              p.contacts,
              p.contact_number,
              p.mobile_number,
              p.address,
              p.finance,
              p.date_of_birth,
              p.status,
              p.tags,
              p.additional_info,
              p.referral_reason,
              p.referral_by,
              p.created_at,
            ],
          )?;
        }

        tx.commit()?;
        Ok(profiles.len())
      })
      .await?;

    Ok(created)
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ACCOUNT_COLS} FROM accounts WHERE account_id = ?1"),
              rusqlite::params![id_str],
              map_account,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLS} FROM profiles WHERE profile_id = ?1"),
              rusqlite::params![id_str],
              map_profile,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn find_profile_by_external_id<'a>(
    &'a self,
    external_id: &'a str,
  ) -> Result<Option<Profile>> {
    let external_id = external_id.to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLS} FROM profiles WHERE external_id = ?1"),
              rusqlite::params![external_id],
              map_profile,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLS} FROM profiles ORDER BY created_at, profile_id"
        ))?;
        let rows = stmt
          .query_map([], map_profile)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn list_accounts(&self) -> Result<Vec<Account>> {
    let raws: Vec<RawAccount> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACCOUNT_COLS} FROM accounts ORDER BY created_at, account_id"
        ))?;
        let rows = stmt
          .query_map([], map_account)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccount::into_account).collect()
  }
}
