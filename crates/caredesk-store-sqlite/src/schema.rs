//! SQL schema for the Caredesk SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The `status` CHECK list must stay in sync with
/// `caredesk_core::profile::ALLOWED_STATUSES`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id    TEXT PRIMARY KEY,
    display_name  TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    role          TEXT NOT NULL,   -- 'admin' | 'carer' | 'client'
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; assigned per batch
);

-- The importer is insert-only against this table.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id      TEXT PRIMARY KEY,
    external_id     TEXT NOT NULL UNIQUE,
    account_id      TEXT NOT NULL REFERENCES accounts(account_id),
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    known_as        TEXT,
    contacts        TEXT NOT NULL DEFAULT '[]',  -- JSON [{label, number}]
    contact_number  TEXT,
    mobile_number   TEXT,
    address         TEXT NOT NULL DEFAULT '{}',  -- JSON Address
    finance         TEXT NOT NULL DEFAULT '{}',  -- JSON Finance
    date_of_birth   TEXT,                        -- ISO 8601 date or NULL
    status          TEXT NOT NULL
        CHECK (status IN ('active', 'inactive', 'pending', 'archived')),
    tags            TEXT NOT NULL DEFAULT '[]',
    additional_info TEXT,
    referral_reason TEXT,
    referral_by     TEXT,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS profiles_account_idx ON profiles(account_id);
CREATE INDEX IF NOT EXISTS profiles_status_idx  ON profiles(status);

PRAGMA user_version = 1;
";
