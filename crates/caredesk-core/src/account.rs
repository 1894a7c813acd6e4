//! Account — the login/identity record.
//!
//! An account holds only identity material. Everything describing the person
//! being cared for lives in the paired [`Profile`](crate::profile::Profile).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The access role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Carer,
  Client,
}

impl Role {
  /// The string stored in the `role` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Admin => "admin",
      Role::Carer => "carer",
      Role::Client => "client",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "admin" => Ok(Role::Admin),
      "carer" => Ok(Role::Carer),
      "client" => Ok(Role::Client),
      other => Err(Error::UnknownRole(other.to_string())),
    }
  }
}

/// A persisted identity record. The bulk importer only ever creates accounts
/// with [`Role::Client`]; it never mutates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub account_id:    Uuid,
  pub display_name:  String,
  /// Synthetic handle, e.g. `cli-3fa8b012@caredesk.invalid`. Generated for
  /// every imported account regardless of the source data.
  pub email:         String,
  /// Argon2 PHC string. The plaintext is never persisted.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
}
