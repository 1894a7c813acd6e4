//! Identifier and credential generation for newly imported accounts.
//!
//! Passwords are random tokens hashed with argon2id; the plaintext is never
//! stored, logged, or sent anywhere by the bulk pipeline.

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use caredesk_core::draft::ImportDraft;
use rand_core::{OsRng, RngCore};
use uuid::Uuid;

use crate::error::{Error, Result};

const PASSWORD_LEN: usize = 20;
const PASSWORD_CHARSET: &[u8] =
  b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_=+?";

/// Generate a random plaintext password from letters, digits, and symbols.
pub fn generate_password() -> String {
  let mut bytes = [0u8; PASSWORD_LEN];
  OsRng.fill_bytes(&mut bytes);
  bytes
    .iter()
    .map(|b| PASSWORD_CHARSET[*b as usize % PASSWORD_CHARSET.len()] as char)
    .collect()
}

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| Error::Credential(e.to_string()))?
      .to_string(),
  )
}

/// Synthesise an external identifier: `CLI-` plus the last six characters of
/// a fresh UUID, uppercased.
pub fn synth_external_id() -> String {
  let id = Uuid::new_v4().simple().to_string();
  format!("CLI-{}", id[id.len() - 6..].to_uppercase())
}

/// Synthesise an email-like handle: `cli-` plus an eight-hex-char random
/// suffix on a reserved placeholder domain.
pub fn synth_email() -> String {
  let id = Uuid::new_v4().simple().to_string();
  format!("cli-{}@caredesk.invalid", &id[..8])
}

/// Fill in a fresh password hash for every draft in the batch.
///
/// Runs after validation so a rejected batch never pays the hashing cost.
pub fn provision_passwords(drafts: &mut [ImportDraft]) -> Result<()> {
  for draft in drafts {
    draft.account.password_hash = hash_password(&generate_password())?;
  }
  Ok(())
}
