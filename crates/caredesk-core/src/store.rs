//! The `RosterStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `caredesk-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{account::Account, draft::ImportDraft, profile::Profile};

/// Abstraction over a roster storage backend.
///
/// The importer is insert-only: `import_batch` either persists every pair in
/// the batch or nothing at all. Reads exist for the API surface and for
/// verifying linkage after an import.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a batch of account/profile pairs as one atomic unit.
  ///
  /// Accounts are inserted first (in draft order), then profiles, all inside
  /// a single storage transaction. Every profile's `account_id` points at
  /// the account from the same pair. Any failure aborts the transaction:
  /// zero records from the batch persist.
  ///
  /// Returns the number of pairs created.
  fn import_batch(
    &self,
    drafts: Vec<ImportDraft>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Retrieve an account by UUID. Returns `None` if not found.
  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Retrieve a profile by UUID. Returns `None` if not found.
  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Look up a profile by its human-facing reference code.
  fn find_profile_by_external_id<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// List all profiles, ordered by creation time.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// List all accounts, ordered by creation time.
  fn list_accounts(
    &self,
  ) -> impl Future<Output = Result<Vec<Account>, Self::Error>> + Send + '_;
}
