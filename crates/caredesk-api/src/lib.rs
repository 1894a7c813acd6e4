//! JSON REST API for the Caredesk roster service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`RosterStore`](caredesk_core::store::RosterStore). The one substantial
//! endpoint is the bulk customer import: a spreadsheet upload normalised into
//! paired account/profile records and committed in a single transaction.

pub mod accounts;
pub mod auth;
pub mod customers;
pub mod error;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use caredesk_core::store::RosterStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub db_path:            PathBuf,
  /// Uploads are spooled here before parsing; successfully imported files
  /// are removed, failed ones are left for inspection.
  pub upload_dir:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: RosterStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S: RosterStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
      auth:   Arc::clone(&self.auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the roster API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RosterStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/api/customers/bulk", post(customers::bulk_import::<S>))
    .route("/api/customers", get(customers::list::<S>))
    .route("/api/customers/{id}", get(customers::get_one::<S>))
    .route("/api/accounts/{id}", get(accounts::get_one::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
