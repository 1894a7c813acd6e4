//! Handlers for `/api/customers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/customers/bulk` | multipart/form-data, field `file` |
//! | `GET`  | `/api/customers` | List all profiles |
//! | `GET`  | `/api/customers/:id` | 404 if not found |

use std::path::PathBuf;

use axum::{
  Json,
  extract::{Multipart, Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use caredesk_core::{profile::Profile, store::RosterStore};
use caredesk_import::{BatchError, Error as ImportError, prepare_batch, sheet};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Bulk import ──────────────────────────────────────────────────────────────

/// Body of a successful `POST /api/customers/bulk` response.
#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
  pub message:    String,
  #[serde(rename = "totalRows")]
  pub total_rows: usize,
  pub created:    usize,
}

/// `POST /api/customers/bulk` — import a spreadsheet of customers.
///
/// The upload is spooled to disk, normalised, and committed in one storage
/// transaction. On failure the spooled file is deliberately left in place;
/// on success it is removed best-effort.
pub async fn bulk_import<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let bytes = read_file_field(&mut multipart).await?;
  if bytes.is_empty() {
    return Err(ApiError::BadRequest("file is empty".to_string()));
  }

  let spool_path = spool_upload(&state, &bytes).await?;

  // Parsing and normalisation happen before any transaction is opened.
  let spool_for_parse = spool_path.clone();
  let sheet = tokio::task::spawn_blocking(move || {
    sheet::read_sheet(&spool_for_parse)
  })
  .await
  .map_err(|e| ApiError::Import(e.to_string()))?
  .map_err(|e| match e {
    ImportError::EmptyFile => ApiError::BadRequest("file is empty".to_string()),
    other => ApiError::BadRequest(format!("cannot parse upload: {other}")),
  })?;

  let batch = prepare_batch(&sheet).map_err(|e| match e {
    BatchError::EmptySheet => ApiError::BadRequest("file is empty".to_string()),
    BatchError::NoValidRows => {
      ApiError::BadRequest("no valid rows found".to_string())
    }
    BatchError::RowErrors(errors) => ApiError::RowErrors(errors),
    BatchError::Credential(m) => ApiError::Import(m),
  })?;

  let total_rows = batch.total_rows;
  let created = state
    .store
    .import_batch(batch.drafts)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // Only after a successful commit; a failed delete never fails the request.
  if let Err(e) = tokio::fs::remove_file(&spool_path).await {
    tracing::warn!(path = %spool_path.display(), error = %e, "failed to remove spooled upload");
  }

  tracing::info!(total_rows, created, "bulk import committed");

  Ok((
    StatusCode::CREATED,
    Json(BulkImportResponse {
      message: "import complete".to_string(),
      total_rows,
      created,
    }),
  ))
}

/// Pull the `file` field out of the multipart body.
async fn read_file_field(
  multipart: &mut Multipart,
) -> Result<axum::body::Bytes, ApiError> {
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(e.to_string()))?
  {
    if field.name() == Some("file") {
      return field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()));
    }
  }
  Err(ApiError::BadRequest("file is required".to_string()))
}

/// Write the upload to the spool directory under a random name.
async fn spool_upload<S>(
  state: &AppState<S>,
  bytes: &[u8],
) -> Result<PathBuf, ApiError>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let dir = &state.config.upload_dir;
  tokio::fs::create_dir_all(dir).await?;
  let path = dir.join(format!("{}.upload", Uuid::new_v4()));
  tokio::fs::write(&path, bytes).await?;
  Ok(path)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /api/customers`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: RosterStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profiles = state
    .store
    .list_profiles()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(profiles))
}

/// `GET /api/customers/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: RosterStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = state
    .store
    .get_profile(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  Ok(Json(profile))
}
