//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::AuthUser;
use crate::config::Config;
use crate::dataset::load_texts;
use crate::decode::{extract_text, DocumentFormat};
use crate::errors::AppError;
use crate::models::resume::{RawDocument, ResumeRecord};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ParseQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/resumes/parse?limit=N
///
/// Re-reads the configured dataset and returns one record per row, in source
/// order, up to `limit`. A bad schema fails the whole request before any row
/// is processed; per-row classifier failures come back inline.
pub async fn handle_parse_dataset(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ParseQuery>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    let limit = resolve_limit(query.limit, &state.config)?;

    let data = state.dataset.fetch().await?;
    let texts = load_texts(data)?;

    let assembler = state.assembler.clone();
    let records = tokio::task::spawn_blocking(move || {
        assembler
            .assemble_many(texts, Some(limit))
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    info!(
        user = %user.email,
        source = %state.dataset.describe(),
        records = records.len(),
        "Parsed dataset batch"
    );
    Ok(Json(records))
}

/// POST /api/v1/resumes/upload (multipart, field `file`)
///
/// Decodes a PDF/DOCX upload and returns its record. Classifier failures are
/// reported as errors, not masked as `Unknown`.
pub async fn handle_upload_resume(
    user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeRecord>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let format = DocumentFormat::from_filename(&filename)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, format, data));
        break;
    }

    let (filename, format, data) = upload.ok_or_else(|| {
        AppError::Validation(format!("Multipart field '{UPLOAD_FIELD}' is required"))
    })?;
    debug!(%filename, format = format.as_str(), bytes = data.len(), "Received upload");

    let assembler = state.assembler.clone();
    let record = tokio::task::spawn_blocking(move || -> Result<ResumeRecord, AppError> {
        let text = extract_text(&data, format)?;
        Ok(assembler.assemble_one(RawDocument::upload(filename, text))?)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    info!(
        user = %user.email,
        category = %record.category,
        confidence = record.confidence,
        "Parsed uploaded resume"
    );
    Ok(Json(record))
}

/// Applies the service's batch-size policy. Without a configured cap any
/// limit is passed through (non-positive meaning "all"); with a cap the
/// limit must fall in `1..=cap`.
fn resolve_limit(requested: Option<i64>, config: &Config) -> Result<i64, AppError> {
    let limit = requested.unwrap_or(config.default_parse_limit);
    if let Some(max) = config.max_parse_limit {
        if limit <= 0 || limit > max {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {max}"
            )));
        }
    }
    Ok(limit)
}
