use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{render_html, render_text, PreviewFormat, RenderOptions};
use crate::collab::{CollabError, ExportId, ExportedFile};
use crate::errors::AppError;
use crate::models::Locale;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub format: PreviewFormat,
    pub locale: Option<Locale>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub locale: Option<Locale>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportResponse {
    Exported {
        file: ExportedFile,
        backend: &'static str,
    },
    Cancelled,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShareResponse {
    Shared { id: ExportId },
    Cancelled,
}

fn options(state: &AppState, locale: Option<Locale>) -> RenderOptions {
    RenderOptions {
        locale: locale.unwrap_or(state.config.locale),
    }
}

/// GET /api/v1/cv/preview?format=html|text&locale=es|en
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let options = options(&state, query.locale);
    let document = state.session.lock().await.document.clone();
    match query.format {
        PreviewFormat::Html => Html(render_html(&document, options)).into_response(),
        PreviewFormat::Text => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_text(&document, options),
        )
            .into_response(),
    }
}

/// POST /api/v1/cv/export
///
/// Renders a snapshot of the document and hands it to the PDF backend. The
/// session stays unlocked while the backend runs.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportResponse>, AppError> {
    let options = options(&state, query.locale);
    let document = state.session.lock().await.document.clone();
    let markup = render_html(&document, options);

    let backend = state.pdf.backend();
    let Some(file) = state
        .pdf
        .render_to_file(&markup)
        .await
        .into_result(CollabError::Pdf)?
    else {
        info!(backend, "Export cancelled");
        return Ok(Json(ExportResponse::Cancelled));
    };

    info!(id = %file.id, backend, path = %file.path.display(), "CV exported");
    let evicted = state.session.lock().await.exports.record(file.clone());
    for old in evicted {
        if let Err(e) = tokio::fs::remove_file(&old.path).await {
            warn!(id = %old.id, path = %old.path.display(), "Could not remove evicted export: {e}");
        }
    }
    Ok(Json(ExportResponse::Exported { file, backend }))
}

/// POST /api/v1/cv/exports/:id/share
pub async fn handle_share(
    State(state): State<AppState>,
    Path(id): Path<ExportId>,
) -> Result<Json<ShareResponse>, AppError> {
    let file = state
        .session
        .lock()
        .await
        .exports
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Export {id} not found")))?;

    let shared = state
        .share
        .share(&file)
        .await
        .into_result(CollabError::Share)?;
    Ok(Json(match shared {
        Some(()) => ShareResponse::Shared { id },
        None => ShareResponse::Cancelled,
    }))
}
