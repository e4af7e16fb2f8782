use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::applications::{ApplicationDetail, ApplicationSummary};
use crate::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::layout::DocumentFormat;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

async fn owned_application(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<ApplicationRow, AppError> {
    state
        .applications
        .find_for_user(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<ApplicationSummary>>, AppError> {
    let rows = state.applications.list_for_user(user_id).await?;
    Ok(Json(rows.iter().map(ApplicationSummary::from).collect()))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let row = owned_application(&state, user_id, id).await?;
    Ok(Json(ApplicationDetail::from(row)))
}

/// GET /api/v1/applications/:id/download/:format
pub async fn handle_download(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path((id, format)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let format: DocumentFormat = format.parse()?;
    let row = owned_application(&state, user_id, id).await?;
    let filename = match format {
        DocumentFormat::Docx => &row.cv_doc_path,
        DocumentFormat::Pdf => &row.cv_pdf_path,
    };
    let bytes = state.storage.get(filename).await?;

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
