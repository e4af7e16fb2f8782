//! Axum route handlers for the Generation API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::applications::ApplicationSummary;
use crate::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::generation::content::SynthesizedContent;
use crate::generation::generator::Pipeline;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub job_description: String,
    pub job_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: &'static str,
    pub application: ApplicationSummary,
    pub content: SynthesizedContent,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub job_description: String,
}

/// Header fields shown alongside a preview.
#[derive(Debug, Serialize)]
pub struct PreviewContact {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub linkedin_profile: Option<String>,
    pub github_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub message: &'static str,
    pub content: SynthesizedContent,
    pub contact: PreviewContact,
}

/// POST /api/v1/resumes/generate
///
/// Synthesizes, renders and stores a tailored resume, then records the application.
pub async fn handle_generate(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let outcome = Pipeline::from_state(&state)
        .generate(user_id, &request.job_description, request.job_link.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            message: "Resume generated successfully",
            application: ApplicationSummary::from(&outcome.application),
            content: outcome.content,
        }),
    ))
}

/// POST /api/v1/resumes/preview
///
/// Dry run: returns synthesized content without rendering or saving anything.
pub async fn handle_preview(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let preview = Pipeline::from_state(&state)
        .preview(user_id, &request.job_description)
        .await?;
    let contact = preview.contact;

    Ok(Json(PreviewResponse {
        message: "Preview generated successfully",
        content: preview.content,
        contact: PreviewContact {
            full_name: contact.full_name,
            email: contact.email,
            phone_number: contact.phone_number,
            address: contact.address,
            linkedin_profile: contact.linkedin_profile,
            github_link: contact.github_link,
        },
    }))
}
