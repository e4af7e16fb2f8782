use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::profile::{
    AdditionalInfoFields, CertificationFields, EducationFields, EmploymentFields, IdentityUpdate,
    Profile, ProfileSection, SkillFields,
};
use crate::profile::validation::{
    validate_education_patch, validate_employment_patch, validate_identity_update,
    validate_new_additional_info, validate_new_certification, validate_new_education,
    validate_new_employment, validate_new_skill,
};
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Profile>, AppError> {
    let profile = state.profiles.load_profile(user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Patches identity fields; absent fields keep their stored value.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(update): Json<IdentityUpdate>,
) -> Result<Json<Value>, AppError> {
    validate_identity_update(&update)?;
    let user = state.profiles.update_identity(user_id, update).await?;
    info!("Updated profile identity for user {user_id}");
    Ok(Json(json!({ "message": "Profile updated successfully", "user": user })))
}

/// POST /api/v1/profile/employment
pub async fn handle_add_employment(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(fields): Json<EmploymentFields>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_new_employment(&fields)?;
    let employment = state.profiles.add_employment(user_id, fields).await?;
    Ok((StatusCode::CREATED, Json(json!({ "employment": employment }))))
}

/// PUT /api/v1/profile/employment/:id
pub async fn handle_update_employment(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(fields): Json<EmploymentFields>,
) -> Result<Json<Value>, AppError> {
    validate_employment_patch(&fields)?;
    let employment = state.profiles.update_employment(user_id, id, fields).await?;
    Ok(Json(json!({ "employment": employment })))
}

/// POST /api/v1/profile/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(fields): Json<EducationFields>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_new_education(&fields)?;
    let education = state.profiles.add_education(user_id, fields).await?;
    Ok((StatusCode::CREATED, Json(json!({ "education": education }))))
}

/// PUT /api/v1/profile/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(fields): Json<EducationFields>,
) -> Result<Json<Value>, AppError> {
    validate_education_patch(&fields)?;
    let education = state.profiles.update_education(user_id, id, fields).await?;
    Ok(Json(json!({ "education": education })))
}

/// POST /api/v1/profile/certifications
pub async fn handle_add_certification(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(fields): Json<CertificationFields>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_new_certification(&fields)?;
    let certification = state.profiles.add_certification(user_id, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "certification": certification })),
    ))
}

/// POST /api/v1/profile/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(fields): Json<SkillFields>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_new_skill(&fields)?;
    let skill = state.profiles.add_skill(user_id, fields).await?;
    Ok((StatusCode::CREATED, Json(json!({ "skill": skill }))))
}

/// POST /api/v1/profile/additional
pub async fn handle_add_additional_info(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(fields): Json<AdditionalInfoFields>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_new_additional_info(&fields)?;
    let info = state.profiles.add_additional_info(user_id, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "additional_info": info })),
    ))
}

async fn delete_entry(
    state: &AppState,
    user_id: Uuid,
    section: ProfileSection,
    id: Uuid,
) -> Result<StatusCode, AppError> {
    state.profiles.delete_entry(user_id, section, id).await?;
    info!("Deleted {} {id} for user {user_id}", section.table());
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/profile/employment/:id
pub async fn handle_delete_employment(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, user_id, ProfileSection::Employment, id).await
}

/// DELETE /api/v1/profile/education/:id
pub async fn handle_delete_education(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, user_id, ProfileSection::Education, id).await
}

/// DELETE /api/v1/profile/certifications/:id
pub async fn handle_delete_certification(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, user_id, ProfileSection::Certifications, id).await
}

/// DELETE /api/v1/profile/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, user_id, ProfileSection::Skills, id).await
}

/// DELETE /api/v1/profile/additional/:id
pub async fn handle_delete_additional_info(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, user_id, ProfileSection::AdditionalInfo, id).await
}
