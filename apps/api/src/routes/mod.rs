pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::generation::handlers as generation;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile editing
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        .route(
            "/api/v1/profile/employment",
            post(profile::handle_add_employment),
        )
        .route(
            "/api/v1/profile/employment/:id",
            put(profile::handle_update_employment).delete(profile::handle_delete_employment),
        )
        .route("/api/v1/profile/education", post(profile::handle_add_education))
        .route(
            "/api/v1/profile/education/:id",
            put(profile::handle_update_education).delete(profile::handle_delete_education),
        )
        .route(
            "/api/v1/profile/certifications",
            post(profile::handle_add_certification),
        )
        .route(
            "/api/v1/profile/certifications/:id",
            delete(profile::handle_delete_certification),
        )
        .route("/api/v1/profile/skills", post(profile::handle_add_skill))
        .route(
            "/api/v1/profile/skills/:id",
            delete(profile::handle_delete_skill),
        )
        .route(
            "/api/v1/profile/additional",
            post(profile::handle_add_additional_info),
        )
        .route(
            "/api/v1/profile/additional/:id",
            delete(profile::handle_delete_additional_info),
        )
        // Generation API
        .route(
            "/api/v1/resumes/generate",
            post(generation::handle_generate),
        )
        .route("/api/v1/resumes/preview", post(generation::handle_preview))
        // Application records
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/download/:format",
            get(applications::handle_download),
        )
        .with_state(state)
}
