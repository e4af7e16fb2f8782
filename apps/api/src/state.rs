use std::sync::Arc;

use crate::applications::ApplicationRepository;
use crate::llm_client::CompletionModel;
use crate::profile::ProfileRepository;
use crate::storage::DocumentStorage;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionModel>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub storage: Arc<dyn DocumentStorage>,
}
