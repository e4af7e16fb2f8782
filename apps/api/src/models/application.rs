use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status written when a generation call commits its record.
pub const STATUS_GENERATED: &str = "generated";

/// Persisted outcome of one successful generation call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub jd_link: String,
    pub jd_content: String,
    /// Storage reference of the generated DOCX.
    pub cv_doc_path: String,
    /// Storage reference of the generated PDF.
    pub cv_pdf_path: String,
    pub applied_at: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
}

/// Values for a new application insert.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub jd_link: String,
    pub jd_content: String,
    pub cv_doc_path: String,
    pub cv_pdf_path: String,
}
