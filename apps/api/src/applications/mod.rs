// Application Record: one row per successful generation, never mutated here.

pub mod handlers;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::DocumentFormat;
use crate::models::application::{ApplicationRow, NewApplication, STATUS_GENERATED};

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Single atomic insert. Returns the stored row with its generated id.
    async fn insert(&self, application: NewApplication) -> Result<ApplicationRow, AppError>;
    /// `None` when the application does not exist or belongs to another user.
    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<ApplicationRow>, AppError>;
    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ApplicationRow>, AppError>;
}

pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn insert(&self, application: NewApplication) -> Result<ApplicationRow, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (id, user_id, job_title, company_name, jd_link, jd_content,
                 cv_doc_path, cv_pdf_path, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application.user_id)
        .bind(&application.job_title)
        .bind(&application.company_name)
        .bind(&application.jd_link)
        .bind(&application.jd_content)
        .bind(&application.cv_doc_path)
        .bind(&application.cv_pdf_path)
        .bind(STATUS_GENERATED)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY applied_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Download route for one of an application's documents.
pub fn download_url(application_id: Uuid, format: DocumentFormat) -> String {
    format!("/api/v1/applications/{application_id}/download/{format}")
}

/// Client-facing view of an application, with download links instead of storage paths.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    pub id: Uuid,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub status: String,
    pub docx_url: String,
    pub pdf_url: String,
}

impl From<&ApplicationRow> for ApplicationSummary {
    fn from(row: &ApplicationRow) -> Self {
        Self {
            id: row.id,
            job_title: row.job_title.clone(),
            company_name: row.company_name.clone(),
            applied_at: row.applied_at,
            status: row.status.clone(),
            docx_url: download_url(row.id, DocumentFormat::Docx),
            pdf_url: download_url(row.id, DocumentFormat::Pdf),
        }
    }
}

/// Single-application view including the submitted job description.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    pub jd_link: String,
    pub jd_content: String,
    pub notes: Option<String>,
}

impl From<ApplicationRow> for ApplicationDetail {
    fn from(row: ApplicationRow) -> Self {
        Self {
            summary: ApplicationSummary::from(&row),
            jd_link: row.jd_link,
            jd_content: row.jd_content,
            notes: row.notes,
        }
    }
}
