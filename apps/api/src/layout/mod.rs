// Document rendering: one composed resume, two encoders (DOCX and PDF).
// Both encoders are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod document;
pub mod docx;
pub mod font_metrics;
pub mod pdf;
pub mod text_flow;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::content::SynthesizedContent;
use crate::models::user::UserIdentity;

pub use docx::render_docx;
pub use pdf::render_pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Pdf,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Pdf => "application/pdf",
        }
    }

    /// `cv_<uuid v4>.<ext>`, unique across users and concurrent requests.
    pub fn unique_filename(self) -> String {
        format!("cv_{}.{}", Uuid::new_v4(), self.extension())
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docx" => Ok(DocumentFormat::Docx),
            "pdf" => Ok(DocumentFormat::Pdf),
            other => Err(AppError::Validation(format!(
                "Unsupported document format '{other}', expected 'docx' or 'pdf'"
            ))),
        }
    }
}

/// Encoded bytes plus the filename they will be stored under.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub format: DocumentFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    fn new(format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            filename: format.unique_filename(),
            bytes,
        }
    }
}

/// Renders both formats in parallel. Either failure fails the pair.
pub async fn render_documents(
    content: Arc<SynthesizedContent>,
    identity: Arc<UserIdentity>,
) -> Result<(RenderedDocument, RenderedDocument), AppError> {
    let docx_task = {
        let (content, identity) = (content.clone(), identity.clone());
        tokio::task::spawn_blocking(move || render_docx(&content, &identity))
    };
    let pdf_task = tokio::task::spawn_blocking(move || render_pdf(&content, &identity));

    let (docx, pdf) = tokio::try_join!(flatten(docx_task), flatten(pdf_task))?;
    Ok((
        RenderedDocument::new(DocumentFormat::Docx, docx),
        RenderedDocument::new(DocumentFormat::Pdf, pdf),
    ))
}

async fn flatten(
    task: tokio::task::JoinHandle<Result<Vec<u8>, AppError>>,
) -> Result<Vec<u8>, AppError> {
    task.await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in rendering: {e}")))?
}
