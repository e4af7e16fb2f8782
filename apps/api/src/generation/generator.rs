use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::ApplicationRepository;
use crate::errors::AppError;
use crate::generation::content::SynthesizedContent;
use crate::generation::extractor::extract_job_details;
use crate::generation::synthesizer::synthesize;
use crate::layout::{render_documents, RenderedDocument};
use crate::llm_client::CompletionModel;
use crate::models::application::{ApplicationRow, NewApplication};
use crate::models::user::UserIdentity;
use crate::profile::ProfileRepository;
use crate::state::AppState;
use crate::storage::DocumentStorage;

/// Result of a committed generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub application: ApplicationRow,
    pub content: SynthesizedContent,
}

/// Result of a dry run: content only, nothing rendered or stored.
#[derive(Debug, Clone)]
pub struct PreviewOutcome {
    pub content: SynthesizedContent,
    pub contact: UserIdentity,
}

/// The generation pipeline over its collaborators. Borrowed per request.
pub struct Pipeline<'a> {
    pub llm: &'a dyn CompletionModel,
    pub profiles: &'a dyn ProfileRepository,
    pub applications: &'a dyn ApplicationRepository,
    pub storage: &'a dyn DocumentStorage,
}

impl<'a> Pipeline<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            llm: state.llm.as_ref(),
            profiles: state.profiles.as_ref(),
            applications: state.applications.as_ref(),
            storage: state.storage.as_ref(),
        }
    }

    /// Runs the full pipeline and commits one application record.
    ///
    /// Steps:
    /// 1. validate the job description (nothing downstream runs on failure)
    /// 2. load the profile
    /// 3. synthesize content and extract job details concurrently
    /// 4. render DOCX and PDF concurrently, both must succeed
    /// 5. store both documents
    /// 6. insert the application row
    ///
    /// Any failure after step 4 removes the documents already written.
    pub async fn generate(
        &self,
        user_id: Uuid,
        job_description: &str,
        job_link: Option<&str>,
    ) -> Result<GenerationOutcome, AppError> {
        validate_job_description(job_description)?;

        let profile = self.profiles.load_profile(user_id).await?;
        info!("Generating resume for user {user_id}");

        let (content, job) = tokio::join!(
            synthesize(self.llm, &profile, job_description),
            extract_job_details(self.llm, job_description),
        );
        let content = Arc::new(content?);
        info!(
            "Content synthesized for user {user_id}: job_title={:?}, company={:?}",
            job.job_title, job.company_name
        );

        let (docx, pdf) = render_documents(content.clone(), Arc::new(profile.user)).await?;
        info!(
            "Rendered documents for user {user_id}: docx={} bytes, pdf={} bytes",
            docx.bytes.len(),
            pdf.bytes.len()
        );

        let (docx_name, pdf_name) = self.store_documents(docx, pdf).await?;

        let insert = self
            .applications
            .insert(NewApplication {
                user_id,
                job_title: job.job_title,
                company_name: job.company_name,
                jd_link: job_link.map(str::trim).unwrap_or_default().to_string(),
                jd_content: job_description.to_string(),
                cv_doc_path: docx_name.clone(),
                cv_pdf_path: pdf_name.clone(),
            })
            .await;

        let application = match insert {
            Ok(row) => row,
            Err(e) => {
                self.discard(&[docx_name.as_str(), pdf_name.as_str()]).await;
                return Err(e);
            }
        };
        info!("Application {} recorded for user {user_id}", application.id);

        Ok(GenerationOutcome {
            application,
            content: Arc::unwrap_or_clone(content),
        })
    }

    /// Profile load and synthesis only. Renders and persists nothing.
    pub async fn preview(&self, user_id: Uuid, job_description: &str) -> Result<PreviewOutcome, AppError> {
        validate_job_description(job_description)?;

        let profile = self.profiles.load_profile(user_id).await?;
        let content = synthesize(self.llm, &profile, job_description).await?;
        info!("Preview generated for user {user_id}");

        Ok(PreviewOutcome {
            content,
            contact: profile.user,
        })
    }

    /// Writes both documents. If either write fails the other is removed.
    async fn store_documents(
        &self,
        docx: RenderedDocument,
        pdf: RenderedDocument,
    ) -> Result<(String, String), AppError> {
        let (docx_written, pdf_written) = tokio::join!(
            self.storage
                .put(&docx.filename, docx.bytes, docx.format.content_type()),
            self.storage
                .put(&pdf.filename, pdf.bytes, pdf.format.content_type()),
        );

        let written: Vec<&str> = [
            (docx.filename.as_str(), docx_written.is_ok()),
            (pdf.filename.as_str(), pdf_written.is_ok()),
        ]
        .into_iter()
        .filter_map(|(name, ok)| ok.then_some(name))
        .collect();

        if let Err(e) = docx_written.and(pdf_written) {
            self.discard(&written).await;
            return Err(e);
        }
        Ok((docx.filename, pdf.filename))
    }

    async fn discard(&self, filenames: &[&str]) {
        for filename in filenames {
            if let Err(e) = self.storage.delete(filename).await {
                warn!("Failed to remove orphaned document {filename}: {e}");
            }
        }
    }
}

fn validate_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}
