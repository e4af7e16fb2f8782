//! Job-detail extraction: pulls a job title and company name out of a job posting.
//!
//! Best-effort: every failure degrades to the "Not specified" pair and is only logged.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::generation::prompts::EXTRACTION_SYSTEM_TEMPLATE;
use crate::llm_client::prompts::NOT_SPECIFIED;
use crate::llm_client::{complete_json, CompletionModel, CompletionRequest};

pub const EXTRACTION_MODEL: &str = "gpt-4o-mini";
const EXTRACTION_MAX_TOKENS: u32 = 100;
/// Title and company almost always appear in the opening of a posting.
pub const EXTRACTION_INPUT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub job_title: String,
    pub company_name: String,
}

impl JobDetails {
    pub fn not_specified() -> Self {
        Self {
            job_title: NOT_SPECIFIED.to_string(),
            company_name: NOT_SPECIFIED.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedFields {
    job_title: Option<String>,
    company_name: Option<String>,
}

/// First `EXTRACTION_INPUT_CHARS` characters of the posting.
pub fn truncate_for_extraction(job_description: &str) -> &str {
    match job_description.char_indices().nth(EXTRACTION_INPUT_CHARS) {
        Some((byte_idx, _)) => &job_description[..byte_idx],
        None => job_description,
    }
}

/// Extracts job title and company. Never fails.
pub async fn extract_job_details(llm: &dyn CompletionModel, job_description: &str) -> JobDetails {
    let system = EXTRACTION_SYSTEM_TEMPLATE.replace("{not_specified}", NOT_SPECIFIED);

    let result: Result<ExtractedFields, _> = complete_json(
        llm,
        CompletionRequest {
            model: EXTRACTION_MODEL,
            system: &system,
            user: truncate_for_extraction(job_description),
            temperature: 0.0,
            max_tokens: EXTRACTION_MAX_TOKENS,
            json_object: true,
        },
    )
    .await;

    match result {
        Ok(fields) => JobDetails {
            job_title: or_not_specified(fields.job_title),
            company_name: or_not_specified(fields.company_name),
        },
        Err(e) => {
            warn!("Job detail extraction failed, using placeholders: {e}");
            JobDetails::not_specified()
        }
    }
}

fn or_not_specified(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}
