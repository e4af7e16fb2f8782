//! Content synthesis: turns a profile plus a job description into tailored resume content.
//!
//! Prompt construction is pure and tested on its own; `synthesize` is a single
//! model call with no retry of its own. Any failure surfaces as `AppError::Generation`.

use tracing::info;

use crate::errors::AppError;
use crate::generation::content::SynthesizedContent;
use crate::generation::prompts::{SYNTHESIS_SYSTEM_TEMPLATE, SYNTHESIS_USER_TEMPLATE};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_json, CompletionModel, CompletionRequest};
use crate::models::profile::Profile;

pub const SYNTHESIS_MODEL: &str = "gpt-4o";
const SYNTHESIS_TEMPERATURE: f32 = 0.7;
const SYNTHESIS_MAX_TOKENS: u32 = 2500;

/// The two messages sent to the model for one synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisPrompt {
    pub system: String,
    pub user: String,
}

/// Builds the synthesis prompt. Pure: no I/O.
pub fn build_synthesis_prompt(profile: &Profile, job_description: &str) -> SynthesisPrompt {
    SynthesisPrompt {
        system: SYNTHESIS_SYSTEM_TEMPLATE.replace("{json_only}", JSON_ONLY_INSTRUCTION),
        user: SYNTHESIS_USER_TEMPLATE
            .replace("{profile}", &render_profile(profile))
            .replace("{job_description}", job_description),
    }
}

/// Calls the synthesis model once and parses its JSON answer.
pub async fn synthesize(
    llm: &dyn CompletionModel,
    profile: &Profile,
    job_description: &str,
) -> Result<SynthesizedContent, AppError> {
    let prompt = build_synthesis_prompt(profile, job_description);

    let content: SynthesizedContent = complete_json(
        llm,
        CompletionRequest {
            model: SYNTHESIS_MODEL,
            system: &prompt.system,
            user: &prompt.user,
            temperature: SYNTHESIS_TEMPERATURE,
            max_tokens: SYNTHESIS_MAX_TOKENS,
            json_object: true,
        },
    )
    .await
    .map_err(|e| AppError::Generation(format!("Resume synthesis failed: {e}")))?;

    info!(
        "Synthesized content for user {}: {} skills, {} experience blocks",
        profile.user.id,
        content.skills.len(),
        content.experience.len()
    );

    Ok(content)
}

/// Serializes the whole profile as markdown. Blank fields and empty
/// collections are left out rather than rendered as placeholders.
pub fn render_profile(profile: &Profile) -> String {
    let user = &profile.user;
    let mut lines = vec![format!("**Name:** {}", user.full_name)];

    if !user.email.trim().is_empty() {
        lines.push(format!("**Email:** {}", user.email));
    }
    for (label, value) in [
        ("Phone", &user.phone_number),
        ("Location", &user.address),
        ("LinkedIn", &user.linkedin_profile),
        ("GitHub", &user.github_link),
    ] {
        if let Some(v) = present(value) {
            lines.push(format!("**{label}:** {v}"));
        }
    }
    if user.experience_years > 0 {
        lines.push(format!("**Years of Experience:** {}", user.experience_years));
    }

    if !profile.employment_history.is_empty() {
        lines.push(String::new());
        lines.push("### Employment History".to_string());
        for job in &profile.employment_history {
            lines.push(format!("- **{}** at **{}**", job.position, job.company));
            if let Some(location) = present(&job.location) {
                lines.push(format!("  Location: {location}"));
            }
            if let Some(period) = employment_period(job.start_date.as_ref(), job.end_date.as_ref()) {
                lines.push(format!("  Period: {period}"));
            }
            if let Some(description) = present(&job.description) {
                lines.push(format!("  Description: {description}"));
            }
        }
    }

    if !profile.education.is_empty() {
        lines.push(String::new());
        lines.push("### Education".to_string());
        for edu in &profile.education {
            lines.push(format!("- **{}** - {}", edu.degree, edu.institution));
            if let Some(location) = present(&edu.location) {
                lines.push(format!("  Location: {location}"));
            }
            if let Some(graduation) = present(&edu.graduation_date) {
                lines.push(format!("  Graduation: {graduation}"));
            }
            if let Some(gpa) = present(&edu.gpa) {
                lines.push(format!("  GPA: {gpa}"));
            }
        }
    }

    if !profile.certifications.is_empty() {
        lines.push(String::new());
        lines.push("### Certifications".to_string());
        for cert in &profile.certifications {
            let mut line = format!("- {}", cert.name);
            if let Some(issuer) = present(&cert.issuer) {
                line.push_str(&format!(" ({issuer})"));
            }
            if let Some(obtained) = present(&cert.date_obtained) {
                line.push_str(&format!(" - obtained {obtained}"));
            }
            if let Some(expiry) = present(&cert.expiry_date) {
                line.push_str(&format!(", expires {expiry}"));
            }
            if let Some(credential) = present(&cert.credential_id) {
                line.push_str(&format!(", credential ID {credential}"));
            }
            lines.push(line);
        }
    }

    if !profile.skills.is_empty() {
        lines.push(String::new());
        lines.push("### Skills".to_string());
        lines.push(
            profile
                .skills
                .iter()
                .map(|s| format!("{} ({})", s.skill_name, s.proficiency_level))
                .collect::<Vec<_>>()
                .join(", "),
        );
    }

    if !profile.additional_info.is_empty() {
        lines.push(String::new());
        lines.push("### Additional Information".to_string());
        for info in &profile.additional_info {
            lines.push(format!("- {}: {}", info.category, info.content));
        }
    }

    lines.join("\n")
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// "start - end", with a missing end read as "Present". `None` when there is no start.
fn employment_period(start: Option<&String>, end: Option<&String>) -> Option<String> {
    let start = start.map(|s| s.trim()).filter(|s| !s.is_empty())?;
    let end = end.map(|s| s.trim()).filter(|s| !s.is_empty()).unwrap_or("Present");
    Some(format!("{start} - {end}"))
}
