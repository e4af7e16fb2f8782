use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::UserIdentity;

/// Self-assessed skill level. Stored lowercase in `skills.proficiency_level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Error)]
#[error("unknown proficiency level '{0}'")]
pub struct UnknownProficiency(String);

impl FromStr for ProficiencyLevel {
    type Err = UnknownProficiency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            other => Err(UnknownProficiency(other.to_string())),
        }
    }
}

impl TryFrom<String> for ProficiencyLevel {
    type Error = UnknownProficiency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct EmploymentEntry {
    pub id: Uuid,
    pub position: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct EducationEntry {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct CertificationEntry {
    pub id: Uuid,
    pub name: String,
    pub issuer: Option<String>,
    pub date_obtained: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct SkillEntry {
    pub id: Uuid,
    pub skill_name: String,
    #[sqlx(try_from = "String")]
    pub proficiency_level: ProficiencyLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct AdditionalInfoEntry {
    pub id: Uuid,
    pub category: String,
    pub content: String,
}

/// Everything a user has recorded about themselves. Read-only input to generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub user: UserIdentity,
    /// Newest first (start date descending).
    pub employment_history: Vec<EmploymentEntry>,
    /// Newest first (graduation date descending).
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub skills: Vec<SkillEntry>,
    pub additional_info: Vec<AdditionalInfoEntry>,
}

/// Partial update of the identity fields. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityUpdate {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub linkedin_profile: Option<String>,
    pub github_link: Option<String>,
    pub experience_years: Option<i32>,
}

/// Request body for creating or patching an employment entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmploymentFields {
    pub position: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationFields {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificationFields {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date_obtained: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillFields {
    pub skill_name: Option<String>,
    pub proficiency_level: Option<ProficiencyLevel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdditionalInfoFields {
    pub category: Option<String>,
    pub content: Option<String>,
}

/// The child collections of a profile that can be edited entry by entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    Employment,
    Education,
    Certifications,
    Skills,
    AdditionalInfo,
}

impl ProfileSection {
    pub fn table(self) -> &'static str {
        match self {
            Self::Employment => "employment_history",
            Self::Education => "education",
            Self::Certifications => "certifications",
            Self::Skills => "skills",
            Self::AdditionalInfo => "additional_info",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Employment => "Employment entry",
            Self::Education => "Education entry",
            Self::Certifications => "Certification",
            Self::Skills => "Skill",
            Self::AdditionalInfo => "Additional info entry",
        }
    }
}
