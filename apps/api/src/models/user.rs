use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity and contact fields of a user, as used on a generated resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub linkedin_profile: Option<String>,
    pub github_link: Option<String>,
    pub experience_years: i32,
}
