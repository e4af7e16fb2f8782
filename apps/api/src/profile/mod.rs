// Profile Store: a user's identity and resume source data.

pub mod handlers;
pub mod validation;

use std::cmp::Ordering;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{
    AdditionalInfoEntry, AdditionalInfoFields, CertificationEntry, CertificationFields,
    EducationEntry, EducationFields, EmploymentEntry, EmploymentFields, IdentityUpdate, Profile,
    ProfileSection, SkillEntry, SkillFields,
};
use crate::models::user::UserIdentity;

/// Reads and edits profiles. Every write is scoped to `user_id`; an entry owned
/// by someone else is reported as `NotFound`.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Loads the whole profile. `NotFound` when the user does not exist.
    async fn load_profile(&self, user_id: Uuid) -> Result<Profile, AppError>;

    async fn update_identity(
        &self,
        user_id: Uuid,
        update: IdentityUpdate,
    ) -> Result<UserIdentity, AppError>;

    async fn add_employment(
        &self,
        user_id: Uuid,
        fields: EmploymentFields,
    ) -> Result<EmploymentEntry, AppError>;

    async fn update_employment(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: EmploymentFields,
    ) -> Result<EmploymentEntry, AppError>;

    async fn add_education(
        &self,
        user_id: Uuid,
        fields: EducationFields,
    ) -> Result<EducationEntry, AppError>;

    async fn update_education(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: EducationFields,
    ) -> Result<EducationEntry, AppError>;

    async fn add_certification(
        &self,
        user_id: Uuid,
        fields: CertificationFields,
    ) -> Result<CertificationEntry, AppError>;

    async fn add_skill(&self, user_id: Uuid, fields: SkillFields) -> Result<SkillEntry, AppError>;

    async fn add_additional_info(
        &self,
        user_id: Uuid,
        fields: AdditionalInfoFields,
    ) -> Result<AdditionalInfoEntry, AppError>;

    async fn delete_entry(
        &self,
        user_id: Uuid,
        section: ProfileSection,
        id: Uuid,
    ) -> Result<(), AppError>;
}

/// Descending by the free-text date; missing or blank dates sort last.
fn newest_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.map(str::trim).filter(|s| !s.is_empty());
    let b = b.map(str::trim).filter(|s| !s.is_empty());
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders employment by start date and education by graduation date, newest first.
pub fn order_profile(profile: &mut Profile) {
    profile
        .employment_history
        .sort_by(|a, b| newest_first(a.start_date.as_deref(), b.start_date.as_deref()));
    profile
        .education
        .sort_by(|a, b| newest_first(a.graduation_date.as_deref(), b.graduation_date.as_deref()));
}

fn entry_not_found(section: ProfileSection, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {id} not found", section.label()))
}

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EMPLOYMENT_COLUMNS: &str = "id, position, company, location, start_date, end_date, description";
const EDUCATION_COLUMNS: &str = "id, degree, institution, location, graduation_date, gpa";
const IDENTITY_COLUMNS: &str =
    "id, email, full_name, address, phone_number, linkedin_profile, github_link, experience_years";

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn load_profile(&self, user_id: Uuid) -> Result<Profile, AppError> {
        let user = sqlx::query_as::<_, UserIdentity>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

        // Ties keep insertion order once `order_profile` sorts by date.
        let employment_history = sqlx::query_as::<_, EmploymentEntry>(&format!(
            "SELECT {EMPLOYMENT_COLUMNS} FROM employment_history WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let education = sqlx::query_as::<_, EducationEntry>(&format!(
            "SELECT {EDUCATION_COLUMNS} FROM education WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let certifications = sqlx::query_as::<_, CertificationEntry>(
            r#"
            SELECT id, name, issuer, date_obtained, expiry_date, credential_id
            FROM certifications
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let skills = sqlx::query_as::<_, SkillEntry>(
            "SELECT id, skill_name, proficiency_level FROM skills WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let additional_info = sqlx::query_as::<_, AdditionalInfoEntry>(
            "SELECT id, category, content FROM additional_info WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Loaded profile for user {user_id}: {} jobs, {} education, {} certifications, {} skills",
            employment_history.len(),
            education.len(),
            certifications.len(),
            skills.len()
        );

        let mut profile = Profile {
            user,
            employment_history,
            education,
            certifications,
            skills,
            additional_info,
        };
        order_profile(&mut profile);
        Ok(profile)
    }

    async fn update_identity(
        &self,
        user_id: Uuid,
        update: IdentityUpdate,
    ) -> Result<UserIdentity, AppError> {
        sqlx::query_as::<_, UserIdentity>(&format!(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                address = COALESCE($3, address),
                phone_number = COALESCE($4, phone_number),
                linkedin_profile = COALESCE($5, linkedin_profile),
                github_link = COALESCE($6, github_link),
                experience_years = COALESCE($7, experience_years),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {IDENTITY_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(update.full_name)
        .bind(update.address)
        .bind(update.phone_number)
        .bind(update.linkedin_profile)
        .bind(update.github_link)
        .bind(update.experience_years)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    async fn add_employment(
        &self,
        user_id: Uuid,
        fields: EmploymentFields,
    ) -> Result<EmploymentEntry, AppError> {
        let entry = sqlx::query_as::<_, EmploymentEntry>(&format!(
            r#"
            INSERT INTO employment_history
                (user_id, position, company, location, start_date, end_date, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EMPLOYMENT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(fields.position)
        .bind(fields.company)
        .bind(fields.location)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn update_employment(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: EmploymentFields,
    ) -> Result<EmploymentEntry, AppError> {
        sqlx::query_as::<_, EmploymentEntry>(&format!(
            r#"
            UPDATE employment_history SET
                position = COALESCE($3, position),
                company = COALESCE($4, company),
                location = COALESCE($5, location),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                description = COALESCE($8, description)
            WHERE id = $1 AND user_id = $2
            RETURNING {EMPLOYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(fields.position)
        .bind(fields.company)
        .bind(fields.location)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| entry_not_found(ProfileSection::Employment, id))
    }

    async fn add_education(
        &self,
        user_id: Uuid,
        fields: EducationFields,
    ) -> Result<EducationEntry, AppError> {
        let entry = sqlx::query_as::<_, EducationEntry>(&format!(
            r#"
            INSERT INTO education (user_id, degree, institution, location, graduation_date, gpa)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EDUCATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(fields.degree)
        .bind(fields.institution)
        .bind(fields.location)
        .bind(fields.graduation_date)
        .bind(fields.gpa)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn update_education(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: EducationFields,
    ) -> Result<EducationEntry, AppError> {
        sqlx::query_as::<_, EducationEntry>(&format!(
            r#"
            UPDATE education SET
                degree = COALESCE($3, degree),
                institution = COALESCE($4, institution),
                location = COALESCE($5, location),
                graduation_date = COALESCE($6, graduation_date),
                gpa = COALESCE($7, gpa)
            WHERE id = $1 AND user_id = $2
            RETURNING {EDUCATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(fields.degree)
        .bind(fields.institution)
        .bind(fields.location)
        .bind(fields.graduation_date)
        .bind(fields.gpa)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| entry_not_found(ProfileSection::Education, id))
    }

    async fn add_certification(
        &self,
        user_id: Uuid,
        fields: CertificationFields,
    ) -> Result<CertificationEntry, AppError> {
        let entry = sqlx::query_as::<_, CertificationEntry>(
            r#"
            INSERT INTO certifications
                (user_id, name, issuer, date_obtained, expiry_date, credential_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, issuer, date_obtained, expiry_date, credential_id
            "#,
        )
        .bind(user_id)
        .bind(fields.name)
        .bind(fields.issuer)
        .bind(fields.date_obtained)
        .bind(fields.expiry_date)
        .bind(fields.credential_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn add_skill(&self, user_id: Uuid, fields: SkillFields) -> Result<SkillEntry, AppError> {
        let level = fields.proficiency_level.unwrap_or_default();
        let entry = sqlx::query_as::<_, SkillEntry>(
            r#"
            INSERT INTO skills (user_id, skill_name, proficiency_level)
            VALUES ($1, $2, $3)
            RETURNING id, skill_name, proficiency_level
            "#,
        )
        .bind(user_id)
        .bind(fields.skill_name)
        .bind(level.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn add_additional_info(
        &self,
        user_id: Uuid,
        fields: AdditionalInfoFields,
    ) -> Result<AdditionalInfoEntry, AppError> {
        let entry = sqlx::query_as::<_, AdditionalInfoEntry>(
            r#"
            INSERT INTO additional_info (user_id, category, content)
            VALUES ($1, $2, $3)
            RETURNING id, category, content
            "#,
        )
        .bind(user_id)
        .bind(fields.category)
        .bind(fields.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn delete_entry(
        &self,
        user_id: Uuid,
        section: ProfileSection,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1 AND user_id = $2",
            section.table()
        ))
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(entry_not_found(section, id));
        }
        Ok(())
    }
}
