use crate::errors::AppError;
use crate::models::profile::{
    AdditionalInfoFields, CertificationFields, EducationFields, EmploymentFields, IdentityUpdate,
    SkillFields,
};

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Fails when a field needed to create an entry is missing or blank.
fn require(field: &str, value: Option<&str>) -> Result<(), AppError> {
    if is_blank(value) {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Fails when a patch tries to blank out a required field.
fn reject_blank(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::Validation(format!("{field} cannot be empty")))
        }
        _ => Ok(()),
    }
}

pub fn validate_identity_update(update: &IdentityUpdate) -> Result<(), AppError> {
    reject_blank("full_name", update.full_name.as_deref())?;
    if update.experience_years.is_some_and(|years| years < 0) {
        return Err(AppError::Validation(
            "experience_years cannot be negative".into(),
        ));
    }
    Ok(())
}

pub fn validate_new_employment(fields: &EmploymentFields) -> Result<(), AppError> {
    require("position", fields.position.as_deref())?;
    require("company", fields.company.as_deref())
}

pub fn validate_employment_patch(fields: &EmploymentFields) -> Result<(), AppError> {
    reject_blank("position", fields.position.as_deref())?;
    reject_blank("company", fields.company.as_deref())
}

pub fn validate_new_education(fields: &EducationFields) -> Result<(), AppError> {
    require("degree", fields.degree.as_deref())?;
    require("institution", fields.institution.as_deref())
}

pub fn validate_education_patch(fields: &EducationFields) -> Result<(), AppError> {
    reject_blank("degree", fields.degree.as_deref())?;
    reject_blank("institution", fields.institution.as_deref())
}

pub fn validate_new_certification(fields: &CertificationFields) -> Result<(), AppError> {
    require("name", fields.name.as_deref())
}

pub fn validate_new_skill(fields: &SkillFields) -> Result<(), AppError> {
    require("skill_name", fields.skill_name.as_deref())
}

pub fn validate_new_additional_info(fields: &AdditionalInfoFields) -> Result<(), AppError> {
    require("category", fields.category.as_deref())?;
    require("content", fields.content.as_deref())
}
