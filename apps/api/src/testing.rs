//! In-memory fakes and fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::applications::ApplicationRepository;
use crate::errors::AppError;
use crate::generation::content::{EducationBlock, ExperienceBlock, SynthesizedContent};
use crate::generation::extractor::EXTRACTION_MODEL;
use crate::generation::synthesizer::SYNTHESIS_MODEL;
use crate::llm_client::{CompletionModel, CompletionRequest, LlmError};
use crate::models::application::{ApplicationRow, NewApplication, STATUS_GENERATED};
use crate::models::profile::{
    AdditionalInfoEntry, AdditionalInfoFields, CertificationEntry, CertificationFields,
    EducationEntry, EducationFields, EmploymentEntry, EmploymentFields, IdentityUpdate,
    ProficiencyLevel, Profile, ProfileSection, SkillEntry, SkillFields,
};
use crate::models::user::UserIdentity;
use crate::profile::{order_profile, ProfileRepository};
use crate::state::AppState;
use crate::storage::DocumentStorage;

/// One employment entry, no phone, no education or certifications.
pub fn sample_profile() -> Profile {
    Profile {
        user: UserIdentity {
            id: Uuid::new_v4(),
            email: "jane@example.com".into(),
            full_name: "Jane Doe".into(),
            address: Some("Berlin, Germany".into()),
            phone_number: None,
            linkedin_profile: Some("linkedin.com/in/janedoe".into()),
            github_link: None,
            experience_years: 6,
        },
        employment_history: vec![EmploymentEntry {
            id: Uuid::new_v4(),
            position: "Senior Engineer".into(),
            company: "Acme Corp".into(),
            location: Some("Berlin".into()),
            start_date: Some("Jan 2020".into()),
            end_date: None,
            description: Some("Built backend systems".into()),
        }],
        skills: vec![SkillEntry {
            id: Uuid::new_v4(),
            skill_name: "Rust".into(),
            proficiency_level: ProficiencyLevel::Expert,
        }],
        ..Default::default()
    }
}

/// What the scripted synthesis model returns by default.
pub fn sample_content() -> SynthesizedContent {
    SynthesizedContent {
        summary: "Backend engineer with six years of experience building reliable services.".into(),
        skills: vec!["Rust".into(), "PostgreSQL".into(), "Distributed Systems".into()],
        experience: vec![ExperienceBlock {
            position: "Senior Engineer".into(),
            company: "Acme Corp".into(),
            location: "Berlin".into(),
            period: "Jan 2020 - Present".into(),
            achievements: vec![
                "Built backend systems serving two million requests per day".into(),
                "Reduced deployment time by 60% through CI pipeline rework".into(),
            ],
        }],
        education: vec![EducationBlock {
            degree: "BSc Computer Science".into(),
            institution: "TU Berlin".into(),
            graduation: "2017".into(),
            details: None,
        }],
        certifications: vec![],
        additional_sections: vec![],
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_object: bool,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Unavailable,
}

impl Reply {
    fn resolve(&self) -> Result<String, LlmError> {
        match self {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Unavailable => Err(LlmError::Api {
                status: 503,
                message: "model overloaded".into(),
            }),
        }
    }
}

/// Completion model that answers by model id and records every request.
pub struct ScriptedModel {
    synthesis: Reply,
    extraction: Reply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            synthesis: Reply::Text(serde_json::to_string(&sample_content()).unwrap()),
            extraction: Reply::Text(
                r#"{"jobTitle": "Backend Engineer", "companyName": "Acme Corp"}"#.into(),
            ),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_synthesis_reply(mut self, reply: &str) -> Self {
        self.synthesis = Reply::Text(reply.into());
        self
    }

    pub fn with_extraction_reply(mut self, reply: &str) -> Self {
        self.extraction = Reply::Text(reply.into());
        self
    }

    pub fn failing_synthesis(mut self) -> Self {
        self.synthesis = Reply::Unavailable;
        self
    }

    pub fn failing_extraction(mut self) -> Self {
        self.extraction = Reply::Unavailable;
        self
    }

    pub fn calls_for(&self, model: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.model == model)
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: request.model.to_string(),
            system: request.system.to_string(),
            user: request.user.to_string(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            json_object: request.json_object,
        });
        match request.model {
            SYNTHESIS_MODEL => self.synthesis.resolve(),
            EXTRACTION_MODEL => self.extraction.resolve(),
            other => Err(LlmError::Api {
                status: 404,
                message: format!("unknown model {other}"),
            }),
        }
    }
}

#[derive(Default)]
pub struct InMemoryProfiles {
    profiles: Mutex<HashMap<Uuid, Profile>>,
    loads: AtomicUsize,
}

impl InMemoryProfiles {
    pub fn with_profile(self, profile: Profile) -> Self {
        self.profiles.lock().unwrap().insert(profile.user.id, profile);
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Runs `edit` against the stored profile, or fails with `NotFound`.
    fn edit<T>(&self, user_id: Uuid, edit: impl FnOnce(&mut Profile) -> Result<T, AppError>) -> Result<T, AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        edit(profile)
    }
}

fn missing(section: ProfileSection, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {id} not found", section.label()))
}

#[async_trait]
impl ProfileRepository for InMemoryProfiles {
    async fn load_profile(&self, user_id: Uuid) -> Result<Profile, AppError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let mut profile = self
            .profiles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        order_profile(&mut profile);
        Ok(profile)
    }

    async fn update_identity(&self, user_id: Uuid, update: IdentityUpdate) -> Result<UserIdentity, AppError> {
        self.edit(user_id, |profile| {
            let user = &mut profile.user;
            if let Some(v) = update.full_name {
                user.full_name = v;
            }
            if update.address.is_some() {
                user.address = update.address;
            }
            if update.phone_number.is_some() {
                user.phone_number = update.phone_number;
            }
            if update.linkedin_profile.is_some() {
                user.linkedin_profile = update.linkedin_profile;
            }
            if update.github_link.is_some() {
                user.github_link = update.github_link;
            }
            if let Some(v) = update.experience_years {
                user.experience_years = v;
            }
            Ok(user.clone())
        })
    }

    async fn add_employment(&self, user_id: Uuid, fields: EmploymentFields) -> Result<EmploymentEntry, AppError> {
        self.edit(user_id, |profile| {
            let entry = EmploymentEntry {
                id: Uuid::new_v4(),
                position: fields.position.unwrap_or_default(),
                company: fields.company.unwrap_or_default(),
                location: fields.location,
                start_date: fields.start_date,
                end_date: fields.end_date,
                description: fields.description,
            };
            profile.employment_history.push(entry.clone());
            Ok(entry)
        })
    }

    async fn update_employment(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: EmploymentFields,
    ) -> Result<EmploymentEntry, AppError> {
        self.edit(user_id, |profile| {
            let entry = profile
                .employment_history
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| missing(ProfileSection::Employment, id))?;
            if let Some(v) = fields.position {
                entry.position = v;
            }
            if let Some(v) = fields.company {
                entry.company = v;
            }
            entry.location = fields.location.or(entry.location.take());
            entry.start_date = fields.start_date.or(entry.start_date.take());
            entry.end_date = fields.end_date.or(entry.end_date.take());
            entry.description = fields.description.or(entry.description.take());
            Ok(entry.clone())
        })
    }

    async fn add_education(&self, user_id: Uuid, fields: EducationFields) -> Result<EducationEntry, AppError> {
        self.edit(user_id, |profile| {
            let entry = EducationEntry {
                id: Uuid::new_v4(),
                degree: fields.degree.unwrap_or_default(),
                institution: fields.institution.unwrap_or_default(),
                location: fields.location,
                graduation_date: fields.graduation_date,
                gpa: fields.gpa,
            };
            profile.education.push(entry.clone());
            Ok(entry)
        })
    }

    async fn update_education(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: EducationFields,
    ) -> Result<EducationEntry, AppError> {
        self.edit(user_id, |profile| {
            let entry = profile
                .education
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| missing(ProfileSection::Education, id))?;
            if let Some(v) = fields.degree {
                entry.degree = v;
            }
            if let Some(v) = fields.institution {
                entry.institution = v;
            }
            entry.location = fields.location.or(entry.location.take());
            entry.graduation_date = fields.graduation_date.or(entry.graduation_date.take());
            entry.gpa = fields.gpa.or(entry.gpa.take());
            Ok(entry.clone())
        })
    }

    async fn add_certification(
        &self,
        user_id: Uuid,
        fields: CertificationFields,
    ) -> Result<CertificationEntry, AppError> {
        self.edit(user_id, |profile| {
            let entry = CertificationEntry {
                id: Uuid::new_v4(),
                name: fields.name.unwrap_or_default(),
                issuer: fields.issuer,
                date_obtained: fields.date_obtained,
                expiry_date: fields.expiry_date,
                credential_id: fields.credential_id,
            };
            profile.certifications.push(entry.clone());
            Ok(entry)
        })
    }

    async fn add_skill(&self, user_id: Uuid, fields: SkillFields) -> Result<SkillEntry, AppError> {
        self.edit(user_id, |profile| {
            let entry = SkillEntry {
                id: Uuid::new_v4(),
                skill_name: fields.skill_name.unwrap_or_default(),
                proficiency_level: fields.proficiency_level.unwrap_or_default(),
            };
            profile.skills.push(entry.clone());
            Ok(entry)
        })
    }

    async fn add_additional_info(
        &self,
        user_id: Uuid,
        fields: AdditionalInfoFields,
    ) -> Result<AdditionalInfoEntry, AppError> {
        self.edit(user_id, |profile| {
            let entry = AdditionalInfoEntry {
                id: Uuid::new_v4(),
                category: fields.category.unwrap_or_default(),
                content: fields.content.unwrap_or_default(),
            };
            profile.additional_info.push(entry.clone());
            Ok(entry)
        })
    }

    async fn delete_entry(&self, user_id: Uuid, section: ProfileSection, id: Uuid) -> Result<(), AppError> {
        self.edit(user_id, |profile| {
            let before = section_len(profile, section);
            match section {
                ProfileSection::Employment => profile.employment_history.retain(|e| e.id != id),
                ProfileSection::Education => profile.education.retain(|e| e.id != id),
                ProfileSection::Certifications => profile.certifications.retain(|e| e.id != id),
                ProfileSection::Skills => profile.skills.retain(|e| e.id != id),
                ProfileSection::AdditionalInfo => profile.additional_info.retain(|e| e.id != id),
            }
            if section_len(profile, section) == before {
                return Err(missing(section, id));
            }
            Ok(())
        })
    }
}

fn section_len(profile: &Profile, section: ProfileSection) -> usize {
    match section {
        ProfileSection::Employment => profile.employment_history.len(),
        ProfileSection::Education => profile.education.len(),
        ProfileSection::Certifications => profile.certifications.len(),
        ProfileSection::Skills => profile.skills.len(),
        ProfileSection::AdditionalInfo => profile.additional_info.len(),
    }
}

#[derive(Default)]
pub struct InMemoryApplications {
    rows: Mutex<Vec<ApplicationRow>>,
    fail_inserts: bool,
}

impl InMemoryApplications {
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<ApplicationRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplications {
    async fn insert(&self, application: NewApplication) -> Result<ApplicationRow, AppError> {
        if self.fail_inserts {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            user_id: application.user_id,
            job_title: Some(application.job_title),
            company_name: Some(application.company_name),
            jd_link: application.jd_link,
            jd_content: application.jd_content,
            cv_doc_path: application.cv_doc_path,
            cv_pdf_path: application.cv_pdf_path,
            applied_at: Utc::now(),
            status: STATUS_GENERATED.to_string(),
            notes: None,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
        let mut rows: Vec<ApplicationRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(rows)
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    blobs: Mutex<HashMap<String, (Vec<u8>, String)>>,
    /// Writes of filenames with this extension fail.
    fail_extension: Option<&'static str>,
}

impl InMemoryStorage {
    pub fn failing_writes_for(extension: &'static str) -> Self {
        Self {
            fail_extension: Some(extension),
            ..Default::default()
        }
    }

    pub fn filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.blobs.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn content_type_of(&self, filename: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .get(filename)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait]
impl DocumentStorage for InMemoryStorage {
    async fn put(&self, filename: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        if let Some(ext) = self.fail_extension {
            if filename.ends_with(ext) {
                return Err(AppError::Storage(format!("disk full writing {filename}")));
            }
        }
        self.blobs
            .lock()
            .unwrap()
            .insert(filename.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn get(&self, filename: &str) -> Result<Bytes, AppError> {
        self.blobs
            .lock()
            .unwrap()
            .get(filename)
            .map(|(bytes, _)| Bytes::from(bytes.clone()))
            .ok_or_else(|| AppError::NotFound(format!("Document {filename} not found")))
    }

    async fn delete(&self, filename: &str) -> Result<(), AppError> {
        self.blobs.lock().unwrap().remove(filename);
        Ok(())
    }
}

/// Shared handles to every fake, so tests can inspect them after the call.
pub struct Fakes {
    pub model: Arc<ScriptedModel>,
    pub profiles: Arc<InMemoryProfiles>,
    pub applications: Arc<InMemoryApplications>,
    pub storage: Arc<InMemoryStorage>,
}

impl Fakes {
    pub fn new(profile: Profile) -> Self {
        Self {
            model: Arc::new(ScriptedModel::new()),
            profiles: Arc::new(InMemoryProfiles::default().with_profile(profile)),
            applications: Arc::new(InMemoryApplications::default()),
            storage: Arc::new(InMemoryStorage::default()),
        }
    }

    pub fn with_model(mut self, model: ScriptedModel) -> Self {
        self.model = Arc::new(model);
        self
    }

    pub fn with_profiles(mut self, profiles: InMemoryProfiles) -> Self {
        self.profiles = Arc::new(profiles);
        self
    }

    pub fn with_applications(mut self, applications: InMemoryApplications) -> Self {
        self.applications = Arc::new(applications);
        self
    }

    pub fn with_storage(mut self, storage: InMemoryStorage) -> Self {
        self.storage = Arc::new(storage);
        self
    }

    pub fn state(&self) -> AppState {
        AppState {
            llm: self.model.clone(),
            profiles: self.profiles.clone(),
            applications: self.applications.clone(),
            storage: self.storage.clone(),
        }
    }
}
