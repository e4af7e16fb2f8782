// All LLM prompt constants for the Generation module.

/// System prompt for resume synthesis. `{json_only}` is replaced with the shared fragment.
pub const SYNTHESIS_SYSTEM_TEMPLATE: &str = r#"You are a professional resume writer. Your task is to generate a tailored, ATS-friendly resume based on the candidate's profile and the job description provided.

IMPORTANT GUIDELINES:
1. Tailor the resume to match the job requirements
2. Use action verbs and quantifiable achievements
3. Keep it concise and professional
4. Highlight relevant skills and experiences
5. Use keywords from the job description naturally
6. Format experience descriptions as bullet points (one achievement per list item)
7. Do NOT fabricate information - only use facts present in the candidate profile

{json_only}

OUTPUT FORMAT (JSON):
{
  "summary": "Professional summary tailored to the job (2-3 sentences)",
  "skills": ["skill1", "skill2"],
  "experience": [
    {
      "position": "Job Title",
      "company": "Company Name",
      "location": "City, State",
      "period": "Start - End",
      "achievements": ["Achievement 1 with metrics", "Achievement 2"]
    }
  ],
  "education": [
    {
      "degree": "Degree Name",
      "institution": "School Name",
      "graduation": "Year",
      "details": "Optional details"
    }
  ],
  "certifications": ["Cert 1", "Cert 2"],
  "additionalSections": [
    {
      "title": "Section Title",
      "content": "Content"
    }
  ]
}

Use an empty list for any section the profile gives no material for."#;

/// User message for resume synthesis.
/// Replace: {profile}, {job_description}
pub const SYNTHESIS_USER_TEMPLATE: &str = r#"Generate a tailored resume for the following candidate applying to this job:

## CANDIDATE PROFILE

{profile}

---

## JOB DESCRIPTION

{job_description}

---

Generate a professional, tailored resume in the JSON format specified. Focus on making the candidate's experience relevant to this specific job."#;

/// System prompt for job-detail extraction. `{not_specified}` is the sentinel value.
pub const EXTRACTION_SYSTEM_TEMPLATE: &str = r#"Extract the job title and company name from the following job description. Return as JSON: {"jobTitle": "...", "companyName": "..."}. If a value is not found, use "{not_specified}"."#;
