// All LLM prompt constants for the CV module.
// Templates use `{placeholder}` markers filled by `fill_template` before sending.

/// System prompt for CV analysis. Fully specifies the target JSON shape.
pub const CV_ANALYSIS_SYSTEM: &str = r#"You are an expert HR CV analyzer. Analyze the CV text and extract structured information.
Return a JSON object with the following structure:
{
  "personalInfo": {
    "name": "string",
    "email": "string",
    "phone": "string",
    "location": "string (omit if unknown)"
  },
  "education": [
    {
      "degree": "string",
      "institution": "string",
      "year": "string",
      "gpa": "string (omit if unknown)"
    }
  ],
  "workExperience": [
    {
      "position": "string",
      "company": "string",
      "duration": "string",
      "responsibilities": ["string"],
      "yearsTotal": number
    }
  ],
  "skills": {
    "technical": ["string"],
    "soft": ["string"],
    "languages": ["string"],
    "certifications": ["string"]
  },
  "summary": "string"
}
Use empty strings or empty arrays when the CV does not contain the information."#;

/// User prompt for CV analysis. Replace `{cv_text}` before sending.
pub const CV_ANALYSIS_PROMPT_TEMPLATE: &str =
    "Analyze this CV and extract structured information:\n\n{cv_text}";

pub const MATCH_SYSTEM: &str =
    "You are an expert HR recruiter specializing in candidate-job matching analysis.";

/// Compatibility prompt. Weighting between criteria is left to the model.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert recruiter analyzing job-candidate compatibility.

CANDIDATE PROFILE:
- Education: {education}
- Work Experience: {work_experience}
- Technical Skills: {technical_skills}
- Soft Skills: {soft_skills}
- Languages: {languages}
- Certifications: {certifications}

JOB REQUIREMENTS:
- Position: {job_title}
- Description: {job_description}

Calculate compatibility scores (0-100) and provide detailed analysis. Return JSON:
{
  "overallScore": number,
  "skillsMatch": number,
  "experienceMatch": number,
  "educationMatch": number,
  "recommendations": ["string"],
  "strengths": ["string"],
  "concerns": ["string"],
  "breakdown": {
    "education": {"score": number, "reason": "string"},
    "experience": {"score": number, "reason": "string"},
    "skills": {"score": number, "reason": "string"},
    "overall": {"score": number, "reason": "string"}
  }
}"#;

pub const INTERVIEW_SYSTEM: &str = "You are an HR expert who writes high-quality interview questions \
    that assess candidates comprehensively.";

/// Interview question prompt. Replace `{name}`, `{education}`, `{work_experience}`,
/// `{skills}`, `{job_title}`, `{job_description}`, `{requirements}`.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Based on the candidate profile and the position applied for, write 8-10 relevant interview questions.

CANDIDATE PROFILE:
- Name: {name}
- Education: {education}
- Work Experience: {work_experience}
- Skills: {skills}

POSITION:
- Title: {job_title}
- Description: {job_description}
- Requirements: {requirements}

Return JSON:
{
  "questions": ["string"]
}

The questions must:
1. Dig into specific relevant experience
2. Test technical skills
3. Explore motivation and culture fit
4. Identify potential and learning ability
5. Ask about challenging situations the candidate has handled"#;


/// Substitutes `{key}` markers in one pass. Inserted values are never rescanned,
/// so CV text containing `{job_description}` stays literal. Unknown markers and
/// the JSON braces in the templates are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });

        match value {
            Some((close, value)) => {
                filled.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                filled.push('{');
                rest = after;
            }
        }
    }

    filled.push_str(rest);
    filled
}
