//! Candidate profile and match score shapes exchanged with the generative service.
//!
//! Field names are camelCase on the wire because the prompts describe the JSON that way.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub personal_info: PersonalInfo,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub skills: Skills,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub gpa: Option<String>,
}

/// Accepts `2018` or `3.6` where a string is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(number) => number.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub position: String,
    pub company: String,
    pub duration: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub years_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Score plus the model's justification for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub education: CriterionScore,
    pub experience: CriterionScore,
    pub skills: CriterionScore,
    pub overall: CriterionScore,
}

/// Compatibility assessment between a candidate and a job opening.
/// Every numeric field lies in [0, 100] once it has passed `CompatibilityScorer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub overall_score: f64,
    pub skills_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    pub recommendations: Vec<String>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

impl MatchScore {
    /// All numeric fields paired with their wire names, in a stable order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 8] {
        [
            ("overallScore", self.overall_score),
            ("skillsMatch", self.skills_match),
            ("experienceMatch", self.experience_match),
            ("educationMatch", self.education_match),
            ("breakdown.education.score", self.breakdown.education.score),
            ("breakdown.experience.score", self.breakdown.experience.score),
            ("breakdown.skills.score", self.breakdown.skills.score),
            ("breakdown.overall.score", self.breakdown.overall.score),
        ]
    }
}
