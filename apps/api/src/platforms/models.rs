use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error text for a requested platform that has no credentials.
pub const NOT_CONFIGURED: &str = "not configured";

/// Normalized, platform-agnostic job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_range: String,
    /// Internal employment type: `full-time`, `part-time`, `contract`, `internship`.
    #[serde(rename = "type")]
    pub employment_type: String,
    #[serde(default = "default_openings")]
    pub openings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
}

fn default_openings() -> u32 {
    1
}

/// Company details merged into postings that do not carry their own.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyProfile {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub apply_url: String,
    pub benefits: Vec<String>,
}

impl JobPosting {
    /// Fills absent company fields. Values already on the posting win.
    pub fn with_company_defaults(mut self, company: &CompanyProfile) -> Self {
        self.company_name.get_or_insert_with(|| company.name.clone());
        self.company_description
            .get_or_insert_with(|| company.description.clone());
        self.contact_email
            .get_or_insert_with(|| company.contact_email.clone());
        if self.benefits.is_none() && !company.benefits.is_empty() {
            self.benefits = Some(company.benefits.clone());
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Success,
    Error,
}

/// Outcome of posting one job to one platform. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResult {
    pub external_id: String,
    pub url: String,
    pub platform: String,
    pub posted_at: DateTime<Utc>,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostResult {
    pub fn success(platform: &str, external_id: String, url: String) -> Self {
        Self {
            external_id,
            url,
            platform: platform.to_string(),
            posted_at: Utc::now(),
            status: PostStatus::Success,
            error: None,
        }
    }

    pub fn failure(platform: &str, error: impl Into<String>) -> Self {
        Self {
            external_id: String::new(),
            url: String::new(),
            platform: platform.to_string(),
            posted_at: Utc::now(),
            status: PostStatus::Error,
            error: Some(error.into()),
        }
    }

    pub fn not_configured(platform: &str) -> Self {
        Self::failure(platform, NOT_CONFIGURED)
    }

    pub fn is_success(&self) -> bool {
        self.status == PostStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn company() -> CompanyProfile {
        CompanyProfile {
            name: "TalentFlow Company".to_string(),
            description: "Leading HR solutions provider".to_string(),
            contact_email: "hr@company.com".to_string(),
            apply_url: "https://company.com/apply".to_string(),
            benefits: vec!["Health insurance".to_string()],
        }
    }

    #[test]
    fn test_posting_deserializes_with_minimal_fields() {
        let job: JobPosting = serde_json::from_value(json!({
            "title": "Data Analyst",
            "type": "contract"
        }))
        .unwrap();
        assert_eq!(job.employment_type, "contract");
        assert_eq!(job.openings, 1);
        assert!(job.salary_range.is_empty());
        assert!(job.company_name.is_none());
    }

    #[test]
    fn test_company_defaults_fill_only_missing_fields() {
        let job: JobPosting = serde_json::from_value(json!({
            "title": "Data Analyst",
            "type": "full-time",
            "companyName": "PT Maju Jaya"
        }))
        .unwrap();

        let job = job.with_company_defaults(&company());
        assert_eq!(job.company_name.as_deref(), Some("PT Maju Jaya"));
        assert_eq!(job.contact_email.as_deref(), Some("hr@company.com"));
        assert_eq!(job.benefits, Some(vec!["Health insurance".to_string()]));
    }

    #[test]
    fn test_failure_result_serializes_error_status() {
        let result = PostResult::not_configured("ghost-platform");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "not configured");
        assert_eq!(value["externalId"], "");
        assert_eq!(value["platform"], "ghost-platform");
        assert!(!result.is_success());
    }

    #[test]
    fn test_success_result_has_no_error_field() {
        let result = PostResult::success(
            "glints",
            "42".to_string(),
            "https://glints.com/opportunities/jobs/42".to_string(),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "success");
        assert!(value.get("error").is_none());
    }
}
