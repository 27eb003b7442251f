//! Platform adapters. `MappedAdapter` posts a `JobPosting` to any board described
//! by a `PlatformSpec`; every failure comes back as an error `PostResult`.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::platforms::credentials::Credentials;
use crate::platforms::mapping::{build_payload, posting_url, Payload, PayloadContext, PlatformSpec};
use crate::platforms::models::{JobPosting, PostResult};

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform_id(&self) -> &str;

    /// Never fails past this boundary; errors are reported in the result.
    async fn post_job(&self, job: &JobPosting) -> PostResult;
}

pub struct MappedAdapter {
    spec: &'static PlatformSpec,
    credentials: Credentials,
    http: reqwest::Client,
    apply_url: String,
    base_url: String,
}

impl MappedAdapter {
    pub fn new(
        spec: &'static PlatformSpec,
        credentials: Credentials,
        http: reqwest::Client,
        apply_url: impl Into<String>,
    ) -> Self {
        Self {
            spec,
            credentials,
            http,
            apply_url: apply_url.into(),
            base_url: spec.base_url.to_string(),
        }
    }

    /// Points the adapter at another host, keeping the platform's path.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.spec.path)
    }

    async fn try_post(&self, job: &JobPosting) -> Result<PostResult, String> {
        let payload = build_payload(
            self.spec,
            &PayloadContext {
                job,
                publisher_id: self.credentials.publisher_id(),
                apply_url: &self.apply_url,
            },
        );

        let mut request = self
            .http
            .post(self.endpoint())
            .bearer_auth(self.credentials.bearer_token());
        for (name, value) in self.spec.headers {
            request = request.header(*name, *value);
        }
        request = match &payload {
            Payload::Json(body) => request.json(body),
            Payload::Form(pairs) => request.form(pairs),
        };

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            return Err(body
                .as_ref()
                .and_then(|b| b.get(self.spec.error_field))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16())));
        }

        let external_id = body
            .as_ref()
            .and_then(|b| b.get(self.spec.id_field))
            .and_then(id_text)
            .ok_or_else(|| format!("response missing {}", self.spec.id_field))?;

        let url = posting_url(self.spec, &external_id);
        Ok(PostResult::success(self.spec.id, external_id, url))
    }
}

/// Platforms return ids as strings or numbers.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl PlatformAdapter for MappedAdapter {
    fn platform_id(&self) -> &str {
        self.spec.id
    }

    async fn post_job(&self, job: &JobPosting) -> PostResult {
        match self.try_post(job).await {
            Ok(result) => {
                info!(
                    "Posted '{}' to {} as {}",
                    job.title, self.spec.name, result.external_id
                );
                result
            }
            Err(message) => {
                warn!("Posting '{}' to {} failed: {message}", job.title, self.spec.name);
                PostResult::failure(self.spec.id, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::mapping::spec;
    use crate::platforms::models::PostStatus;
    use crate::test_support::RecordingStub;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn job() -> JobPosting {
        JobPosting {
            title: "Backend Engineer".to_string(),
            description: "Build payment APIs".to_string(),
            requirements: "3+ years Go".to_string(),
            location: "Bandung".to_string(),
            salary_range: "8-12".to_string(),
            employment_type: "full-time".to_string(),
            openings: 1,
            company_name: Some("PT Maju Jaya".to_string()),
            company_description: None,
            contact_email: Some("hr@majujaya.co.id".to_string()),
            benefits: Some(vec!["BPJS".to_string()]),
        }
    }

    fn api_key(key: &str) -> Credentials {
        Credentials::ApiKey {
            api_key: key.to_string(),
        }
    }

    fn adapter(id: &str, credentials: Credentials, base_url: &str) -> MappedAdapter {
        MappedAdapter::new(
            spec(id).unwrap(),
            credentials,
            reqwest::Client::new(),
            "https://company.com/apply",
        )
        .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_jobstreet_success_builds_public_url() {
        let stub = RecordingStub::spawn(StatusCode::CREATED, json!({"job_id": "JS-991"})).await;

        let result = adapter("jobstreet", api_key("js-key"), &stub.base_url)
            .post_job(&job())
            .await;

        assert_eq!(result.status, PostStatus::Success);
        assert_eq!(result.external_id, "JS-991");
        assert_eq!(result.url, "https://www.jobstreet.co.id/job/JS-991");
        assert_eq!(result.platform, "jobstreet");

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/jobs");
        assert_eq!(requests[0].header("authorization"), Some("Bearer js-key"));
        assert_eq!(requests[0].header("accept"), Some("application/json"));
        assert_eq!(requests[0].json()["employment_type"], "FULL_TIME");
        assert_eq!(requests[0].json()["benefits"], json!(["BPJS"]));
    }

    #[tokio::test]
    async fn test_indeed_posts_form_with_publisher() {
        let stub = RecordingStub::spawn(StatusCode::OK, json!({"job_id": "abc123"})).await;
        let credentials = Credentials::PublisherKey {
            publisher_id: "pub-77".to_string(),
            api_key: "in-key".to_string(),
        };

        let result = adapter("indeed", credentials, &stub.base_url)
            .post_job(&job())
            .await;

        assert!(result.is_success());
        assert_eq!(result.url, "https://www.indeed.com/viewjob?jk=abc123");

        let request = &stub.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header("authorization"), Some("Bearer in-key"));
        let form = request.form().await;
        assert_eq!(form["publisher"], "pub-77");
        assert_eq!(form["jobtype"], "fulltime");
        assert_eq!(form["email"], "hr@majujaya.co.id");
        assert_eq!(form["method"], "job.create");
    }

    #[tokio::test]
    async fn test_linkedin_uses_access_token_and_version_header() {
        let stub = RecordingStub::spawn(StatusCode::CREATED, json!({"id": 7788})).await;
        let credentials = Credentials::OAuth {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            access_token: "li-token".to_string(),
        };

        let result = adapter("linkedin", credentials, &stub.base_url)
            .post_job(&job())
            .await;

        assert_eq!(result.external_id, "7788");
        assert_eq!(result.url, "https://www.linkedin.com/jobs/view/7788");
        let request = &stub.requests()[0];
        assert_eq!(request.path, "/jobPostings");
        assert_eq!(request.header("authorization"), Some("Bearer li-token"));
        assert_eq!(request.header("linkedin-version"), Some("202210"));
        assert_eq!(request.json()["location"]["city"], "Bandung");
    }

    #[tokio::test]
    async fn test_kalibrr_sends_salary_bounds() {
        let stub = RecordingStub::spawn(StatusCode::OK, json!({"id": "kb-1"})).await;

        let result = adapter("kalibrr", api_key("kb-key"), &stub.base_url)
            .post_job(&job())
            .await;

        assert!(result.is_success());
        let body = stub.requests()[0].json();
        assert_eq!(body["salary_min"], 8_000_000u64);
        assert_eq!(body["salary_max"], 12_000_000u64);
        assert_eq!(body["employment_type"], "full_time");
    }

    #[tokio::test]
    async fn test_error_body_message_is_reported() {
        let stub = RecordingStub::spawn(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "title too short"}),
        )
        .await;

        let result = adapter("glints", api_key("gl-key"), &stub.base_url)
            .post_job(&job())
            .await;

        assert_eq!(result.status, PostStatus::Error);
        assert_eq!(result.error.as_deref(), Some("title too short"));
        assert_eq!(result.external_id, "");
        assert_eq!(result.url, "");
    }

    #[tokio::test]
    async fn test_indeed_reads_error_field() {
        let stub = RecordingStub::spawn(
            StatusCode::BAD_REQUEST,
            json!({"error": "invalid publisher", "message": "ignored"}),
        )
        .await;
        let credentials = Credentials::PublisherKey {
            publisher_id: "pub".to_string(),
            api_key: "key".to_string(),
        };

        let result = adapter("indeed", credentials, &stub.base_url)
            .post_job(&job())
            .await;
        assert_eq!(result.error.as_deref(), Some("invalid publisher"));
    }

    #[tokio::test]
    async fn test_status_fallback_message() {
        let stub = RecordingStub::spawn(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;

        let result = adapter("jobstreet", api_key("js-key"), &stub.base_url)
            .post_job(&job())
            .await;
        assert_eq!(result.error.as_deref(), Some("request failed with status 500"));
    }

    #[tokio::test]
    async fn test_success_without_id_is_an_error() {
        let stub = RecordingStub::spawn(StatusCode::OK, json!({"ok": true})).await;

        let result = adapter("kalibrr", api_key("kb-key"), &stub.base_url)
            .post_job(&job())
            .await;
        assert_eq!(result.error.as_deref(), Some("response missing id"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_captured() {
        let result = adapter("glints", api_key("gl-key"), "http://127.0.0.1:1")
            .post_job(&job())
            .await;

        assert_eq!(result.status, PostStatus::Error);
        assert!(!result.error.unwrap().is_empty());
        assert_eq!(result.platform, "glints");
    }
}
