//! Test helpers: stub HTTP services bound to an ephemeral local port and a canned
//! completion provider.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::FromRequest;
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use axum::{Form, Json, Router};
use serde_json::Value;

use crate::config::Config;
use crate::cv::extractor::ExtractorCommand;
use crate::llm_client::{CompletionRequest, LlmError, StructuredCompletionProvider};
use crate::platforms::credentials::PlatformCredentials;
use crate::platforms::models::CompanyProfile;

/// Configuration rooted at `upload_dir`, with no platform credentials and an
/// extractor command that always fails (every extraction degrades).
pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        upload_dir: upload_dir.to_path_buf(),
        extractor_command: ExtractorCommand {
            program: "/definitely/not/an/extractor".to_string(),
            args: vec![],
        },
        extraction_timeout: Duration::from_secs(2),
        llm_api_key: "test-key".to_string(),
        llm_base_url: "http://127.0.0.1:1".to_string(),
        llm_model: "test-model".to_string(),
        llm_timeout: Duration::from_secs(2),
        platform_timeout: Duration::from_secs(2),
        fanout_concurrency: 1,
        company: CompanyProfile {
            name: "TalentFlow Company".to_string(),
            description: "Leading HR solutions provider".to_string(),
            contact_email: "hr@company.com".to_string(),
            apply_url: "https://company.com/apply".to_string(),
            benefits: vec!["Health insurance".to_string()],
        },
        platform_credentials: PlatformCredentials::default(),
    }
}

/// Serves `router` on 127.0.0.1 and returns its base URL (no trailing slash).
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("recorded body is JSON")
    }

    pub async fn form(&self) -> HashMap<String, String> {
        let request = Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(self.body.clone()))
            .expect("form request");
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .expect("recorded body is form-encoded");
        fields
    }
}

/// A stub platform API answering every request with one fixed reply.
pub struct RecordingStub {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingStub {
    pub async fn spawn(status: StatusCode, reply: Value) -> Self {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = recorded.clone();
        let router = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
                let sink = sink.clone();
                let reply = reply.clone();
                async move {
                    sink.lock().unwrap().push(RecordedRequest {
                        method,
                        path: uri.path().to_string(),
                        headers,
                        body,
                    });
                    (status, Json(reply))
                }
            },
        );
        Self {
            base_url: spawn_stub(router).await,
            recorded,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

/// Replays queued answers in order and records every request it receives.
/// Runs dry with `LlmError::EmptyContent`.
pub struct StubProvider {
    replies: Mutex<VecDeque<Result<Value, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    pub fn replying(replies: Vec<Result<Value, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn json(value: Value) -> Self {
        Self::replying(vec![Ok(value)])
    }

    pub fn failing(err: LlmError) -> Self {
        Self::replying(vec![Err(err)])
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredCompletionProvider for StubProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// A complete, valid CV analysis answer.
pub fn sample_profile_json() -> Value {
    serde_json::json!({
        "personalInfo": {
            "name": "Sari Dewi",
            "email": "sari.dewi@example.com",
            "phone": "+62 812 0000 0000",
            "location": "Jakarta"
        },
        "education": [
            {"degree": "S1 Teknik Informatika", "institution": "Universitas Indonesia", "year": "2018", "gpa": "3.6"}
        ],
        "workExperience": [
            {
                "position": "Backend Engineer",
                "company": "Tokopedia",
                "duration": "2018 - 2023",
                "responsibilities": ["Built payment services in Go", "Led PostgreSQL migrations"],
                "yearsTotal": 5
            }
        ],
        "skills": {
            "technical": ["Go", "PostgreSQL", "Kubernetes"],
            "soft": ["Communication"],
            "languages": ["Indonesian", "English"],
            "certifications": ["CKA"]
        },
        "summary": "Backend engineer with five years of payments experience."
    })
}

/// A complete, valid match score answer.
pub fn sample_score_json() -> Value {
    serde_json::json!({
        "overallScore": 82,
        "skillsMatch": 88,
        "experienceMatch": 80,
        "educationMatch": 75,
        "recommendations": ["Proceed to technical interview"],
        "strengths": ["Strong Go background"],
        "concerns": ["Limited Rust exposure"],
        "breakdown": {
            "education": {"score": 75, "reason": "Relevant degree"},
            "experience": {"score": 80, "reason": "Five years in backend roles"},
            "skills": {"score": 88, "reason": "Most required skills present"},
            "overall": {"score": 82, "reason": "Good fit"}
        }
    })
}
