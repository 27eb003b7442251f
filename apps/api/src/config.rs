use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cv::extractor::{ExtractorCommand, DEFAULT_EXTRACTION_TIMEOUT};
use crate::llm_client::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::platforms::credentials::PlatformCredentials;
use crate::platforms::models::CompanyProfile;

const DEFAULT_EXTRACTOR_CMD: &str = "talentflow-extract";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub extractor_command: ExtractorCommand,
    pub extraction_timeout: Duration,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub platform_timeout: Duration,
    pub fanout_concurrency: usize,
    pub company: CompanyProfile,
    pub platform_credentials: PlatformCredentials,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let extractor_line = optional_env("TEXT_EXTRACTOR_CMD")
            .unwrap_or_else(|| DEFAULT_EXTRACTOR_CMD.to_string());

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upload_dir: PathBuf::from(
                optional_env("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            ),
            extractor_command: ExtractorCommand::parse(&extractor_line)
                .context("TEXT_EXTRACTOR_CMD must name a program")?,
            extraction_timeout: Duration::from_secs(parse_env(
                "EXTRACTION_TIMEOUT_SECS",
                DEFAULT_EXTRACTION_TIMEOUT.as_secs(),
            )?),
            llm_api_key: require_env("LLM_API_KEY").or_else(|_| require_env("OPENAI_API_KEY"))?,
            llm_base_url: optional_env("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 30)?),
            platform_timeout: Duration::from_secs(parse_env("PLATFORM_TIMEOUT_SECS", 30)?),
            fanout_concurrency: parse_env("FANOUT_CONCURRENCY", 1)?,
            company: CompanyProfile {
                name: env_or("COMPANY_NAME", "TalentFlow Company"),
                description: env_or("COMPANY_DESCRIPTION", "Leading HR solutions provider"),
                contact_email: env_or("COMPANY_EMAIL", "hr@company.com"),
                apply_url: env_or("COMPANY_APPLY_URL", "https://company.com/apply"),
                benefits: default_benefits(),
            },
            platform_credentials: PlatformCredentials::from_env(),
        })
    }

    pub fn llm(&self) -> LlmConfig {
        LlmConfig {
            api_key: self.llm_api_key.clone(),
            base_url: self.llm_base_url.clone(),
            model: self.llm_model.clone(),
            timeout: self.llm_timeout,
        }
    }
}

fn default_benefits() -> Vec<String> {
    ["Health insurance", "Transport allowance", "Performance bonus"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
