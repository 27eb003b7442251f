//! Per-platform mapping tables.
//!
//! Every job board differs only in endpoint, credential shape, payload field names,
//! employment-type vocabulary and posting URL template. One `PlatformSpec` per board
//! captures those differences; `MappedAdapter` does the rest.

use serde_json::{Map, Value};

use crate::platforms::models::JobPosting;
use crate::platforms::salary::parse_salary_millions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    Json,
    Form,
}

/// Which credential set a platform needs before an adapter is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    ApiKey,
    PublisherKey,
    OAuth,
}

/// Where a payload value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Title,
    Description,
    Requirements,
    Location,
    SalaryRange,
    EmploymentType,
    Openings,
    CompanyName,
    CompanyDescription,
    ContactEmail,
    Benefits,
    SalaryMin,
    SalaryMax,
    PublisherId,
    ApplyUrl,
    Literal(&'static str),
}

/// `key` may be dotted (`location.city`) to build nested JSON objects.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub key: &'static str,
    pub source: FieldSource,
}

const fn field(key: &'static str, source: FieldSource) -> FieldMapping {
    FieldMapping { key, source }
}

#[derive(Debug)]
pub struct PlatformSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub base_url: &'static str,
    pub path: &'static str,
    pub credential: CredentialKind,
    /// Environment variables, in `Credentials` field order.
    pub credential_env: &'static [&'static str],
    pub encoding: PayloadEncoding,
    pub headers: &'static [(&'static str, &'static str)],
    pub fields: &'static [FieldMapping],
    pub employment_types: &'static [(&'static str, &'static str)],
    pub default_employment_type: &'static str,
    /// Success-body field holding the platform's posting id.
    pub id_field: &'static str,
    /// Error-body field holding a human-readable message.
    pub error_field: &'static str,
    pub url_template: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Tables
// ────────────────────────────────────────────────────────────────────────────

const UPPER_SNAKE_TYPES: &[(&str, &str)] = &[
    ("full-time", "FULL_TIME"),
    ("part-time", "PART_TIME"),
    ("contract", "CONTRACT"),
    ("internship", "INTERNSHIP"),
];

const JOBSTREET_FIELDS: &[FieldMapping] = &[
    field("title", FieldSource::Title),
    field("description", FieldSource::Description),
    field("requirements", FieldSource::Requirements),
    field("location", FieldSource::Location),
    field("salary_range", FieldSource::SalaryRange),
    field("employment_type", FieldSource::EmploymentType),
    field("openings", FieldSource::Openings),
    field("company_name", FieldSource::CompanyName),
    field("company_description", FieldSource::CompanyDescription),
    field("contact_email", FieldSource::ContactEmail),
    field("benefits", FieldSource::Benefits),
];

const INDEED_FIELDS: &[FieldMapping] = &[
    field("publisher", FieldSource::PublisherId),
    field("format", FieldSource::Literal("json")),
    field("v", FieldSource::Literal("2")),
    field("method", FieldSource::Literal("job.create")),
    field("title", FieldSource::Title),
    field("description", FieldSource::Description),
    field("location", FieldSource::Location),
    field("company", FieldSource::CompanyName),
    field("jobtype", FieldSource::EmploymentType),
    field("salary", FieldSource::SalaryRange),
    field("email", FieldSource::ContactEmail),
    field("requirements", FieldSource::Requirements),
];

const LINKEDIN_FIELDS: &[FieldMapping] = &[
    field("title", FieldSource::Title),
    field("description", FieldSource::Description),
    field("location.countryCode", FieldSource::Literal("ID")),
    field("location.city", FieldSource::Location),
    field("employmentType", FieldSource::EmploymentType),
    field("seniority", FieldSource::Literal("ENTRY_LEVEL")),
    field("companyName", FieldSource::CompanyName),
    field("applyMethod.companyApplyUrl", FieldSource::ApplyUrl),
];

const GLINTS_FIELDS: &[FieldMapping] = &[
    field("title", FieldSource::Title),
    field("description", FieldSource::Description),
    field("requirements", FieldSource::Requirements),
    field("location", FieldSource::Location),
    field("salary_range", FieldSource::SalaryRange),
    field("job_type", FieldSource::EmploymentType),
    field("openings", FieldSource::Openings),
    field("company_name", FieldSource::CompanyName),
    field("contact_email", FieldSource::ContactEmail),
];

const KALIBRR_FIELDS: &[FieldMapping] = &[
    field("title", FieldSource::Title),
    field("description", FieldSource::Description),
    field("requirements", FieldSource::Requirements),
    field("location", FieldSource::Location),
    field("salary_min", FieldSource::SalaryMin),
    field("salary_max", FieldSource::SalaryMax),
    field("employment_type", FieldSource::EmploymentType),
    field("openings", FieldSource::Openings),
    field("company_name", FieldSource::CompanyName),
];

pub static PLATFORMS: [PlatformSpec; 5] = [
    PlatformSpec {
        id: "jobstreet",
        name: "JobStreet",
        base_url: "https://api.jobstreet.co.id/v1",
        path: "/jobs",
        credential: CredentialKind::ApiKey,
        credential_env: &["JOBSTREET_API_KEY"],
        encoding: PayloadEncoding::Json,
        headers: &[("Accept", "application/json")],
        fields: JOBSTREET_FIELDS,
        employment_types: UPPER_SNAKE_TYPES,
        default_employment_type: "FULL_TIME",
        id_field: "job_id",
        error_field: "message",
        url_template: "https://www.jobstreet.co.id/job/{id}",
    },
    PlatformSpec {
        id: "indeed",
        name: "Indeed",
        base_url: "https://secure.indeed.com/rpc/job",
        path: "",
        credential: CredentialKind::PublisherKey,
        credential_env: &["INDEED_PUBLISHER_ID", "INDEED_API_KEY"],
        encoding: PayloadEncoding::Form,
        headers: &[],
        fields: INDEED_FIELDS,
        employment_types: &[
            ("full-time", "fulltime"),
            ("part-time", "parttime"),
            ("contract", "contract"),
            ("internship", "internship"),
        ],
        default_employment_type: "fulltime",
        id_field: "job_id",
        error_field: "error",
        url_template: "https://www.indeed.com/viewjob?jk={id}",
    },
    PlatformSpec {
        id: "linkedin",
        name: "LinkedIn",
        base_url: "https://api.linkedin.com/v2",
        path: "/jobPostings",
        credential: CredentialKind::OAuth,
        credential_env: &[
            "LINKEDIN_CLIENT_ID",
            "LINKEDIN_CLIENT_SECRET",
            "LINKEDIN_ACCESS_TOKEN",
        ],
        encoding: PayloadEncoding::Json,
        headers: &[("LinkedIn-Version", "202210")],
        fields: LINKEDIN_FIELDS,
        employment_types: UPPER_SNAKE_TYPES,
        default_employment_type: "FULL_TIME",
        id_field: "id",
        error_field: "message",
        url_template: "https://www.linkedin.com/jobs/view/{id}",
    },
    PlatformSpec {
        id: "glints",
        name: "Glints",
        base_url: "https://api.glints.com/v1",
        path: "/jobs",
        credential: CredentialKind::ApiKey,
        credential_env: &["GLINTS_API_KEY"],
        encoding: PayloadEncoding::Json,
        headers: &[],
        fields: GLINTS_FIELDS,
        employment_types: UPPER_SNAKE_TYPES,
        default_employment_type: "FULL_TIME",
        id_field: "job_id",
        error_field: "message",
        url_template: "https://glints.com/opportunities/jobs/{id}",
    },
    PlatformSpec {
        id: "kalibrr",
        name: "Kalibrr",
        base_url: "https://api.kalibrr.com/v1",
        path: "/jobs",
        credential: CredentialKind::ApiKey,
        credential_env: &["KALIBRR_API_KEY"],
        encoding: PayloadEncoding::Json,
        headers: &[],
        fields: KALIBRR_FIELDS,
        employment_types: &[
            ("full-time", "full_time"),
            ("part-time", "part_time"),
            ("contract", "contract"),
            ("internship", "internship"),
        ],
        default_employment_type: "full_time",
        id_field: "id",
        error_field: "message",
        url_template: "https://www.kalibrr.com/job/{id}",
    },
];

pub fn spec(id: &str) -> Option<&'static PlatformSpec> {
    PLATFORMS.iter().find(|p| p.id == id)
}

// ────────────────────────────────────────────────────────────────────────────
// Payload building
// ────────────────────────────────────────────────────────────────────────────

/// Unknown internal types fall back to the platform default.
pub fn translate_employment_type(spec: &PlatformSpec, internal: &str) -> &'static str {
    spec.employment_types
        .iter()
        .find(|(from, _)| *from == internal)
        .map(|(_, to)| *to)
        .unwrap_or(spec.default_employment_type)
}

pub fn posting_url(spec: &PlatformSpec, external_id: &str) -> String {
    spec.url_template.replace("{id}", external_id)
}

/// Values that come from the adapter rather than the posting.
#[derive(Debug, Clone, Copy)]
pub struct PayloadContext<'a> {
    pub job: &'a JobPosting,
    pub publisher_id: Option<&'a str>,
    pub apply_url: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Form(Vec<(String, String)>),
}

pub fn build_payload(spec: &PlatformSpec, ctx: &PayloadContext<'_>) -> Payload {
    let values = spec
        .fields
        .iter()
        .map(|mapping| (mapping.key, resolve(spec, mapping.source, ctx)));

    match spec.encoding {
        PayloadEncoding::Json => {
            let mut body = Map::new();
            for (key, value) in values {
                if let Some(value) = value {
                    insert_path(&mut body, key, value);
                }
            }
            Payload::Json(Value::Object(body))
        }
        PayloadEncoding::Form => Payload::Form(
            values
                .map(|(key, value)| (key.to_string(), form_value(value)))
                .collect(),
        ),
    }
}

fn resolve(spec: &PlatformSpec, source: FieldSource, ctx: &PayloadContext<'_>) -> Option<Value> {
    fn text(s: &str) -> Option<Value> {
        Some(Value::String(s.to_string()))
    }

    let job = ctx.job;
    match source {
        FieldSource::Title => text(&job.title),
        FieldSource::Description => text(&job.description),
        FieldSource::Requirements => text(&job.requirements),
        FieldSource::Location => text(&job.location),
        FieldSource::SalaryRange => text(&job.salary_range),
        FieldSource::EmploymentType => {
            text(translate_employment_type(spec, &job.employment_type))
        }
        FieldSource::Openings => Some(Value::from(job.openings)),
        FieldSource::CompanyName => job.company_name.as_deref().and_then(text),
        FieldSource::CompanyDescription => job.company_description.as_deref().and_then(text),
        FieldSource::ContactEmail => job.contact_email.as_deref().and_then(text),
        FieldSource::Benefits => job.benefits.as_ref().map(|b| Value::from(b.clone())),
        FieldSource::SalaryMin => Some(whole_number(parse_salary_millions(&job.salary_range).min)),
        FieldSource::SalaryMax => Some(whole_number(parse_salary_millions(&job.salary_range).max)),
        FieldSource::PublisherId => ctx.publisher_id.and_then(text),
        FieldSource::ApplyUrl => text(ctx.apply_url),
        FieldSource::Literal(value) => text(value),
    }
}

/// Integral amounts serialize without a fractional part.
fn whole_number(n: f64) -> Value {
    if n.fract() == 0.0 && n >= 0.0 && n <= u64::MAX as f64 {
        Value::from(n as u64)
    } else {
        Value::from(n)
    }
}

fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(nested) = child {
                insert_path(nested, rest, value);
            }
        }
    }
}

fn form_value(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(employment_type: &str) -> JobPosting {
        JobPosting {
            title: "Backend Engineer".to_string(),
            description: "Build payment APIs".to_string(),
            requirements: "3+ years Go".to_string(),
            location: "Jakarta".to_string(),
            salary_range: "8-12".to_string(),
            employment_type: employment_type.to_string(),
            openings: 2,
            company_name: Some("PT Maju Jaya".to_string()),
            company_description: None,
            contact_email: None,
            benefits: None,
        }
    }

    fn ctx(job: &JobPosting) -> PayloadContext<'_> {
        PayloadContext {
            job,
            publisher_id: Some("pub-77"),
            apply_url: "https://company.com/apply",
        }
    }

    fn json_payload(id: &str, job: &JobPosting) -> Value {
        match build_payload(spec(id).unwrap(), &ctx(job)) {
            Payload::Json(value) => value,
            Payload::Form(_) => panic!("{id} should be JSON"),
        }
    }

    #[test]
    fn test_every_platform_has_a_unique_id() {
        let mut ids: Vec<_> = PLATFORMS.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids, vec!["glints", "indeed", "jobstreet", "kalibrr", "linkedin"]);
        assert!(spec("ghost-platform").is_none());
    }

    #[test]
    fn test_employment_type_translation_per_platform() {
        assert_eq!(translate_employment_type(spec("jobstreet").unwrap(), "full-time"), "FULL_TIME");
        assert_eq!(translate_employment_type(spec("linkedin").unwrap(), "part-time"), "PART_TIME");
        assert_eq!(translate_employment_type(spec("indeed").unwrap(), "full-time"), "fulltime");
        assert_eq!(translate_employment_type(spec("kalibrr").unwrap(), "part-time"), "part_time");
    }

    #[test]
    fn test_unknown_employment_type_uses_platform_fallback() {
        assert_eq!(translate_employment_type(spec("glints").unwrap(), "freelance"), "FULL_TIME");
        assert_eq!(translate_employment_type(spec("indeed").unwrap(), "freelance"), "fulltime");
        assert_eq!(translate_employment_type(spec("kalibrr").unwrap(), ""), "full_time");
    }

    #[test]
    fn test_jobstreet_payload_omits_absent_optionals() {
        let job = job("contract");
        let body = json_payload("jobstreet", &job);
        assert_eq!(body["employment_type"], "CONTRACT");
        assert_eq!(body["salary_range"], "8-12");
        assert_eq!(body["openings"], 2);
        assert_eq!(body["company_name"], "PT Maju Jaya");
        assert!(body.get("contact_email").is_none());
        assert!(body.get("benefits").is_none());
    }

    #[test]
    fn test_linkedin_payload_is_nested() {
        let job = job("internship");
        let body = json_payload("linkedin", &job);
        assert_eq!(body["location"], json!({"countryCode": "ID", "city": "Jakarta"}));
        assert_eq!(body["applyMethod"]["companyApplyUrl"], "https://company.com/apply");
        assert_eq!(body["seniority"], "ENTRY_LEVEL");
        assert_eq!(body["employmentType"], "INTERNSHIP");
    }

    #[test]
    fn test_glints_uses_job_type_key() {
        let job = job("full-time");
        let body = json_payload("glints", &job);
        assert_eq!(body["job_type"], "FULL_TIME");
        assert!(body.get("employment_type").is_none());
    }

    #[test]
    fn test_kalibrr_payload_has_salary_bounds() {
        let job = job("full-time");
        let body = json_payload("kalibrr", &job);
        assert_eq!(body["salary_min"], 8_000_000u64);
        assert_eq!(body["salary_max"], 12_000_000u64);
        assert!(body.get("salary_range").is_none());

        let mut single = job.clone();
        single.salary_range = "10".to_string();
        let body = json_payload("kalibrr", &single);
        assert_eq!(body["salary_min"], 10_000_000u64);
        assert_eq!(body["salary_max"], 15_000_000u64);
    }

    #[test]
    fn test_indeed_form_sends_empty_strings_for_absent_fields() {
        let job = job("part-time");
        let Payload::Form(pairs) = build_payload(spec("indeed").unwrap(), &ctx(&job)) else {
            panic!("indeed should be form-encoded");
        };
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("publisher"), "pub-77");
        assert_eq!(get("method"), "job.create");
        assert_eq!(get("v"), "2");
        assert_eq!(get("jobtype"), "parttime");
        assert_eq!(get("company"), "PT Maju Jaya");
        assert_eq!(get("email"), "");
        assert_eq!(pairs.len(), INDEED_FIELDS.len());
    }

    #[test]
    fn test_posting_url_templates() {
        assert_eq!(
            posting_url(spec("indeed").unwrap(), "abc123"),
            "https://www.indeed.com/viewjob?jk=abc123"
        );
        assert_eq!(
            posting_url(spec("kalibrr").unwrap(), "9"),
            "https://www.kalibrr.com/job/9"
        );
    }
}
