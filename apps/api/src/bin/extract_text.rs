//! `talentflow-extract <path>`: prints one JSON object describing the text found
//! in a CV document.
//!
//! `{"success":true,"text":..,"method":..,"length":..,"word_count":..}` on success,
//! `{"success":false,"error":..}` otherwise. Exit status is 1 only on a usage error.

use std::panic;
use std::path::Path;

use serde::Serialize;

/// Less text than this is treated as a failed extraction.
const MIN_TEXT_CHARS: usize = 20;

#[derive(Debug, Serialize)]
struct Report {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Report {
    fn failure(method: Option<&'static str>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            method,
            length: None,
            word_count: None,
            error: Some(error.into()),
        }
    }

    fn extracted(method: &'static str, text: String) -> Self {
        Self {
            success: true,
            length: Some(text.chars().count()),
            word_count: Some(text.split_whitespace().count()),
            text: Some(text),
            method: Some(method),
            error: None,
        }
    }
}

fn extract(path: &Path) -> Report {
    if !path.is_file() {
        return Report::failure(None, format!("File not found: {}", path.display()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let (method, result) = match extension.as_str() {
        "txt" | "text" | "md" => (
            "plain-text",
            std::fs::read_to_string(path).map_err(|e| e.to_string()),
        ),
        "pdf" => ("pdf-extract", extract_pdf(path)),
        other => {
            return Report::failure(None, format!("Unsupported file type: '{other}'"));
        }
    };

    match result {
        Ok(text) => {
            let text = text.trim().to_string();
            if text.chars().count() < MIN_TEXT_CHARS {
                Report::failure(Some(method), "Failed to extract sufficient text from document")
            } else {
                Report::extracted(method, text)
            }
        }
        Err(e) => Report::failure(Some(method), e),
    }
}

/// The PDF parser can panic on malformed input; that is reported as a failure.
fn extract_pdf(path: &Path) -> Result<String, String> {
    match panic::catch_unwind(|| pdf_extract::extract_text(path)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("PDF extraction failed: {e}")),
        Err(_) => Err("PDF extraction failed: parser panicked".to_string()),
    }
}

fn main() {
    // stdout carries only the JSON report
    panic::set_hook(Box::new(|_| {}));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (report, code) = match args.as_slice() {
        [path] => (extract(Path::new(path)), 0),
        _ => (
            Report::failure(None, "Usage: talentflow-extract <document_path>"),
            1,
        ),
    };

    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => println!(r#"{{"success":false,"error":"serialize report: {e}"}}"#),
    }
    std::process::exit(code);
}
