// CV Intelligence: extraction, structured analysis, compatibility scoring.
// All generative calls go through llm_client::StructuredCompletionProvider.

pub mod analyzer;
pub mod extractor;
pub mod handlers;
pub mod interview;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
