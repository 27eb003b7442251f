mod config;
mod cv;
mod errors;
mod llm_client;
mod platforms;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cv::analyzer::CvAnalyzer;
use crate::cv::extractor::TextExtractor;
use crate::cv::pipeline::CvScreeningPipeline;
use crate::cv::scoring::LlmCompatibilityScorer;
use crate::llm_client::{LlmClient, StructuredCompletionProvider};
use crate::platforms::fanout::FanoutManager;
use crate::platforms::registry::PlatformRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("talentflow_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm_client = LlmClient::new(config.llm())?;
    info!("LLM client initialized (model: {})", llm_client.model());
    let llm: Arc<dyn StructuredCompletionProvider> = Arc::new(llm_client);

    // CV screening: extraction subprocess → analysis → scoring
    let extractor = Arc::new(TextExtractor::new(
        &config.upload_dir,
        config.extractor_command.clone(),
        config.extraction_timeout,
    ));
    info!(
        "Text extractor: {} (upload root {}, timeout {:?})",
        config.extractor_command.program,
        config.upload_dir.display(),
        config.extraction_timeout
    );
    let pipeline = CvScreeningPipeline::new(
        extractor,
        CvAnalyzer::new(llm.clone()),
        Arc::new(LlmCompatibilityScorer::new(llm.clone())),
    );

    // Job boards: only platforms with complete credentials get an adapter
    let http = reqwest::Client::builder()
        .timeout(config.platform_timeout)
        .build()?;
    let registry = PlatformRegistry::from_credentials(
        &config.platform_credentials,
        http,
        &config.company.apply_url,
    );
    let fanout =
        FanoutManager::new(Arc::new(registry)).with_max_concurrency(config.fanout_concurrency);

    // Build app state
    let state = AppState {
        config: Arc::new(config.clone()),
        pipeline,
        llm,
        fanout,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
