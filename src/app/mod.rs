use crate::api::ApiServer;
use crate::config::Config;
use crate::pipeline::Orchestrator;
use crate::publish::DocumentPublisher;
use crate::summarize::{AnthropicClient, Summarizer};
use crate::transcript::FirefliesClient;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run_service(config: &Config) -> Result<()> {
    info!("Starting conference notes service");

    let status = config.status();
    if !status.fireflies_configured {
        warn!("FIREFLIES_API_KEY is not set; recording requests will fail");
    }
    if !status.anthropic_configured {
        warn!("ANTHROPIC_API_KEY is not set; summarization will fail");
    }
    if !status.publish_configured {
        info!("GOOGLE_SCRIPT_URL is not set; summaries will not be published");
    }

    let orchestrator = Arc::new(build_orchestrator(config)?);
    ApiServer::new(orchestrator, config).start().await
}

/// Wire the provider clients from configuration. All clients share one
/// HTTP client and its timeout.
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .context("Failed to create HTTP client")?;

    let transcripts = FirefliesClient::new(
        client.clone(),
        config.fireflies.api_key.clone(),
        config.fireflies.api_url.clone(),
    );
    let model = AnthropicClient::new(
        client.clone(),
        config.anthropic.api_key.clone(),
        config.anthropic.api_url.clone(),
        config.anthropic.model.clone(),
        config.anthropic.max_tokens,
    );
    let publisher = DocumentPublisher::new(client);

    Ok(Orchestrator::new(
        Arc::new(transcripts),
        Summarizer::new(Arc::new(model)),
        Arc::new(publisher),
        config.publish.endpoint.clone(),
    )
    .with_sections(config.summary.sections()))
}
