use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use itinera::agents::{LlmTaskRunner, TaskRunnerRef};
use itinera::api::{self, AppState};
use itinera::config::Config;
use itinera::llm::{GeminiClient, GeminiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let mut gemini = GeminiConfig::new(config.gemini_api_key.clone(), config.model.clone());
    gemini.timeout = config.llm_timeout;
    let llm = Arc::new(GeminiClient::new(gemini)?);
    let runner: TaskRunnerRef = Arc::new(LlmTaskRunner::new(llm));

    tracing::info!(model = %config.model, "starting itinera");
    api::serve(AppState::new(config, runner)).await
}
