use std::{error::Error, sync::Arc};

use ai_llm_service::{
    GeminiService,
    config::default_config::{config_gemini, redact_key},
    health_service::HealthService,
    telemetry,
};
use api::{ApiConfig, AppState};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verse_chat::VerseChat;
use verse_store::{StoreConfig, VerseStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file.
    // A missing file is fine; an unreadable or invalid one is not.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn", Level::INFO))
        .with(telemetry::layer())
        .try_init()?;

    // Everything below must succeed before the listener binds.
    let llm_cfg = config_gemini()?;
    info!(
        model = %llm_cfg.model,
        endpoint = %llm_cfg.endpoint,
        api_key = %redact_key(&llm_cfg.api_key),
        "Gemini configured"
    );
    let api_cfg = ApiConfig::from_env()?;
    let store_cfg = StoreConfig::from_env()?;

    info!(
        csv = ?store_cfg.csv_path,
        model = %store_cfg.model_name,
        device = ?store_cfg.device,
        "loading verse corpus"
    );
    let store = tokio::task::spawn_blocking(move || VerseStore::open(&store_cfg)).await??;
    info!(
        verses = store.len(),
        dim = store.dimension(),
        model = store.model_name(),
        "corpus embeddings cached"
    );

    // Probe result is informational only; requests fall back on failure.
    let health = HealthService::new(None)?.check(&llm_cfg).await;
    if !health.ok {
        warn!("Gemini key/model check failed; replies will use the fallback until it recovers");
    }

    let generator = Arc::new(GeminiService::new(llm_cfg)?);
    let chat = VerseChat::new(Arc::new(store), generator);

    if let Err(e) = api::start(AppState::new(chat), &api_cfg).await {
        error!(error = %e, "server terminated with error");
        return Err(e.into());
    }
    Ok(())
}
