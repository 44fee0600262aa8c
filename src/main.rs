use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use etude_marche::analysis::MarketAnalyzer;
use etude_marche::catalog::CatalogClient;
use etude_marche::llm::LlmClient;
use etude_marche::narrative::{GenerativeNarrative, NarrativeStrategy, TemplateNarrative};
use etude_marche::server;
use etude_marche::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load env
    let _ = dotenv::dotenv();

    let catalog = Arc::new(CatalogClient::from_env()?);
    info!(base_url = catalog.base_url(), "catalog client initialized");

    // NARRATIVE_MODE=template selects the deterministic fallback build;
    // anything else probes the generative backend once at startup.
    let narrative: Arc<dyn NarrativeStrategy> = match dotenv::var("NARRATIVE_MODE").as_deref() {
        Ok("template") => {
            info!("narrative mode: deterministic templates");
            Arc::new(TemplateNarrative)
        }
        _ => {
            let llm = Arc::new(LlmClient::from_env()?);
            Arc::new(GenerativeNarrative::probe(llm).await)
        }
    };

    let analyzer = Arc::new(MarketAnalyzer::new(catalog.clone(), narrative));

    let state = AppState { catalog, analyzer };

    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "serving market-study API");

    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
