mod api;
mod middleware;
mod pipeline;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use geoquery_assistant::AssistantClient;
use geoquery_search::GeosearchClient;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = geoquery_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting geoquery");

    // A broken assistant config degrades to unconfigured rather than failing
    // startup: every query still works, searching on the raw input text.
    let assistant = match &config.assistant {
        Some(assistant_config) => {
            match AssistantClient::new(assistant_config, &config.user_agent) {
                Ok(client) => Some(Arc::new(client)),
                Err(error) => {
                    tracing::warn!(%error, "assistant client unavailable; queries will skip structured parsing");
                    None
                }
            }
        }
        None => {
            tracing::info!("assistant credentials not set; queries will skip structured parsing");
            None
        }
    };

    let search = Arc::new(GeosearchClient::new(
        &config.geosearch_url,
        config.geosearch_timeout_secs,
        &config.user_agent,
    )?);

    let app = build_app(AppState { assistant, search });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
