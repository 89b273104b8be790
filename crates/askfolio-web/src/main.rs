use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use askfolio_core::config::AskfolioConfig;
use askfolio_web::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askfolio_web=info,tower_http=info".parse().unwrap()),
        )
        .init();

    let config =
        AskfolioConfig::load(None).unwrap_or_else(|_| AskfolioConfig::default_config());

    let state = Arc::new(AppState::from_config(&config.server));
    tracing::info!(
        sessions = %state.sessions.path().display(),
        ratings = %state.ratings.path().display(),
        "storing records"
    );

    let app = askfolio_web::app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("askfolio-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
