use anyhow::Context;
use seatplan_api::{app, AppState};
use seatplan_core::EditMode;
use seatplan_layout::LayoutSession;
use seatplan_store::{app_config::Config, read_document, write_document, DbClient, StoreLayoutRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatplan_api=debug,seatplan_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting seat plan API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    let repo = Arc::new(StoreLayoutRepository::new(db));

    let mut session = LayoutSession::open(repo, config.layout.project_id)
        .await
        .context("Failed to load layout")?;

    if let Some(path) = &config.layout.seed_document {
        if session.seats().is_empty() {
            let document = read_document(path)
                .await
                .with_context(|| format!("Failed to read seed document {}", path))?;
            session.import_document(document).await.context("Failed to import seed document")?;
            tracing::info!("Seeded project {} from {}", config.layout.project_id, path);
        }
    }
    if config.layout.read_only {
        session.set_mode(EditMode::View);
    }

    let state = AppState::new(session);
    let app = app(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &config.layout.export_document {
        let document = state.session.lock().await.export_document();
        write_document(path, &document)
            .await
            .with_context(|| format!("Failed to export layout to {}", path))?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
