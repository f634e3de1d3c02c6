mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use kotoba_api::auth::{AppState, AppStateInner};
use kotoba_core::identity::PasswordIdentity;
use kotoba_core::{Context, Dispatcher};
use kotoba_db::Database;
use kotoba_translate::gemini::GeminiTranslator;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kotoba=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(Database::open(&config.db_path)?);
    if let Some(path) = &config.pairs_file {
        let pairs = config::load_pairs(path)?;
        db.assign_pairs(&pairs)?;
        info!("Seeded {} pairings from {}", pairs.len(), path.display());
    }

    // Collaborators
    let api_key = config.translate_api_key.clone().unwrap_or_else(|| {
        warn!("KOTOBA_TRANSLATE_API_KEY is unset; memos and advice will pass through untranslated");
        String::new()
    });
    let mut translator = GeminiTranslator::new(api_key);
    if let Some(model) = &config.translate_model {
        translator = translator.with_model(model.clone());
    }
    if let Some(base_url) = &config.translate_base_url {
        translator = translator.with_base_url(base_url.clone());
    }

    let identity = PasswordIdentity::new(
        db.clone(),
        config.jwt_secret.clone(),
        chrono::Duration::hours(config.session_hours),
    );

    let ctx = Context::new(db, Arc::new(translator), Arc::new(identity));
    let state: AppState = Arc::new(AppStateInner {
        dispatcher: Dispatcher::new(ctx),
    });

    let app = kotoba_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Kotoba server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
