mod collab;
mod config;
mod errors;
mod forms;
mod models;
mod progress;
mod render;
mod routes;
mod state;
mod store;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::collab::pdf::{CommandPdfRenderer, HtmlSnapshotRenderer};
use crate::collab::share::DirectoryShare;
use crate::collab::PdfRenderer;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV API v{}", env!("CARGO_PKG_VERSION"));

    // PDF backend: external converter when configured, HTML snapshots otherwise
    let pdf: Arc<dyn PdfRenderer> = match &config.pdf_command {
        Some(program) => {
            info!("PDF backend: command ({program})");
            Arc::new(CommandPdfRenderer::new(
                program.clone(),
                config.pdf_command_args.clone(),
                config.export_dir.clone(),
            ))
        }
        None => {
            let renderer = HtmlSnapshotRenderer::new(config.export_dir.clone());
            info!(
                "PDF backend: html snapshots in {}",
                renderer.out_dir().display()
            );
            Arc::new(renderer)
        }
    };

    let share = DirectoryShare::new(config.share_dir.clone());
    if !share.is_available() {
        info!("SHARE_DIR not set; sharing is unavailable");
    }

    let state = AppState::new(config.clone(), pdf, Arc::new(share));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
