//! `vidgrab serve` – run the browser front end.

use anyhow::{Context, Result};
use std::sync::Arc;
use vidgrab_core::config::VidgrabConfig;
use vidgrab_core::media::MediaResolver;

use crate::web::{self, AppState};

pub async fn run_serve(
    resolver: Arc<dyn MediaResolver>,
    cfg: &VidgrabConfig,
    listen: Option<String>,
) -> Result<()> {
    let addr = listen.unwrap_or_else(|| cfg.listen_addr.clone());
    let state = AppState::new(resolver, cfg.container.clone(), cfg.resolve_download_dir());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    println!("vidgrab listening on http://{}", addr);
    tracing::info!(%addr, download_dir = %state.download_dir().display(), "web front end started");

    axum::serve(listener, web::router(state))
        .await
        .context("HTTP server failed")
}
