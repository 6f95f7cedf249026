//! `vidgrab info <url>` – show metadata and available resolutions.

use anyhow::{Context, Result};
use std::sync::Arc;
use vidgrab_core::config::VidgrabConfig;
use vidgrab_core::media::MediaResolver;

use super::format_duration;

pub async fn run_info(resolver: Arc<dyn MediaResolver>, cfg: &VidgrabConfig, url: String) -> Result<()> {
    println!("Fetching video details... Please wait.");
    let info = tokio::task::spawn_blocking(move || resolver.resolve(&url))
        .await
        .context("metadata task failed")??;

    println!("Title:      {}", info.title);
    match info.duration_secs {
        Some(d) => println!("Duration:   {} ({} seconds)", format_duration(d), d),
        None => println!("Duration:   unknown"),
    }
    println!("Thumbnail:  {}", info.thumbnail_url.as_deref().unwrap_or("-"));

    let resolutions = info.available_resolutions(&cfg.container);
    if resolutions.is_empty() {
        println!("No {} video streams available.", cfg.container);
    } else {
        println!("Resolutions ({}): {}", cfg.container, resolutions.join(", "));
    }
    Ok(())
}
