//! `vidgrab download <url>` – download one stream with terminal progress.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use vidgrab_core::config::VidgrabConfig;
use vidgrab_core::download::ProgressStats;
use vidgrab_core::guard::DownloadGuard;
use vidgrab_core::job::{self, JobEvent, JobRequest};
use vidgrab_core::media::MediaResolver;

use super::format_duration;

fn progress_line(stats: &ProgressStats) -> String {
    let done_mib = stats.bytes_done as f64 / 1_048_576.0;
    let total_mib = stats.total_bytes as f64 / 1_048_576.0;
    let pct = stats.fraction() * 100.0;
    let rate_mib = stats.bytes_per_sec() / 1_048_576.0;
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}",
        done_mib, total_mib, pct, rate_mib, eta
    )
}

/// Resolution to use when none was given: the highest one listed.
async fn default_resolution(
    resolver: &Arc<dyn MediaResolver>,
    url: &str,
    container: &str,
) -> Result<String> {
    let resolver = Arc::clone(resolver);
    let url = url.to_string();
    let info = tokio::task::spawn_blocking(move || resolver.resolve(&url))
        .await
        .context("metadata task failed")??;
    info.available_resolutions(container)
        .into_iter()
        .next()
        .with_context(|| format!("no {} video streams available", container))
}

pub async fn run_download(
    resolver: Arc<dyn MediaResolver>,
    cfg: &VidgrabConfig,
    url: String,
    resolution: Option<String>,
    download_dir: Option<PathBuf>,
) -> Result<()> {
    println!("Fetching video details... Please wait.");
    let resolution = match resolution {
        Some(r) => r,
        None => default_resolution(&resolver, &url, &cfg.container).await?,
    };
    let request = JobRequest {
        url,
        resolution,
        container: cfg.container.clone(),
        download_dir: download_dir.unwrap_or_else(|| cfg.resolve_download_dir()),
    };
    let interval_ms = cfg.progress_interval_ms;

    let outcome = tokio::task::spawn_blocking(move || {
        let guard = DownloadGuard::new();
        let start = Instant::now();
        let mut last_print: Option<Instant> = None;
        job::run_job(&request, resolver.as_ref(), &guard, |event| match event {
            JobEvent::Resolved {
                title,
                duration_secs,
                ..
            } => {
                println!("Title:    {}", title);
                if let Some(d) = duration_secs {
                    println!("Duration: {}", format_duration(d));
                }
                println!("Downloading {} stream...", request.resolution);
            }
            JobEvent::Progress(ev) => {
                let now = Instant::now();
                let due = last_print
                    .map_or(true, |t| now.duration_since(t).as_millis() as u64 >= interval_ms);
                if due || ev.is_terminal() {
                    let stats = ProgressStats::from_event(ev, start.elapsed().as_secs_f64());
                    println!("{}", progress_line(&stats));
                    last_print = Some(now);
                }
            }
        })
    })
    .await
    .context("download task failed")??;

    println!(
        "Download successful! The video is saved as: {}",
        outcome.path.display()
    );
    tracing::info!(bytes = outcome.bytes_written, "cli download completed");
    Ok(())
}
