//! One user-triggered download, end to end.
//!
//! resolve metadata → select stream → compose filename → transfer bytes →
//! report the outcome. Every failure comes back as a [`DownloadError`].

use std::path::PathBuf;
use std::sync::Arc;

use crate::download::{self, DownloadTarget, ProgressEvent};
use crate::error::{DownloadError, Stage, StageExt};
use crate::guard::{DownloadGuard, DownloadSlot};
use crate::media::{MediaResolver, VideoInfo};
use crate::naming;

/// What the user asked for.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub url: String,
    /// Resolution label, e.g. "720p".
    pub resolution: String,
    /// Container extension, e.g. "mp4".
    pub container: String,
    pub download_dir: PathBuf,
}

/// Observer notifications, in order: one `Resolved`, then `Progress` events.
#[derive(Debug, Clone)]
pub enum JobEvent {
    Resolved {
        title: String,
        duration_secs: Option<u64>,
        thumbnail_url: Option<String>,
    },
    Progress(ProgressEvent),
}

/// A completed download.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub title: String,
    pub filename: String,
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Claims the guard and runs the job. Fails fast if another download holds it.
pub fn run_job(
    request: &JobRequest,
    resolver: &dyn MediaResolver,
    guard: &Arc<DownloadGuard>,
    on_event: impl FnMut(JobEvent),
) -> Result<JobOutcome, DownloadError> {
    let slot = guard.try_acquire().ok_or_else(|| {
        tracing::warn!(url = %request.url, "rejected download: another one is in flight");
        DownloadError::busy()
    })?;
    run_acquired(request, resolver, &slot, on_event)
}

/// Runs the job under an already claimed slot.
pub fn run_acquired(
    request: &JobRequest,
    resolver: &dyn MediaResolver,
    _slot: &DownloadSlot,
    mut on_event: impl FnMut(JobEvent),
) -> Result<JobOutcome, DownloadError> {
    let result = run_steps(request, resolver, &mut on_event);
    match &result {
        Ok(outcome) => tracing::info!(path = %outcome.path.display(), "job finished"),
        Err(e) => tracing::error!(stage = %e.stage(), "job failed: {}", e.message()),
    }
    result
}

fn run_steps(
    request: &JobRequest,
    resolver: &dyn MediaResolver,
    on_event: &mut impl FnMut(JobEvent),
) -> Result<JobOutcome, DownloadError> {
    let source = request.url.trim();
    let info: VideoInfo = resolver.resolve(source).stage(Stage::Resolve)?;
    on_event(JobEvent::Resolved {
        title: info.title.clone(),
        duration_secs: info.duration_secs,
        thumbnail_url: info.thumbnail_url.clone(),
    });

    let stream = info
        .select_stream(&request.resolution, &request.container)
        .stage(Stage::Select)?;
    let filename = naming::compose_filename(&info.title, source, &stream.ext);
    let total = stream.filesize.unwrap_or_else(|| {
        tracing::warn!(format_id = %stream.format_id, "stream size unknown; progress will only report completion");
        0
    });
    tracing::info!(
        format_id = %stream.format_id,
        resolution = %request.resolution,
        %filename,
        "selected stream"
    );

    let mut handle = resolver.open(stream).stage(Stage::Transfer)?;
    let target = DownloadTarget::new(&request.download_dir, &filename, total);
    let file = download::download_to(&mut *handle, &target, |e| {
        on_event(JobEvent::Progress(e))
    })?;

    Ok(JobOutcome {
        title: info.title,
        filename,
        path: file.path,
        bytes_written: file.bytes_written,
    })
}
