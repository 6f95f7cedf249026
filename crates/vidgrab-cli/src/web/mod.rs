//! Browser front end: one page plus a small JSON API.
//!
//! `GET /` serves the page. `POST /api/info` resolves metadata,
//! `POST /api/download` starts the single allowed download on a blocking
//! thread and `GET /api/progress` reports its status for the page to poll.

mod page;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use vidgrab_core::guard::DownloadGuard;
use vidgrab_core::job::{self, JobEvent, JobRequest};
use vidgrab_core::media::MediaResolver;
use vidgrab_core::{DownloadError, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Idle,
    Running,
    Done,
    Failed,
}

/// What `/api/progress` returns.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub state: JobState,
    pub title: Option<String>,
    pub bytes_done: u64,
    pub total_bytes: u64,
    pub message: Option<String>,
    pub path: Option<String>,
}

impl JobStatus {
    fn idle() -> Self {
        Self {
            state: JobState::Idle,
            title: None,
            bytes_done: 0,
            total_bytes: 0,
            message: None,
            path: None,
        }
    }

    fn running() -> Self {
        Self {
            state: JobState::Running,
            message: Some("Fetching video details... Please wait.".to_string()),
            ..Self::idle()
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn MediaResolver>,
    guard: Arc<DownloadGuard>,
    status: Arc<Mutex<JobStatus>>,
    container: String,
    download_dir: PathBuf,
}

impl AppState {
    pub fn new(resolver: Arc<dyn MediaResolver>, container: String, download_dir: PathBuf) -> Self {
        Self {
            resolver,
            guard: DownloadGuard::new(),
            status: Arc::new(Mutex::new(JobStatus::idle())),
            container,
            download_dir,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn snapshot(&self) -> JobStatus {
        match self.status.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut JobStatus)) {
        let mut guard = match self.status.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/info", post(fetch_info))
        .route("/api/download", post(start_download))
        .route("/api/progress", get(progress))
        .with_state(state)
}

/// JSON error body with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        let status = match err.stage() {
            Stage::Busy => StatusCode::CONFLICT,
            Stage::Select => StatusCode::UNPROCESSABLE_ENTITY,
            Stage::Resolve | Stage::Transfer => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

#[derive(Debug, Deserialize)]
pub struct InfoRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub title: String,
    pub duration_secs: Option<u64>,
    pub thumbnail_url: Option<String>,
    pub resolutions: Vec<String>,
}

async fn fetch_info(
    State(state): State<AppState>,
    Json(req): Json<InfoRequest>,
) -> Result<Json<InfoResponse>, ApiError> {
    let resolver = Arc::clone(&state.resolver);
    let info = tokio::task::spawn_blocking(move || resolver.resolve(&req.url))
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| DownloadError::new(Stage::Resolve, e))?;

    Ok(Json(InfoResponse {
        resolutions: info.available_resolutions(&state.container),
        title: info.title,
        duration_secs: info.duration_secs,
        thumbnail_url: info.thumbnail_url,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub resolution: String,
}

async fn start_download(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<(StatusCode, Json<JobStatus>), ApiError> {
    let slot = state.guard.try_acquire().ok_or_else(DownloadError::busy)?;
    state.update(|s| *s = JobStatus::running());
    let accepted = state.snapshot();

    let request = JobRequest {
        url: req.url,
        resolution: req.resolution,
        container: state.container.clone(),
        download_dir: state.download_dir.clone(),
    };
    let worker = state.clone();
    tokio::task::spawn_blocking(move || {
        let result = job::run_acquired(&request, worker.resolver.as_ref(), &slot, |event| {
            worker.update(|s| match event {
                JobEvent::Resolved { title, .. } => {
                    s.message = Some("Downloading your video... Please wait.".to_string());
                    s.title = Some(title);
                }
                JobEvent::Progress(p) => {
                    s.bytes_done = p.bytes_done;
                    s.total_bytes = p.total_bytes;
                }
            })
        });
        // Publish the final status before the slot is released.
        worker.update(|s| match result {
            Ok(outcome) => {
                s.state = JobState::Done;
                s.message = Some(format!(
                    "Download successful! The video is saved as: {}",
                    outcome.filename
                ));
                s.path = Some(outcome.path.display().to_string());
            }
            Err(e) => {
                s.state = JobState::Failed;
                s.message = Some(format!("An error occurred: {}", e));
            }
        });
        drop(slot);
    });

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

async fn progress(State(state): State<AppState>) -> Json<JobStatus> {
    Json(state.snapshot())
}
