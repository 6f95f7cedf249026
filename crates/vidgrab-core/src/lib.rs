pub mod config;
pub mod logging;

pub mod download;
pub mod error;
pub mod guard;
pub mod job;
pub mod media;
pub mod naming;
pub mod storage;
pub mod stream;

pub use error::{DownloadError, Stage};
