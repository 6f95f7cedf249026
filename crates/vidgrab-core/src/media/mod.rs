//! Media resolution: turn a video page URL into metadata and downloadable streams.
//!
//! The rest of the crate only depends on the [`MediaResolver`] trait; the
//! `yt-dlp` backed implementation lives in [`ytdlp`].

mod parse;
mod ytdlp;

pub use ytdlp::YtDlpResolver;

use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::stream::StreamHandle;

/// One encoded track at a given resolution/container.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub format_id: String,
    /// Label like "720p"; `None` for audio-only or unknown.
    pub resolution: Option<String>,
    pub height: Option<u32>,
    /// Container extension, e.g. "mp4".
    pub ext: String,
    /// Reported byte size (exact or approximate), if known.
    pub filesize: Option<u64>,
    pub has_video: bool,
    pub has_audio: bool,
    /// Direct media URL.
    pub url: String,
    /// Headers the media host expects on the GET.
    pub http_headers: HashMap<String, String>,
}

/// Metadata for one video plus its available streams.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub title: String,
    pub duration_secs: Option<u64>,
    pub thumbnail_url: Option<String>,
    pub streams: Vec<StreamDescriptor>,
}

impl StreamDescriptor {
    fn is_video_in(&self, ext: &str) -> bool {
        self.has_video && self.resolution.is_some() && self.ext.eq_ignore_ascii_case(ext)
    }
}

impl VideoInfo {

    /// Distinct resolution labels offered in container `ext`, highest first.
    pub fn available_resolutions(&self, ext: &str) -> Vec<String> {
        let mut found: Vec<(u32, String)> = Vec::new();
        for s in self.streams.iter().filter(|s| s.is_video_in(ext)) {
            if let Some(label) = &s.resolution {
                if !found.iter().any(|(_, l)| l == label) {
                    found.push((s.height.unwrap_or(0), label.clone()));
                }
            }
        }
        found.sort_by(|a, b| b.0.cmp(&a.0));
        found.into_iter().map(|(_, l)| l).collect()
    }

    /// Picks the stream for `resolution` in container `ext`.
    ///
    /// Among matches, a stream carrying audio wins over a video-only one;
    /// otherwise the first listed match is used.
    pub fn select_stream(&self, resolution: &str, ext: &str) -> Result<&StreamDescriptor> {
        let mut matches = self
            .streams
            .iter()
            .filter(|s| s.is_video_in(ext) && s.resolution.as_deref() == Some(resolution))
            .peekable();
        let first = matches
            .peek()
            .copied()
            .with_context(|| format!("no {} stream available at {}", ext, resolution))?;
        Ok(matches.find(|s| s.has_audio).unwrap_or(first))
    }
}

/// Upstream service that resolves a source URL and opens its streams.
pub trait MediaResolver: Send + Sync {
    /// Fetch title, duration, thumbnail and stream list for `url`.
    fn resolve(&self, url: &str) -> Result<VideoInfo>;

    /// Open a byte source for a stream previously returned by `resolve`.
    fn open(&self, stream: &StreamDescriptor) -> Result<Box<dyn StreamHandle>>;
}

/// Accepts only absolute http/https URLs with a host.
pub fn validate_source_url(raw: &str) -> Result<url::Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("no video URL given");
    }
    let parsed = url::Url::parse(trimmed).with_context(|| format!("invalid URL {:?}", trimmed))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!("unsupported URL scheme {:?}", other),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        anyhow::bail!("URL has no host: {}", trimmed);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, res: Option<&str>, ext: &str, video: bool, audio: bool) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.to_string(),
            resolution: res.map(str::to_string),
            height: res.and_then(|r| r.trim_end_matches('p').parse().ok()),
            ext: ext.to_string(),
            filesize: Some(100),
            has_video: video,
            has_audio: audio,
            url: format!("https://cdn.example.com/{}", id),
            http_headers: HashMap::new(),
        }
    }

    fn sample() -> VideoInfo {
        VideoInfo {
            title: "t".to_string(),
            duration_secs: Some(10),
            thumbnail_url: None,
            streams: vec![
                stream("a", None, "m4a", false, true),
                stream("v360", Some("360p"), "mp4", true, true),
                stream("v720", Some("720p"), "mp4", true, false),
                stream("v720av", Some("720p"), "mp4", true, true),
                stream("w1080", Some("1080p"), "webm", true, false),
                stream("v144", Some("144p"), "mp4", true, false),
            ],
        }
    }

    #[test]
    fn resolutions_for_container_highest_first() {
        let info = sample();
        assert_eq!(info.available_resolutions("mp4"), vec!["720p", "360p", "144p"]);
        assert_eq!(info.available_resolutions("webm"), vec!["1080p"]);
        assert!(info.available_resolutions("mkv").is_empty());
    }

    #[test]
    fn select_prefers_stream_with_audio() {
        let info = sample();
        assert_eq!(info.select_stream("720p", "mp4").unwrap().format_id, "v720av");
        assert_eq!(info.select_stream("144p", "mp4").unwrap().format_id, "v144");
    }

    #[test]
    fn select_missing_resolution_fails() {
        let info = sample();
        let err = info.select_stream("1080p", "mp4").unwrap_err();
        assert_eq!(err.to_string(), "no mp4 stream available at 1080p");
    }

    #[test]
    fn validate_urls() {
        assert!(validate_source_url("https://www.youtube.com/watch?v=abc").is_ok());
        assert!(validate_source_url("  http://x/y  ").is_ok());
        assert!(validate_source_url("").is_err());
        assert!(validate_source_url("ftp://x/y").is_err());
        assert!(validate_source_url("not a url").is_err());
    }
}
