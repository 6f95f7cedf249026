//! Parse `yt-dlp -J` output into [`VideoInfo`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

use super::{StreamDescriptor, VideoInfo};

/// Title used when the extractor reports none.
const FALLBACK_TITLE: &str = "video";

#[derive(Debug, Deserialize)]
struct RawInfo {
    title: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: Option<String>,
    ext: Option<String>,
    url: Option<String>,
    protocol: Option<String>,
    height: Option<u32>,
    format_note: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    filesize: Option<f64>,
    filesize_approx: Option<f64>,
    #[serde(default)]
    http_headers: HashMap<String, String>,
}

/// Only plain HTTP(S) formats can be fetched with a single GET.
fn is_direct(protocol: Option<&str>) -> bool {
    matches!(protocol, None | Some("http") | Some("https"))
}

/// "720p" from height, else from a note like "720p60" / "1080p".
fn resolution_label(height: Option<u32>, note: Option<&str>) -> Option<String> {
    if let Some(h) = height.filter(|h| *h > 0) {
        return Some(format!("{}p", h));
    }
    let note = note?;
    let digits: String = note.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() && note[digits.len()..].starts_with('p') {
        Some(format!("{}p", digits))
    } else {
        None
    }
}

fn has_codec(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if c != "none")
}

pub(crate) fn parse_info(json: &[u8]) -> Result<VideoInfo> {
    let raw: RawInfo = serde_json::from_slice(json).context("invalid yt-dlp JSON")?;

    let streams = raw
        .formats
        .into_iter()
        .filter(|f| is_direct(f.protocol.as_deref()))
        .filter_map(|f| {
            let url = f.url?;
            let format_id = f.format_id?;
            let resolution = resolution_label(f.height, f.format_note.as_deref());
            let height = f
                .height
                .or_else(|| resolution.as_deref().and_then(|r| r.trim_end_matches('p').parse().ok()));
            Some(StreamDescriptor {
                format_id,
                resolution,
                height,
                ext: f.ext.unwrap_or_default(),
                filesize: f
                    .filesize
                    .or(f.filesize_approx)
                    .filter(|n| *n >= 0.0)
                    .map(|n| n as u64),
                has_video: has_codec(f.vcodec.as_deref()),
                has_audio: has_codec(f.acodec.as_deref()),
                url,
                http_headers: f.http_headers,
            })
        })
        .collect();

    Ok(VideoInfo {
        title: raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        duration_secs: raw.duration.filter(|d| *d >= 0.0).map(|d| d.round() as u64),
        thumbnail_url: raw.thumbnail,
        streams,
    })
}
