//! `yt-dlp` backed resolver.
//!
//! Runs `yt-dlp -J` for metadata and fetches the chosen format's direct URL
//! with libcurl, so no yt-dlp process is involved in the byte transfer.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Command;

use super::parse::parse_info;
use super::{validate_source_url, MediaResolver, StreamDescriptor, VideoInfo};
use crate::stream::{HttpStream, StreamHandle, TransferOptions};

/// Lines of stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    bin: PathBuf,
    transfer: TransferOptions,
}

impl YtDlpResolver {
    pub fn new(bin: impl Into<PathBuf>, transfer: TransferOptions) -> Self {
        Self {
            bin: bin.into(),
            transfer,
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return "no stderr output captured".to_string();
    }
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("; ")
}

impl MediaResolver for YtDlpResolver {
    /// Blocks until yt-dlp exits; use `spawn_blocking` from async code.
    fn resolve(&self, url: &str) -> Result<VideoInfo> {
        let url = validate_source_url(url)?;
        tracing::debug!(bin = %self.bin.display(), %url, "running yt-dlp -J");

        let output = Command::new(&self.bin)
            .arg("-J")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg(url.as_str())
            .output()
            .with_context(|| format!("failed to run {}", self.bin.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr_tail(&output.stderr)
            );
        }

        let info = parse_info(&output.stdout)?;
        tracing::info!(
            title = %info.title,
            streams = info.streams.len(),
            "resolved video metadata"
        );
        Ok(info)
    }

    fn open(&self, stream: &StreamDescriptor) -> Result<Box<dyn StreamHandle>> {
        Ok(Box::new(HttpStream::new(
            stream.url.clone(),
            stream.http_headers.clone(),
            stream.filesize,
            self.transfer,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_last_lines() {
        let err = b"one\n\ntwo\nthree\nfour\nfive\nsix\n";
        assert_eq!(stderr_tail(err), "two; three; four; five; six");
        assert_eq!(stderr_tail(b""), "no stderr output captured");
    }

    #[test]
    fn missing_binary_is_an_error() {
        let r = YtDlpResolver::new("/nonexistent/yt-dlp", TransferOptions::default());
        let err = r.resolve("https://example.com/watch?v=x").unwrap_err();
        assert!(format!("{:#}", err).contains("failed to run /nonexistent/yt-dlp"));
    }

    #[test]
    fn invalid_url_rejected_before_spawn() {
        let r = YtDlpResolver::new("/nonexistent/yt-dlp", TransferOptions::default());
        let err = r.resolve("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme"));
    }

    #[cfg(unix)]
    #[test]
    fn runs_fake_ytdlp_script() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let ok_script = dir.path().join("yt-dlp-ok");
        std::fs::write(
            &ok_script,
            "#!/bin/sh\ncat <<'JSON'\n{\"title\": \"Fake\", \"duration\": 3, \"formats\": [\
             {\"format_id\": \"18\", \"ext\": \"mp4\", \"url\": \"http://127.0.0.1:9/v\", \
             \"height\": 360, \"vcodec\": \"avc1\", \"acodec\": \"mp4a\", \"filesize\": 42}]}\nJSON\n",
        )
        .unwrap();
        let bad_script = dir.path().join("yt-dlp-bad");
        std::fs::write(
            &bad_script,
            "#!/bin/sh\necho 'ERROR: [youtube] x: Video unavailable' >&2\nexit 1\n",
        )
        .unwrap();
        for p in [&ok_script, &bad_script] {
            std::fs::set_permissions(p, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let ok = YtDlpResolver::new(&ok_script, TransferOptions::default());
        let info = ok.resolve("https://example.com/watch?v=x").unwrap();
        assert_eq!(info.title, "Fake");
        assert_eq!(info.duration_secs, Some(3));
        assert_eq!(info.available_resolutions("mp4"), vec!["360p"]);
        let chosen = info.select_stream("360p", "mp4").unwrap();
        let handle = ok.open(chosen).unwrap();
        assert_eq!(handle.total_size(), Some(42));

        let bad = YtDlpResolver::new(&bad_script, TransferOptions::default());
        let err = bad.resolve("https://example.com/watch?v=x").unwrap_err();
        assert!(err.to_string().contains("Video unavailable"));
    }
}
