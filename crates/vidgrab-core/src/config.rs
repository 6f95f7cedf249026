use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::stream::TransferOptions;

/// Global configuration loaded from `~/.config/vidgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VidgrabConfig {
    /// Where downloads are saved. Defaults to the home directory.
    pub download_dir: Option<PathBuf>,
    /// Container extension streams are filtered by (e.g. "mp4").
    pub container: String,
    /// yt-dlp executable used for metadata resolution.
    pub ytdlp_bin: PathBuf,
    /// Bind address for `vidgrab serve`.
    pub listen_addr: String,
    /// Connect timeout for the media GET, in seconds.
    pub connect_timeout_secs: u64,
    /// Abort the media GET after this many seconds below 1 KiB/s.
    pub low_speed_time_secs: u64,
    /// Minimum interval between CLI progress lines, in milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for VidgrabConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            container: "mp4".to_string(),
            ytdlp_bin: PathBuf::from("yt-dlp"),
            listen_addr: "127.0.0.1:8501".to_string(),
            connect_timeout_secs: 30,
            low_speed_time_secs: 60,
            progress_interval_ms: 500,
        }
    }
}

impl VidgrabConfig {
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
        }
    }

    /// Configured download dir, else `$HOME`, else the current directory.
    pub fn resolve_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vidgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VidgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VidgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<VidgrabConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let cfg: VidgrabConfig =
        toml::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))?;
    if cfg.container.trim().is_empty() {
        anyhow::bail!("config: container must not be empty");
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = VidgrabConfig::default();
        assert_eq!(cfg.container, "mp4");
        assert_eq!(cfg.ytdlp_bin, PathBuf::from("yt-dlp"));
        assert_eq!(cfg.listen_addr, "127.0.0.1:8501");
        assert!(cfg.download_dir.is_none());
        assert_eq!(cfg.transfer_options().connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = VidgrabConfig {
            download_dir: Some(PathBuf::from("/srv/videos")),
            ..VidgrabConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: VidgrabConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.download_dir, cfg.download_dir);
        assert_eq!(parsed.container, cfg.container);
        assert_eq!(parsed.progress_interval_ms, cfg.progress_interval_ms);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg: VidgrabConfig = toml::from_str(
            r#"
            container = "webm"
            low_speed_time_secs = 5
        "#,
        )
        .unwrap();
        assert_eq!(cfg.container, "webm");
        assert_eq!(cfg.transfer_options().low_speed_time, Duration::from_secs(5));
        assert_eq!(cfg.ytdlp_bin, PathBuf::from("yt-dlp"));
    }

    #[test]
    fn configured_download_dir_wins() {
        let cfg = VidgrabConfig {
            download_dir: Some(PathBuf::from("/data/dl")),
            ..VidgrabConfig::default()
        };
        assert_eq!(cfg.resolve_download_dir(), PathBuf::from("/data/dl"));
    }

    #[test]
    fn load_from_path_rejects_empty_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "container = \"\"\n").unwrap();
        assert!(load_from_path(&path).is_err());
        fs::write(&path, "ytdlp_bin = \"/opt/yt-dlp\"\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.ytdlp_bin, PathBuf::from("/opt/yt-dlp"));
    }
}
