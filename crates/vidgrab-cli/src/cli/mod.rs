//! CLI for vidgrab.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use vidgrab_core::config;
use vidgrab_core::media::{MediaResolver, YtDlpResolver};

use commands::{run_download, run_info, run_serve};

/// Top-level CLI for vidgrab.
#[derive(Debug, Parser)]
#[command(name = "vidgrab")]
#[command(about = "vidgrab: download a video stream at a chosen resolution", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show title, duration, thumbnail and available resolutions.
    Info {
        /// Video page URL.
        url: String,
    },

    /// Download the video stream at a resolution.
    Download {
        /// Video page URL.
        url: String,
        /// Resolution label such as 720p (default: highest available).
        #[arg(long, short)]
        resolution: Option<String>,
        /// Save into this directory instead of the configured one.
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },

    /// Serve the browser front end.
    Serve {
        /// Bind address (default from config, 127.0.0.1:8501).
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let resolver: Arc<dyn MediaResolver> = Arc::new(YtDlpResolver::new(
            cfg.ytdlp_bin.clone(),
            cfg.transfer_options(),
        ));

        match cli.command {
            CliCommand::Info { url } => run_info(resolver, &cfg, url).await?,
            CliCommand::Download {
                url,
                resolution,
                download_dir,
            } => run_download(resolver, &cfg, url, resolution, download_dir).await?,
            CliCommand::Serve { listen } => run_serve(resolver, &cfg, listen).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
