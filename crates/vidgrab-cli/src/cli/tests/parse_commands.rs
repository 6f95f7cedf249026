//! Tests for info, download and serve subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_info() {
    match parse(&["vidgrab", "info", "https://www.youtube.com/watch?v=abc"]) {
        CliCommand::Info { url } => assert_eq!(url, "https://www.youtube.com/watch?v=abc"),
        _ => panic!("expected Info"),
    }
}

#[test]
fn cli_parse_download_defaults() {
    match parse(&["vidgrab", "download", "https://x/y"]) {
        CliCommand::Download {
            url,
            resolution,
            download_dir,
        } => {
            assert_eq!(url, "https://x/y");
            assert!(resolution.is_none());
            assert!(download_dir.is_none());
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_resolution_and_dir() {
    match parse(&[
        "vidgrab",
        "download",
        "https://x/y",
        "-r",
        "720p",
        "--download-dir",
        "/tmp/videos",
    ]) {
        CliCommand::Download {
            resolution,
            download_dir,
            ..
        } => {
            assert_eq!(resolution.as_deref(), Some("720p"));
            assert_eq!(
                download_dir.as_deref(),
                Some(std::path::Path::new("/tmp/videos"))
            );
        }
        _ => panic!("expected Download with options"),
    }
}

#[test]
fn cli_parse_serve() {
    match parse(&["vidgrab", "serve"]) {
        CliCommand::Serve { listen } => assert!(listen.is_none()),
        _ => panic!("expected Serve"),
    }
    match parse(&["vidgrab", "serve", "--listen", "0.0.0.0:9000"]) {
        CliCommand::Serve { listen } => assert_eq!(listen.as_deref(), Some("0.0.0.0:9000")),
        _ => panic!("expected Serve with --listen"),
    }
}

#[test]
fn cli_rejects_missing_url() {
    assert!(Cli::try_parse_from(["vidgrab", "download"]).is_err());
    assert!(Cli::try_parse_from(["vidgrab", "info"]).is_err());
}
