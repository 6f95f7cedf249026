//! Output filename derivation.
//!
//! Builds the on-disk name for a download from the video title and the source
//! URL, both passed through [`sanitize`].

mod sanitize;

pub use sanitize::{is_sanitized, sanitize, RESERVED_CHARS};

/// Composes the final filename for a download.
///
/// `sanitize(title) + "_" + sanitize(source) + "." + ext`. Including the source
/// identifier keeps names distinct when two videos share a title. Downloading
/// the same source twice yields the same name, and the second download
/// overwrites the first.
///
/// # Examples
///
/// - `compose_filename("My: Video?", "http://x/y", "mp4")` → `"My_ Video__http___x_y.mp4"`
pub fn compose_filename(title: &str, source: &str, ext: &str) -> String {
    format!("{}_{}.{}", sanitize(title), sanitize(source), sanitize(ext))
}
