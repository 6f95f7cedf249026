//! CLI command handlers, one file per command.

mod download;
mod info;
mod serve;

pub use download::run_download;
pub use info::run_info;
pub use serve::run_serve;

/// "3:25" / "1:02:07" for a duration in seconds.
pub(crate) fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(205), "3:25");
        assert_eq!(format_duration(3727), "1:02:07");
    }
}
