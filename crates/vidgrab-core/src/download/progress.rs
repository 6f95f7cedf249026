//! Progress events for a single download, plus CLI-friendly stats.

use serde::Serialize;

/// Cumulative bytes written against the expected total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub bytes_done: u64,
    pub total_bytes: u64,
}

impl ProgressEvent {
    /// The completion event carries `bytes_done == total_bytes`.
    pub fn is_terminal(&self) -> bool {
        self.bytes_done == self.total_bytes
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}

/// Forwards byte counts to an observer as a well-formed event stream.
///
/// While bytes are still flowing, events stay strictly below the reported
/// total and never go backwards; only [`ProgressReporter::finish`] emits the
/// terminal event. The reported total is upstream's number and may be wrong:
/// extra bytes are not reported, and a short transfer still ends at the total.
pub struct ProgressReporter<F: FnMut(ProgressEvent)> {
    total: u64,
    last: Option<u64>,
    observer: F,
}

impl<F: FnMut(ProgressEvent)> ProgressReporter<F> {
    pub fn new(total: u64, observer: F) -> Self {
        Self {
            total,
            last: None,
            observer,
        }
    }

    /// Report `cumulative` bytes written so far.
    pub fn advance(&mut self, cumulative: u64) {
        if cumulative >= self.total {
            // Held back for finish().
            return;
        }
        if self.last.map_or(true, |last| cumulative > last) {
            self.emit(cumulative);
        }
    }

    /// Emit the terminal event. Consumes the reporter so it fires once.
    pub fn finish(mut self) {
        let total = self.total;
        self.emit(total);
    }

    fn emit(&mut self, bytes_done: u64) {
        self.last = Some(bytes_done);
        (self.observer)(ProgressEvent {
            bytes_done,
            total_bytes: self.total,
        });
    }
}

/// Snapshot of download progress with timing (bytes done, ETA, rate).
#[derive(Debug, Clone)]
pub struct ProgressStats {
    pub bytes_done: u64,
    pub total_bytes: u64,
    /// Elapsed time since download start (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    pub fn from_event(event: ProgressEvent, elapsed_secs: f64) -> Self {
        Self {
            bytes_done: event.bytes_done,
            total_bytes: event.total_bytes,
            elapsed_secs,
        }
    }

    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0 and not done).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    pub fn fraction(&self) -> f64 {
        ProgressEvent {
            bytes_done: self.bytes_done,
            total_bytes: self.total_bytes,
        }
        .fraction()
    }
}
