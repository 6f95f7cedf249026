//! Single in-flight download guard.
//!
//! Only one download may run at a time. A request arriving while the slot is
//! held is turned away instead of racing the first one for the output file.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared busy flag. Hand out slots with [`DownloadGuard::try_acquire`].
#[derive(Debug, Default)]
pub struct DownloadGuard {
    busy: AtomicBool,
}

impl DownloadGuard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the slot, or `None` if a download is already running.
    pub fn try_acquire(self: &Arc<Self>) -> Option<DownloadSlot> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DownloadSlot {
                guard: Arc::clone(self),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one download; releases the slot when dropped.
#[derive(Debug)]
pub struct DownloadSlot {
    guard: Arc<DownloadGuard>,
}

impl Drop for DownloadSlot {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let guard = DownloadGuard::new();
        let slot = guard.try_acquire().expect("first acquire");
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());
        drop(slot);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn only_one_thread_wins() {
        let guard = DownloadGuard::new();
        let start = Arc::new(std::sync::Barrier::new(8));
        let tried = Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let g = Arc::clone(&guard);
                let start = Arc::clone(&start);
                let tried = Arc::clone(&tried);
                std::thread::spawn(move || {
                    start.wait();
                    let slot = g.try_acquire();
                    // Hold the slot until every thread has tried.
                    tried.wait();
                    slot.is_some()
                })
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
