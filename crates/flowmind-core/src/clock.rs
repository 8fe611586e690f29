//! Monotonic clock used for duration measurement, separate from the
//! wall-clock timestamps (`chrono::DateTime<Utc>`) stored in history entries.
//!
//! Wall-clock time is what gets serialized; [`Instant`] is only ever used to
//! compute an elapsed [`Duration`] within a single process lifetime (e.g.
//! `process_time` for an activity, §4.1).

use std::time::{Duration, Instant};

/// A monotonic stopwatch. Cheap to create; `Copy` because `Instant` is.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start a new stopwatch at the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Elapsed time since this stopwatch started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_non_negative() {
        let sw = Stopwatch::start();
        assert!(sw.elapsed() >= Duration::ZERO);
    }

    #[test]
    fn elapsed_increases() {
        let sw = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(5));
        let first = sw.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        let second = sw.elapsed();
        assert!(second >= first);
    }
}
