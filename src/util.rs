//! Timing helpers for frame and pass profiling.

use std::time::Instant;

/// Logs the time between construction and drop at the given level.
pub struct Timed {
    label: &'static str,
    frame: u64,
    start: Instant,
    level: log::Level,
}

impl Timed {
    pub fn frame(frame: u64) -> Self {
        Self::new("frame", frame, log::Level::Debug)
    }

    pub fn pass(label: &'static str, frame: u64) -> Self {
        Self::new(label, frame, log::Level::Trace)
    }

    fn new(label: &'static str, frame: u64, level: log::Level) -> Self {
        Self {
            label,
            frame,
            start: Instant::now(),
            level,
        }
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        if log::log_enabled!(self.level) {
            log::log!(
                self.level,
                "[{}] {}: {:.3?}",
                self.frame,
                self.label,
                self.start.elapsed()
            );
        }
    }
}
