//! Timer-based progress notifications

use std::time::{Duration, Instant};

use crate::formatting::format_number;

/// Minimum time between two progress lines
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Logs "done/total" at most once per interval
///
/// Purely informational: how many lines are emitted depends on timing and
/// has no effect on the results.
#[derive(Debug)]
pub struct Progress {
    label: &'static str,
    total: usize,
    interval: Duration,
    last: Option<Instant>,
}

impl Progress {
    pub fn new(label: &'static str, total: usize, interval: Duration) -> Self {
        Self {
            label,
            total,
            interval,
            last: None,
        }
    }

    /// Reports `done` items if the interval has elapsed since the last report.
    /// The first call always reports.
    pub fn tick(&mut self, done: usize) -> bool {
        let due = self.last.map_or(true, |t| t.elapsed() >= self.interval);
        if due {
            log::info!(
                "  {}: {}/{}",
                self.label,
                format_number(done),
                format_number(self.total)
            );
            self.last = Some(Instant::now());
        }
        due
    }

    pub fn finish(&self) {
        log::info!(
            "  {}: {}/{}",
            self.label,
            format_number(self.total),
            format_number(self.total)
        );
    }
}
