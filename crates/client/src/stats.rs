use std::time::Duration;

use rtrack_core::{error::PollError, types::PositionReport};
use web_time::Instant;

/// Running totals of the poll cycles, shown in the clients' status lines
#[derive(Debug, Default, Clone)]
pub struct PollStats {
    pub successes: u64,
    pub failures: u64,
    pub last_report: Option<PositionReport>,
    pub last_error: Option<PollError>,
    last_success_at: Option<Instant>,
}

impl PollStats {
    pub fn record_success(&mut self, report: &PositionReport) {
        self.successes += 1;
        self.last_report = Some(report.clone());
        self.last_success_at = Some(Instant::now());
    }

    pub fn record_failure(&mut self, error: &PollError) {
        self.failures += 1;
        self.last_error = Some(error.clone());
    }

    pub fn cycles(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn since_last_success(&self) -> Option<Duration> {
        self.last_success_at.map(|at| at.elapsed())
    }
}
