use crate::domain::model::ContestInfo;
use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    NotStarted { remaining: Duration },
    Running { remaining: Duration },
    Ended,
}

/// Contest clock. Times are naive and read as UTC, as the backend stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    start: NaiveDateTime,
    duration: Duration,
}

impl Countdown {
    pub fn new(start: NaiveDateTime, duration: Duration) -> Self {
        Self { start, duration }
    }

    pub fn from_contest(contest: &ContestInfo) -> Self {
        Self::new(contest.start_time, Duration::seconds(contest.duration))
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + self.duration
    }

    pub fn phase_at(&self, now: NaiveDateTime) -> CountdownPhase {
        if now < self.start {
            CountdownPhase::NotStarted {
                remaining: self.start - now,
            }
        } else if now < self.end() {
            CountdownPhase::Running {
                remaining: self.end() - now,
            }
        } else {
            CountdownPhase::Ended
        }
    }

    pub fn display_at(&self, now: NaiveDateTime) -> String {
        match self.phase_at(now) {
            CountdownPhase::NotStarted { remaining } => {
                format!("Inizio tra {}", format_remaining(remaining))
            }
            CountdownPhase::Running { remaining } => format_remaining(remaining),
            CountdownPhase::Ended => "Gara terminata".to_string(),
        }
    }
}

/// `HH:MM:SS`, hours not wrapped at 24. Partial seconds round up so the
/// clock never shows zero while time is left.
pub fn format_remaining(remaining: Duration) -> String {
    let millis = remaining.num_milliseconds().max(0);
    let total = (millis + 999) / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
