use std::time::{Duration, Instant};

use log::info;
use serde::Serialize;

/// Snapshot of the session clock for display.
#[derive(Serialize, Clone, Debug)]
pub struct TimerState {
    pub elapsed_seconds: u64,
    pub elapsed_minutes: u64,
    pub is_running: bool,
    pub paused_seconds: u64,
}

/// Wall-clock timer for one interview session, with pause support.
#[derive(Debug)]
pub struct SessionTimer {
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            info!("⏱️ Session timer started");
        } else {
            self.resume();
        }
    }

    pub fn pause(&mut self) {
        if self.started_at.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
            info!("⏸️ Session timer paused");
        }
    }

    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += paused_at.elapsed();
            info!("▶️ Session timer resumed");
        }
    }

    /// Stop the clock and return the final state. A stopped timer reports
    /// `is_running: false` and keeps its final elapsed value.
    pub fn stop(&mut self) -> TimerState {
        self.resume();
        let state = self.state();
        if self.started_at.is_some() {
            // Freeze by leaving the timer permanently paused.
            self.paused_at = Some(Instant::now());
        }
        info!(
            "⏹️ Session timer stopped at {}m{}s",
            state.elapsed_minutes,
            state.elapsed_seconds % 60
        );
        state
    }

    pub fn elapsed(&self) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let gross = match self.paused_at {
            Some(paused_at) => paused_at.duration_since(started_at),
            None => started_at.elapsed(),
        };
        gross.saturating_sub(self.paused_total)
    }

    pub fn state(&self) -> TimerState {
        let elapsed = self.elapsed();
        TimerState {
            elapsed_seconds: elapsed.as_secs(),
            elapsed_minutes: elapsed.as_secs() / 60,
            is_running: self.started_at.is_some() && self.paused_at.is_none(),
            paused_seconds: self.paused_total.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstarted_timer_reports_zero() {
        let timer = SessionTimer::new();
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert!(!timer.state().is_running);
    }

    #[test]
    fn start_pause_resume_cycle() {
        let mut timer = SessionTimer::new();
        timer.start();
        assert!(timer.state().is_running);

        timer.pause();
        let frozen = timer.elapsed();
        assert!(!timer.state().is_running);
        std::thread::sleep(Duration::from_millis(15));
        // Paused time does not count toward elapsed.
        assert_eq!(timer.elapsed(), frozen);

        timer.resume();
        assert!(timer.state().is_running);
        assert!(timer.elapsed() >= frozen);
    }

    #[test]
    fn stop_freezes_the_clock() {
        let mut timer = SessionTimer::new();
        timer.start();
        let final_state = timer.stop();
        assert!(!timer.state().is_running);
        std::thread::sleep(Duration::from_millis(15));
        assert_eq!(timer.state().elapsed_seconds, final_state.elapsed_seconds);
    }
}
