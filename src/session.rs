use chrono::{DateTime, Local};
use std::collections::BTreeMap;

use crate::clock::millis_between;
use crate::time_series::TimeSeriesPoint;
use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Waiting,
    Started,
    Finished,
}

/// Final numbers computed once at the Finished transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub duration_ms: i64,
    pub errors: usize,
}

impl SessionResult {
    pub fn compute(target_len: usize, errors: usize, duration_ms: i64) -> Self {
        Self {
            wpm: util::wpm(target_len, duration_ms),
            accuracy: util::accuracy(errors, target_len),
            duration_ms,
            errors,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        (self.duration_ms / 1000).max(0) as u64
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_wpm(self.wpm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PerformanceLevel {
    Novice,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl PerformanceLevel {
    pub fn from_wpm(wpm: u32) -> Self {
        match wpm {
            w if w > 80 => PerformanceLevel::Expert,
            w if w > 60 => PerformanceLevel::Advanced,
            w if w > 40 => PerformanceLevel::Intermediate,
            w if w > 20 => PerformanceLevel::Beginner,
            _ => PerformanceLevel::Novice,
        }
    }
}

/// A single typing attempt. Replaced wholesale on reset.
#[derive(Debug, Clone)]
pub struct Session {
    pub target_text: String,
    pub typed_text: String,
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: Option<DateTime<Local>>,
    pub error_count: usize,
    pub key_errors: BTreeMap<char, usize>,
    pub combo_count: usize,
    pub error_streak: usize,
    pub last_milestone_progress: u8,
    pub last_observed_wpm: u32,
    pub last_speed_milestone: u32,
    pub time_elapsed_secs: u64,
    pub wpm_samples: Vec<TimeSeriesPoint>,
    pub result: Option<SessionResult>,
    target_len: usize,
    current_index: usize,
}

impl Session {
    pub fn new(target_text: String) -> Self {
        let target_len = target_text.chars().count();
        Self {
            target_text,
            typed_text: String::new(),
            status: SessionStatus::Waiting,
            started_at: None,
            finished_at: None,
            error_count: 0,
            key_errors: BTreeMap::new(),
            combo_count: 0,
            error_streak: 0,
            last_milestone_progress: 0,
            last_observed_wpm: 0,
            last_speed_milestone: 0,
            time_elapsed_secs: 0,
            wpm_samples: Vec::new(),
            result: None,
            target_len,
            current_index: 0,
        }
    }

    /// Target length in characters
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Characters typed so far; always equals the char length of `typed_text`
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub(crate) fn set_typed_text(&mut self, typed: &str) {
        self.typed_text.clear();
        self.typed_text.push_str(typed);
        self.current_index = typed.chars().count();
    }

    pub fn is_complete(&self) -> bool {
        self.typed_text == self.target_text
    }

    /// Completion percentage in [0, 100]
    pub fn progress_percent(&self) -> f64 {
        if self.target_len == 0 {
            return 0.0;
        }
        self.current_index as f64 / self.target_len as f64 * 100.0
    }

    pub fn elapsed_ms(&self, now: DateTime<Local>) -> i64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => millis_between(start, end),
            (Some(start), None) => millis_between(start, now),
            _ => 0,
        }
    }

    /// Live estimate shown while typing, based on the last whole-second sample
    pub fn live_wpm(&self) -> u32 {
        util::wpm(self.current_index, self.time_elapsed_secs as i64 * 1000)
    }

    /// Whether the character at `idx` was typed correctly, `None` if untyped
    pub fn char_correct(&self, idx: usize) -> Option<bool> {
        let typed = self.typed_text.chars().nth(idx)?;
        Some(self.target_text.chars().nth(idx) == Some(typed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_waiting_and_zeroed() {
        let session = Session::new("hello".to_string());
        assert_eq!(session.status, SessionStatus::Waiting);
        assert_eq!(session.typed_text, "");
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.target_len(), 5);
        assert_eq!(session.error_count, 0);
        assert!(session.key_errors.is_empty());
        assert_eq!(session.combo_count, 0);
        assert_eq!(session.error_streak, 0);
        assert!(session.started_at.is_none());
        assert!(session.finished_at.is_none());
        assert!(session.result.is_none());
    }

    #[test]
    fn typed_text_tracks_current_index_in_chars() {
        let mut session = Session::new("naïve".to_string());
        session.set_typed_text("naï");
        assert_eq!(session.current_index(), 3);
        assert_eq!(session.progress_percent(), 60.0);
    }

    #[test]
    fn result_perfect_session() {
        let result = SessionResult::compute(3, 0, 1000);
        assert_eq!(result.wpm, 36);
        assert_eq!(result.accuracy, 100);
        assert_eq!(result.duration_secs(), 1);
    }

    #[test]
    fn result_degenerate_inputs_resolve_to_zero() {
        let empty = SessionResult::compute(0, 0, 1000);
        assert_eq!((empty.wpm, empty.accuracy), (0, 0));

        let instant = SessionResult::compute(10, 0, 0);
        assert_eq!(instant.wpm, 0);
    }

    #[test]
    fn performance_levels() {
        assert_eq!(PerformanceLevel::from_wpm(20), PerformanceLevel::Novice);
        assert_eq!(PerformanceLevel::from_wpm(21), PerformanceLevel::Beginner);
        assert_eq!(PerformanceLevel::from_wpm(41), PerformanceLevel::Intermediate);
        assert_eq!(PerformanceLevel::from_wpm(61), PerformanceLevel::Advanced);
        assert_eq!(PerformanceLevel::from_wpm(81), PerformanceLevel::Expert);
    }

    #[test]
    fn char_correct_reports_per_position() {
        let mut session = Session::new("cat".to_string());
        session.set_typed_text("cx");
        assert_eq!(session.char_correct(0), Some(true));
        assert_eq!(session.char_correct(1), Some(false));
        assert_eq!(session.char_correct(2), None);
    }
}
