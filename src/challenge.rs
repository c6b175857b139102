//! Goal overlays on a normal session. Each kind is a pure policy over the
//! engine's counters; nothing here keeps time or reads the session itself.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::text::Difficulty;
use crate::util;

const SPEED_TARGET_WPM: u32 = 50;
const ACCURACY_TARGET: u32 = 95;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChallengeKind {
    Speed50,
    Accuracy95,
    Endurance,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 3] = [
        ChallengeKind::Speed50,
        ChallengeKind::Accuracy95,
        ChallengeKind::Endurance,
    ];

    /// Text tier a challenge is played on
    pub fn difficulty(&self) -> Difficulty {
        match self {
            ChallengeKind::Speed50 => Difficulty::Medium,
            ChallengeKind::Accuracy95 => Difficulty::Easy,
            ChallengeKind::Endurance => Difficulty::Hard,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChallengeKind::Speed50 => "Speed Challenge: 50 WPM",
            ChallengeKind::Accuracy95 => "Accuracy Challenge: 95%",
            ChallengeKind::Endurance => "Endurance Challenge",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ChallengeKind::Speed50 => "Type at a speed of at least 50 WPM",
            ChallengeKind::Accuracy95 => "Maintain at least 95% accuracy",
            ChallengeKind::Endurance => "Complete a long text without giving up",
        }
    }

    /// Live progress in [0, 100]
    pub fn evaluate(
        &self,
        current_len: usize,
        target_len: usize,
        elapsed_ms: i64,
        errors: usize,
    ) -> f64 {
        match self {
            ChallengeKind::Speed50 => {
                if elapsed_ms <= 0 {
                    return 0.0;
                }
                let current_wpm = util::wpm(current_len, elapsed_ms) as f64;
                (current_wpm / SPEED_TARGET_WPM as f64 * 100.0).min(100.0)
            }
            ChallengeKind::Accuracy95 => {
                let accuracy = if current_len > 0 {
                    (100.0 - errors as f64 / current_len as f64 * 100.0).max(0.0)
                } else {
                    0.0
                };
                (accuracy / ACCURACY_TARGET as f64 * 100.0).min(100.0)
            }
            ChallengeKind::Endurance => {
                if target_len == 0 {
                    return 0.0;
                }
                current_len as f64 / target_len as f64 * 100.0
            }
        }
    }

    /// Pass/fail against the final session metrics
    pub fn is_met(&self, final_wpm: u32, final_accuracy: u32) -> bool {
        match self {
            ChallengeKind::Speed50 => final_wpm >= SPEED_TARGET_WPM,
            ChallengeKind::Accuracy95 => final_accuracy >= ACCURACY_TARGET,
            ChallengeKind::Endurance => true,
        }
    }
}

/// Free-function form of [`ChallengeKind::evaluate`]
pub fn evaluate(
    kind: ChallengeKind,
    current_len: usize,
    target_len: usize,
    elapsed_ms: i64,
    errors: usize,
) -> f64 {
    kind.evaluate(current_len, target_len, elapsed_ms, errors)
}

/// Snapshot handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeSnapshot {
    pub kind: ChallengeKind,
    pub progress_percent: f64,
    pub completed: bool,
}

/// An active challenge. The verdict is decided once at finish.
#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    kind: ChallengeKind,
    progress_percent: f64,
    completed: bool,
    decided: bool,
}

impl Challenge {
    pub fn new(kind: ChallengeKind) -> Self {
        Self {
            kind,
            progress_percent: 0.0,
            completed: false,
            decided: false,
        }
    }

    pub fn kind(&self) -> ChallengeKind {
        self.kind
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    #[cfg(test)]
    fn is_decided(&self) -> bool {
        self.decided
    }

    pub fn update_progress(
        &mut self,
        current_len: usize,
        target_len: usize,
        elapsed_ms: i64,
        errors: usize,
    ) {
        self.progress_percent = self
            .kind
            .evaluate(current_len, target_len, elapsed_ms, errors)
            .clamp(0.0, 100.0);
    }

    /// Record the verdict; later calls leave the first verdict in place
    pub fn decide(&mut self, final_wpm: u32, final_accuracy: u32) -> bool {
        if !self.decided {
            self.completed = self.kind.is_met(final_wpm, final_accuracy);
            self.decided = true;
        }
        self.completed
    }

    /// Fresh attempt at the same challenge
    pub fn restart(&mut self) {
        *self = Challenge::new(self.kind);
    }

    pub fn snapshot(&self) -> ChallengeSnapshot {
        ChallengeSnapshot {
            kind: self.kind,
            progress_percent: self.progress_percent,
            completed: self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_progress_from_live_wpm() {
        // round(25 / 5 / 0.25) = 20 wpm, 20 / 50 = 40%
        let progress = evaluate(ChallengeKind::Speed50, 25, 100, 15_000, 0);
        assert!((progress - 40.0).abs() < 1e-9);
    }

    #[test]
    fn speed_progress_zero_elapsed() {
        assert_eq!(evaluate(ChallengeKind::Speed50, 25, 100, 0, 0), 0.0);
    }

    #[test]
    fn speed_progress_is_capped() {
        assert_eq!(evaluate(ChallengeKind::Speed50, 100, 100, 1_000, 0), 100.0);
    }

    #[test]
    fn accuracy_progress() {
        assert_eq!(evaluate(ChallengeKind::Accuracy95, 0, 50, 1_000, 0), 0.0);
        assert_eq!(evaluate(ChallengeKind::Accuracy95, 20, 50, 1_000, 0), 100.0);
        // 90% accuracy -> 90 / 95
        let p = evaluate(ChallengeKind::Accuracy95, 10, 50, 1_000, 1);
        assert!((p - 90.0 / 95.0 * 100.0).abs() < 1e-9);
        assert_eq!(evaluate(ChallengeKind::Accuracy95, 2, 50, 1_000, 5), 0.0);
    }

    #[test]
    fn endurance_progress_tracks_completion() {
        assert_eq!(evaluate(ChallengeKind::Endurance, 50, 200, 1_000, 9), 25.0);
        assert_eq!(evaluate(ChallengeKind::Endurance, 0, 0, 1_000, 0), 0.0);
    }

    #[test]
    fn verdicts_use_final_metrics() {
        assert!(ChallengeKind::Speed50.is_met(50, 0));
        assert!(!ChallengeKind::Speed50.is_met(49, 100));
        assert!(ChallengeKind::Accuracy95.is_met(1, 95));
        assert!(!ChallengeKind::Accuracy95.is_met(200, 94));
        assert!(ChallengeKind::Endurance.is_met(0, 0));
    }

    #[test]
    fn verdict_is_never_retracted() {
        let mut challenge = Challenge::new(ChallengeKind::Speed50);
        assert!(challenge.decide(60, 90));
        assert!(challenge.decide(10, 90));
        assert!(challenge.completed());
        assert!(challenge.is_decided());
    }

    #[test]
    fn restart_clears_progress_and_verdict() {
        let mut challenge = Challenge::new(ChallengeKind::Endurance);
        challenge.update_progress(5, 10, 1_000, 0);
        challenge.decide(0, 0);

        challenge.restart();

        assert_eq!(challenge, Challenge::new(ChallengeKind::Endurance));
    }

    #[test]
    fn difficulty_per_kind() {
        assert_eq!(ChallengeKind::Speed50.difficulty(), Difficulty::Medium);
        assert_eq!(ChallengeKind::Accuracy95.difficulty(), Difficulty::Easy);
        assert_eq!(ChallengeKind::Endurance.difficulty(), Difficulty::Hard);
    }
}
