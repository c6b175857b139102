//! The typing-session state machine.
//!
//! Every keystroke reaches the engine as a whole-value input change through
//! [`Engine::on_input_change`]; that is the only place counters move. The
//! host loop calls [`Engine::on_tick`] at its own cadence and the engine
//! decides from its [`SampleTimer`] whether a one-second sample is due.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::challenge::{Challenge, ChallengeKind, ChallengeSnapshot};
use crate::clock::{millis_between, Clock};
use crate::error::ValidationError;
use crate::history::HistoryEntry;
use crate::notifier::{Milestone, Notifier};
use crate::runtime::SampleTimer;
use crate::session::{Session, SessionResult, SessionStatus};
use crate::store::AppStore;
use crate::text::{Difficulty, TextProvider, TextSource};
use crate::time_series::TimeSeriesPoint;
use crate::typing_policy::{classify_edit, error_key, judge, Edit, Outcome};
use crate::util;

const PROGRESS_MILESTONES: [u8; 3] = [25, 50, 75];
const SPEED_MILESTONES: [u32; 5] = [20, 40, 60, 80, 100];
const COMBO_MILESTONES: [usize; 3] = [10, 20, 50];
/// Texts at or below this length never count as a "perfect" finish
const PERFECT_MIN_LEN: usize = 10;

pub struct Engine {
    session: Session,
    source: TextSource,
    custom_text: Option<String>,
    difficulty: Difficulty,
    provider: TextProvider,
    challenge: Option<Challenge>,
    timer: SampleTimer,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
}

impl Engine {
    /// Build an engine with a fresh random text of the given tier
    pub fn new(
        mut provider: TextProvider,
        difficulty: Difficulty,
        notifier: Box<dyn Notifier>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let text = provider.generate(difficulty);
        Self {
            session: Session::new(text),
            source: TextSource::Random,
            custom_text: None,
            difficulty,
            provider,
            challenge: None,
            timer: SampleTimer::every_second(),
            notifier,
            clock,
        }
    }

    /// Begin a new Waiting session on `text`. Refused while a session is
    /// in progress.
    pub fn start_session(&mut self, text: impl Into<String>) -> bool {
        if self.session.status == SessionStatus::Started {
            tracing::debug!("start_session ignored, session in progress");
            return false;
        }
        self.replace_session(text.into());
        true
    }

    pub fn on_input_change(&mut self, new_typed: &str, store: &mut AppStore) {
        if self.session.status == SessionStatus::Finished {
            return;
        }
        if new_typed == self.session.typed_text {
            return;
        }

        let now = self.clock.now();
        if self.session.status == SessionStatus::Waiting {
            self.begin(now);
        }

        match classify_edit(&self.session.typed_text, new_typed) {
            Edit::Append(c) => {
                let idx = new_typed.chars().count() - 1;
                match judge(&self.session.target_text, idx, c) {
                    Outcome::Correct => self.record_correct(c),
                    Outcome::Incorrect => self.record_error(c, store),
                }
            }
            Edit::Delete => self.notifier.backspace(),
            Edit::Unchanged => {}
        }

        self.session.set_typed_text(new_typed);

        if let Some(challenge) = self.challenge.as_mut() {
            challenge.update_progress(
                self.session.current_index(),
                self.session.target_len(),
                self.session.elapsed_ms(now),
                self.session.error_count,
            );
        }

        if self.session.is_complete() {
            self.finalize(now, store);
        } else if self.session.status == SessionStatus::Started {
            self.check_progress_milestones();
        }
    }

    /// Host-loop tick; takes a sample when the one-second timer is due
    pub fn on_tick(&mut self) {
        if self.timer.poll(self.clock.now()) {
            self.sample_elapsed();
        }
    }

    /// Refresh elapsed seconds and the live WPM sample
    pub fn sample_elapsed(&mut self) {
        if self.session.status != SessionStatus::Started {
            return;
        }
        let Some(started_at) = self.session.started_at else {
            return;
        };

        let secs = (millis_between(started_at, self.clock.now()) / 1000) as u64;
        self.session.time_elapsed_secs = secs;
        if secs == 0 {
            return;
        }

        let wpm = util::wpm(self.session.current_index(), secs as i64 * 1000);
        let previous = self.session.last_observed_wpm;
        let crossed = SPEED_MILESTONES
            .iter()
            .copied()
            .filter(|&t| previous < t && wpm >= t && t > self.session.last_speed_milestone)
            .max();
        if let Some(threshold) = crossed {
            self.session.last_speed_milestone = threshold;
            tracing::debug!(threshold, wpm, "speed milestone");
            self.notifier.milestone(Milestone::Speed(threshold));
        }

        self.session.last_observed_wpm = wpm;
        self.session
            .wpm_samples
            .push(TimeSeriesPoint::new(secs as f64, wpm as f64));
    }

    /// Throw the current attempt away and start over
    pub fn reset(&mut self) {
        let text = match self.source {
            TextSource::Random => self.provider.generate(self.difficulty),
            TextSource::Custom => self
                .custom_text
                .clone()
                .unwrap_or_else(|| self.session.target_text.clone()),
        };
        self.replace_session(text);
        tracing::info!(source = ?self.source, difficulty = %self.difficulty, "session reset");
    }

    /// Switch tier. Refused while a challenge pins the tier.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.challenge.is_some() {
            tracing::debug!(%difficulty, "difficulty change ignored during challenge");
            return false;
        }
        self.difficulty = difficulty;
        if self.source == TextSource::Random {
            self.reset();
        }
        true
    }

    /// Practice on user text from now on. On error nothing changes.
    pub fn use_custom_text(&mut self, text: &str) -> Result<(), ValidationError> {
        let text = TextProvider::accept_custom(text).inspect_err(|e| {
            tracing::debug!(error = %e, "custom text rejected");
        })?;
        if self.challenge.take().is_some() {
            tracing::info!("challenge dropped for custom text");
        }
        self.custom_text = Some(text);
        self.source = TextSource::Custom;
        self.reset();
        Ok(())
    }

    pub fn use_random_text(&mut self) {
        self.source = TextSource::Random;
        self.reset();
    }

    pub fn start_challenge(&mut self, kind: ChallengeKind) {
        self.challenge = Some(Challenge::new(kind));
        self.difficulty = kind.difficulty();
        self.source = TextSource::Random;
        tracing::info!(challenge = %kind, difficulty = %self.difficulty, "challenge started");
        self.reset();
    }

    pub fn exit_challenge(&mut self) {
        if let Some(challenge) = self.challenge.take() {
            tracing::info!(challenge = %challenge.kind(), "challenge exited");
            self.reset();
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn typed_text(&self) -> &str {
        &self.session.typed_text
    }

    pub fn target_text(&self) -> &str {
        &self.session.target_text
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    pub fn error_count(&self) -> usize {
        self.session.error_count
    }

    pub fn key_errors(&self) -> &BTreeMap<char, usize> {
        &self.session.key_errors
    }

    pub fn combo_count(&self) -> usize {
        self.session.combo_count
    }

    pub fn time_elapsed_secs(&self) -> u64 {
        self.session.time_elapsed_secs
    }

    pub fn progress_percent(&self) -> f64 {
        self.session.progress_percent()
    }

    pub fn live_wpm(&self) -> u32 {
        self.session.live_wpm()
    }

    pub fn result(&self) -> Option<SessionResult> {
        self.session.result
    }

    pub fn challenge(&self) -> Option<ChallengeSnapshot> {
        self.challenge.as_ref().map(Challenge::snapshot)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn source(&self) -> TextSource {
        self.source
    }

    /// Finished with zero errors on a text longer than ten characters
    pub fn is_perfect_finish(&self) -> bool {
        self.session.status == SessionStatus::Finished
            && self.session.error_count == 0
            && self.session.target_len() > PERFECT_MIN_LEN
    }

    /// Last accepted custom text, kept across switches back to random
    pub fn custom_text(&self) -> Option<&str> {
        self.custom_text.as_deref()
    }

    fn replace_session(&mut self, text: String) {
        self.timer.cancel();
        self.session = Session::new(text);
        if let Some(challenge) = self.challenge.as_mut() {
            challenge.restart();
        }
    }

    fn begin(&mut self, now: DateTime<Local>) {
        self.session.status = SessionStatus::Started;
        self.session.started_at = Some(now);
        self.timer.arm(now);
        tracing::info!(
            chars = self.session.target_len(),
            difficulty = %self.difficulty,
            "session started"
        );
    }

    fn record_correct(&mut self, c: char) {
        let session = &mut self.session;
        session.combo_count += 1;
        session.error_streak = 0;
        self.notifier.key_press(c);
        if COMBO_MILESTONES.contains(&session.combo_count) {
            self.notifier.combo(session.combo_count);
        }
    }

    fn record_error(&mut self, c: char, store: &mut AppStore) {
        let key = error_key(c);
        let session = &mut self.session;
        let repeated = session.error_streak >= 2;

        session.error_count += 1;
        *session.key_errors.entry(key).or_insert(0) += 1;
        session.combo_count = 0;
        session.error_streak += 1;
        store.heatmap.record(key);

        self.notifier.error(repeated);
    }

    fn check_progress_milestones(&mut self) {
        let pct = self.session.progress_percent().round();
        for threshold in PROGRESS_MILESTONES {
            if pct >= threshold as f64 && self.session.last_milestone_progress < threshold {
                self.session.last_milestone_progress = threshold;
                tracing::debug!(threshold, "progress milestone");
                self.notifier.milestone(Milestone::Progress(threshold));
            }
        }
    }

    fn finalize(&mut self, now: DateTime<Local>, store: &mut AppStore) {
        self.timer.cancel();
        let session = &mut self.session;
        session.status = SessionStatus::Finished;
        session.finished_at = Some(now);

        let duration_ms = session
            .started_at
            .map(|start| millis_between(start, now))
            .unwrap_or(0);
        let result = SessionResult::compute(session.target_len(), session.error_count, duration_ms);
        session.result = Some(result);
        session.time_elapsed_secs = result.duration_secs();
        if duration_ms > 0 {
            session.wpm_samples.push(TimeSeriesPoint::new(
                duration_ms as f64 / 1000.0,
                result.wpm as f64,
            ));
        }

        store.history.append(HistoryEntry {
            wpm: result.wpm,
            accuracy: result.accuracy,
            completed_at: now,
        });

        if let Some(challenge) = self.challenge.as_mut() {
            let passed = challenge.decide(result.wpm, result.accuracy);
            tracing::info!(challenge = %challenge.kind(), passed, "challenge decided");
        }

        let perfect = self.is_perfect_finish();
        tracing::info!(
            wpm = result.wpm,
            accuracy = result.accuracy,
            errors = result.errors,
            duration_ms,
            "session finished"
        );
        self.notifier.complete(perfect);
    }
}
