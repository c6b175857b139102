use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use webbrowser::Browser;

use crate::celebration::{Burst, Celebration};
use crate::challenge::ChallengeKind;
use crate::config::{Config, ConfigStore};
use crate::engine::Engine;
use crate::input::{self, InputEdit, Rejection};
use crate::runtime::AppEvent;
use crate::session::SessionStatus;
use crate::store::AppStore;
use crate::text::{Difficulty, TextSource};

pub const TICK_RATE_MS: u64 = 100;
pub const PROJECT_URL: &str = "https://github.com/abhrajyoti-01/typing-master";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Test,
    Challenges,
    Statistics,
    Keyboard,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Test, Tab::Challenges, Tab::Statistics, Tab::Keyboard];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Test => "Test",
            Tab::Challenges => "Challenges",
            Tab::Statistics => "Statistics",
            Tab::Keyboard => "Keyboard",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Custom text overlay. Unlike the typing field it accepts pasted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTextEditor {
    pub buffer: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub engine: Engine,
    pub store: AppStore,
    pub tab: Tab,
    pub editor: Option<CustomTextEditor>,
    pub celebration: Celebration,
    /// One-line feedback under the typing area, e.g. a rejected paste
    pub notice: Option<String>,
    muted: Rc<Cell<bool>>,
    config: Config,
    config_store: Box<dyn ConfigStore>,
    viewport: (u16, u16),
}

impl App {
    pub fn new(
        engine: Engine,
        store: AppStore,
        config: Config,
        config_store: Box<dyn ConfigStore>,
        muted: Rc<Cell<bool>>,
    ) -> Self {
        muted.set(config.muted);
        Self {
            engine,
            store,
            tab: Tab::Test,
            editor: None,
            celebration: Celebration::new(),
            notice: None,
            muted,
            config,
            config_store,
            viewport: (80, 24),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Terminal size, used to centre the celebration burst
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Flow {
        match &event {
            AppEvent::Tick => {
                self.engine.on_tick();
                self.celebration.update(TICK_RATE_MS as f64 / 1000.0);
                Flow::Continue
            }
            AppEvent::Resize => Flow::Continue,
            AppEvent::Paste(text) if self.editor.is_some() => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.buffer.push_str(text);
                    editor.error = None;
                }
                Flow::Continue
            }
            AppEvent::Key(key) if key.kind == KeyEventKind::Release => Flow::Continue,
            // mid-attempt Ctrl+C is a copy chord and goes to the normalizer
            AppEvent::Key(key)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                    && !self.typing_in_progress() =>
            {
                Flow::Quit
            }
            AppEvent::Key(key) if self.editor.is_some() => {
                self.on_editor_key(*key);
                Flow::Continue
            }
            AppEvent::Key(key) => self.on_key(*key, &event),
            AppEvent::Paste(_) | AppEvent::Mouse(_) => {
                if self.tab == Tab::Test {
                    self.feed_input(&event);
                }
                Flow::Continue
            }
        }
    }

    fn typing_in_progress(&self) -> bool {
        self.editor.is_none()
            && self.tab == Tab::Test
            && self.engine.status() == SessionStatus::Started
    }

    fn on_key(&mut self, key: KeyEvent, event: &AppEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                if self.engine.challenge().is_some() {
                    self.engine.exit_challenge();
                    self.celebration.stop();
                } else {
                    return Flow::Quit;
                }
            }
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('r') if ctrl => self.reset(),
            KeyCode::Char('o') if ctrl => self.toggle_text_source(),
            KeyCode::Char('t') if ctrl => self.cycle_theme(),
            KeyCode::Char('s') if ctrl => self.toggle_mute(),
            KeyCode::Char('g') if ctrl => self.open_project_page(),
            KeyCode::F(n @ 1..=3) => self.set_difficulty(Difficulty::ALL[n as usize - 1]),
            _ => match self.tab {
                Tab::Test => self.feed_input(event),
                Tab::Challenges => {
                    if let KeyCode::Char(c @ '1'..='3') = key.code {
                        let kind = ChallengeKind::ALL[c as usize - '1' as usize];
                        self.start_challenge(kind);
                    }
                }
                Tab::Keyboard => {
                    if key.code == KeyCode::Char('c') && !ctrl {
                        self.store.heatmap.clear();
                        tracing::info!("key heatmap cleared");
                    }
                }
                Tab::Statistics => {}
            },
        }
        Flow::Continue
    }

    fn on_editor_key(&mut self, key: KeyEvent) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.editor = None,
            KeyCode::Enter => {
                let text = editor.buffer.clone();
                match self.engine.use_custom_text(&text) {
                    Ok(()) => {
                        self.editor = None;
                        self.after_new_session();
                    }
                    Err(e) => editor.error = Some(e.to_string()),
                }
            }
            KeyCode::Backspace => {
                editor.buffer.pop();
                editor.error = None;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                editor.buffer.push(c);
                editor.error = None;
            }
            _ => {}
        }
    }

    fn feed_input(&mut self, event: &AppEvent) {
        let limit = self.engine.session().target_len();
        match input::normalize(event, self.engine.typed_text(), limit) {
            InputEdit::Changed(next) => {
                let was_finished = self.engine.status() == SessionStatus::Finished;
                self.engine.on_input_change(&next, &mut self.store);
                self.notice = None;
                if !was_finished && self.engine.status() == SessionStatus::Finished {
                    self.celebrate();
                }
            }
            InputEdit::Rejected(reason) => self.notice = Some(rejection_notice(reason).to_string()),
            InputEdit::Unchanged => {}
        }
    }

    fn celebrate(&mut self) {
        let burst = if self.engine.is_perfect_finish() {
            Burst::Perfect
        } else {
            Burst::Confetti
        };
        let (w, h) = self.viewport;
        self.celebration.start(burst, w, h);
    }

    fn after_new_session(&mut self) {
        self.celebration.stop();
        self.notice = None;
        self.tab = Tab::Test;
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.after_new_session();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.engine.set_difficulty(difficulty) {
            self.config.difficulty = difficulty;
            self.save_config();
            self.after_new_session();
        } else {
            self.notice = Some("Difficulty is fixed during a challenge".to_string());
        }
    }

    pub fn toggle_text_source(&mut self) {
        match self.engine.source() {
            TextSource::Custom => {
                self.engine.use_random_text();
                self.after_new_session();
            }
            TextSource::Random => {
                self.editor = Some(CustomTextEditor {
                    buffer: self.engine.custom_text().unwrap_or_default().to_string(),
                    error: None,
                });
            }
        }
    }

    pub fn start_challenge(&mut self, kind: ChallengeKind) {
        self.engine.start_challenge(kind);
        self.after_new_session();
    }

    pub fn cycle_theme(&mut self) {
        self.store.theme = self.store.theme.next();
        self.config.theme = self.store.theme;
        tracing::info!(theme = %self.store.theme, "theme changed");
        self.save_config();
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.muted.get();
        self.muted.set(muted);
        self.config.muted = muted;
        tracing::info!(muted, "sound hooks toggled");
        self.save_config();
    }

    fn open_project_page(&mut self) {
        if !Browser::is_available() {
            self.notice = Some(format!("No browser available, visit {PROJECT_URL}"));
            return;
        }
        if let Err(e) = webbrowser::open(PROJECT_URL) {
            tracing::warn!(error = %e, "could not open project page");
        }
    }

    fn save_config(&self) {
        if let Err(e) = self.config_store.save(&self.config) {
            tracing::warn!(error = %e, "failed to save config");
        }
    }
}

fn rejection_notice(reason: Rejection) -> &'static str {
    match reason {
        Rejection::Paste => "Pasting is disabled, type it out",
        Rejection::Copy => "Copying is disabled while typing, Esc quits",
        Rejection::Cut => "Cutting is disabled while typing",
        Rejection::ContextMenu => "Context menu is disabled while typing",
    }
}
