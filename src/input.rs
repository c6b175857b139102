//! Capture-field boundary: turns terminal events into whole-value edits of
//! the typed text. Anything that would put characters in the field without a
//! keystroke is rejected here, so the engine only ever sees typing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::runtime::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Rejection {
    Paste,
    Copy,
    Cut,
    ContextMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEdit {
    /// New full value of the field
    Changed(String),
    Unchanged,
    Rejected(Rejection),
}

/// Map one event onto the field holding `current`, never growing it past
/// `limit` characters.
pub fn normalize(event: &AppEvent, current: &str, limit: usize) -> InputEdit {
    let edit = match event {
        AppEvent::Paste(_) => InputEdit::Rejected(Rejection::Paste),
        AppEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Right) => InputEdit::Rejected(Rejection::ContextMenu),
            _ => InputEdit::Unchanged,
        },
        AppEvent::Key(key) => normalize_key(key, current, limit),
        AppEvent::Resize | AppEvent::Tick => InputEdit::Unchanged,
    };

    if let InputEdit::Rejected(reason) = edit {
        tracing::debug!(%reason, "input rejected");
    }
    edit
}

fn normalize_key(key: &KeyEvent, current: &str, limit: usize) -> InputEdit {
    if key.kind == KeyEventKind::Release {
        return InputEdit::Unchanged;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'v' => InputEdit::Rejected(Rejection::Paste),
            'c' => InputEdit::Rejected(Rejection::Copy),
            'x' => InputEdit::Rejected(Rejection::Cut),
            _ => InputEdit::Unchanged,
        },
        KeyCode::Insert if key.modifiers.contains(KeyModifiers::SHIFT) => {
            InputEdit::Rejected(Rejection::Paste)
        }
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => InputEdit::Unchanged,
        KeyCode::Char(c) => {
            if current.chars().count() >= limit {
                return InputEdit::Unchanged;
            }
            let mut next = String::with_capacity(current.len() + c.len_utf8());
            next.push_str(current);
            next.push(c);
            InputEdit::Changed(next)
        }
        KeyCode::Backspace => {
            let mut next = current.to_string();
            match next.pop() {
                Some(_) => InputEdit::Changed(next),
                None => InputEdit::Unchanged,
            }
        }
        _ => InputEdit::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: MouseEventKind) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn printable_char_appends() {
        let edit = normalize(&key(KeyCode::Char('a'), KeyModifiers::NONE), "c", 3);
        assert_eq!(edit, InputEdit::Changed("ca".into()));

        let edit = normalize(&key(KeyCode::Char('A'), KeyModifiers::SHIFT), "", 3);
        assert_eq!(edit, InputEdit::Changed("A".into()));
    }

    #[test]
    fn append_is_capped_at_limit() {
        let edit = normalize(&key(KeyCode::Char('x'), KeyModifiers::NONE), "cat", 3);
        assert_eq!(edit, InputEdit::Unchanged);
    }

    #[test]
    fn backspace_removes_one_char() {
        let edit = normalize(&key(KeyCode::Backspace, KeyModifiers::NONE), "naï", 5);
        assert_eq!(edit, InputEdit::Changed("na".into()));

        let edit = normalize(&key(KeyCode::Backspace, KeyModifiers::NONE), "", 5);
        assert_eq!(edit, InputEdit::Unchanged);
    }

    #[test]
    fn paste_paths_are_rejected() {
        let paste = AppEvent::Paste("the whole text".into());
        assert_eq!(
            normalize(&paste, "", 50),
            InputEdit::Rejected(Rejection::Paste)
        );
        assert_eq!(
            normalize(&key(KeyCode::Char('v'), KeyModifiers::CONTROL), "", 50),
            InputEdit::Rejected(Rejection::Paste)
        );
        assert_eq!(
            normalize(&key(KeyCode::Insert, KeyModifiers::SHIFT), "", 50),
            InputEdit::Rejected(Rejection::Paste)
        );
    }

    #[test]
    fn copy_cut_and_context_menu_are_rejected() {
        assert_eq!(
            normalize(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), "ab", 50),
            InputEdit::Rejected(Rejection::Copy)
        );
        assert_eq!(
            normalize(&key(KeyCode::Char('x'), KeyModifiers::CONTROL), "ab", 50),
            InputEdit::Rejected(Rejection::Cut)
        );
        assert_eq!(
            normalize(&mouse(MouseEventKind::Down(MouseButton::Right)), "ab", 50),
            InputEdit::Rejected(Rejection::ContextMenu)
        );
        assert_eq!(
            normalize(&mouse(MouseEventKind::Down(MouseButton::Left)), "ab", 50),
            InputEdit::Unchanged
        );
    }

    #[test]
    fn other_chords_and_releases_are_ignored() {
        assert_eq!(
            normalize(&key(KeyCode::Char('r'), KeyModifiers::CONTROL), "ab", 50),
            InputEdit::Unchanged
        );
        assert_eq!(
            normalize(&key(KeyCode::Char('a'), KeyModifiers::ALT), "ab", 50),
            InputEdit::Unchanged
        );

        let release = AppEvent::Key(KeyEvent::new_with_kind_and_state(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        ));
        assert_eq!(normalize(&release, "", 50), InputEdit::Unchanged);
        assert_eq!(normalize(&AppEvent::Tick, "ab", 50), InputEdit::Unchanged);
    }
}
