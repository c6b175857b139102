use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};

use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::session::{Session, SessionStatus};
use crate::theme::Palette;
use crate::ui::results;

/// Combo length at which the badge appears
const COMBO_BADGE_MIN: usize = 5;

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    if app.engine.status() == SessionStatus::Finished {
        results::render(app, area, buf);
        return;
    }

    let palette = app.store.theme.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1), // live stats
            Constraint::Length(1), // challenge line
            Constraint::Length(1), // progress
            Constraint::Length(1),
            Constraint::Min(1), // prompt
        ])
        .split(area);

    render_live_stats(app, &palette, chunks[0], buf);

    if let Some(challenge) = app.engine.challenge() {
        Paragraph::new(Span::styled(
            format!(
                "{}  {:.0}%",
                challenge.kind.title(),
                challenge.progress_percent
            ),
            Style::default().fg(palette.warning),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }

    let ratio = (app.engine.progress_percent() / 100.0).clamp(0.0, 1.0);
    Gauge::default()
        .gauge_style(Style::default().fg(palette.primary).bg(palette.background))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0))
        .render(chunks[2], buf);

    let prompt_width = app.engine.target_text().width();
    let alignment = if prompt_width <= chunks[4].width as usize {
        Alignment::Center
    } else {
        Alignment::Left
    };
    Paragraph::new(prompt_line(app.engine.session(), &palette))
        .alignment(alignment)
        .wrap(Wrap { trim: false })
        .render(chunks[4], buf);
}

fn render_live_stats(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut spans = if engine.status() == SessionStatus::Waiting {
        vec![Span::styled(
            "start typing to begin",
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        vec![
            Span::styled(format!("{}s", engine.time_elapsed_secs()), bold),
            Span::raw("   "),
            Span::styled(format!("{} wpm", engine.live_wpm()), bold.fg(palette.primary)),
            Span::raw("   "),
            Span::styled(
                format!("{} errors", engine.error_count()),
                Style::default().fg(palette.error),
            ),
        ]
    };

    let combo = engine.combo_count();
    if combo >= COMBO_BADGE_MIN {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{combo}x combo"),
            bold.fg(palette.warning),
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Target text with typed characters judged in place and the cursor marked
pub fn prompt_line(session: &Session, palette: &Palette) -> Line<'static> {
    let correct = Style::default()
        .fg(palette.primary)
        .add_modifier(Modifier::BOLD);
    let incorrect = Style::default()
        .fg(palette.error)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let cursor = Style::default()
        .fg(palette.text)
        .add_modifier(Modifier::REVERSED);
    let pending = Style::default().fg(palette.muted);

    let cursor_idx = session.current_index();
    let spans = session
        .target_text
        .chars()
        .enumerate()
        .map(|(idx, expected)| match session.char_correct(idx) {
            Some(true) => Span::styled(expected.to_string(), correct),
            Some(false) => Span::styled(
                match expected {
                    ' ' => "·".to_string(),
                    c => c.to_string(),
                },
                incorrect,
            ),
            None if idx == cursor_idx => Span::styled(expected.to_string(), cursor),
            None => Span::styled(expected.to_string(), pending),
        })
        .collect::<Vec<Span>>();

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ui::test_support::{app_with_clock, type_into};
    use crate::ui::{buffer_text, test_support::app};
    use crate::theme::Theme;

    fn render_text(app: &App) -> String {
        let area = Rect::new(0, 0, 90, 16);
        let mut buf = Buffer::empty(area);
        render(app, area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn waiting_session_shows_prompt_and_hint() {
        let mut app = app();
        assert!(app.engine.start_session("the quick brown fox"));
        let text = render_text(&app);
        assert!(text.contains("start typing to begin"));
        assert!(text.contains("the quick brown fox"));
    }

    #[test]
    fn prompt_marks_errors_and_cursor() {
        let mut app = app();
        assert!(app.engine.start_session("cat dog"));
        type_into(&mut app, "cx");

        let palette = Theme::Dark.palette();
        let line = prompt_line(app.engine.session(), &palette);
        assert_eq!(line.spans.len(), 7);
        assert_eq!(line.spans[0].style.fg, Some(palette.primary));
        assert_eq!(line.spans[1].content, "a");
        assert!(line.spans[1]
            .style
            .add_modifier
            .contains(Modifier::UNDERLINED));
        assert!(line.spans[2].style.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(line.spans[3].style.fg, Some(palette.muted));
    }

    #[test]
    fn wrong_space_is_shown_as_dot() {
        let mut app = app();
        assert!(app.engine.start_session("a b"));
        type_into(&mut app, "ax");
        let line = prompt_line(app.engine.session(), &Theme::Dark.palette());
        assert_eq!(line.spans[1].content, "·");
    }

    #[test]
    fn live_stats_and_combo_badge() {
        let clock = ManualClock::new();
        let mut app = app_with_clock(&clock);
        assert!(app.engine.start_session("abcdefghijklmnop"));
        type_into(&mut app, "abcdef");
        clock.advance_secs(1);
        app.engine.on_tick();

        let text = render_text(&app);
        assert!(text.contains("1s"));
        assert!(text.contains("72 wpm"));
        assert!(text.contains("6x combo"));
    }

    #[test]
    fn no_combo_badge_below_five() {
        let mut app = app();
        assert!(app.engine.start_session("abcdefghijklmnop"));
        type_into(&mut app, "abcd");
        assert!(!render_text(&app).contains("combo"));
    }

    #[test]
    fn short_prompt_is_centred() {
        let mut app = app();
        assert!(app.engine.start_session("short prompt here"));
        let text = render_text(&app);
        let row = text.lines().find(|l| l.contains("short prompt here")).unwrap();
        assert!(row.starts_with("          "));
    }
}
