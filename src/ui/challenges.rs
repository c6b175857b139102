use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::challenge::{ChallengeKind, ChallengeSnapshot};
use crate::session::SessionStatus;
use crate::theme::Palette;

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = app.store.theme.palette();
    let active = app.engine.challenge();

    let mut constraints = vec![Constraint::Length(4); ChallengeKind::ALL.len()];
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .constraints(constraints)
        .split(area);

    for (i, kind) in ChallengeKind::ALL.iter().enumerate() {
        let is_active = active.is_some_and(|a| a.kind == *kind);
        challenge_card(*kind, i + 1, is_active, &palette).render(chunks[i], buf);
    }

    if let Some(snapshot) = active {
        let finished = app.engine.status() == SessionStatus::Finished;
        render_active(&snapshot, finished, &palette, chunks[ChallengeKind::ALL.len()], buf);
    }
}

fn challenge_card(kind: ChallengeKind, number: usize, active: bool, palette: &Palette) -> Paragraph<'static> {
    let border = if active { palette.primary } else { palette.muted };
    let title = Span::styled(
        format!(" ({number}) {} ", kind.title()),
        Style::default()
            .fg(if active { palette.primary } else { palette.text })
            .add_modifier(Modifier::BOLD),
    );
    Paragraph::new(vec![
        Line::from(kind.description()),
        Line::from(Span::styled(
            format!("{} text", kind.difficulty()),
            Style::default().fg(palette.muted),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(title),
    )
}

fn render_active(
    snapshot: &ChallengeSnapshot,
    finished: bool,
    palette: &Palette,
    area: Rect,
    buf: &mut Buffer,
) {
    let label = match (finished, snapshot.completed) {
        (true, true) => "completed!".to_string(),
        (true, false) => "not met".to_string(),
        (false, _) => format!("{:.0}%", snapshot.progress_percent),
    };
    let color = if finished && !snapshot.completed {
        palette.error
    } else {
        palette.primary
    };

    Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" active challenge (esc to leave) "),
        )
        .gauge_style(Style::default().fg(color).bg(palette.background))
        .ratio((snapshot.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(label)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;
    use crate::ui::test_support::{app, type_into};

    fn render_text(app: &App) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        render(app, area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn lists_every_challenge() {
        let app = app();
        let text = render_text(&app);
        assert!(text.contains("(1) Speed Challenge: 50 WPM"));
        assert!(text.contains("(2) Accuracy Challenge: 95%"));
        assert!(text.contains("(3) Endurance Challenge"));
        assert!(!text.contains("active challenge"));
    }

    #[test]
    fn active_challenge_shows_progress() {
        let mut app = app();
        app.engine.start_challenge(ChallengeKind::Endurance);
        assert!(app.engine.start_session("abcdefghij"));
        type_into(&mut app, "abcde");

        let text = render_text(&app);
        assert!(text.contains("active challenge"));
        assert!(text.contains("50%"));
    }

    #[test]
    fn finished_challenge_shows_verdict() {
        let mut app = app();
        app.engine.start_challenge(ChallengeKind::Accuracy95);
        assert!(app.engine.start_session("abcdefghijklmnopqrst"));
        type_into(&mut app, "x");
        app.engine.on_input_change("", &mut app.store);
        type_into(&mut app, "abcdefghijklmnopqrst");

        let text = render_text(&app);
        assert!(text.contains("completed!"));
    }
}
