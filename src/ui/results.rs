use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::app::App;
use crate::celebration::Celebration;
use crate::theme::Palette;
use crate::ui::charting::{compute_chart_params, format_label};

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(result) = app.engine.result() else {
        return;
    };
    let palette = app.store.theme.palette();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // level
            Constraint::Length(1), // challenge verdict
            Constraint::Length(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let samples = &app.engine.session().wpm_samples;
    let (duration, highest_wpm) = compute_chart_params(samples);
    let points: Vec<(f64, f64)> = samples.iter().map(|p| (*p).into()).collect();
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(palette.primary))
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .style(Style::default().fg(palette.muted))
                .bounds([0.0, duration])
                .labels(vec![
                    Span::styled("0", bold),
                    Span::styled(format_label(duration), bold),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .style(Style::default().fg(palette.muted))
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold),
                    Span::styled(format_label(highest_wpm), bold),
                ]),
        )
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {}s   {} errors",
            result.wpm,
            result.accuracy,
            result.duration_secs(),
            result.errors
        ),
        bold,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!("Performance: {}", result.performance_level()),
        Style::default().fg(palette.primary),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    if let Some(challenge) = app.engine.challenge() {
        let (verdict, color) = if challenge.completed {
            ("completed!", palette.primary)
        } else {
            ("not met, try again", palette.error)
        };
        Paragraph::new(Span::styled(
            format!("{}: {verdict}", challenge.kind.title()),
            bold.fg(color),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    Paragraph::new(Span::styled(
        "(^r) next text / (tab) more / (esc) quit",
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    if app.celebration.is_active() {
        render_celebration(&app.celebration, &palette, area, buf);
    }
}

/// Draw the confetti over whatever is already in `area`
fn render_celebration(celebration: &Celebration, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let colors = [
        palette.primary,
        palette.warning,
        palette.error,
        palette.text,
        Color::Magenta,
        Color::Cyan,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let mut style = Style::default().fg(colors[particle.color_index % colors.len()]);
        if particle.is_banner() {
            style = style.add_modifier(Modifier::BOLD);
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celebration::Burst;
    use crate::challenge::ChallengeKind;
    use crate::clock::ManualClock;
    use crate::ui::buffer_text;
    use crate::ui::test_support::{app_with_clock, type_into};

    fn render_text(app: &App, w: u16, h: u16) -> String {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        render(app, area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn results_card_shows_metrics_and_level() {
        let clock = ManualClock::new();
        let mut app = app_with_clock(&clock);
        assert!(app.engine.start_session("cat"));
        type_into(&mut app, "ca");
        clock.advance_secs(1);
        type_into(&mut app, "t");

        let text = render_text(&app, 80, 20);
        assert!(text.contains("36 wpm"));
        assert!(text.contains("100% acc"));
        assert!(text.contains("Performance: Beginner"));
    }

    #[test]
    fn challenge_verdict_is_shown() {
        let clock = ManualClock::new();
        let mut app = app_with_clock(&clock);
        app.engine.start_challenge(ChallengeKind::Endurance);
        assert!(app.engine.start_session("a short endurance run"));
        type_into(&mut app, "a short endurance run");

        let text = render_text(&app, 80, 20);
        assert!(text.contains("Endurance Challenge: completed!"));
    }

    #[test]
    fn nothing_rendered_before_finish() {
        let app = app_with_clock(&ManualClock::new());
        let text = render_text(&app, 40, 10);
        assert!(text.trim().is_empty());
    }

    #[test]
    fn celebration_particles_are_drawn() {
        let clock = ManualClock::new();
        let mut app = app_with_clock(&clock);
        assert!(app.engine.start_session("hello world"));
        clock.advance_secs(1);
        type_into(&mut app, "hello world");
        app.celebration.start(Burst::Perfect, 80, 20);

        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        render(&app, area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains('P'));
    }
}
