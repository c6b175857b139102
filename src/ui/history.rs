use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::App;
use crate::history::{HistoryEntry, HistorySummary};
use crate::theme::Palette;

/// Pure presenter for one history row. `number` counts sessions from 1.
pub fn present_row(number: usize, entry: &HistoryEntry, palette: &Palette) -> Row<'static> {
    let accuracy_color = match entry.accuracy {
        a if a >= 95 => palette.primary,
        a if a >= 80 => palette.warning,
        _ => palette.error,
    };

    Row::new(vec![
        Cell::from(format!("#{number}")).style(Style::default().fg(palette.muted)),
        Cell::from(format!("{} wpm", entry.wpm)).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(format!("{}%", entry.accuracy)).style(Style::default().fg(accuracy_color)),
        Cell::from(entry.completed_at.format("%H:%M:%S").to_string()),
    ])
}

pub fn summary_line(summary: &HistorySummary) -> String {
    format!(
        "{} sessions   avg {:.0} wpm   best {} wpm   avg {:.0}% acc   sd {:.1}",
        summary.sessions,
        summary.avg_wpm,
        summary.best_wpm,
        summary.avg_accuracy,
        summary.wpm_std_dev
    )
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = app.store.theme.palette();
    let history = &app.store.history;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let Some(summary) = history.summary() else {
        Paragraph::new(Span::styled(
            "No finished sessions yet. Complete a test to see it here.",
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);
        return;
    };

    Paragraph::new(Span::styled(
        summary_line(&summary),
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let total = history.len();
    let rows: Vec<Row> = history
        .list_descending()
        .enumerate()
        .map(|(i, entry)| present_row(total - i, entry, &palette))
        .collect();

    let header = Row::new(vec!["", "Speed", "Accuracy", "Finished"]).style(
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    );

    Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(palette.muted))
            .title(" history, newest first "),
    )
    .render(chunks[2], buf);
}
