use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::App;
use crate::store::KeyHeatmap;
use crate::theme::Palette;

const KEY_ROWS: [&str; 4] = ["1234567890-=", "qwertyuiop[]", "asdfghjkl;'", "zxcvbnm,./"];
const TOP_MISSES: usize = 5;

/// Colour band for a key's share of the worst key's error count
pub fn heat_color(intensity: f64, palette: &Palette) -> Color {
    match intensity {
        i if i <= 0.0 => palette.muted,
        i if i < 0.3 => palette.primary,
        i if i < 0.6 => palette.warning,
        _ => palette.error,
    }
}

fn key_span(label: &str, key: char, heatmap: &KeyHeatmap, palette: &Palette) -> Span<'static> {
    let color = heat_color(heatmap.intensity(key), palette);
    let mut style = Style::default().fg(palette.background).bg(color);
    if heatmap.count(key) > 0 {
        style = style.add_modifier(Modifier::BOLD);
    }
    Span::styled(format!(" {label} "), style)
}

fn keyboard_lines(heatmap: &KeyHeatmap, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = KEY_ROWS
        .iter()
        .enumerate()
        .map(|(row, keys)| {
            let mut spans = vec![Span::raw(" ".repeat(row * 2))];
            for key in keys.chars() {
                spans.push(key_span(&key.to_string(), key, heatmap, palette));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    lines.push(Line::from(vec![
        Span::raw("          "),
        key_span("SPACE", ' ', heatmap, palette),
    ]));
    lines
}

/// "e 4, a 2" for the most-missed keys, worst first
pub fn top_misses(heatmap: &KeyHeatmap) -> String {
    heatmap
        .iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(TOP_MISSES)
        .map(|(key, count)| match key {
            ' ' => format!("space {count}"),
            k => format!("{k} {count}"),
        })
        .join(", ")
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = app.store.theme.palette();
    let heatmap = &app.store.heatmap;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(KEY_ROWS.len() as u16 + 1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let headline = if heatmap.total() == 0 {
        "No mistakes recorded yet".to_string()
    } else {
        format!("{} mistakes   most missed: {}", heatmap.total(), top_misses(heatmap))
    };
    Paragraph::new(Span::styled(
        headline,
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(keyboard_lines(heatmap, &palette))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let legend = Line::from(vec![
        Span::styled("  none  ", Style::default().bg(palette.muted).fg(palette.background)),
        Span::raw(" "),
        Span::styled("  low  ", Style::default().bg(palette.primary).fg(palette.background)),
        Span::raw(" "),
        Span::styled("  mid  ", Style::default().bg(palette.warning).fg(palette.background)),
        Span::raw(" "),
        Span::styled("  high  ", Style::default().bg(palette.error).fg(palette.background)),
    ]);
    Paragraph::new(legend)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(c) clear heatmap",
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}
