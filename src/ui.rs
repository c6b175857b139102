pub mod challenges;
pub mod charting;
pub mod heatmap;
pub mod history;
pub mod results;
pub mod typing;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Widget, Wrap},
};

use crate::app::{App, Tab};
use crate::error::MIN_CUSTOM_TEXT_CHARS;
use crate::text::TextSource;
use crate::theme::Palette;

const HORIZONTAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.store.theme.palette();
        Block::default()
            .style(Style::default().bg(palette.background).fg(palette.text))
            .render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3), // tabs
                Constraint::Min(1),    // body
                Constraint::Length(1), // notice
                Constraint::Length(1), // status + legend
            ])
            .split(area);

        render_tabs(self, &palette, chunks[0], buf);

        match self.tab {
            Tab::Test => typing::render(self, chunks[1], buf),
            Tab::Challenges => challenges::render(self, chunks[1], buf),
            Tab::Statistics => history::render(self, chunks[1], buf),
            Tab::Keyboard => heatmap::render(self, chunks[1], buf),
        }

        if let Some(notice) = &self.notice {
            Paragraph::new(Span::styled(
                notice.as_str(),
                Style::default()
                    .fg(palette.warning)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        render_status_line(self, &palette, chunks[3], buf);

        if self.editor.is_some() {
            render_editor(self, &palette, area, buf);
        }
    }
}

fn render_tabs(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let titles = Tab::ALL.iter().map(|t| t.title());
    Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(palette.muted))
        .highlight_style(
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.muted))
                .title(Span::styled(
                    " typemaster ",
                    Style::default()
                        .fg(palette.primary)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .render(area, buf);
}

fn render_status_line(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let source = match app.engine.source() {
        TextSource::Random => "random",
        TextSource::Custom => "custom",
    };
    let sound = if app.is_muted() { "muted" } else { "on" };
    let status = format!(
        "{} · {} · {} · sound {}   ",
        app.engine.difficulty(),
        source,
        app.store.theme,
        sound
    );
    let legend = "(tab) switch  (^r) reset  (F1-F3) tier  (^o) text  (^t) theme  (^s) sound  (esc) quit";

    Paragraph::new(Line::from(vec![
        Span::styled(status, Style::default().fg(palette.primary)),
        Span::styled(
            legend,
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC),
        ),
    ]))
    .render(area, buf);
}

/// Centered rectangle of at most `width` x `height` within `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn render_editor(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let Some(editor) = &app.editor else {
        return;
    };
    let popup = centered_rect(area.width.saturating_sub(8).max(20), 9, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.background).fg(palette.text))
        .title(" Custom text ");
    let inner = block.inner(popup);
    block.render(popup, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(format!("{}▏", editor.buffer))
        .wrap(Wrap { trim: false })
        .render(rows[0], buf);

    let chars = editor.buffer.trim().chars().count();
    let hint = match &editor.error {
        Some(err) => Span::styled(err.as_str(), Style::default().fg(palette.error)),
        None => Span::styled(
            format!("{chars} characters (min {MIN_CUSTOM_TEXT_CHARS})"),
            Style::default().fg(palette.muted),
        ),
    };
    Paragraph::new(hint).render(rows[1], buf);

    Paragraph::new(Span::styled(
        "(enter) use text  (esc) cancel",
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::ITALIC),
    ))
    .render(rows[2], buf);
}

/// Flatten a buffer into text, one line per row
#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::app::App;
    use crate::clock::ManualClock;
    use crate::config::{Config, MemoryConfigStore};
    use crate::engine::Engine;
    use crate::notifier::SilentNotifier;
    use crate::store::AppStore;
    use crate::text::{Difficulty, TextProvider};

    pub fn app_with_clock(clock: &ManualClock) -> App {
        let engine = Engine::new(
            TextProvider::with_seed(5).unwrap(),
            Difficulty::Medium,
            Box::new(SilentNotifier),
            Box::new(clock.clone()),
        );
        App::new(
            engine,
            AppStore::default(),
            Config::default(),
            Box::new(MemoryConfigStore::default()),
            Rc::new(Cell::new(true)),
        )
    }

    pub fn app() -> App {
        app_with_clock(&ManualClock::new())
    }

    pub fn type_into(app: &mut App, text: &str) {
        for c in text.chars() {
            let mut next = app.engine.typed_text().to_string();
            next.push(c);
            app.engine.on_input_change(&next, &mut app.store);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::app::CustomTextEditor;

    fn render(app: &App, w: u16, h: u16) -> String {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn renders_tab_titles_and_status() {
        let app = app();
        let text = render(&app, 120, 30);
        for tab in Tab::ALL {
            assert!(text.contains(tab.title()), "missing tab {}", tab.title());
        }
        assert!(text.contains("medium"));
        assert!(text.contains("sound muted"));
    }

    #[test]
    fn editor_overlay_shows_validation_error() {
        let mut app = app();
        app.editor = Some(CustomTextEditor {
            buffer: "tiny".into(),
            error: Some("Text must be at least 10 characters long (got 4)".into()),
        });
        let text = render(&app, 100, 30);
        assert!(text.contains("Custom text"));
        assert!(text.contains("at least 10 characters"));
    }

    #[test]
    fn notice_is_rendered() {
        let mut app = app();
        app.notice = Some("Pasting is disabled, type it out".into());
        let text = render(&app, 100, 30);
        assert!(text.contains("Pasting is disabled"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let app = app();
        render(&app, 5, 3);
        render(&app, 1, 1);
    }

    #[test]
    fn every_tab_renders() {
        let mut app = app();
        for tab in Tab::ALL {
            app.tab = tab;
            render(&app, 100, 30);
        }
    }

    #[test]
    fn centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 10, 4);
        assert_eq!(centered_rect(20, 9, area), area);
        assert_eq!(centered_rect(4, 2, area), Rect::new(3, 1, 4, 2));
    }
}
