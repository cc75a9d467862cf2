use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::page::{GalleryCard, SectionKind, CARD_WIDTH, GALLERY_ROWS};
use crate::surface::TerminalSurface;
use crate::theme::Theme;

pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let text = app
            .scroll
            .with_platform(|surface| Self::visible_text(surface, area.height as usize, theme));

        let paragraph = Paragraph::new(text).style(Style::default().bg(theme.bg0).fg(theme.fg1));
        frame.render_widget(paragraph, area);
    }

    /// Lines for the rows currently inside the viewport
    fn visible_text(surface: &TerminalSurface, rows: usize, theme: &Theme) -> Text<'static> {
        let layout = surface.layout();
        let page = surface.page();
        let first = surface.first_visible_row();
        let mut lines = Vec::with_capacity(rows);

        for row in first..first + rows {
            let Some(idx) = layout
                .sections
                .iter()
                .position(|s| row >= s.top && row < s.top + s.height)
            else {
                lines.push(Line::default());
                continue;
            };

            let section = &page.sections[idx];
            let placed = &layout.sections[idx];
            let offset = row - placed.top;

            let line = match (offset, &section.kind) {
                (0, _) => Line::from(Span::styled(
                    section.title.clone(),
                    Style::default()
                        .fg(theme.heading)
                        .add_modifier(Modifier::BOLD),
                )),
                (1, _) => Line::default(),
                (o, SectionKind::Prose(_)) => placed
                    .lines
                    .get(o - 2)
                    .map(|l| Line::from(l.clone()))
                    .unwrap_or_default(),
                (o, SectionKind::Gallery(cards)) if o - 2 < GALLERY_ROWS => {
                    let strip = strip_row(cards, o - 2);
                    let visible = slice_columns(&strip, surface.gallery_offset(idx), layout.width);
                    Line::from(Span::styled(visible, Style::default().fg(theme.card)))
                }
                _ => Line::default(),
            };
            lines.push(line);
        }

        Text::from(lines)
    }
}

/// One text row across every card of a gallery strip
fn strip_row(cards: &[GalleryCard], row: usize) -> String {
    // border, padding and the gap to the next card take six columns
    let inner = CARD_WIDTH - 6;
    cards
        .iter()
        .map(|card| {
            let body = match row {
                0 => return format!("┌{}┐  ", "─".repeat(inner + 2)),
                1 => fit(&card.title, inner),
                2 => fit(&card.caption, inner),
                r if r + 1 == GALLERY_ROWS => return format!("└{}┘  ", "─".repeat(inner + 2)),
                _ => " ".repeat(inner),
            };
            format!("│ {} │  ", body)
        })
        .collect()
}

/// Truncate or pad to exactly `width` columns
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Columns `[start, start + width)` of a single-width line
fn slice_columns(line: &str, start: usize, width: usize) -> String {
    line.chars().skip(start).take(width).collect()
}
