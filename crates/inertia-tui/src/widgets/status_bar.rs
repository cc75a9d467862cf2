use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let mode_str = match &app.mode {
            Mode::Normal => "NORMAL",
            Mode::Inquiry(_) => "INQUIRY",
            Mode::Help => "HELP",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let snap = app.snapshot();
            let row_height = app.config.ui.row_height_px;
            format!(
                " {} | {} | row {}/{}{} | inquiries left: {}",
                mode_str,
                snap.kind,
                (snap.scroll_y / row_height).round() as u64,
                (snap.max_scroll / row_height).round() as u64,
                if snap.animating { " ~" } else { "" },
                app.remaining_attempts(),
            )
        };

        let help_hint = " q:quit j/k:scroll g:top i:inquiry ?:help ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey).bg(theme.bg2)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
