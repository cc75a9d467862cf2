use inertia_core::config::KeymapConfig;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{InquiryDraft, InquiryField};
use crate::theme::Theme;

pub struct PopupWidget;

impl PopupWidget {
    /// Render the admissions inquiry form
    pub fn render_inquiry(
        frame: &mut Frame,
        draft: &InquiryDraft,
        remaining: usize,
        theme: &Theme,
    ) {
        let area = frame.area();

        let popup_width = 60u16.min(area.width.saturating_sub(4));
        let popup_height = 9u16.min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        // Clear the background area
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Admissions inquiry ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Contact
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Message
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Hint
                Constraint::Min(0),
            ])
            .split(inner_area);

        let field_width = inner_area.width.saturating_sub(12) as usize;
        let contact = Self::field_line(
            "Contact: ",
            &draft.contact,
            draft.field == InquiryField::Contact,
            field_width,
            theme,
        );
        let message = Self::field_line(
            "Message: ",
            &draft.message,
            draft.field == InquiryField::Message,
            field_width,
            theme,
        );
        frame.render_widget(Paragraph::new(contact), chunks[0]);
        frame.render_widget(Paragraph::new(message), chunks[2]);

        let hint = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.success).add_modifier(Modifier::BOLD)),
            Span::styled(" next/send  ", Style::default().fg(theme.grey)),
            Span::styled("Esc", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" cancel  ({} left)", remaining),
                Style::default().fg(theme.grey),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[4]);
    }

    fn field_line(
        label: &'static str,
        value: &str,
        active: bool,
        width: usize,
        theme: &Theme,
    ) -> Line<'static> {
        let value_style = if active {
            Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg1)
        };
        let cursor = if active { "_" } else { "" };

        Line::from(vec![
            Span::styled(label, Style::default().fg(theme.heading)),
            Span::styled(
                format!("{}{}", tail_str(value, width), cursor),
                value_style,
            ),
        ])
    }

    /// Render the key binding overview
    pub fn render_help(frame: &mut Frame, keymap: &KeymapConfig, theme: &Theme) {
        let area = frame.area();
        let rows: [(&str, &str); 11] = [
            (keymap.line_down.as_str(), "scroll one row down"),
            (keymap.line_up.as_str(), "scroll one row up"),
            (keymap.page_down.as_str(), "page down"),
            (keymap.page_up.as_str(), "page up"),
            (keymap.next_section.as_str(), "next section"),
            (keymap.prev_section.as_str(), "previous section"),
            (keymap.back_to_top.as_str(), "back to top"),
            (keymap.jump_to_end.as_str(), "jump to end"),
            (keymap.inquiry.as_str(), "admissions inquiry"),
            (keymap.help.as_str(), "toggle help"),
            (keymap.quit.as_str(), "quit"),
        ];

        let popup_width = 44u16.min(area.width.saturating_sub(4));
        let popup_height = (rows.len() as u16 + 4).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        let mut lines: Vec<Line> = rows
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>9}  ", key),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*what, Style::default().fg(theme.fg1)),
                ])
            })
            .collect();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  mouse wheel scrolls; over the gallery it pans",
            Style::default().fg(theme.grey),
        )));

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Keep the last `max_len` characters so the cursor end stays visible
fn tail_str(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        s.chars().skip(count - max_len).collect()
    }
}
