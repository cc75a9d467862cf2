use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

const LABEL: &str = " ↑ Back to top ";

/// Floating button shown once the page has scrolled past the threshold
pub struct BackToTopWidget;

impl BackToTopWidget {
    pub fn render(frame: &mut Frame, page_area: Rect, app: &App) {
        if !app.back_to_top_visible() {
            return;
        }
        let Some(area) = button_area(page_area) else {
            return;
        };

        let button = Paragraph::new(Span::styled(
            LABEL,
            Style::default()
                .fg(app.theme.bg0)
                .bg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(button, area);
    }
}

/// Bottom-right corner of the page, one column in
fn button_area(page_area: Rect) -> Option<Rect> {
    let width = LABEL.chars().count() as u16;
    if page_area.width < width + 1 || page_area.height == 0 {
        return None;
    }
    Some(Rect::new(
        page_area.x + page_area.width - width - 1,
        page_area.y + page_area.height - 1,
        width,
        1,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_sits_in_corner() {
        let area = button_area(Rect::new(0, 1, 80, 22)).unwrap();
        assert_eq!(area.y, 22);
        assert_eq!(area.x + area.width, 79);
    }

    #[test]
    fn test_button_hidden_when_too_narrow() {
        assert!(button_area(Rect::new(0, 0, 5, 10)).is_none());
    }
}
