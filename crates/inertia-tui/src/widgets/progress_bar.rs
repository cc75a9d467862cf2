use ratatui::{layout::Rect, style::Style, widgets::Gauge, Frame};

use crate::app::App;

/// Reading progress across the top row
pub struct ProgressBarWidget;

impl ProgressBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let ratio = app.progress().clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(app.theme.accent).bg(app.theme.bg1))
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0));
        frame.render_widget(gauge, area);
    }
}
