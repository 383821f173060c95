//! Status bar with key hints and clock

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Render hints on the left and the status (or the time) on the right
pub fn render(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    status: Option<&str>,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(32)])
        .split(area);

    let hint_text: String = hints
        .iter()
        .map(|(key, action)| format!("[{}] {}", key, action))
        .collect::<Vec<_>>()
        .join("  ");
    frame.render_widget(
        Paragraph::new(format!(" {}", hint_text)).style(theme.text_muted()),
        chunks[0],
    );

    let right = match status {
        Some(status) => status.to_string(),
        None => chrono::Local::now().format("%H:%M ").to_string(),
    };
    frame.render_widget(
        Paragraph::new(right)
            .style(theme.text_muted())
            .alignment(Alignment::Right),
        chunks[1],
    );
}
