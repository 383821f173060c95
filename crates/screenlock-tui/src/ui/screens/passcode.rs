//! Passcode prompt shown while the authenticator waits for input

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::ui::layout::centered_rect;

/// Dots shown before the count is abbreviated
const MAX_DOTS: usize = 16;

/// Draw the passcode dialog over the prompt
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(entry) = &app.passcode else {
        return;
    };
    let theme = &app.theme;

    let dialog = centered_rect(50, 40, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(" Authentication Required ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.background());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // App name
            Constraint::Length(3), // Reason
            Constraint::Length(2), // Passcode
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let app_name = Paragraph::new(app.controller.localizer().app_display_name())
        .style(theme.title())
        .alignment(Alignment::Center);
    frame.render_widget(app_name, chunks[0]);

    let reason = Paragraph::new(entry.reason())
        .style(theme.text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(reason, chunks[1]);

    let masked = Paragraph::new(masked_passcode(entry.input.chars().count(), app.tick))
        .style(theme.text())
        .alignment(Alignment::Center);
    frame.render_widget(masked, chunks[2]);
}

/// Masked passcode with a blinking cursor
fn masked_passcode(len: usize, tick: u64) -> String {
    let mut display = "●".repeat(len.min(MAX_DOTS));
    if len > MAX_DOTS {
        display.push_str(&format!(" +{}", len - MAX_DOTS));
    }
    if tick % 2 == 0 {
        display.push('▏');
    } else {
        display.push(' ');
    }
    display
}
