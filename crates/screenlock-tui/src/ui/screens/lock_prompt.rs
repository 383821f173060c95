//! Lock prompt: app icon, error message and retry/logout actions

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use screenlock_core::{icon_offset, MessageKey, PromptAction, PromptPhase, CAN_LOGOUT};

use crate::app::App;
use crate::ui::components::{logo, status_bar};
use crate::ui::layout::icon_rect;

/// Rows reserved for the error message
const ERROR_ROWS: u16 = 3;

/// Draw the lock prompt
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let state = app.controller.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let (body, footer) = (chunks[0], chunks[1]);

    // Icon rises while nothing is shown below it
    let icon_area = icon_rect(
        body,
        logo::icon_width(&app.icon),
        app.icon.len() as u16,
        icon_offset(state, CAN_LOGOUT),
    );
    let icon = Paragraph::new(app.icon.join("\n"))
        .style(theme.icon())
        .alignment(Alignment::Center);
    frame.render_widget(icon, Rect::new(body.x, icon_area.y, body.width, icon_area.height));

    let actions = app.controller.offered_actions();
    if state.has_error {
        let top = icon_area.bottom().saturating_add(1).min(body.bottom());
        let below = Rect::new(body.x, top, body.width, body.bottom() - top);
        draw_error(frame, below, app, &actions);
    }

    let hints = hints(app, &actions);
    let announcement = app.announcement();
    status_bar::render(frame, footer, &hints, announcement.as_deref(), theme);
}

fn draw_error(frame: &mut Frame, area: Rect, app: &App, actions: &[PromptAction]) {
    let theme = &app.theme;
    let strings = app.controller.localizer();

    let mut constraints = vec![Constraint::Length(ERROR_ROWS)];
    for _ in actions {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));

    let text_width = area.width.saturating_sub(8).max(20).min(area.width);
    let column = Rect::new(
        area.x + (area.width - text_width) / 2,
        area.y,
        text_width,
        area.height,
    );
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(column);

    let message = Paragraph::new(app.controller.state().error_text.as_str())
        .style(theme.text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, rows[0]);

    for (i, action) in actions.iter().enumerate() {
        let focused = i == app.focus;
        let button = match action {
            PromptAction::Retry => {
                let label = format!("  {}  ", strings.text(MessageKey::RetryButtonTitle));
                Span::styled(label, theme.button(focused))
            }
            PromptAction::Logout => {
                Span::styled(strings.text(MessageKey::LogoutButtonTitle), theme.link(focused))
            }
        };
        let row = rows[1 + i * 2 + 1];
        frame.render_widget(Paragraph::new(Line::from(button)).alignment(Alignment::Center), row);
    }
}

fn hints(app: &App, actions: &[PromptAction]) -> Vec<(&'static str, &'static str)> {
    if app.passcode.is_some() {
        return vec![("Enter", "Unlock"), ("Esc", "Cancel")];
    }

    match app.controller.phase() {
        PromptPhase::ErrorShown { .. } => {
            let mut hints = Vec::new();
            if actions.len() > 1 {
                hints.push(("Tab", "Switch"));
            }
            hints.push(("Enter", "Select"));
            if actions.contains(&PromptAction::Retry) {
                hints.push(("r", "Retry"));
            }
            hints.push(("l", "Log out"));
            hints
        }
        _ => Vec::new(),
    }
}
