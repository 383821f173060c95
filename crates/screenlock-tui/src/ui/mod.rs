//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
mod theme;

pub use theme::Theme;

use std::fs;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use screenlock_core::Background;

use crate::app::App;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    render_background(frame, area, app);
    screens::lock_prompt::draw(frame, area, app);

    if app.passcode.is_some() {
        screens::passcode::draw(frame, area, app);
    }
}

fn render_background(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(Block::default().style(app.theme.background()), area);

    if let Some(lines) = &app.backdrop {
        let backdrop = Paragraph::new(lines.join("\n")).style(app.theme.backdrop());
        frame.render_widget(backdrop, area);
    }
}

/// Read the backdrop file for an image background
///
/// Falls back to the plain fill when the file can't be read.
pub fn load_backdrop(background: &Background) -> Option<Vec<String>> {
    match background {
        Background::Color(_) => None,
        Background::Image(path) => match fs::read_to_string(path) {
            Ok(contents) => Some(contents.lines().map(str::to_string).collect()),
            Err(e) => {
                tracing::warn!("Failed to read background {:?}: {}", path, e);
                None
            }
        },
    }
}
