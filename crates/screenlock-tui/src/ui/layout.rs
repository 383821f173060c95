//! Layout helpers

use ratatui::prelude::*;

/// Offset points per terminal row
const POINTS_PER_ROW: i16 = 40;

/// Create a centered box for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Place a `width` x `height` icon shifted from the vertical center
///
/// `offset` is in layout points (see `screenlock_core::icon_offset`). The
/// result is clamped to `area`.
pub fn icon_rect(area: Rect, width: u16, height: u16, offset: i16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let center = i32::from(area.y) + i32::from(area.height) / 2;
    let shifted = center + i32::from(offset / POINTS_PER_ROW) - i32::from(height) / 2;
    let max_top = i32::from(area.y + area.height - height);
    let top = shifted.clamp(i32::from(area.y), max_top);

    let x = area.x + (area.width - width) / 2;
    Rect::new(x, top as u16, width, height)
}
