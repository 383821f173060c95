//! Colors derived from the view configuration

use ratatui::style::{Color, Modifier, Style};

use screenlock_core::{Background, Rgb, ScreenLockViewConfiguration};

/// Lock prompt palette
pub struct Theme {
    pub text: Color,
    pub button_title: Color,
    pub button_background: Color,
    pub background: Color,
    pub muted: Color,
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

impl Theme {
    /// Build the palette for a view configuration
    pub fn from_view(view: &ScreenLockViewConfiguration) -> Self {
        let background = match &view.background {
            Background::Color(rgb) => color(*rgb),
            Background::Image(_) => Color::Reset,
        };

        Self {
            text: color(view.text_color),
            button_title: color(view.button_title_color),
            button_background: color(view.button_background_color),
            background,
            muted: Color::Rgb(117, 117, 117), // #757575
        }
    }

    /// Whole-screen fill
    pub fn background(&self) -> Style {
        Style::default().bg(self.background)
    }

    /// Text drawn from a background image file
    pub fn backdrop(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }

    /// Error message and logout link
    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// App icon
    pub fn icon(&self) -> Style {
        Style::default()
            .fg(self.button_background)
            .add_modifier(Modifier::BOLD)
    }

    /// Filled retry button
    pub fn button(&self, focused: bool) -> Style {
        let style = Style::default()
            .fg(self.button_title)
            .bg(self.button_background);
        if focused {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            style
        }
    }

    /// Borderless logout link
    pub fn link(&self, focused: bool) -> Style {
        if focused {
            self.text().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            self.text()
        }
    }

    /// Hints and status line
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Dialog border
    pub fn border(&self) -> Style {
        Style::default().fg(self.button_background)
    }

    /// Dialog title
    pub fn title(&self) -> Style {
        self.border().add_modifier(Modifier::BOLD)
    }
}
