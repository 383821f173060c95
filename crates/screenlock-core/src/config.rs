//! Appearance of the lock prompt
//!
//! Hosts brand the prompt with their own colors, background and app icon.
//! Colors are written as `#RRGGBB` strings in configuration files.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with '#': {s}"))?;
        if hex.len() != 6 || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Color must be #RRGGBB: {s}"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("Invalid color {s}: {e}"))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Backdrop behind the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Background {
    /// Solid fill
    Color(Rgb),
    /// Image file stretched over the whole view
    Image(PathBuf),
}

/// Icon drawn above the error message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum AppIcon {
    /// The built-in logo
    #[default]
    Builtin,
    /// Icon loaded from a file
    File(PathBuf),
}

/// Branding for the lock prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenLockViewConfiguration {
    /// Error message and logout link color
    pub text_color: Rgb,
    /// Retry button title color
    pub button_title_color: Rgb,
    /// Retry button fill
    pub button_background_color: Rgb,
    /// Backdrop
    pub background: Background,
    /// Icon shown in the middle of the prompt
    pub app_icon: AppIcon,
}

impl Default for ScreenLockViewConfiguration {
    fn default() -> Self {
        Self {
            text_color: Rgb::new(0x18, 0x18, 0x18),
            button_title_color: Rgb::WHITE,
            button_background_color: Rgb::new(0x01, 0x76, 0xD3),
            background: Background::Color(Rgb::new(0xF3, 0xF3, 0xF3)),
            app_icon: AppIcon::Builtin,
        }
    }
}
