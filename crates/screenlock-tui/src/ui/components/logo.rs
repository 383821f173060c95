//! App icon drawn in the middle of the prompt

use std::fs;

use screenlock_core::AppIcon;

/// Built-in padlock icon
const PADLOCK: &str = r#"
    ▄▀▀▀▀▄
   █      █
 ▄▄█▄▄▄▄▄▄█▄▄
 █    ▄▄    █
 █    ██    █
 █▄▄▄▄▄▄▄▄▄▄█
"#;

/// Tallest icon that will be drawn from a file
const MAX_ICON_LINES: usize = 12;

/// Lines of the built-in icon
pub fn builtin_icon() -> Vec<String> {
    PADLOCK
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the configured icon, falling back to the built-in one
pub fn load_icon(icon: &AppIcon) -> Vec<String> {
    match icon {
        AppIcon::Builtin => builtin_icon(),
        AppIcon::File(path) => match fs::read_to_string(path) {
            Ok(contents) => {
                let lines: Vec<String> = contents
                    .lines()
                    .take(MAX_ICON_LINES)
                    .map(|line| line.trim_end().to_string())
                    .collect();
                if lines.iter().all(|line| line.is_empty()) {
                    builtin_icon()
                } else {
                    lines
                }
            }
            Err(e) => {
                tracing::warn!("Failed to read app icon {:?}: {}", path, e);
                builtin_icon()
            }
        },
    }
}

/// Width of the widest line, in terminal cells
pub fn icon_width(lines: &[String]) -> u16 {
    lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .min(u16::MAX as usize) as u16
}
