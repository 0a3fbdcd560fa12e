//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML palettes. Four Catppuccin variants are compiled in; a
//! custom palette can be loaded from a file under the host filesystem.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! error_fg = "#f38ba8"
//! status_open = "#a6e3a1"
//! status_closed = "#f38ba8"
//! status_unknown = "#9399b2"
//! night_badge = "#cba6f7"
//! marker = "#89b4fa"
//! cluster = "#fab387"
//! user_location = "#94e2d5"
//! popup_border = "#f5c2e7"
//! ```
//!
//! # Example
//!
//! ```rust
//! use yakguk::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-latte").unwrap();
//! println!("{}", Theme::fg(&theme.colors.header_fg));
//! println!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! ```

use crate::domain::error::{Result, YakgukError};
use crate::domain::hours::OpenStatus;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Selected card foreground color.
    pub selection_fg: String,
    /// Selected card background color.
    pub selection_bg: String,

    pub text_normal: String,
    /// Dimmed text color (footer, addresses, secondary info).
    pub text_dim: String,

    /// Border and separator line color.
    pub border: String,

    pub search_bar_border: String,
    /// Search match highlight foreground.
    pub match_highlight_fg: String,
    /// Search match highlight background.
    pub match_highlight_bg: String,

    /// Empty state and loading message color.
    pub empty_state_fg: String,
    /// Load failure message color.
    pub error_fg: String,

    pub status_open: String,
    pub status_closed: String,
    pub status_unknown: String,
    pub night_badge: String,

    /// Single pharmacy marker on the map.
    pub marker: String,
    /// Cluster marker with its member count.
    pub cluster: String,
    pub user_location: String,
    pub popup_border: String,
}

impl Default for ThemeColors {
    /// Catppuccin Mocha, mirrored from `themes/catppuccin-mocha.toml`.
    fn default() -> Self {
        let hex = |s: &str| s.to_string();
        Self {
            header_fg: hex("#cdd6f4"),
            header_bg: None,
            selection_fg: hex("#1e1e2e"),
            selection_bg: hex("#f5c2e7"),
            text_normal: hex("#cdd6f4"),
            text_dim: hex("#6c7086"),
            border: hex("#45475a"),
            search_bar_border: hex("#f5c2e7"),
            match_highlight_fg: hex("#1e1e2e"),
            match_highlight_bg: hex("#f9e2af"),
            empty_state_fg: hex("#89b4fa"),
            error_fg: hex("#f38ba8"),
            status_open: hex("#a6e3a1"),
            status_closed: hex("#f38ba8"),
            status_unknown: hex("#9399b2"),
            night_badge: hex("#cba6f7"),
            marker: hex("#89b4fa"),
            cluster: hex("#fab387"),
            user_location: hex("#94e2d5"),
            popup_border: hex("#f5c2e7"),
        }
    }
}

impl ThemeColors {
    /// Color for an open/closed/unknown badge.
    #[must_use]
    pub fn status(&self, status: OpenStatus) -> &str {
        match status {
            OpenStatus::Open => &self.status_open,
            OpenStatus::Closed => &self.status_closed,
            OpenStatus::Unknown => &self.status_unknown,
        }
    }
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Returns `None` if the theme name is unknown.
    ///
    /// # Example
    ///
    /// ```rust
    /// use yakguk::ui::theme::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-frappe").unwrap();
    /// assert_eq!(theme.name, "catppuccin-frappe");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`YakgukError::Theme`] if the file cannot be read or is not a
    /// complete palette.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| YakgukError::Theme(format!("Failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| YakgukError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Converts a hex color to RGB tuple.
    ///
    /// Returns `(255, 255, 255)` (white) on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground color escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling (colors, bold, dim).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the default theme (Catppuccin Mocha).
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn every_builtin_theme_parses() {
        for name in [
            "catppuccin-mocha",
            "catppuccin-latte",
            "catppuccin-frappe",
            "catppuccin-macchiato",
        ] {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} should parse"));
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn embedded_default_matches_mocha_file() {
        let parsed = Theme::from_name(DEFAULT_THEME).unwrap();
        assert_eq!(parsed.colors, ThemeColors::default());
    }

    #[test]
    fn custom_theme_file_loads() {
        let mut file = NamedTempFile::new().unwrap();
        let mut contents = String::from("name = \"custom\"\n\n[colors]\n");
        let colors = toml::to_string(&ThemeColors::default()).unwrap();
        contents.push_str(&colors);
        file.write_all(contents.as_bytes()).unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "custom");
    }

    #[test]
    fn incomplete_theme_file_is_a_theme_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"name = \"broken\"\n[colors]\nheader_fg = \"#ffffff\"\n")
            .unwrap();

        assert!(matches!(Theme::from_file(file.path()), Err(YakgukError::Theme(_))));
    }

    #[test]
    fn hex_colors_become_truecolor_sequences() {
        assert_eq!(Theme::fg("#a6e3a1"), "\u{1b}[38;2;166;227;161m");
        assert_eq!(Theme::bg("nonsense"), "\u{1b}[48;2;255;255;255m");
    }
}
