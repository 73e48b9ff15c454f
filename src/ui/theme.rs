//! Color themes and ANSI escape sequence generation.
//!
//! Four Catppuccin variants are embedded in the binary; custom themes are TOML
//! files with the same shape:
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
//! accent = "#cba6f7"
//! primary = "#89b4fa"
//! destructive = "#f38ba8"
//! disabled = "#45475a"
//! notice = "#a6e3a1"
//! error = "#f38ba8"
//! ```

use crate::domain::error::{RegistrarError, Result};
use crate::table::ButtonVariant;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Theme used when none is configured or the configured one fails to load.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every styled element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Focused row.
    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, subtitles and secondary columns.
    pub text_dim: String,

    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Checkboxes, sort markers and the active screen tab.
    pub accent: String,
    pub primary: String,
    pub destructive: String,
    /// Actions whose condition rejects the row.
    pub disabled: String,

    /// Informational notifications.
    pub notice: String,
    pub error: String,
}

impl Default for ThemeColors {
    /// Catppuccin Mocha, kept in sync with `themes/catppuccin-mocha.toml`.
    fn default() -> Self {
        Self {
            header_fg: "#cdd6f4".to_string(),
            header_bg: None,
            selection_fg: "#1e1e2e".to_string(),
            selection_bg: "#f5c2e7".to_string(),
            text_normal: "#cdd6f4".to_string(),
            text_dim: "#6c7086".to_string(),
            border: "#45475a".to_string(),
            search_bar_border: "#f5c2e7".to_string(),
            match_highlight_fg: "#1e1e2e".to_string(),
            match_highlight_bg: "#f9e2af".to_string(),
            empty_state_fg: "#89b4fa".to_string(),
            accent: "#cba6f7".to_string(),
            primary: "#89b4fa".to_string(),
            destructive: "#f38ba8".to_string(),
            disabled: "#45475a".to_string(),
            notice: "#a6e3a1".to_string(),
            error: "#f38ba8".to_string(),
        }
    }
}

impl Theme {
    /// Loads a built-in theme. Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str)
            .map_err(|e| tracing::error!(theme = name, error = %e, "built-in theme does not parse"))
            .ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrarError::Theme`] if the file cannot be read or is not a
    /// valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| RegistrarError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| RegistrarError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Foreground color for a button of `variant`.
    #[must_use]
    pub fn button_color(&self, variant: ButtonVariant, enabled: bool) -> &str {
        if !enabled {
            return &self.colors.disabled;
        }
        match variant {
            ButtonVariant::Primary => &self.colors.primary,
            ButtonVariant::Destructive => &self.colors.destructive,
            ButtonVariant::Secondary | ButtonVariant::Outline => &self.colors.text_dim,
            ButtonVariant::Default => &self.colors.text_normal,
        }
    }

    /// Parses `#rrggbb`, falling back to white on malformed input.
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

    /// 24-bit foreground escape, `\x1b[38;2;r;g;bm`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape, `\x1b[48;2;r;g;bm`.
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

    #[must_use]
    pub const fn underline() -> &'static str {
        "\u{001b}[4m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}
