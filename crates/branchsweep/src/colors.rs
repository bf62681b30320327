//! Semantic color theme for consistent terminal output
//!
//! - `ACTIVE` => blue - headers, branch names
//! - `SUCCESS` => green - deleted branches
//! - `WARNING` => yellow - stale branches, skipped deletions
//! - `FAIL` => red - deprecated branches, failed deletions

use std::io::IsTerminal;
use std::sync::LazyLock;

use owo_colors::{OwoColorize, Style};

/// Semantic color definitions for terminal output
pub struct SemanticColors {
    /// Blue - headers, branch names
    pub active: Style,
    /// Green - completed deletions
    pub success: Style,
    /// Yellow - stale branches, skipped deletions
    pub warning: Style,
    /// Red - deprecated branches, failures
    pub fail: Style,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            active: Style::new().blue().bold(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }
}

/// Global default theme
pub static COLORS: LazyLock<SemanticColors> = LazyLock::new(SemanticColors::default);

/// Whether stdout should get ANSI colors
pub fn colors_enabled() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Apply `style` to `text` when `enabled`
pub fn paint(text: &str, style: Style, enabled: bool) -> String {
    if enabled {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}
