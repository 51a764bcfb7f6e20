//! Centralized theme and styling for the TUI
//!
//! Colors and styles used across screens live here so every widget draws
//! from the same palette.
//!
//! # Usage
//! ```rust
//! use geoviz_wizard::theme::{Colors, Styles, Theme};
//! use geoviz_wizard::types::CheckStatus;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! let passed = Theme::check_style(CheckStatus::Passed);
//! ```

use ratatui::style::{Color, Modifier, Style};

use crate::types::{CheckStatus, ServiceKind};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors
    // -------------------------------------------------------------------------

    /// Panel and popup background
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    pub const FG_PRIMARY: Color = Color::White;

    pub const FG_SECONDARY: Color = Color::Gray;

    pub const FG_MUTED: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Accent Colors
    // -------------------------------------------------------------------------

    /// Borders, titles, highlights
    pub const PRIMARY: Color = Color::Cyan;

    /// Emphasis and the active step
    pub const SECONDARY: Color = Color::Yellow;

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    pub const SUCCESS: Color = Color::Green;

    pub const WARNING: Color = Color::Yellow;

    pub const ERROR: Color = Color::Red;

    pub const INFO: Color = Color::Blue;

    // -------------------------------------------------------------------------
    // UI Element Colors
    // -------------------------------------------------------------------------

    pub const BORDER_ACTIVE: Color = Color::Cyan;

    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    pub const HEADER: Color = Color::Cyan;

    /// Histogram bars
    pub const CHART_BAR: Color = Color::LightBlue;

    /// Example endpoint URLs
    pub const URL: Color = Color::LightCyan;

    pub const NAV_HINT: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Wizard Step Colors
    // -------------------------------------------------------------------------

    pub const STEP_ACTIVE: Color = Color::Yellow;

    pub const STEP_COMPLETE: Color = Color::Green;

    pub const STEP_PENDING: Color = Color::Gray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Common styles built from [`Colors`]
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    pub fn text_bold() -> Style {
        Style::default()
            .fg(Colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default()
            .fg(Colors::HEADER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    pub fn url() -> Style {
        Style::default().fg(Colors::URL)
    }

    /// Key label in the nav bar
    pub fn nav_key() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }
}

// =============================================================================
// SEMANTIC STYLING
// =============================================================================

/// Styles derived from domain values
pub struct Theme;

impl Theme {
    pub fn check_color(status: CheckStatus) -> Color {
        match status {
            CheckStatus::Pending | CheckStatus::Skipped => Colors::FG_MUTED,
            CheckStatus::Running => Colors::SECONDARY,
            CheckStatus::Passed => Colors::SUCCESS,
            CheckStatus::Warning => Colors::WARNING,
            CheckStatus::Failed => Colors::ERROR,
        }
    }

    pub fn check_style(status: CheckStatus) -> Style {
        let style = Style::default().fg(Self::check_color(status));
        if status == CheckStatus::Running {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Primary service is bold, alternatives are plain
    pub fn service_style(service: ServiceKind, primary: bool) -> Style {
        let color = match service {
            ServiceKind::FormatConversion => Colors::WARNING,
            _ => Colors::SUCCESS,
        };
        let style = Style::default().fg(color);
        if primary {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Style for a step indicator entry
    pub fn step_style(completed: bool, active: bool) -> Style {
        if active {
            Style::default()
                .fg(Colors::STEP_ACTIVE)
                .add_modifier(Modifier::BOLD)
        } else if completed {
            Style::default().fg(Colors::STEP_COMPLETE)
        } else {
            Style::default().fg(Colors::STEP_PENDING)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_colors() {
        assert_eq!(Theme::check_color(CheckStatus::Passed), Colors::SUCCESS);
        assert_eq!(Theme::check_color(CheckStatus::Failed), Colors::ERROR);
        assert_eq!(Theme::check_color(CheckStatus::Skipped), Colors::FG_MUTED);
    }

    #[test]
    fn test_running_is_bold() {
        assert!(Theme::check_style(CheckStatus::Running)
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_step_style_priority() {
        assert_eq!(Theme::step_style(true, true).fg, Some(Colors::STEP_ACTIVE));
        assert_eq!(Theme::step_style(true, false).fg, Some(Colors::STEP_COMPLETE));
        assert_eq!(Theme::step_style(false, false).fg, Some(Colors::STEP_PENDING));
    }
}
