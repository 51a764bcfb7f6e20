//! Header and common widget rendering
//!
//! This module contains the banner, the step indicator, the status line,
//! and the nav bar / help overlay glue.

use crate::app::AppState;
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use crate::components::nav_bar::NavBar;
use crate::theme::{Colors, Styles, Theme};
use crate::wizard::WizardStep;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Banner height in rows
pub const HEADER_HEIGHT: u16 = 4;

/// Header renderer containing the banner
pub struct HeaderRenderer {
    header_lines: Vec<Line<'static>>,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    pub fn new() -> Self {
        Self {
            header_lines: Self::create_header(),
        }
    }

    /// Render the banner
    pub fn render_header(&self, f: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header = Paragraph::new(self.header_lines.clone())
            .block(Block::default().borders(Borders::NONE))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn create_header() -> Vec<Line<'static>> {
        let style = Style::default().fg(Colors::PRIMARY);
        vec![
            Line::from(Span::styled(" ┌─┐┌─┐┌─┐┬  ┬┬┌─┐  ┬ ┬┬┌─┐┌─┐┬─┐┌┬┐", style)),
            Line::from(Span::styled(" │ ┬├┤ │ │└┐┌┘│┌─┘  ││││┌─┘├─┤├┬┘ ││", style)),
            Line::from(Span::styled(" └─┘└─┘└─┘ └┘ ┴└─┘  └┴┘┴└─┘┴ ┴┴└──┴┘", style)),
            Line::from(Span::styled(
                "Cloud-native geospatial visualization advisor",
                Styles::text_muted(),
            )),
        ]
    }
}

/// Step indicator spans: `✓ 1 File Reference ─ ● 2 Validation ─ ○ 3 Recommendation`
pub fn step_indicator(current: WizardStep) -> Line<'static> {
    let steps = [WizardStep::Input, WizardStep::Validate, WizardStep::Recommend];
    let mut spans = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ─ ", Styles::text_muted()));
        }
        let completed = current.is_terminal() || step.step_number() < current.step_number();
        let active = *step == current;
        let marker = if completed && !active {
            "✓"
        } else if active {
            "●"
        } else {
            "○"
        };
        spans.push(Span::styled(
            format!("{} {} {}", marker, step.step_number(), step.title()),
            Theme::step_style(completed, active),
        ));
    }
    Line::from(spans).centered()
}

/// Render the step indicator
pub fn render_step_indicator(f: &mut Frame, area: Rect, current: WizardStep) {
    f.render_widget(Paragraph::new(step_indicator(current)), area);
}

/// Render the status message line
pub fn render_status(f: &mut Frame, area: Rect, message: &str) {
    let status = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Colors::SECONDARY))
        .wrap(Wrap { trim: true });
    f.render_widget(status, area);
}

/// Render the navigation bar
pub fn render_nav_bar(
    f: &mut Frame,
    state: &AppState,
    keybinding_ctx: &KeybindingContext,
    area: Rect,
) {
    let nav_items = keybinding_ctx.get_nav_items(state.step());
    NavBar::new(nav_items).render(f, area);
}

/// Render the help overlay
pub fn render_help_overlay(f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
    let help_overlay = HelpOverlay::new(state.step(), keybinding_ctx);
    help_overlay.render(f, f.area());
}
