//! User interface rendering module
//!
//! - `header` - banner, step indicator, status line, nav bar glue
//! - `screens` - one screen per wizard step
//! - `chart` - histogram bar chart

mod chart;
mod header;
pub mod screens;

use crate::app::AppState;
use crate::components::keybindings::KeybindingContext;
use crate::wizard::WizardStep;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use chart::{axis_labels, fit_bins};
pub use header::{step_indicator, HeaderRenderer, HEADER_HEIGHT};

/// UI renderer for the application
///
/// This is the main entry point for UI rendering. It delegates to
/// specialized submodules for the parts of each screen.
pub struct UiRenderer {
    header: HeaderRenderer,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    pub fn new() -> Self {
        Self {
            header: HeaderRenderer::new(),
        }
    }

    /// Render the complete UI with the keybinding context
    pub fn render_with_context(
        &self,
        f: &mut Frame,
        state: &AppState,
        keybinding_ctx: &KeybindingContext,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT), // Banner
                Constraint::Length(1),             // Step indicator
                Constraint::Min(5),                // Step content
                Constraint::Length(2),             // Status message
                Constraint::Length(1),             // Navigation bar
            ])
            .split(f.area());

        self.header.render_header(f, chunks[0]);
        header::render_step_indicator(f, chunks[1], state.step());

        match state.step() {
            WizardStep::Input => screens::render_input_screen(f, state, chunks[2]),
            WizardStep::Validate => screens::render_validate_screen(f, state, chunks[2]),
            WizardStep::Recommend => screens::render_recommend_screen(f, state, chunks[2]),
            WizardStep::Done => screens::render_done_screen(f, state, chunks[2]),
        }

        header::render_status(f, chunks[3], &state.status_message);
        header::render_nav_bar(f, state, keybinding_ctx, chunks[4]);

        // Help overlay goes on top of everything
        if state.help_visible {
            header::render_help_overlay(f, state, keybinding_ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_every_step_without_panic() {
        let renderer = UiRenderer::new();
        let ctx = KeybindingContext::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).expect("terminal");

        let mut state = AppState::default();
        terminal
            .draw(|f| renderer.render_with_context(f, &state, &ctx))
            .expect("draw input");
        assert!(buffer_text(&terminal).contains("File reference"));

        state.help_visible = true;
        terminal
            .draw(|f| renderer.render_with_context(f, &state, &ctx))
            .expect("draw help");
        assert!(buffer_text(&terminal).contains("Help"));
    }

    #[test]
    fn test_render_tiny_terminal() {
        let renderer = UiRenderer::new();
        let ctx = KeybindingContext::new();
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).expect("terminal");
        let state = AppState {
            help_visible: true,
            ..AppState::default()
        };
        terminal
            .draw(|f| renderer.render_with_context(f, &state, &ctx))
            .expect("draw");
    }
}
