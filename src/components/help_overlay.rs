//! Help overlay component
//!
//! Displays context-sensitive help in a centred popup.

use super::keybindings::{HelpSection, KeybindingContext};
use crate::theme::{Colors, Styles};
use crate::wizard::WizardStep;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Help overlay component
pub struct HelpOverlay {
    content: Vec<Line<'static>>,
}

impl HelpOverlay {
    pub const WIDTH_PERCENT: u16 = 60;
    pub const HEIGHT_PERCENT: u16 = 70;
    const MIN_WIDTH: u16 = 44;
    const MAX_WIDTH: u16 = 80;
    const MIN_HEIGHT: u16 = 14;

    /// Create a new help overlay for the given step
    pub fn new(step: WizardStep, keybinding_ctx: &KeybindingContext) -> Self {
        let sections = keybinding_ctx.get_help_content(step);
        Self {
            content: Self::build_content(&sections, step),
        }
    }

    fn build_content(sections: &[HelpSection], step: WizardStep) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(Span::styled("  Visualization Wizard Help  ", Styles::title())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Current: ", Styles::text_muted()),
                Span::styled(
                    format!(
                        "Step {} of {}: {}",
                        step.step_number(),
                        WizardStep::TOTAL_STEPS,
                        step.title()
                    ),
                    Style::default().fg(Colors::SECONDARY),
                ),
            ]),
            Line::from(""),
        ];

        for section in sections {
            lines.push(Line::from(Span::styled(
                format!("  {}  ", section.title),
                Style::default()
                    .fg(Colors::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in &section.items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{:<12}", key), Styles::nav_key()),
                    Span::styled(description.clone(), Styles::text()),
                ]));
            }
            lines.push(Line::from(""));
        }

        if step == WizardStep::Input {
            lines.push(Line::from(Span::styled(
                "Accepted input:",
                Styles::text_secondary(),
            )));
            for example in [
                "s3://bucket/path/file.tif",
                "https://host/path/data.nc",
                "C1996881146-POCLOUD (CMR collection)",
                "G2536058745-LPCLOUD (CMR granule)",
            ] {
                lines.push(Line::from(Span::styled(format!("  {}", example), Styles::url())));
            }
        }

        lines
    }

    /// Number of content lines
    pub fn line_count(&self) -> usize {
        self.content.len()
    }

    /// Render the help overlay centred in `parent`
    pub fn render(&self, f: &mut Frame, parent: Rect) {
        let area = popup_area(
            parent,
            Self::WIDTH_PERCENT,
            Self::HEIGHT_PERCENT,
            Self::MIN_WIDTH,
            Self::MAX_WIDTH,
            Self::MIN_HEIGHT,
        );
        f.render_widget(Clear, area);

        let block = Block::default()
            .title(" Help ")
            .title_bottom(Line::from(" Press ? or Esc to close ").centered())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::panel_bg());
        let paragraph = Paragraph::new(self.content.clone())
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }
}

/// Centred rectangle sized as a percentage of `parent`, clamped to limits
/// and never larger than `parent`.
pub fn popup_area(
    parent: Rect,
    width_percent: u16,
    height_percent: u16,
    min_width: u16,
    max_width: u16,
    min_height: u16,
) -> Rect {
    let width = (parent.width as u32 * width_percent as u32 / 100) as u16;
    let height = (parent.height as u32 * height_percent as u32 / 100) as u16;
    let width = width.clamp(min_width, max_width).min(parent.width);
    let height = height.max(min_height).min(parent.height);
    Rect {
        x: parent.x + (parent.width - width) / 2,
        y: parent.y + (parent.height - height) / 2,
        width,
        height,
    }
}
