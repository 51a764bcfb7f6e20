//! Wizard step screens
//!
//! One render function per [`WizardStep`]. Each draws into the content area
//! below the header and step indicator.

use super::chart::render_histogram;
use crate::app::AppState;
use crate::logic::Recommendation;
use crate::stats::Histogram;
use crate::theme::{Colors, Styles, Theme};
use crate::types::{CheckStatus, SourceKind};
use crate::validation::DetectedProperties;
use crate::wizard::WizardStep;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

// ============================================================================
// Input
// ============================================================================

pub fn render_input_screen(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // text field
            Constraint::Min(4),    // examples
        ])
        .split(area);

    let (before, after) = state.input.split_at_cursor();
    let mut after_chars = after.chars();
    let under_cursor = after_chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let rest: String = after_chars.collect();

    let field = Paragraph::new(Line::from(vec![
        Span::styled(before.to_string(), Styles::text()),
        Span::styled(
            under_cursor,
            Style::default()
                .fg(Colors::BG_PRIMARY)
                .bg(Colors::FG_PRIMARY),
        ),
        Span::styled(rest, Styles::text()),
    ]))
    .block(
        Block::default()
            .title(" File reference ")
            .borders(Borders::ALL)
            .border_style(Styles::border_active()),
    );
    f.render_widget(field, chunks[0]);

    let help = vec![
        Line::from(Span::styled("Supported references", Styles::text_bold())),
        Line::from(""),
        example_line("S3 object", "s3://bucket/path/to/file.tif"),
        example_line("HTTPS URL", "https://example.com/data/sst.nc"),
        example_line("Zarr store", "s3://bucket/store.zarr"),
        example_line("CMR collection", "C1996881146-POCLOUD"),
        example_line("CMR granule", "G2536058745-LPCLOUD"),
        Line::from(""),
        Line::from(Span::styled(
            "Checks run against hosted services; nothing is downloaded locally.",
            Styles::text_muted(),
        )),
    ];
    let examples = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).border_style(Styles::border_inactive()))
        .wrap(Wrap { trim: true });
    f.render_widget(examples, chunks[1]);
}

fn example_line(label: &str, example: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<16}", label), Styles::text_secondary()),
        Span::styled(example.to_string(), Styles::url()),
    ])
}

// ============================================================================
// Validate
// ============================================================================

pub fn render_validate_screen(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                             // input echo
            Constraint::Length(state.checks.len() as u16 + 2), // check list
            Constraint::Min(3),                                // detected properties
        ])
        .split(area);

    let echo = Paragraph::new(Span::styled(state.session.input.trim().to_string(), Styles::url()))
        .block(Block::default().title(" Validating ").borders(Borders::ALL));
    f.render_widget(echo, chunks[0]);

    let items: Vec<ListItem> = state
        .checks
        .iter()
        .map(|row| {
            let style = Theme::check_style(row.status);
            let mut spans = vec![
                Span::styled(format!(" {} ", row.status.icon()), style),
                Span::styled(format!("{:<26}", row.check.title()), style),
            ];
            if !row.message.is_empty() {
                spans.push(Span::styled(row.message.clone(), Styles::text_secondary()));
            } else if row.status == CheckStatus::Running {
                spans.push(Span::styled("running...", Styles::text_muted()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(
        " Checks {}/{} ",
        state.finished_checks(),
        state.checks.len()
    );
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Styles::border_active()),
    );
    f.render_widget(list, chunks[1]);

    let details = match state.session.report() {
        Some(report) => properties_lines(&report.properties),
        None => vec![Line::from(Span::styled(
            "Waiting for checks to finish...",
            Styles::text_muted(),
        ))],
    };
    let panel = Paragraph::new(details)
        .block(Block::default().title(" Detected ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(panel, chunks[2]);
}

/// Key/value lines describing detected properties
pub fn properties_lines(props: &DetectedProperties) -> Vec<Line<'static>> {
    let mut rows: Vec<(&str, String)> = Vec::new();
    if let Some(kind) = props.source_kind {
        rows.push(("Source", kind.to_string()));
    }
    rows.push(("Format", format!("{} ({})", props.format.label(), props.spatial_type)));
    if props.source_kind == Some(SourceKind::Https) || props.source_kind == Some(SourceKind::S3) {
        if let Some(len) = props.content_length {
            rows.push(("Size", format!("{} bytes", len)));
        }
    }
    if props.format.is_multidimensional() || props.is_cmr {
        rows.push(("Time dimension", yes_no(props.has_time_dimension)));
    } else {
        rows.push(("Cloud optimized", yes_no(props.is_cog)));
    }
    if !props.variables.is_empty() {
        rows.push(("Variables", props.variables.join(", ")));
    }
    if let Some(count) = props.band_count {
        rows.push(("Bands", count.to_string()));
    }
    if let Some((min, max)) = props.zoom_range {
        rows.push(("Zoom", format!("{}-{}", min, max)));
    }
    if let Some(id) = &props.concept_id {
        rows.push(("Concept", id.clone()));
    }

    rows.into_iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("  {:<16}", k), Styles::text_secondary()),
                Span::styled(v, Styles::text()),
            ])
        })
        .collect()
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

// ============================================================================
// Recommend
// ============================================================================

pub fn render_recommend_screen(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(rec) = state.session.recommendation() else {
        f.render_widget(Paragraph::new("No recommendation available"), area);
        return;
    };

    let histogram = state.session.statistics().and_then(Histogram::first_of);
    let show_chart = histogram.is_some() || state.loading_statistics || state.statistics_error.is_some();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if show_chart {
            vec![Constraint::Min(8), Constraint::Length(10)]
        } else {
            vec![Constraint::Min(8)]
        })
        .split(area);

    let body = Paragraph::new(recommendation_lines(rec))
        .block(
            Block::default()
                .title(" Recommendation ")
                .borders(Borders::ALL)
                .border_style(Styles::border_active()),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.recommend_scroll, 0));
    f.render_widget(body, chunks[0]);

    if !show_chart {
        return;
    }
    match (&histogram, &state.statistics_error) {
        (Some(hist), _) => render_histogram(f, chunks[1], hist),
        (None, Some(err)) => {
            let msg = Paragraph::new(Span::styled(format!("Statistics unavailable: {}", err), Styles::warning()))
                .block(Block::default().title(" Statistics ").borders(Borders::ALL))
                .wrap(Wrap { trim: true });
            f.render_widget(msg, chunks[1]);
        }
        (None, None) => {
            let msg = Paragraph::new(Span::styled("Fetching statistics...", Styles::text_muted()))
                .block(Block::default().title(" Statistics ").borders(Borders::ALL));
            f.render_widget(msg, chunks[1]);
        }
    }
}

/// Text body of the recommendation panel
pub fn recommendation_lines(rec: &Recommendation) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Recommended: ", Styles::text_bold()),
        Span::styled(rec.primary.label().to_string(), Theme::service_style(rec.primary, true)),
    ])];
    if let Some(backend) = rec.cmr_backend {
        lines.push(Line::from(vec![
            Span::styled("Backend:     ", Styles::text_secondary()),
            Span::styled(backend.to_string(), Styles::text()),
        ]));
    }
    if !rec.alternatives.is_empty() {
        let mut spans = vec![Span::styled("Also:        ", Styles::text_secondary())];
        for (i, alt) in rec.alternatives.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(", "));
            }
            spans.push(Span::styled(alt.label().to_string(), Theme::service_style(*alt, false)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(section_title("Why"));
    for reason in &rec.rationale {
        lines.push(Line::from(Span::styled(format!("  • {}", reason), Styles::text())));
    }

    if !rec.endpoints.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_title("Example endpoints"));
        for endpoint in &rec.endpoints {
            lines.push(Line::from(Span::styled(format!("  {}", endpoint.label), Styles::text_secondary())));
            lines.push(Line::from(Span::styled(format!("    {}", endpoint.url), Styles::url())));
        }
    }

    if let Some(advice) = &rec.conversion {
        lines.push(Line::from(""));
        lines.push(section_title("Conversion"));
        lines.push(Line::from(Span::styled(format!("  {}", advice.summary), Styles::text())));
        for command in &advice.commands {
            lines.push(Line::from(Span::styled(format!("    $ {}", command), Styles::warning())));
        }
    }
    lines
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Colors::SUCCESS)
            .add_modifier(Modifier::BOLD),
    ))
}

// ============================================================================
// Done
// ============================================================================

pub fn render_done_screen(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("Session complete", Styles::title())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Input:        ", Styles::text_secondary()),
            Span::styled(state.session.input.trim().to_string(), Styles::url()),
        ]),
    ];

    if let Some(report) = state.session.report() {
        let summary = report.summary();
        lines.push(Line::from(vec![
            Span::styled("  Checks:       ", Styles::text_secondary()),
            Span::styled(
                format!(
                    "{} passed, {} warnings, {} skipped",
                    summary.passed, summary.warnings, summary.skipped
                ),
                Styles::text(),
            ),
        ]));
    }
    if let Some(rec) = state.session.recommendation() {
        lines.push(Line::from(vec![
            Span::styled("  Recommended:  ", Styles::text_secondary()),
            Span::styled(rec.primary.label().to_string(), Theme::service_style(rec.primary, true)),
        ]));
        if let Some(first) = rec.endpoints.first() {
            lines.push(Line::from(vec![
                Span::styled("  Start with:   ", Styles::text_secondary()),
                Span::styled(first.url.clone(), Styles::url()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Steps visited: {}",
            state
                .session
                .history()
                .iter()
                .map(|(step, _)| step.title())
                .collect::<Vec<_>>()
                .join(" → ")
        ),
        Styles::text_muted(),
    )));

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", WizardStep::Done.title()))
                .borders(Borders::ALL)
                .border_style(Styles::border_active()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::WizardConfig;
    use crate::logic::recommend;
    use crate::types::FileFormat;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_recommendation_lines_include_commands() {
        let props = DetectedProperties {
            format: FileFormat::GeoTiff,
            file_name: Some("scene.tif".to_string()),
            ..Default::default()
        };
        let rec = recommend(&props, &WizardConfig::default());
        let body = text(&recommendation_lines(&rec));
        assert!(body.contains("Conversion"));
        assert!(body.contains("$ rio cogeo create scene.tif scene_cog.tif"));
    }

    #[test]
    fn test_properties_lines_for_netcdf() {
        let props = DetectedProperties {
            source_kind: Some(SourceKind::Https),
            format: FileFormat::NetCdf,
            has_time_dimension: true,
            variables: vec!["sst".to_string()],
            ..Default::default()
        };
        let body = text(&properties_lines(&props));
        assert!(body.contains("Time dimension"));
        assert!(body.contains("sst"));
        assert!(!body.contains("Cloud optimized"));
    }
}
