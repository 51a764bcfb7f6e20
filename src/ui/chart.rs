//! Histogram chart for the statistics preview

use crate::stats::{Histogram, LinearScale};
use crate::theme::{Colors, Styles};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

/// Merge adjacent bins so at most `columns` remain. Counts are summed and
/// centres averaged.
pub fn fit_bins(hist: &Histogram, columns: usize) -> Histogram {
    if columns == 0 || hist.counts.len() <= columns {
        return hist.clone();
    }
    let chunk = hist.counts.len().div_ceil(columns);
    let counts = hist.counts.chunks(chunk).map(|c| c.iter().sum()).collect();
    let centers = hist
        .centers
        .chunks(chunk)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect();
    Histogram {
        band: hist.band.clone(),
        centers,
        counts,
    }
}

/// Axis labels at evenly spaced values across the histogram's range
pub fn axis_labels(hist: &Histogram, count: usize) -> Vec<String> {
    let (lo, hi) = hist.value_range();
    LinearScale::new((lo, hi), (0.0, 1.0))
        .ticks(count)
        .into_iter()
        .map(|v| format!("{:.2}", v))
        .collect()
}

/// Render a histogram as a bar chart with a value axis underneath
pub fn render_histogram(f: &mut Frame, area: Rect, hist: &Histogram) {
    let block = Block::default()
        .title(format!(" Histogram: {} ", hist.band))
        .borders(Borders::ALL)
        .border_style(Styles::border_inactive());
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 4 || inner.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    // One column per bar, no gaps
    let fitted = fit_bins(hist, inner.width as usize);
    let bar_width = (inner.width as usize / fitted.counts.len().max(1)).max(1) as u16;
    let bars: Vec<Bar> = fitted
        .bar_heights(u64::from(chunks[0].height) * 8)
        .into_iter()
        .map(|h| Bar::default().value(h).text_value(String::new()))
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(0)
        .bar_style(Style::default().fg(Colors::CHART_BAR));
    f.render_widget(chart, chunks[0]);

    let labels = axis_labels(hist, 3);
    let axis = match labels.as_slice() {
        [lo, mid, hi] => {
            let width = chunks[1].width as usize;
            let gap = width.saturating_sub(lo.len() + mid.len() + hi.len()) / 2;
            format!("{}{}{}{}{}", lo, " ".repeat(gap), mid, " ".repeat(gap), hi)
        }
        _ => String::new(),
    };
    f.render_widget(Paragraph::new(Line::styled(axis, Styles::text_muted())), chunks[1]);
}
