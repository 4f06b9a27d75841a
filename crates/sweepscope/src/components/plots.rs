use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};
use sweepscope_core::format::{AxisLabel, format_tick};
use sweepscope_core::{ChartSpec, HeatmapChart, LineChart, PlotGrid};

use super::{Component, EventResult};
use crate::state::{AppState, Panel};
use crate::util::styles::{
    HEADER_COLOR, HELP_COLOR, axis_title, focused_block_with_help, heat_cell, series_color,
};

pub struct PlotsPanel;

impl PlotsPanel {
    pub fn new() -> Self {
        Self
    }

    fn render_grid(frame: &mut Frame, area: Rect, grid: &PlotGrid) {
        let rows = grid.rows();
        let columns = grid.columns_per_row().max(1) as u32;
        let row_areas = Layout::vertical(
            rows.iter()
                .map(|_| Constraint::Ratio(1, rows.len() as u32)),
        )
        .split(area);

        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let cells = Layout::horizontal((0..columns).map(|_| Constraint::Ratio(1, columns)))
                .split(*row_area);
            for (chart, cell) in row.iter().zip(cells.iter()) {
                match chart {
                    ChartSpec::Line(line) => Self::render_line_chart(frame, *cell, line),
                    ChartSpec::Heatmap(heatmap) => Self::render_heatmap(frame, *cell, heatmap),
                }
            }
        }
    }

    fn render_line_chart(frame: &mut Frame, area: Rect, chart: &LineChart) {
        let points: Vec<Vec<(f64, f64)>> = chart
            .series
            .iter()
            .map(|series| {
                chart
                    .x
                    .iter()
                    .zip(&series.values)
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(x, y)| (*x, *y))
                    .collect()
            })
            .collect();

        let datasets: Vec<Dataset> = chart
            .series
            .iter()
            .zip(&points)
            .enumerate()
            .map(|(i, (series, data))| {
                Dataset::default()
                    .name(series.series_name.clone())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(series_color(i)))
                    .data(data)
            })
            .collect();

        let (x_lo, x_hi) = bounds(chart.x.iter().copied());
        let (y_lo, y_hi) = bounds(points.iter().flatten().map(|(_, y)| *y));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(chart.title.clone()).fg(HEADER_COLOR));

        let widget = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title(axis_title(&chart.x_label))
                    .bounds([x_lo, x_hi])
                    .labels(tick_labels(x_lo, x_hi, &chart.x_label.unit)),
            )
            .y_axis(
                Axis::default()
                    .bounds([y_lo, y_hi])
                    .labels(tick_labels(y_lo, y_hi, "")),
            );

        frame.render_widget(widget, area);
    }

    /// Character-cell heatmap; the highest y value is drawn on the top row
    fn render_heatmap(frame: &mut Frame, area: Rect, chart: &HeatmapChart) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(chart.title.clone()).fg(HEADER_COLOR));
        let range = chart.z_range();
        if let Some((lo, hi)) = range {
            block = block.title_bottom(
                Line::from(format!(" {} .. {} ", format_tick(lo, ""), format_tick(hi, ""))).fg(HELP_COLOR),
            );
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [map_area, legend_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

        let (nx, ny) = (chart.x.len(), chart.y.len());
        let (Some((lo, hi)), true) = (range, nx > 0 && ny > 0) else {
            frame.render_widget(
                Paragraph::new("  no finite values").style(Style::default().fg(HELP_COLOR)),
                map_area,
            );
            return;
        };

        let z_span = if hi > lo { hi - lo } else { 1.0 };
        let width = map_area.width as usize;
        let height = map_area.height as usize;

        let lines: Vec<Line> = (0..height)
            .map(|row| {
                let j = ny - 1 - sample_index(row, height, ny);
                let cells: Vec<Span> = (0..width)
                    .map(|col| {
                        let i = sample_index(col, width, nx);
                        let value = chart.z.get(j).and_then(|r| r.get(i)).copied().unwrap_or(f64::NAN);
                        let (glyph, color) = heat_cell((value - lo) / z_span);
                        Span::styled(glyph.to_string(), Style::default().fg(color))
                    })
                    .collect();
                Line::from(cells)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), map_area);

        let legend = vec![
            axis_legend("x ", &chart.x_label, &chart.x),
            axis_legend("y ", &chart.y_label, &chart.y),
        ];
        frame.render_widget(Paragraph::new(legend), legend_area);
    }
}

impl Component for PlotsPanel {
    fn handle_key(&mut self, _key: KeyEvent, _state: &mut AppState) -> EventResult {
        EventResult::NotHandled
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.panel == Panel::Plots;
        if state.show_summary {
            let block = focused_block_with_help(" RUN SUMMARY ", focused, "i back to plots");
            let lines: Vec<Line> = state
                .session
                .dataset()
                .describe()
                .lines()
                .into_iter()
                .enumerate()
                .map(|(i, line)| {
                    if i == 0 || !line.starts_with(' ') {
                        Line::from(line).fg(HEADER_COLOR)
                    } else {
                        Line::from(line)
                    }
                })
                .collect();
            frame.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }

        let title = match &state.rendered {
            Some(rendered) => format!(" PLOTS (rev {}) ", rendered.revision),
            None => " PLOTS ".to_string(),
        };
        let block = focused_block_with_help(&title, focused, "+/- columns | i summary");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let grid = state.rendered.as_ref().and_then(|r| r.grid.as_ref());
        match grid {
            Some(grid) if !grid.is_empty() => Self::render_grid(frame, inner, grid),
            _ => {
                let text = match state.current_notice() {
                    Some(notice) => notice.to_string(),
                    None => "No results selected.".to_string(),
                };
                let paragraph = Paragraph::new(format!("  {text}")).style(Style::default().fg(HELP_COLOR));
                frame.render_widget(paragraph, inner);
            }
        }
    }
}

/// Index into `len` samples for position `pos` of `extent` cells
fn sample_index(pos: usize, extent: usize, len: usize) -> usize {
    if extent == 0 || len == 0 {
        return 0;
    }
    (pos * len / extent).min(len - 1)
}

/// Finite bounds of `values`, widened when degenerate
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad, hi + pad);
    }
    (lo, hi)
}

fn tick_labels(lo: f64, hi: f64, unit: &str) -> Vec<Line<'static>> {
    [lo, (lo + hi) / 2.0, hi]
        .into_iter()
        .map(|v| Line::from(format_tick(v, unit)))
        .collect()
}

fn axis_legend(prefix: &'static str, label: &AxisLabel, ticks: &[f64]) -> Line<'static> {
    let mut line = axis_title(label);
    line.spans.insert(0, Span::styled(prefix, Style::default().fg(Color::Gray)));
    if let (Some(first), Some(last)) = (ticks.first(), ticks.last()) {
        line.spans.push(Span::styled(
            format!("  {} .. {}", format_tick(*first, &label.unit), format_tick(*last, &label.unit)),
            Style::default().fg(HELP_COLOR),
        ));
    }
    line
}
