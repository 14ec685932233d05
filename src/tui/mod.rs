//! Ratatui-based terminal UI.
//!
//! The TUI provides two selectors (year and polling source) and renders the
//! six party lines for the current selection. Every selector change recomputes
//! the series from the parsed dataset.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_series};
use crate::chart::format_percent;
use crate::data::Dataset;
use crate::domain::{FilterState, Party};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{PartyLine, PollsPlottersChart};

const TITLE: &str = "Sonntagsfragen zur Bundestagswahl";
const CREDITS: &str = "Infratest dimap, Forsa, Forschungsgruppe Wahlen, Kantar, Insa";

/// Start the TUI.
pub fn run(dataset: Dataset, filters: FilterState) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, filters);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Source,
}

struct App {
    dataset: Dataset,
    filters: FilterState,
    selected_field: Field,
    status: String,
    run: RunOutput,
}

impl App {
    fn new(dataset: Dataset, filters: FilterState) -> Self {
        let run = run_series(&dataset, &filters);
        let status = if dataset.has_source(&filters.source) {
            format!("{} rows", run.series.len())
        } else {
            format!("Source '{}' not in dataset; pick one with ←/→.", filters.source)
        };
        Self {
            dataset,
            filters,
            selected_field: Field::Year,
            status,
            run,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = Field::Year,
            KeyCode::Down => self.selected_field = Field::Source,
            KeyCode::Left => self.adjust_field(self.selected_field, -1),
            KeyCode::Right => self.adjust_field(self.selected_field, 1),
            KeyCode::Char('y') => self.adjust_field(Field::Year, 1),
            KeyCode::Char('s') => self.adjust_field(Field::Source, 1),
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, field: Field, delta: i32) {
        match field {
            Field::Year => {
                self.filters.year = if delta >= 0 {
                    self.filters.year.next()
                } else {
                    self.filters.year.prev()
                };
            }
            Field::Source => {
                let Some(source) = cycle_source(&self.dataset.sources, &self.filters.source, delta) else {
                    self.status = "No sources in dataset.".to_string();
                    return;
                };
                self.filters.source = source;
            }
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.run = run_series(&self.dataset, &self.filters);
        self.status = format!(
            "year: {} | source: {} | {} rows",
            self.filters.year.display_name(),
            self.filters.source,
            self.run.series.len()
        );
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));

        let mut legend = Vec::new();
        for party in Party::ALL {
            let (r, g, b) = terminal_rgb(party);
            legend.push(Span::styled("━━ ", Style::default().fg(Color::Rgb(r, g, b))));
            legend.push(Span::raw(format!("{}  ", party.display_name())));
        }
        lines.push(Line::from(legend));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(0)])
            .split(area);

        self.draw_selectors(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!("Year: {}", self.filters.year.display_name())),
            ListItem::new(format!("Source: {}", self.filters.source)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let selected = match self.selected_field {
            Field::Year => 0,
            Field::Source => 1,
        };
        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Party popularity").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.run.series.is_empty() {
            let msg = Paragraph::new("No polls for this selection.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let (lines, x_bounds, y_bounds) = chart_lines(&self.run);
        let (chart_rect, axis_row) = chart_layout(inner);

        let widget = PollsPlottersChart {
            lines: &lines,
            x_bounds,
            y_bounds,
            y_label: "%",
            fmt_y: format_percent,
        };
        frame.render_widget(widget, chart_rect);

        if let Some(axis_row) = axis_row {
            draw_category_labels(frame, chart_rect, axis_row, &self.run.series.categories);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  y year  s source  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled(CREDITS, Style::default().fg(Color::DarkGray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Next/previous source in dataset order.
///
/// An unknown current source jumps to the first (forward) or last (backward).
fn cycle_source(sources: &[String], current: &str, delta: i32) -> Option<String> {
    if sources.is_empty() {
        return None;
    }
    let n = sources.len();
    let idx = match sources.iter().position(|s| s == current) {
        Some(i) if delta >= 0 => (i + 1) % n,
        Some(i) => (i + n - 1) % n,
        None if delta >= 0 => 0,
        None => n - 1,
    };
    Some(sources[idx].clone())
}

/// Party colour adjusted for a dark terminal background.
fn terminal_rgb(party: Party) -> (u8, u8, u8) {
    match party.rgb() {
        (0, 0, 0) => (200, 200, 200),
        rgb => rgb,
    }
}

/// Build per-party line segments plus chart bounds.
///
/// X is the record position; absent values split a line into segments.
fn chart_lines(run: &RunOutput) -> (Vec<PartyLine>, [f64; 2], [f64; 2]) {
    let n = run.series.len();
    let x_bounds = [0.0, (n.max(2) - 1) as f64];

    let mut lines = Vec::with_capacity(run.series.series.len());
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for s in &run.series.series {
        let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for (idx, value) in s.values.iter().enumerate() {
            match value.filter(|v| v.is_finite()) {
                Some(v) => {
                    y_min = y_min.min(v);
                    y_max = y_max.max(v);
                    current.push((idx as f64, v));
                }
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        lines.push(PartyLine {
            color: terminal_rgb(s.party),
            segments,
        });
    }

    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 50.0;
    }
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [(y_min - pad).max(0.0), y_max + pad];

    (lines, x_bounds, y_bounds)
}

/// Left offset of the plotting area inside the chart widget (margin + y labels).
const PLOT_LEFT: u16 = 7;
/// Right margin of the plotting area inside the chart widget.
const PLOT_RIGHT: u16 = 1;

/// Split the inner chart area into the Plotters area and the year-label row.
fn chart_layout(inner: Rect) -> (Rect, Option<Rect>) {
    if inner.height <= 9 {
        return (inner, None);
    }

    let chart = Rect {
        height: inner.height - 1,
        ..inner
    };
    let axis_row = Rect {
        x: inner.x,
        y: inner.y + inner.height - 1,
        width: inner.width,
        height: 1,
    };
    (chart, Some(axis_row))
}

/// Column offsets (relative to the plot start) for non-empty category labels.
///
/// Labels that would overlap the previous one are skipped.
fn category_positions(categories: &[String], plot_width: u16) -> Vec<(u16, &str)> {
    let n = categories.len();
    let mut out = Vec::new();
    if plot_width == 0 {
        return out;
    }
    let mut next_free = 0u16;
    for (idx, label) in categories.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        let u = if n < 2 { 0.0 } else { idx as f64 / (n as f64 - 1.0) };
        let center = ((plot_width - 1) as f64 * u).round() as u16;
        let len = label.chars().count() as u16;
        let start = center.saturating_sub(len / 2).min(plot_width.saturating_sub(len));
        if start < next_free {
            continue;
        }
        out.push((start, label.as_str()));
        next_free = start + len + 1;
    }
    out
}

fn draw_category_labels(frame: &mut ratatui::Frame<'_>, chart: Rect, row: Rect, categories: &[String]) {
    let plot_x = chart.x + PLOT_LEFT;
    let plot_width = chart.width.saturating_sub(PLOT_LEFT + PLOT_RIGHT);
    let style = Style::default().fg(Color::Gray);

    for (offset, label) in category_positions(categories, plot_width) {
        let rect = Rect {
            x: plot_x + offset,
            y: row.y,
            width: label.chars().count() as u16,
            height: 1,
        };
        frame.render_widget(Paragraph::new(label).style(style), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetLocation;
    use crate::domain::{PartyValues, RawPollRecord, YearFilter};

    fn dataset() -> Dataset {
        let rows: Vec<RawPollRecord> = [
            ("01-06-2020", "insa", Some(10.0)),
            ("15-12-2020", "insa", None),
            ("03-03-2021", "insa", Some(11.0)),
            ("05-06-2020", "forsa", Some(9.0)),
        ]
        .iter()
        .map(|&(date, source, afd)| RawPollRecord {
            date: date.to_string(),
            source: source.to_string(),
            values: PartyValues {
                afd,
                spd: Some(20.0),
                ..PartyValues::default()
            },
        })
        .collect();
        Dataset::from_raw(DatasetLocation::Bundled, &rows).unwrap()
    }

    #[test]
    fn keys_change_filters_and_recompute() {
        let mut app = App::new(dataset(), FilterState::default());
        assert_eq!(app.run.series.len(), 3);

        assert!(!app.handle_key(KeyCode::Right));
        assert_eq!(app.filters.year, YearFilter::Year(2020));
        assert_eq!(app.run.series.len(), 2);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.filters.source, "forsa");
        assert_eq!(app.run.series.len(), 1);

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn source_cycling_wraps_and_recovers_from_unknown() {
        let sources = vec!["insa".to_string(), "forsa".to_string()];
        assert_eq!(cycle_source(&sources, "insa", 1).as_deref(), Some("forsa"));
        assert_eq!(cycle_source(&sources, "forsa", 1).as_deref(), Some("insa"));
        assert_eq!(cycle_source(&sources, "insa", -1).as_deref(), Some("forsa"));
        assert_eq!(cycle_source(&sources, "kantar", 1).as_deref(), Some("insa"));
        assert_eq!(cycle_source(&sources, "kantar", -1).as_deref(), Some("forsa"));
        assert_eq!(cycle_source(&[], "insa", 1), None);
    }

    #[test]
    fn absent_values_split_lines() {
        let app = App::new(dataset(), FilterState::default());
        let (lines, x_bounds, y_bounds) = chart_lines(&app.run);
        assert_eq!(lines.len(), 6);
        // AfD: 10, gap, 11
        assert_eq!(lines[0].segments, vec![vec![(0.0, 10.0)], vec![(2.0, 11.0)]]);
        // SPD continuous.
        assert_eq!(lines[5].segments.len(), 1);
        assert_eq!(x_bounds, [0.0, 2.0]);
        assert!(y_bounds[0] < 10.0 && y_bounds[1] > 20.0);
        // Union is drawn light on dark backgrounds.
        assert_eq!(lines[1].color, (200, 200, 200));
    }

    #[test]
    fn category_labels_skip_overlaps() {
        let cats: Vec<String> = ["2020", "2020", "", "", "", "", "", "", "", "2021"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let pos = category_positions(&cats, 19);
        assert_eq!(pos, vec![(0, "2020"), (15, "2021")]);
    }
}
