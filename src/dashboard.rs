//! Interactive cost dashboard
//!
//! Provides a ratatui-based dashboard showing:
//! - Current Lambda parameters, adjustable live from the keyboard
//! - A line chart of EC2 daily cost vs cumulative Lambda cost
//! - The comparison table for the filtered instance types
//!
//! Keyboard adjustment replaces the sliders a GUI would have: arrow keys
//! select and step the parameters, '/' edits the instance-type filter.

use crate::chart::build_chart;
use crate::compare::{build_comparison, LambdaParams};
use crate::config::Config;
use crate::ec2::PriceCatalog;
use crate::error::Result;
use crate::format::{format_count, format_duration_ms, format_size, format_usd};
use crate::validation::{
    MAX_COMPUTE_TIME_MS, MAX_MEMORY_MB, MAX_STORAGE_MB, MIN_COMPUTE_TIME_MS, MIN_MEMORY_MB,
    MIN_STORAGE_MB,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const MEMORY_STEP_MB: f64 = 128.0;
const STORAGE_STEP_MB: f64 = 128.0;
const DURATION_STEP_MS: f64 = 100.0;

// More lines than this and a terminal chart becomes unreadable
const CHART_SERIES_LIMIT: usize = 6;
const TABLE_ROW_LIMIT: usize = 10;

const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
    Color::White,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Memory,
    Storage,
    Duration,
    Instances,
}

const FIELDS: [Field; 4] = [
    Field::Memory,
    Field::Storage,
    Field::Duration,
    Field::Instances,
];

struct DashboardState {
    params: LambdaParams,
    num_instances: f64,
    filter: String,
    selected: usize,
    editing_filter: bool,
}

impl DashboardState {
    fn from_config(config: &Config) -> Self {
        Self {
            params: LambdaParams::from_config(&config.lambda),
            num_instances: config.ec2.num_instances as f64,
            filter: config.ec2.filter.clone(),
            selected: 0,
            editing_filter: false,
        }
    }

    fn adjust_selected(&mut self, up: bool) {
        match FIELDS[self.selected] {
            Field::Memory => self.params.memory_size_mb = step_memory(self.params.memory_size_mb, up),
            Field::Storage => self.params.storage_mb = step_storage(self.params.storage_mb, up),
            Field::Duration => {
                self.params.compute_time_ms = step_duration(self.params.compute_time_ms, up)
            }
            Field::Instances => self.num_instances = step_instances(self.num_instances, up),
        }
    }
}

fn step_clamped(current: f64, step: f64, up: bool, min: f64, max: f64) -> f64 {
    let next = if up { current + step } else { current - step };
    next.max(min).min(max)
}

fn step_memory(current: f64, up: bool) -> f64 {
    step_clamped(
        current,
        MEMORY_STEP_MB,
        up,
        MIN_MEMORY_MB as f64,
        MAX_MEMORY_MB as f64,
    )
}

fn step_storage(current: f64, up: bool) -> f64 {
    step_clamped(
        current,
        STORAGE_STEP_MB,
        up,
        MIN_STORAGE_MB as f64,
        MAX_STORAGE_MB as f64,
    )
}

fn step_duration(current: f64, up: bool) -> f64 {
    step_clamped(
        current,
        DURATION_STEP_MS,
        up,
        MIN_COMPUTE_TIME_MS as f64,
        MAX_COMPUTE_TIME_MS as f64,
    )
}

fn step_instances(current: f64, up: bool) -> f64 {
    let next = if up { current + 1.0 } else { current - 1.0 };
    next.max(0.0)
}

/// Run the interactive dashboard until the user quits
pub fn run_dashboard(config: &Config, catalog: &PriceCatalog) -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut state = DashboardState::from_config(config);

    loop {
        terminal.draw(|f| render_dashboard(f, &state, catalog))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if state.editing_filter {
                    match key.code {
                        KeyCode::Enter | KeyCode::Esc => state.editing_filter = false,
                        KeyCode::Backspace => {
                            state.filter.pop();
                        }
                        KeyCode::Char(c) => state.filter.push(c),
                        _ => {}
                    }
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('h') | KeyCode::Left => {
                        state.selected = state.selected.saturating_sub(1);
                    }
                    KeyCode::Char('l') | KeyCode::Right => {
                        state.selected = (state.selected + 1).min(FIELDS.len() - 1);
                    }
                    KeyCode::Char('k') | KeyCode::Up => state.adjust_selected(true),
                    KeyCode::Char('j') | KeyCode::Down => state.adjust_selected(false),
                    KeyCode::Char('/') => state.editing_filter = true,
                    KeyCode::Char('r') => state = DashboardState::from_config(config),
                    _ => {}
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render_dashboard(f: &mut Frame, state: &DashboardState, catalog: &PriceCatalog) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(TABLE_ROW_LIMIT as u16 + 3),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_params(f, chunks[0], state);
    render_chart(f, chunks[1], state, catalog);
    render_table(f, chunks[2], state, catalog);
    render_help(f, chunks[3]);
}

fn field_span(label: &str, value: String, selected: bool) -> Vec<Span<'static>> {
    let value_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    vec![
        Span::raw(format!("{}: ", label)),
        Span::styled(value, value_style),
        Span::raw("  "),
    ]
}

fn render_params(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut spans = Vec::new();
    spans.extend(field_span(
        "Memory",
        format_size(state.params.memory_size_mb),
        FIELDS[state.selected] == Field::Memory,
    ));
    spans.extend(field_span(
        "Storage",
        format_size(state.params.storage_mb),
        FIELDS[state.selected] == Field::Storage,
    ));
    spans.extend(field_span(
        "Duration",
        format_duration_ms(state.params.compute_time_ms),
        FIELDS[state.selected] == Field::Duration,
    ));
    spans.extend(field_span(
        "Instances",
        format!("{}", state.num_instances),
        FIELDS[state.selected] == Field::Instances,
    ));

    let filter_style = if state.editing_filter {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let filter_display = if state.editing_filter {
        format!("\"{}_\"", state.filter)
    } else {
        format!("\"{}\"", state.filter)
    };
    let filter_line = Line::from(vec![
        Span::raw("Filter: "),
        Span::styled(filter_display, filter_style),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(spans), filter_line]).block(
        Block::default()
            .borders(Borders::ALL)
            .title("costctl - EC2 vs Lambda"),
    );
    f.render_widget(paragraph, area);
}

fn render_chart(f: &mut Frame, area: Rect, state: &DashboardState, catalog: &PriceCatalog) {
    let chart_data = build_chart(
        catalog,
        &state.filter,
        CHART_SERIES_LIMIT,
        &state.params,
        state.num_instances,
    );

    let point_sets: Vec<(String, Vec<(f64, f64)>)> = chart_data
        .series
        .iter()
        .map(|series| {
            let points = chart_data
                .labels
                .iter()
                .cloned()
                .zip(series.data.iter().cloned())
                .collect();
            (series.label.clone(), points)
        })
        .collect();

    let lambda_index = point_sets.len().saturating_sub(1);
    let datasets: Vec<Dataset> = point_sets
        .iter()
        .enumerate()
        .map(|(i, (label, points))| {
            let style = if i == lambda_index {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()])
            };
            Dataset::default()
                .name(label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(points)
        })
        .collect();

    let x_max = chart_data.labels.last().copied().unwrap_or(0.0).max(1.0);
    let y_max = point_sets
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, y)| *y))
        .filter(|y| y.is_finite())
        .fold(0.0_f64, f64::max)
        .max(0.01)
        * 1.05;

    let x_labels = vec![
        Span::raw("0"),
        Span::raw(format_count(x_max / 2.0)),
        Span::raw(format_count(x_max)),
    ];
    let y_labels = vec![
        Span::raw("$0"),
        Span::raw(format_usd(y_max / 2.0)),
        Span::raw(format_usd(y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Cost per day (USD) vs invocations"),
        )
        .x_axis(
            Axis::default()
                .title("invocations/day")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("USD")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame, area: Rect, state: &DashboardState, catalog: &PriceCatalog) {
    let comparison = build_comparison(
        catalog,
        &state.filter,
        TABLE_ROW_LIMIT,
        &state.params,
        state.num_instances,
    );

    if comparison.rows.is_empty() {
        let paragraph = Paragraph::new("No results")
            .block(Block::default().borders(Borders::ALL).title("Comparison"));
        f.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<Row> = comparison
        .rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.instance_type.clone()),
                Cell::from(format!("${:.4}", row.hourly_cost)),
                Cell::from(format_usd(row.daily_cost)),
                Cell::from(format_usd(row.monthly_cost)),
                Cell::from(format_count(row.lambda_invocations)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Min(18),
    ];
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title("Comparison"))
        .header(
            Row::new(vec!["Type", "Hourly", "Daily", "Monthly", "Invocations/day"]).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        );

    f.render_widget(table, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        "←/→ select  ↑/↓ adjust  / filter  r reset  q quit",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_memory_clamps_to_range() {
        assert_eq!(step_memory(128.0, false), 128.0);
        assert_eq!(step_memory(128.0, true), 256.0);
        assert_eq!(step_memory(10_240.0, true), 10_240.0);
        assert_eq!(step_memory(10_240.0, false), 10_112.0);
    }

    #[test]
    fn test_step_storage_clamps_to_range() {
        assert_eq!(step_storage(512.0, false), 512.0);
        assert_eq!(step_storage(512.0, true), 640.0);
        assert_eq!(step_storage(10_240.0, true), 10_240.0);
    }

    #[test]
    fn test_step_duration_clamps_to_range() {
        assert_eq!(step_duration(100.0, false), 100.0);
        assert_eq!(step_duration(100.0, true), 200.0);
        assert_eq!(step_duration(900_000.0, true), 900_000.0);
    }

    #[test]
    fn test_step_instances_never_negative() {
        assert_eq!(step_instances(0.0, false), 0.0);
        assert_eq!(step_instances(0.0, true), 1.0);
        assert_eq!(step_instances(5.0, false), 4.0);
    }

    #[test]
    fn test_adjust_selected_touches_only_selected_field() {
        let config = Config::default();
        let mut state = DashboardState::from_config(&config);
        state.selected = 0;
        state.adjust_selected(true);
        assert_eq!(state.params.memory_size_mb, 256.0);
        assert_eq!(state.params.storage_mb, 512.0);
        assert_eq!(state.params.compute_time_ms, 200.0);
        assert_eq!(state.num_instances, 1.0);
    }
}
