//! Ratatui-based terminal UI.
//!
//! The TUI loads the dataset once at startup, then offers a region selector;
//! every selection change triggers exactly one recompute through the dashboard
//! controller and redraws the sales line chart.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::Dashboard;
use crate::domain::{AggregatedSeries, LoadConfig, LoadSummary, RegionFilter};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{ChartLine, SalesPlottersChart};

/// Start the TUI.
pub fn run(config: &LoadConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config.clone())?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
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

struct App {
    config: LoadConfig,
    dashboard: Dashboard,
    summary: LoadSummary,
    /// Selector entries: `all` plus every region observed in the dataset.
    selections: Vec<RegionFilter>,
    selected: usize,
    /// Overlay one line per region when `all` is selected.
    breakdown: bool,
    series: AggregatedSeries,
    /// Populated only while the breakdown overlay is active.
    regional: Option<AggregatedSeries>,
    status: String,
}

impl App {
    fn new(config: LoadConfig) -> Result<Self, AppError> {
        let (dashboard, summary) = Dashboard::initialize(&config)?;
        let selections = selector_entries(&dashboard);
        let series = dashboard.on_region_selected(&RegionFilter::All);

        let status = if summary.rows_dropped > 0 {
            format!(
                "Loaded {} rows ({} dropped).",
                summary.rows_loaded, summary.rows_dropped
            )
        } else {
            format!("Loaded {} rows.", summary.rows_loaded)
        };

        Ok(Self {
            config,
            dashboard,
            summary,
            selections,
            selected: 0,
            breakdown: false,
            series,
            regional: None,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
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
                    if self.handle_key(key.code)? {
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

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Left => self.select_region(-1),
            KeyCode::Down | KeyCode::Right => self.select_region(1),
            KeyCode::Char('g') => {
                self.breakdown = !self.breakdown;
                self.refresh_series();
                self.status = if self.breakdown {
                    "Per-region overlay on (applies to `all`).".to_string()
                } else {
                    "Per-region overlay off.".to_string()
                };
            }
            KeyCode::Char('r') => self.reload()?,
            _ => {}
        }

        Ok(false)
    }

    /// Move the selector and trigger exactly one recompute.
    fn select_region(&mut self, delta: i32) {
        let n = self.selections.len() as i32;
        self.selected = ((self.selected as i32 + delta).rem_euclid(n)) as usize;
        self.refresh_series();
        self.status = format!("region: {}", self.current_selection());
    }

    fn current_selection(&self) -> &RegionFilter {
        &self.selections[self.selected]
    }

    fn refresh_series(&mut self) {
        let selection = self.selections[self.selected].clone();
        self.series = self.dashboard.on_region_selected(&selection);
        self.regional = if self.breakdown && selection == RegionFilter::All {
            Some(self.dashboard.regional_breakdown())
        } else {
            None
        };
    }

    /// Re-read the source files and rebuild the dataset from scratch.
    fn reload(&mut self) -> Result<(), AppError> {
        match Dashboard::initialize(&self.config) {
            Ok((dashboard, summary)) => {
                self.dashboard = dashboard;
                self.summary = summary;
                self.selections = selector_entries(&self.dashboard);
                self.selected = self.selected.min(self.selections.len() - 1);
                self.refresh_series();
                self.status = format!("Reloaded {} rows.", self.summary.rows_loaded);
            }
            Err(err) => {
                // Keep the previous dataset on a failed reload; the operator
                // sees the error in the status line.
                self.status = format!("Reload failed: {err}");
            }
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let selector_height = (self.selections.len() as u16).saturating_add(2).min(10);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(selector_height),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_selector(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("morsel", Style::default().fg(Color::Cyan)),
            Span::raw(" — daily sales trends"),
        ]));

        let source = if self.config.demo {
            format!("demo (seed={})", self.config.demo_seed)
        } else {
            format!(
                "{} file(s) under '{}'",
                self.summary.n_files,
                self.config.data_dir.display()
            )
        };
        lines.push(Line::from(Span::styled(
            format!(
                "product: {} | source: {source} | rows: {} (dropped {})",
                self.dashboard.target_product(),
                self.summary.rows_loaded,
                self.summary.rows_dropped,
            ),
            Style::default().fg(Color::Gray),
        )));

        let dates = match (self.series.date_min, self.series.date_max) {
            (Some(min), Some(max)) => format!("{min} to {max}"),
            _ => "no data".to_string(),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "region: {} | points: {} | total sales: {:.2} | dates: {dates}",
                self.current_selection(),
                self.series.n_points(),
                self.series.total_sales,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.series.is_empty() {
            // Empty-state view: valid outcome, not an error.
            let msg = Paragraph::new(format!(
                "No data for product '{}' with region '{}'.",
                self.dashboard.target_product(),
                self.current_selection()
            ))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let (lines, x_bounds, y_bounds) = self.chart_lines();
        let widget = SalesPlottersChart {
            lines: &lines,
            x_bounds,
            y_bounds,
            x_label: "date",
            y_label: "sales ($)",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_sales,
        };
        frame.render_widget(widget, inner);
    }

    /// Build chart series for Plotters.
    ///
    /// One line per region when the breakdown overlay is active, otherwise a
    /// single line for the current selection.
    fn chart_lines(&self) -> (Vec<ChartLine>, [f64; 2], [f64; 2]) {
        let mut lines: Vec<ChartLine> = Vec::new();

        match &self.regional {
            Some(regional) => {
                // Points arrive sorted by (date, region); split them per region.
                let mut per_region: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
                for point in &regional.points {
                    let name = point
                        .region
                        .as_ref()
                        .map(|r| r.as_str().to_string())
                        .unwrap_or_default();
                    let idx = match per_region.iter().position(|(n, _)| *n == name) {
                        Some(idx) => idx,
                        None => {
                            per_region.push((name, Vec::new()));
                            per_region.len() - 1
                        }
                    };
                    per_region[idx].1.push((epoch_days(point.date), point.sales));
                }
                for (idx, (_, points)) in per_region.into_iter().enumerate() {
                    lines.push(ChartLine {
                        color: region_color(idx),
                        points,
                    });
                }
            }
            None => {
                let points = self
                    .series
                    .points
                    .iter()
                    .map(|p| (epoch_days(p.date), p.sales))
                    .collect();
                lines.push(ChartLine {
                    color: RGBColor(0, 255, 255),
                    points,
                });
            }
        }

        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for line in &lines {
            for &(x, y) in &line.points {
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }

        if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
            x_max = x_min + 1.0;
        }
        if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
            y_min = 0.0;
            y_max = 1.0;
        }

        let pad = ((y_max - y_min).abs() * 0.05).max(1e-9);
        (
            lines,
            [x_min, x_max],
            [(y_min - pad).max(0.0), y_max + pad],
        )
    }

    fn draw_selector(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .selections
            .iter()
            .map(|s| ListItem::new(s.to_string()))
            .collect();

        let overlay = if self.breakdown { " [overlay]" } else { "" };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("Region{overlay}"))
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ region  g overlay  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(
                &self.status,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn selector_entries(dashboard: &Dashboard) -> Vec<RegionFilter> {
    let mut entries = vec![RegionFilter::All];
    entries.extend(dashboard.regions().into_iter().map(RegionFilter::Named));
    entries
}

fn epoch_days(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%d %b %y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_axis_sales(v: f64) -> String {
    format!("{v:.0}")
}

fn region_color(idx: usize) -> RGBColor {
    // High-contrast palette for terminal rendering; cycles past four regions.
    const PALETTE: [RGBColor; 4] = [
        RGBColor(0, 255, 255),
        RGBColor(0, 255, 0),
        RGBColor(255, 0, 255),
        RGBColor(255, 255, 0),
    ];
    PALETTE[idx % PALETTE.len()]
}
