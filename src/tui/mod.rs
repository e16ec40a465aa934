//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing an indicator, a sub-category
//! and a date range, then renders the line chart, the raw data table and the
//! summary statistics. Every settings change refetches the series.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::app::pipeline::{Query, RunOutput, run_query};
use crate::catalog::{Indicator, Resolved, cycle_category};
use crate::config::Settings;
use crate::data::{BcbClient, format_bcb_date};
use crate::error::AppError;
use crate::plot::{chart_bounds, date_from_day_number, line_segments};
use crate::report::{NO_DATA_NOTICE, fmt_value};

mod plotters_chart;

use plotters_chart::SeriesChart;

const FIELD_COUNT: usize = 4;
const TABLE_PAGE: usize = 10;

/// Start the TUI with an initial query.
pub fn run(settings: &Settings, query: Query) -> Result<(), AppError> {
    let client = BcbClient::new(settings)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client, query);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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
enum DateField {
    Start,
    End,
}

struct App {
    client: BcbClient,
    selection: Resolved,
    start: NaiveDate,
    end: NaiveDate,
    selected_field: usize,
    editing: Option<DateField>,
    date_input: String,
    /// Rows hidden below the visible table window (0 = newest rows shown).
    table_offset: usize,
    /// Table rows that fit on screen, as of the last draw.
    table_visible: usize,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(client: BcbClient, query: Query) -> Self {
        let mut app = Self {
            client,
            selection: query.selection,
            start: query.start,
            end: query.end,
            selected_field: 0,
            editing: None,
            date_input: String::new(),
            table_offset: 0,
            table_visible: 0,
            status: String::new(),
            run: None,
        };
        app.refresh();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Some(field) = self.editing {
            self.handle_date_edit(field, code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                let field = match self.selected_field {
                    2 => Some(DateField::Start),
                    3 => Some(DateField::End),
                    _ => None,
                };
                if let Some(field) = field {
                    self.date_input = self.date_of(field).to_string();
                    self.editing = Some(field);
                    self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::PageUp => self.scroll_table(true),
            KeyCode::PageDown => self.scroll_table(false),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, field: DateField, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = None;
                self.apply_date_input(field);
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        let current = self.selection.indicator;
        match self.selected_field {
            0 => {
                let indicator = if delta >= 0 { current.next() } else { current.prev() };
                self.select(indicator, cycle_category(indicator, None, 0));
            }
            1 => {
                if current.category_label().is_none() {
                    self.status = format!("{} has no sub-categories.", current.display_name());
                    return;
                }
                self.select(current, cycle_category(current, self.selection.category, delta));
            }
            _ => {}
        }
    }

    fn select(&mut self, indicator: Indicator, category: Option<&str>) {
        match indicator.resolve(category) {
            Ok(selection) => {
                self.selection = selection;
                self.refresh();
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn scroll_table(&mut self, up: bool) {
        let len = self.run.as_ref().map_or(0, |r| r.table.len());
        self.table_offset = scroll_offset(self.table_offset, up, len, self.table_visible);
    }

    fn date_of(&self, field: DateField) -> NaiveDate {
        match field {
            DateField::Start => self.start,
            DateField::End => self.end,
        }
    }

    fn apply_date_input(&mut self, field: DateField) {
        let trimmed = self.date_input.trim();
        let date = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                self.status = format!("Invalid date '{trimmed}': {e}");
                return;
            }
        };
        match field {
            DateField::Start => self.start = date,
            DateField::End => self.end = date,
        }
        self.refresh();
    }

    /// Refetch the current selection. Failures land in the status line and
    /// keep the previous table on screen.
    fn refresh(&mut self) {
        let query = Query {
            selection: self.selection,
            start: self.start,
            end: self.end,
        };

        match run_query(&self.client, &query) {
            Ok(run) => {
                self.status = if run.table.is_empty() {
                    NO_DATA_NOTICE.to_string()
                } else {
                    format!(
                        "{} rows | {} window(s), {} failed",
                        run.table.len(),
                        run.table.chunks.issued,
                        run.table.chunks.failed
                    )
                };
                self.table_offset = 0;
                self.run = Some(run);
            }
            Err(err) => {
                self.status = format!("Fetch failed: {err}");
            }
        }
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
        lines.push(Line::from(vec![
            Span::styled("painel", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", self.selection.title())),
        ]));

        let series = self
            .run
            .as_ref()
            .map(|r| r.table.series.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "series: {series} | period: {} to {} | unit: {}",
                format_bcb_date(self.start),
                format_bcb_date(self.end),
                self.selection.unit(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(area);

        self.draw_chart(frame, rows[0]);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(25),
                Constraint::Percentage(40),
            ])
            .split(rows[1]);

        self.draw_settings(frame, panels[0]);
        self.draw_stats(frame, panels[1]);
        self.draw_table(frame, panels[2]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Series").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = self.run.as_ref().filter(|r| !r.table.is_empty()) else {
            let msg = if self.run.is_some() { NO_DATA_NOTICE } else { "Waiting for data..." };
            frame.render_widget(
                Paragraph::new(msg).style(Style::default().fg(Color::Yellow)),
                inner,
            );
            return;
        };

        let segments = line_segments(&run.table);
        let Some((x_bounds, y_bounds)) = chart_bounds(&segments) else {
            frame.render_widget(
                Paragraph::new("No numeric values to plot.").style(Style::default().fg(Color::Yellow)),
                inner,
            );
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SeriesChart {
            segments: &segments,
            x_bounds,
            y_bounds,
            y_label: run.selection.unit().to_string(),
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_value,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, run.selection.unit());
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let category = match (self.selection.indicator.category_label(), self.selection.category) {
            (Some(label), Some(name)) => format!("{label}: {name}"),
            _ => "Category: -".to_string(),
        };

        let date_label = |field: DateField| {
            if self.editing == Some(field) {
                format!("{}_", self.date_input)
            } else {
                self.date_of(field).to_string()
            }
        };

        let items = vec![
            ListItem::new(format!("Indicator: {}", self.selection.indicator.display_name())),
            ListItem::new(category),
            ListItem::new(format!("Start: {}", date_label(DateField::Start))),
            ListItem::new(format!("End: {}", date_label(DateField::End))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing.is_some() {
            let hint = Paragraph::new("Editing date…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Statistics").borders(Borders::ALL);
        let Some(run) = self.run.as_ref().filter(|r| !r.table.is_empty()) else {
            frame.render_widget(Paragraph::new("-").block(block), area);
            return;
        };

        let unit = run.selection.unit();
        let stat = |v: Option<f64>| match v {
            Some(v) => format!("{v:.2} {unit}"),
            None => "n/a".to_string(),
        };
        let mut lines = vec![
            Line::from(format!("Mean:    {}", stat(run.summary.mean))),
            Line::from(format!("Median:  {}", stat(run.summary.median))),
            Line::from(format!("Std dev: {}", stat(run.summary.std_dev))),
            Line::from(""),
            Line::from(format!("Rows:    {}", run.summary.rows)),
        ];
        if run.summary.missing > 0 {
            lines.push(Line::from(format!("Missing: {}", run.summary.missing)));
        }
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_table(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        // Borders + header row.
        let visible = area.height.saturating_sub(3) as usize;
        self.table_visible = visible;

        let block = Block::default().title("Data (PgUp/PgDn)").borders(Borders::ALL);
        let Some(run) = self.run.as_ref().filter(|r| !r.table.is_empty()) else {
            frame.render_widget(Paragraph::new(NO_DATA_NOTICE).block(block), area);
            return;
        };

        let (from, to) = table_window(run.table.len(), visible, self.table_offset);

        let rows = run.table.rows[from..to].iter().map(|o| {
            Row::new(vec![format_bcb_date(o.date), fmt_value(o.value)])
        });
        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(8)])
            .header(Row::new(vec!["date", "value"]).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(block);
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  Enter edit date  PgUp/PgDn scroll  r refetch  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Offset after one PgUp (`up`) or PgDn, kept within `[0, len - visible]`.
fn scroll_offset(offset: usize, up: bool, len: usize, visible: usize) -> usize {
    let max_offset = len.saturating_sub(visible);
    let offset = offset.min(max_offset);
    if up {
        offset.saturating_add(TABLE_PAGE).min(max_offset)
    } else {
        offset.saturating_sub(TABLE_PAGE)
    }
}

/// Row range `[from, to)` to display, `offset` rows up from the newest.
fn table_window(len: usize, visible: usize, offset: usize) -> (usize, usize) {
    let max_offset = len.saturating_sub(visible);
    let to = len - offset.min(max_offset);
    let from = to.saturating_sub(visible);
    (from, to)
}

fn fmt_axis_date(v: f64) -> String {
    date_from_day_number(v)
        .map(|d| d.format("%m/%Y").to_string())
        .unwrap_or_default()
}

fn fmt_axis_value(v: f64) -> String {
    format!("{v:.2}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    unit: &str,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_date(x_val);
        let label_len = label.chars().count() as u16;
        let start = x.saturating_sub(label_len / 2).max(inner.x);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len.min(inner.x + inner.width - start),
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_value(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("date")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(unit.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_window_shows_newest_rows_by_default() {
        assert_eq!(table_window(100, 10, 0), (90, 100));
        assert_eq!(table_window(100, 10, 25), (65, 75));
        // Scrolling past the top clamps to the first page.
        assert_eq!(table_window(100, 10, 500), (0, 10));
        assert_eq!(table_window(3, 10, 5), (0, 3));
    }

    #[test]
    fn scrolling_stops_at_the_oldest_page() {
        let mut offset = 0;
        for _ in 0..20 {
            offset = scroll_offset(offset, true, 100, 10);
        }
        assert_eq!(offset, 90);
        assert_eq!(scroll_offset(offset, false, 100, 10), 80);
        assert_eq!(scroll_offset(0, false, 100, 10), 0);
        // A table that fits on screen never scrolls.
        assert_eq!(scroll_offset(0, true, 5, 10), 0);
    }

    #[test]
    fn axis_dates_are_month_year() {
        let date = NaiveDate::from_ymd_opt(2019, 7, 15).unwrap();
        assert_eq!(fmt_axis_date(crate::plot::day_number(date)), "07/2019");
    }
}
