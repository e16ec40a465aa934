//! ASCII line chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The x axis is the calendar date, the y axis the observation value. A
//! missing value breaks the line; isolated points are drawn as `o`.

use crate::data::format_bcb_date;
use crate::domain::SeriesTable;
use crate::plot::{chart_bounds, line_segments};

/// Render a line chart of the table's values.
pub fn render_ascii_plot(table: &SeriesTable, unit: &str, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let segments = line_segments(table);
    let Some(([x_min, x_max], [y_min, y_max])) = chart_bounds(&segments) else {
        return "Plot: nothing to draw.\n".to_string();
    };

    let mut grid = vec![vec![' '; width]; height];
    for segment in &segments {
        draw_segment(&mut grid, segment, x_min, x_max, y_min, y_max);
    }

    let first = table.rows.first().map(|r| format_bcb_date(r.date)).unwrap_or_default();
    let last = table.rows.last().map(|r| format_bcb_date(r.date)).unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: date=[{first}, {last}] | y=[{y_min:.2}, {y_max:.2}] {unit}\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_segment(grid: &mut [Vec<char>], segment: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    if let [(x, y)] = segment {
        let col = map_x(*x, x_min, x_max, width);
        let row = map_y(*y, y_min, y_max, height);
        grid[row][col] = 'o';
        return;
    }

    let mut prev = None;
    for &(x, y) in segment {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '*');
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Observation, SeriesId};

    fn table(values: &[Option<f64>]) -> SeriesTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut table = SeriesTable::empty(SeriesId::new(1).unwrap(), start, start);
        table.rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(start + chrono::Duration::days(i as i64), *v))
            .collect();
        table
    }

    #[test]
    fn rising_line_goes_bottom_left_to_top_right() {
        let plot = render_ascii_plot(&table(&[Some(1.0), Some(2.0), Some(3.0)]), "R$", 10, 5);
        let lines: Vec<&str> = plot.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Plot: date=[01/01/2024, 03/01/2024]"));
        assert!(lines[0].ends_with("R$"));
        assert!(lines[5].starts_with('*'), "bottom row: {:?}", lines[5]);
        assert!(lines[1].ends_with('*'), "top row: {:?}", lines[1]);
    }

    #[test]
    fn missing_value_breaks_the_line() {
        let plot = render_ascii_plot(&table(&[Some(1.0), None, Some(1.0)]), "%", 11, 5);
        let grid: String = plot.lines().skip(1).collect();
        // Two isolated points, no connecting stroke.
        assert_eq!(grid.matches('o').count(), 2);
        assert_eq!(grid.matches('*').count(), 0);
    }

    #[test]
    fn nothing_to_draw() {
        assert_eq!(render_ascii_plot(&table(&[None, None]), "%", 20, 5), "Plot: nothing to draw.\n");
    }
}
