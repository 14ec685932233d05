//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each party is drawn as a line of its glyph (`A`, `U`, `F`, `G`, `L`, `S`).
//! Absent values break the line. Parties drawn earlier win where lines cross.

use crate::chart::format_percent;
use crate::domain::{DerivedSeries, Party};

/// Render derived series as a text plot with a sparse year axis and a legend.
pub fn render_ascii_plot(derived: &DerivedSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    if derived.is_empty() {
        return "Plot: no data for the selected filters\n".to_string();
    }

    let n = derived.len();
    let (y_min, y_max) = y_range(derived).unwrap_or((0.0, 100.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for s in &derived.series {
        draw_party(&mut grid, &s.values, s.party.glyph(), n, y_min, y_max);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: n={n} | y=[{}, {}]\n",
        format_percent(y_min),
        format_percent(y_max)
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&axis_row(&derived.categories, width));
    out.push('\n');
    out.push_str(&legend());
    out.push('\n');

    out
}

fn legend() -> String {
    Party::ALL
        .iter()
        .map(|p| format!("{}={}", p.glyph(), p.display_name()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Place non-empty category labels under their columns, skipping overlaps.
fn axis_row(categories: &[String], width: usize) -> String {
    let mut row = vec![' '; width];
    let mut next_free = 0usize;
    for (idx, label) in categories.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        let len = label.chars().count();
        if len > width {
            continue;
        }
        // Labels near the right edge shift left to stay visible.
        let x = map_x(idx, categories.len(), width).min(width - len);
        if x < next_free {
            continue;
        }
        for (offset, ch) in label.chars().enumerate() {
            row[x + offset] = ch;
        }
        next_free = x + len + 1;
    }
    row.into_iter().collect::<String>().trim_end().to_string()
}

fn y_range(derived: &DerivedSeries) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for s in &derived.series {
        for v in s.values.iter().flatten() {
            if v.is_finite() {
                min_y = min_y.min(*v);
                max_y = max_y.max(*v);
            }
        }
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(idx: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = idx as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_party(grid: &mut [Vec<char>], values: &[Option<f64>], ch: char, n: usize, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev: Option<(usize, usize)> = None;
    for (idx, value) in values.iter().enumerate() {
        let Some(y) = value.filter(|v| v.is_finite()) else {
            prev = None;
            continue;
        };
        let x = map_x(idx, n, width);
        let yy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, yy, ch),
            None => {
                if grid[yy][x] == ' ' {
                    grid[yy][x] = ch;
                }
            }
        }
        prev = Some((x, yy));
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
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
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
