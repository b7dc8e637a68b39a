//! Print-move coordinate extraction
//!
//! A single linear pass over the input collecting the first, last,
//! average, min, and max coordinates of qualifying print moves. The Z
//! axis needs special handling: most print moves omit Z, so the pass
//! carries the most recently seen Z value forward ("active Z") and
//! records that alongside the first and last print moves.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use printloop_core::{parse_g1_line, Result};

/// Coordinate statistics gathered from one pass over a print file
///
/// Coordinates never observed stay at `0.0`. `first_print_found` records
/// whether any qualifying print move appeared after the init marker; the
/// transformer decides whether its absence is an error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrintStats {
    pub first_x: f64,
    pub first_y: f64,
    pub first_z: f64,
    pub last_x: f64,
    pub last_y: f64,
    pub last_z: f64,
    pub average_x: f64,
    pub average_y: f64,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub first_print_found: bool,
}

/// Scan `path` once and gather print-move statistics.
///
/// First-print coordinates are only recorded for moves strictly after
/// `end_init_last_line`; last/average/min/max cover qualifying moves
/// anywhere in the file, X and Y tracked independently.
pub fn extract_print_stats(path: &Path, end_init_last_line: u64) -> Result<PrintStats> {
    let reader = BufReader::new(File::open(path)?);

    let mut first_x: Option<f64> = None;
    let mut first_y: Option<f64> = None;
    let mut first_z: Option<f64> = None;
    let mut last_x: Option<f64> = None;
    let mut last_y: Option<f64> = None;
    let mut last_z: Option<f64> = None;
    let mut active_z: Option<f64> = None;
    let mut first_print_found = false;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count_x = 0u64;
    let mut count_y = 0u64;
    let mut min_x: Option<f64> = None;
    let mut min_y: Option<f64> = None;
    let mut max_x: Option<f64> = None;
    let mut max_y: Option<f64> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(coords) = parse_g1_line(&line) else {
            continue;
        };

        // Any G1 carrying a Z updates the active layer height.
        if coords.z.is_some() {
            active_z = coords.z;
        }

        if !coords.is_print_move() {
            continue;
        }

        if !first_print_found && line_no as u64 > end_init_last_line {
            first_x = coords.x;
            first_y = coords.y;
            first_z = active_z;
            first_print_found = true;
        }

        if coords.x.is_some() {
            last_x = coords.x;
        }
        if coords.y.is_some() {
            last_y = coords.y;
        }
        if active_z.is_some() {
            last_z = active_z;
        }

        if let Some(x) = coords.x {
            sum_x += x;
            count_x += 1;
            min_x = Some(min_x.map_or(x, |m| m.min(x)));
            max_x = Some(max_x.map_or(x, |m| m.max(x)));
        }
        if let Some(y) = coords.y {
            sum_y += y;
            count_y += 1;
            min_y = Some(min_y.map_or(y, |m| m.min(y)));
            max_y = Some(max_y.map_or(y, |m| m.max(y)));
        }
    }

    Ok(PrintStats {
        first_x: first_x.unwrap_or_default(),
        first_y: first_y.unwrap_or_default(),
        first_z: first_z.unwrap_or_default(),
        last_x: last_x.unwrap_or_default(),
        last_y: last_y.unwrap_or_default(),
        last_z: last_z.unwrap_or_default(),
        average_x: if count_x > 0 {
            sum_x / count_x as f64
        } else {
            0.0
        },
        average_y: if count_y > 0 {
            sum_y / count_y as f64
        } else {
            0.0
        },
        min_x: min_x.unwrap_or_default(),
        min_y: min_y.unwrap_or_default(),
        max_x: max_x.unwrap_or_default(),
        max_y: max_y.unwrap_or_default(),
        first_print_found,
    })
}
