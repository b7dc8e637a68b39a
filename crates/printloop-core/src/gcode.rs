//! Narrow G-code line reader
//!
//! The engine interprets exactly one command: `G1` linear moves, from
//! which it extracts the optional X/Y/Z/E parameters. Everything else in
//! the input stream is opaque text that is copied through verbatim.

use std::sync::OnceLock;

use regex::Regex;

fn coordinate_regex(cell: &'static OnceLock<Regex>, letter: char) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(&format!(r"{letter}([-+]?\d*\.?\d+)")).expect("invalid regex pattern")
    })
}

fn x_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    coordinate_regex(&RE, 'X')
}

fn y_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    coordinate_regex(&RE, 'Y')
}

fn z_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    coordinate_regex(&RE, 'Z')
}

fn e_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    coordinate_regex(&RE, 'E')
}

/// Coordinates parsed from a single `G1` line
///
/// Each axis word is independently optional; a move that omits an axis
/// leaves the previous machine state untouched, so absence must be
/// distinguishable from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GcodeCoordinates {
    /// X axis target, if the line carries an `X` word
    pub x: Option<f64>,
    /// Y axis target, if the line carries a `Y` word
    pub y: Option<f64>,
    /// Z axis target, if the line carries a `Z` word
    pub z: Option<f64>,
    /// Extrusion amount, if the line carries an `E` word
    pub e: Option<f64>,
}

impl GcodeCoordinates {
    /// A print move lays down material: positive extrusion combined with
    /// motion in X and/or Y.
    pub fn is_print_move(&self) -> bool {
        matches!(self.e, Some(e) if e > 0.0) && (self.x.is_some() || self.y.is_some())
    }
}

/// Parse a line as a `G1` move and extract its coordinates.
///
/// Returns `None` when the trimmed line does not start with `G1` or
/// carries none of the four axis words. Matching is case-sensitive.
pub fn parse_g1_line(line: &str) -> Option<GcodeCoordinates> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with("G1") {
        return None;
    }

    let capture = |re: &Regex| {
        re.captures(trimmed)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    };

    let coords = GcodeCoordinates {
        x: capture(x_regex()),
        y: capture(y_regex()),
        z: capture(z_regex()),
        e: capture(e_regex()),
    };

    if coords == GcodeCoordinates::default() {
        return None;
    }

    Some(coords)
}
