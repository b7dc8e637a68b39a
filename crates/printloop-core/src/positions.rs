//! Located marker ranges and extracted print statistics

use serde::Serialize;

/// The twelve coordinate-statistic fields a definition may assert on.
pub const COORDINATE_FIELDS: [&str; 12] = [
    "FirstPrintX",
    "FirstPrintY",
    "FirstPrintZ",
    "LastPrintX",
    "LastPrintY",
    "LastPrintZ",
    "AveragePrintX",
    "AveragePrintY",
    "MinPrintX",
    "MinPrintY",
    "MaxPrintX",
    "MaxPrintY",
];

/// Marker ranges and print-move statistics for one input file
///
/// Produced by the marker search and coordinate extraction passes and
/// consumed by the assertion check and the template renderer (exposed to
/// templates under `Positions`, PascalCase). Line indices are zero-based.
/// Coordinates never observed in the file default to `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarkerPositions {
    /// First line of the end-of-init marker range
    pub end_init_section_first_line: u64,
    /// Last line of the end-of-init marker range
    pub end_init_section_last_line: u64,
    /// First line of the end-of-print marker range
    pub end_print_section_first_line: u64,
    /// Last line of the end-of-print marker range
    pub end_print_section_last_line: u64,
    /// X of the first print move after the init marker
    pub first_print_x: f64,
    /// Y of the first print move after the init marker
    pub first_print_y: f64,
    /// Z active during the first print move after the init marker
    pub first_print_z: f64,
    /// X of the last print move anywhere in the file
    pub last_print_x: f64,
    /// Y of the last print move anywhere in the file
    pub last_print_y: f64,
    /// Z active during the last print move
    pub last_print_z: f64,
    /// Average X over all print moves carrying an X
    pub average_print_x: f64,
    /// Average Y over all print moves carrying a Y
    pub average_print_y: f64,
    /// Minimum X over all print moves carrying an X
    pub min_print_x: f64,
    /// Minimum Y over all print moves carrying a Y
    pub min_print_y: f64,
    /// Maximum X over all print moves carrying an X
    pub max_print_x: f64,
    /// Maximum Y over all print moves carrying a Y
    pub max_print_y: f64,
}

impl MarkerPositions {
    /// Look up a coordinate statistic by its assertion field name.
    ///
    /// Returns `None` for names outside [`COORDINATE_FIELDS`]; the caller
    /// treats that as a configuration error in the printer definition.
    pub fn coordinate(&self, field: &str) -> Option<f64> {
        match field {
            "FirstPrintX" => Some(self.first_print_x),
            "FirstPrintY" => Some(self.first_print_y),
            "FirstPrintZ" => Some(self.first_print_z),
            "LastPrintX" => Some(self.last_print_x),
            "LastPrintY" => Some(self.last_print_y),
            "LastPrintZ" => Some(self.last_print_z),
            "AveragePrintX" => Some(self.average_print_x),
            "AveragePrintY" => Some(self.average_print_y),
            "MinPrintX" => Some(self.min_print_x),
            "MinPrintY" => Some(self.min_print_y),
            "MaxPrintX" => Some(self.max_print_x),
            "MaxPrintY" => Some(self.max_print_y),
            _ => None,
        }
    }
}
