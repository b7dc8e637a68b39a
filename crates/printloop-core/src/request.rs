//! Transformation request record

use serde::Serialize;

/// A file processing request
///
/// Carries the caller's parameters for one transformation. The record is
/// serialized into the template context under `Request`, so field names
/// are exposed to templates in PascalCase (`Request.Iterations`,
/// `Request.WaitBedCooldownTemp`, ...).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingRequest {
    /// Name of the file being processed (opaque to the engine)
    pub file_name: String,
    /// How many copies of the print body to emit (must be positive)
    pub iterations: i64,
    /// Bed temperature to cool down to before ejecting, in degrees C
    pub wait_bed_cooldown_temp: i64,
    /// Extra minutes to wait before ejecting
    pub wait_min: i64,
    /// Extra filament to extrude before restarting, in mm
    pub extra_extrude: f64,
    /// Printer name, resolved against the catalog
    pub printer: String,
    /// Optional user-supplied definition source; overrides the catalog lookup
    #[serde(skip)]
    pub custom_template: Option<String>,
}

impl Default for ProcessingRequest {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            iterations: 1,
            wait_bed_cooldown_temp: 0,
            wait_min: 0,
            extra_extrude: 0.0,
            printer: String::new(),
            custom_template: None,
        }
    }
}
