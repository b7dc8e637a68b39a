//! Embedded printer catalog
//!
//! Definitions ship inside the binary; the catalog is read-only for the
//! process lifetime and safe to share across concurrent transformations.

use printloop_core::CatalogError;
use tracing::debug;

use crate::definition::PrinterDefinition;

/// The embedded definition set, keyed by normalized printer name.
const EMBEDDED_DEFINITIONS: &[(&str, &str)] = &[
    (
        "bambu-lab-a1",
        include_str!("../printers/bambu-lab-a1.toml"),
    ),
    (
        "bambu-lab-a1-mini",
        include_str!("../printers/bambu-lab-a1-mini.toml"),
    ),
    (
        "bambu-lab-p1s",
        include_str!("../printers/bambu-lab-p1s.toml"),
    ),
    ("unit-tests", include_str!("../printers/unit-tests.toml")),
];

/// Read-only lookup over the embedded printer definitions
pub struct PrinterCatalog;

impl PrinterCatalog {
    /// Normalize a caller-supplied printer name for lookup: lowercase,
    /// spaces replaced with hyphens.
    pub fn normalize_name(name: &str) -> String {
        name.replace(' ', "-").to_lowercase()
    }

    /// A valid printer name is non-empty and restricted to letters,
    /// digits, and `-`. Checked before any storage access.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    /// Load and parse the definition for a printer name.
    ///
    /// The name is normalized and validated first; lookup failures and
    /// malformed documents surface as [`CatalogError`] values.
    pub fn load(name: &str) -> Result<PrinterDefinition, CatalogError> {
        let normalized = Self::normalize_name(name);

        if !Self::is_valid_name(&normalized) {
            return Err(CatalogError::InvalidPrinterName { name: normalized });
        }

        let source = EMBEDDED_DEFINITIONS
            .iter()
            .find(|(key, _)| *key == normalized)
            .map(|(_, source)| *source)
            .ok_or_else(|| CatalogError::PrinterNotFound {
                name: normalized.clone(),
            })?;

        debug!(printer = %normalized, "loading printer definition");
        PrinterDefinition::parse(source, &normalized)
    }

    /// Normalized names of all embedded definitions.
    pub fn names() -> Vec<&'static str> {
        EMBEDDED_DEFINITIONS.iter().map(|(key, _)| *key).collect()
    }
}
