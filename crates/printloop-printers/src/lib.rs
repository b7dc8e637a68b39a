//! Printer definition catalog for printloop
//!
//! Each supported printer ships as an embedded TOML document describing
//! its section-boundary markers, search strategies, loop-code template,
//! template parameters, and safe-envelope assertions. The same document
//! format is accepted from users as a custom definition override.

pub mod catalog;
pub mod definition;

pub use catalog::PrinterCatalog;
pub use definition::{Markers, PrinterDefinition, StrategyNames, TemplateSection};
