//! Core types for the printloop transformation engine
//!
//! This crate holds the pieces shared by every layer:
//! - The unified error taxonomy ([`Error`], [`Result`]) and the
//!   per-domain error enums it wraps
//! - The caller-facing [`ProcessingRequest`] record
//! - [`MarkerPositions`], the located marker ranges plus extracted
//!   print statistics
//! - The narrow `G1` line reader ([`gcode`])

pub mod error;
pub mod gcode;
pub mod positions;
pub mod request;

pub use error::{CatalogError, Error, Result, SearchError, TemplateError};
pub use gcode::{parse_g1_line, GcodeCoordinates};
pub use positions::{MarkerPositions, COORDINATE_FIELDS};
pub use request::ProcessingRequest;
