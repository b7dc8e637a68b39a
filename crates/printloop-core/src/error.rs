//! Error handling for printloop
//!
//! Provides structured error types for all layers of the engine:
//! - Catalog errors (printer definition lookup/parsing)
//! - Search errors (marker location strategies)
//! - Template errors (loop-code parsing/rendering)
//!
//! All error types use `thiserror` for ergonomic error handling. Every
//! failure is fatal to the transformation in progress; nothing is
//! recovered internally.

use thiserror::Error;

/// Printer catalog error type
///
/// Represents errors raised while resolving a printer name to a parsed
/// definition, whether from the embedded catalog or from a user-supplied
/// definition string.
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    /// Printer name fails the character-class predicate
    #[error("Invalid printer name: {name}")]
    InvalidPrinterName {
        /// The rejected (already normalized) printer name.
        name: String,
    },

    /// No definition with this name in the catalog
    #[error("Printer not found: {name}")]
    PrinterNotFound {
        /// The normalized printer name that was looked up.
        name: String,
    },

    /// A required field is missing from a parsed definition
    #[error("Malformed printer definition: missing {field}")]
    MalformedDefinition {
        /// The missing field, in definition-document notation.
        field: String,
    },

    /// The definition document could not be parsed at all
    #[error("Failed to parse printer definition: {message}")]
    ParseFailed {
        /// The underlying parser message.
        message: String,
    },
}

/// Marker search error type
///
/// Represents errors raised by the marker-location strategies and by the
/// marker pre-flight checks in the transformer.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// Strategy name is not one of the recognized three
    #[error("Unknown search strategy: {name}")]
    UnknownStrategy {
        /// The unrecognized strategy name.
        name: String,
    },

    /// The end-of-init marker sequence was not found anywhere in the file
    #[error("Init section marker not found: [{markers}]")]
    InitMarkerNotFound {
        /// The marker sequence, comma-joined.
        markers: String,
    },

    /// The end-of-print marker sequence was not found after the init marker
    #[error("Print section marker not found after line {search_from}: [{markers}]")]
    PrintMarkerNotFound {
        /// The line strictly after which the search ran.
        search_from: u64,
        /// The marker sequence, comma-joined.
        markers: String,
    },

    /// The located init range does not strictly precede the print range
    #[error("Invalid marker positions: init section ends at line {init_last}, print section starts at line {print_first}")]
    InvalidMarkerOrder {
        /// Last line of the init marker range.
        init_last: u64,
        /// First line of the print marker range.
        print_first: u64,
    },

    /// An init-marker line contains an end-marker line as a substring
    #[error("Init section marker line '{init_line}' contains print section marker '{print_line}'")]
    MarkerConflict {
        /// The offending init-marker pattern line.
        init_line: String,
        /// The contained print-marker pattern line.
        print_line: String,
    },
}

/// Template error type
///
/// Represents errors from parsing a printer's loop-code template or from
/// rendering it for a particular iteration.
#[derive(Error, Debug, Clone)]
pub enum TemplateError {
    /// Template source is syntactically invalid
    #[error("Failed to parse template: {message}")]
    Parse {
        /// The underlying template-engine message.
        message: String,
    },

    /// Rendering failed (missing field, helper failure)
    #[error("Failed to render template for iteration {iteration}: {message}")]
    Render {
        /// The 1-based iteration being rendered.
        iteration: i64,
        /// The underlying template-engine message.
        message: String,
    },
}

/// Main error type for printloop
///
/// A unified error type that can represent any failure from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Printer catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Marker search error
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Template error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// No qualifying print move appeared after the init marker
    #[error("No print commands found after end of init section at line {after_line}")]
    NoPrintCommandsFound {
        /// Last line of the init marker range.
        after_line: u64,
    },

    /// A position value fell outside its declared assertion range
    #[error("Assertion failed: {field} value {value:.2} is outside allowed range [{min:.2}, {max:.2}]")]
    AssertionFailed {
        /// The asserted coordinate-field name.
        field: String,
        /// The observed value.
        value: f64,
        /// Lower bound of the declared range.
        min: f64,
        /// Upper bound of the declared range.
        max: f64,
    },

    /// Assertion bounds are not exactly two numeric values
    #[error("Malformed assertion for {field}: {reason}")]
    MalformedAssertion {
        /// The asserted coordinate-field name.
        field: String,
        /// Why the bounds were rejected.
        reason: String,
    },

    /// Iteration count is not positive
    #[error("Iterations must be positive, got {value}")]
    InvalidIterations {
        /// The rejected iteration count.
        value: i64,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a catalog error
    pub fn is_catalog_error(&self) -> bool {
        matches!(self, Error::Catalog(_))
    }

    /// Check if this is a marker search error
    pub fn is_search_error(&self) -> bool {
        matches!(self, Error::Search(_))
    }

    /// Check if this is a template error
    pub fn is_template_error(&self) -> bool {
        matches!(self, Error::Template(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
