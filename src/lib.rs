//! # printloop
//!
//! Repeat a 3D print job automatically: take a sliced G-code file, and
//! produce a new one in which the finished part is ejected and the next
//! copy starts, N times over.
//!
//! ## Architecture
//!
//! printloop is organized as a workspace with multiple crates:
//!
//! 1. **printloop-core** - Shared types, the `G1` line reader, and the
//!    unified error taxonomy
//! 2. **printloop-printers** - Embedded printer definition catalog
//!    (markers, strategies, loop-code templates, assertions)
//! 3. **printloop-engine** - Marker search, coordinate extraction,
//!    template rendering, and the streaming transformer
//! 4. **printloop** - This crate: re-exports plus the command-line
//!    front end
//!
//! ## How a transformation works
//!
//! The engine locates the end of the printer's init section and the end
//! of the print section with per-printer search strategies, gathers
//! coordinate statistics from the print moves, validates them against
//! the printer's safe envelope, and then streams out header, N copies of
//! the body followed by templated loop code, and footer.

pub use printloop_core::{
    parse_g1_line, CatalogError, Error, GcodeCoordinates, MarkerPositions, ProcessingRequest,
    Result, SearchError, TemplateError, COORDINATE_FIELDS,
};
pub use printloop_engine::{
    extract_print_stats, transform, LoopTemplate, PrintStats, SearchStrategy,
    StreamingTransformer,
};
pub use printloop_printers::{PrinterCatalog, PrinterDefinition};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
