//! G-code print-loop transformation engine
//!
//! Turns a single print job into N back-to-back jobs by repeating the
//! print body with printer-specific loop code (cooldown, ejection,
//! restart) injected between copies:
//!
//! 1. **Search strategies** ([`strategy`]) locate the end-of-init and
//!    end-of-print boundaries named by the printer definition.
//! 2. **Coordinate extraction** ([`extract`]) gathers first/last/
//!    average/min/max print-move statistics in one pass.
//! 3. **Assertions** guard the statistics against the printer's safe
//!    envelope.
//! 4. **Template rendering** ([`template`]) expands the definition's
//!    loop code once per iteration.
//! 5. **The streaming transformer** ([`transform`]) stitches the output
//!    together by re-reading input line ranges.
//!
//! The engine is synchronous and shares no mutable state between
//! transformations.

pub mod extract;
pub mod strategy;
pub mod template;
pub mod transform;

pub use extract::{extract_print_stats, PrintStats};
pub use strategy::SearchStrategy;
pub use template::LoopTemplate;
pub use transform::{transform, StreamingTransformer};
