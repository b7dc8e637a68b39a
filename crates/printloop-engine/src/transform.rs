//! Streaming print-loop transformation
//!
//! The transformer drives the whole pipeline for one request: resolve
//! the printer definition, locate the two section boundaries, extract
//! print statistics, check the definition's assertions, then write the
//! output as header + N * (body + end marker + rendered loop code) +
//! footer. The input is re-opened for every pass and every emitted
//! range, which keeps peak memory at one scanner buffer regardless of
//! file size; the OS page cache absorbs the repeated reads.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use printloop_core::{Error, MarkerPositions, ProcessingRequest, Result, SearchError};
use printloop_printers::{PrinterCatalog, PrinterDefinition};
use toml::Value;
use tracing::{debug, info};

use crate::extract::extract_print_stats;
use crate::strategy::SearchStrategy;
use crate::template::LoopTemplate;

/// Transform `input` into `output` according to `request`.
///
/// This is the engine's public boundary. Failures at any pass abort the
/// transformation; a partially written output file must be discarded by
/// the caller.
pub fn transform(input: &Path, output: &Path, request: &ProcessingRequest) -> Result<()> {
    StreamingTransformer::new(request.clone())?.run(input, output)
}

/// Orchestrator for one transformation
///
/// Construction resolves and parses everything derived from the request
/// (definition, strategies, template); [`StreamingTransformer::run`]
/// performs the four passes over the input. Each transformation owns its
/// own instance, so transformations may run in parallel freely.
pub struct StreamingTransformer {
    request: ProcessingRequest,
    definition: PrinterDefinition,
    init_strategy: SearchStrategy,
    print_strategy: SearchStrategy,
    template: LoopTemplate,
}

impl StreamingTransformer {
    /// Resolve the printer definition and parse the strategies and the
    /// loop-code template.
    ///
    /// A custom definition on the request overrides the catalog lookup
    /// and is parsed with the same rules.
    pub fn new(request: ProcessingRequest) -> Result<Self> {
        let definition = match &request.custom_template {
            Some(source) => PrinterDefinition::parse(source, &request.printer)?,
            None => PrinterCatalog::load(&request.printer)?,
        };

        let init_strategy =
            SearchStrategy::parse(&definition.search_strategy.end_init_section_strategy)?;
        let print_strategy =
            SearchStrategy::parse(&definition.search_strategy.end_print_section_strategy)?;

        let template = LoopTemplate::parse(&definition.template.code)?;

        Ok(Self {
            request,
            definition,
            init_strategy,
            print_strategy,
            template,
        })
    }

    /// Run the transformation, writing the looped file to `output`.
    pub fn run(&self, input: &Path, output: &Path) -> Result<()> {
        self.validate()?;

        let positions = self.locate_markers(input)?;
        debug!(
            init_first = positions.end_init_section_first_line,
            init_last = positions.end_init_section_last_line,
            print_first = positions.end_print_section_first_line,
            print_last = positions.end_print_section_last_line,
            "located section markers"
        );

        self.check_assertions(&positions)?;

        let mut writer = BufWriter::new(File::create(output)?);

        // Header, with marker-bearing lines split off their comments.
        self.stream_range(
            input,
            &mut writer,
            0,
            positions.end_init_section_last_line,
            true,
        )?;

        for iteration in 1..=self.request.iterations {
            if positions.end_init_section_last_line + 1 < positions.end_print_section_first_line {
                self.stream_range(
                    input,
                    &mut writer,
                    positions.end_init_section_last_line + 1,
                    positions.end_print_section_first_line - 1,
                    false,
                )?;
            }

            self.stream_range(
                input,
                &mut writer,
                positions.end_print_section_first_line,
                positions.end_print_section_last_line,
                false,
            )?;

            for line in self.template.render(
                iteration,
                &self.definition.name,
                &self.request,
                &self.definition.parameters,
                &positions,
            )? {
                writeln!(writer, "{line}")?;
            }
        }

        self.stream_tail(
            input,
            &mut writer,
            positions.end_print_section_last_line + 1,
        )?;

        writer.flush()?;

        info!(
            printer = %self.definition.name,
            iterations = self.request.iterations,
            "transformation complete"
        );
        Ok(())
    }

    /// Pre-flight checks on the request and definition.
    fn validate(&self) -> Result<()> {
        if self.request.iterations <= 0 {
            return Err(Error::InvalidIterations {
                value: self.request.iterations,
            });
        }

        let markers = &self.definition.markers;
        if markers.end_init_section.is_empty() {
            return Err(printloop_core::CatalogError::MalformedDefinition {
                field: "Markers.EndInitSection".to_string(),
            }
            .into());
        }
        if markers.end_print_section.is_empty() {
            return Err(printloop_core::CatalogError::MalformedDefinition {
                field: "Markers.EndPrintSection".to_string(),
            }
            .into());
        }

        // An init-marker line containing an end-marker line would make
        // every header line a potential end-of-print match.
        for init_line in &markers.end_init_section {
            for print_line in &markers.end_print_section {
                if init_line.contains(print_line.as_str()) {
                    return Err(SearchError::MarkerConflict {
                        init_line: init_line.clone(),
                        print_line: print_line.clone(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Pass 1 and 2: locate both marker ranges, then extract print
    /// statistics.
    fn locate_markers(&self, input: &Path) -> Result<MarkerPositions> {
        let markers = &self.definition.markers;

        let (init_first, init_last) = self
            .init_strategy
            .find_init_section(input, &markers.end_init_section)?;

        let (print_first, print_last) =
            self.print_strategy
                .find_print_section(input, &markers.end_print_section, init_last)?;

        if init_last >= print_first {
            return Err(SearchError::InvalidMarkerOrder {
                init_last,
                print_first,
            }
            .into());
        }

        let stats = extract_print_stats(input, init_last)?;
        if !stats.first_print_found && !self.request.printer.contains("unit-tests") {
            return Err(Error::NoPrintCommandsFound {
                after_line: init_last,
            });
        }

        Ok(MarkerPositions {
            end_init_section_first_line: init_first,
            end_init_section_last_line: init_last,
            end_print_section_first_line: print_first,
            end_print_section_last_line: print_last,
            first_print_x: stats.first_x,
            first_print_y: stats.first_y,
            first_print_z: stats.first_z,
            last_print_x: stats.last_x,
            last_print_y: stats.last_y,
            last_print_z: stats.last_z,
            average_print_x: stats.average_x,
            average_print_y: stats.average_y,
            min_print_x: stats.min_x,
            min_print_y: stats.min_y,
            max_print_x: stats.max_x,
            max_print_y: stats.max_y,
        })
    }

    /// Pass 3: check every declared assertion against the computed
    /// positions.
    fn check_assertions(&self, positions: &MarkerPositions) -> Result<()> {
        for (field, bounds) in &self.definition.assertions {
            if bounds.len() != 2 {
                return Err(Error::MalformedAssertion {
                    field: field.clone(),
                    reason: format!("expected [min, max], got {} values", bounds.len()),
                });
            }

            let min = numeric(&bounds[0]).ok_or_else(|| Error::MalformedAssertion {
                field: field.clone(),
                reason: "min value is not a number".to_string(),
            })?;
            let max = numeric(&bounds[1]).ok_or_else(|| Error::MalformedAssertion {
                field: field.clone(),
                reason: "max value is not a number".to_string(),
            })?;

            let value = positions
                .coordinate(field)
                .ok_or_else(|| Error::MalformedAssertion {
                    field: field.clone(),
                    reason: "unknown coordinate field".to_string(),
                })?;

            if value < min || value > max {
                return Err(Error::AssertionFailed {
                    field: field.clone(),
                    value,
                    min,
                    max,
                });
            }

            debug!(field = %field, value, min, max, "assertion passed");
        }

        Ok(())
    }

    /// Copy input lines `start..=end` to the writer.
    ///
    /// In the header (`split_markers`), a line containing an init-marker
    /// pattern and a `;` comment is split at the first `;` into a code
    /// line and a comment line.
    fn stream_range(
        &self,
        input: &Path,
        writer: &mut BufWriter<File>,
        start: u64,
        end: u64,
        split_markers: bool,
    ) -> Result<()> {
        let reader = BufReader::new(File::open(input)?);

        for (line_no, line) in reader.lines().enumerate() {
            let line_no = line_no as u64;
            if line_no < start {
                continue;
            }
            if line_no > end {
                break;
            }

            let line = line?;
            if split_markers {
                for part in
                    split_marker_comment(&line, &self.definition.markers.end_init_section)
                {
                    writeln!(writer, "{part}")?;
                }
            } else {
                writeln!(writer, "{line}")?;
            }
        }

        Ok(())
    }

    /// Copy input lines from `start` through EOF to the writer.
    fn stream_tail(&self, input: &Path, writer: &mut BufWriter<File>, start: u64) -> Result<()> {
        let reader = BufReader::new(File::open(input)?);

        for (line_no, line) in reader.lines().enumerate() {
            if (line_no as u64) < start {
                continue;
            }
            writeln!(writer, "{}", line?)?;
        }

        Ok(())
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

/// Split a marker-bearing header line at its trailing comment.
///
/// Slicers commonly emit the init marker with an inline comment
/// (`M1007 S1 ;enable detection`); downstream firmware is happier with
/// the command and the comment on separate lines. Lines without a marker
/// or without both non-empty halves pass through unchanged.
fn split_marker_comment(line: &str, markers: &[String]) -> Vec<String> {
    for marker in markers {
        if !line.contains(marker.trim()) {
            continue;
        }
        if let Some(semicolon) = line.find(';') {
            let before = line[..semicolon].trim();
            let after = line[semicolon..].trim();
            if !before.is_empty() && !after.is_empty() {
                return vec![before.to_string(), after.to_string()];
            }
        }
    }

    vec![line.to_string()]
}
