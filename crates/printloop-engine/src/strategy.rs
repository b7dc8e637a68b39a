//! Marker search strategies
//!
//! Three interchangeable ways of locating a marker pattern in a G-code
//! file. All share one match kernel; they differ only in scan direction
//! (first vs last complete match) and start boundary (file start vs a
//! given line). The set is closed: printer definitions select a strategy
//! by name and templates have no way to observe a new one, so this is a
//! tagged enum rather than an open trait.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use printloop_core::{Result, SearchError};

/// A marker-location strategy named by a printer definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Earliest complete match wins
    AfterFirstAppear,
    /// Latest complete match wins; must see the whole file before deciding
    AfterLastAppear,
    /// Matches like [`SearchStrategy::AfterFirstAppear`]; the name records
    /// that the markers precede the section they bound
    BeforeFirstAppear,
}

impl SearchStrategy {
    /// Resolve a strategy name from a printer definition.
    pub fn parse(name: &str) -> std::result::Result<Self, SearchError> {
        match name {
            "after_first_appear" => Ok(Self::AfterFirstAppear),
            "after_last_appear" => Ok(Self::AfterLastAppear),
            "before_first_appear" => Ok(Self::BeforeFirstAppear),
            _ => Err(SearchError::UnknownStrategy {
                name: name.to_string(),
            }),
        }
    }

    /// The wire name used in definition documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AfterFirstAppear => "after_first_appear",
            Self::AfterLastAppear => "after_last_appear",
            Self::BeforeFirstAppear => "before_first_appear",
        }
    }

    /// Locate the end-of-init marker range anywhere in the file.
    ///
    /// Returns the zero-based (first, last) line indices of the matched
    /// window.
    pub fn find_init_section(&self, path: &Path, markers: &[String]) -> Result<(u64, u64)> {
        let found = match self {
            Self::AfterLastAppear => find_match(path, markers, 0, Keep::Last)?,
            Self::AfterFirstAppear | Self::BeforeFirstAppear => {
                find_match(path, markers, 0, Keep::First)?
            }
        };

        found.ok_or_else(|| {
            SearchError::InitMarkerNotFound {
                markers: markers.join(", "),
            }
            .into()
        })
    }

    /// Locate the end-of-print marker range, matching strictly after
    /// `search_from_line`.
    pub fn find_print_section(
        &self,
        path: &Path,
        markers: &[String],
        search_from_line: u64,
    ) -> Result<(u64, u64)> {
        let start = search_from_line + 1;
        let found = match self {
            Self::AfterLastAppear => find_match(path, markers, start, Keep::Last)?,
            Self::AfterFirstAppear | Self::BeforeFirstAppear => {
                find_match(path, markers, start, Keep::First)?
            }
        };

        found.ok_or_else(|| {
            SearchError::PrintMarkerNotFound {
                search_from: search_from_line,
                markers: markers.join(", "),
            }
            .into()
        })
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Keep {
    First,
    Last,
}

/// A partially matched marker window.
struct Candidate {
    first_line: u64,
    next: usize,
}

/// Incremental matcher for one marker sequence.
///
/// A single-entry sequence matches any line containing (trimmed) the
/// marker. A multi-entry sequence matches a window of lines carrying the
/// entries in order, with any number of skippable lines (empty or `;`
/// comments) interleaved; a non-skippable line that does not carry the
/// next expected entry kills the attempt at that start position. Feeding
/// lines one at a time keeps memory independent of the window span, so
/// arbitrarily long comment runs between entries are fine.
struct WindowMatcher {
    markers: Vec<String>,
    candidates: Vec<Candidate>,
}

impl WindowMatcher {
    fn new(markers: &[String]) -> Self {
        Self {
            markers: markers.iter().map(|m| m.trim().to_string()).collect(),
            candidates: Vec::new(),
        }
    }

    /// Feed one line; returns windows completed on this line, earliest
    /// start first.
    fn feed(&mut self, line_no: u64, line: &str) -> Vec<(u64, u64)> {
        let trimmed = line.trim();
        let markers = &self.markers;
        let mut completed = Vec::new();

        self.candidates.retain_mut(|candidate| {
            if trimmed.contains(markers[candidate.next].as_str()) {
                candidate.next += 1;
                if candidate.next == markers.len() {
                    completed.push((candidate.first_line, line_no));
                    false
                } else {
                    true
                }
            } else {
                // Empty and comment lines may interleave marker entries.
                trimmed.is_empty() || trimmed.starts_with(';')
            }
        });

        if trimmed.contains(markers[0].as_str()) {
            if markers.len() == 1 {
                completed.push((line_no, line_no));
            } else {
                self.candidates.push(Candidate {
                    first_line: line_no,
                    next: 1,
                });
            }
        }

        completed
    }

    /// Start line of the oldest window still in progress.
    fn oldest_open(&self) -> Option<u64> {
        self.candidates.first().map(|c| c.first_line)
    }
}

/// Scan `path` for the marker sequence, considering only lines at or
/// after `start_line`.
///
/// `Keep::First` returns the match with the earliest first line, waiting
/// out any older still-open window before committing. `Keep::Last` scans
/// to EOF and returns the final match.
fn find_match(
    path: &Path,
    markers: &[String],
    start_line: u64,
    keep: Keep,
) -> Result<Option<(u64, u64)>> {
    if markers.is_empty() {
        return Ok(None);
    }

    let reader = BufReader::new(File::open(path)?);
    let mut matcher = WindowMatcher::new(markers);
    let mut found: Option<(u64, u64)> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no as u64;
        if line_no < start_line {
            continue;
        }

        let completed = matcher.feed(line_no, &line);
        match keep {
            Keep::First => {
                for m in completed {
                    if found.is_none_or(|best| m.0 < best.0) {
                        found = Some(m);
                    }
                }
                if let Some(best) = found {
                    // An older window could still complete with an earlier
                    // first line; only return once none remains.
                    if !matcher.oldest_open().is_some_and(|first| first < best.0) {
                        return Ok(Some(best));
                    }
                }
            }
            Keep::Last => {
                if let Some(first) = completed.first() {
                    found = Some(*first);
                }
            }
        }
    }

    Ok(found)
}
