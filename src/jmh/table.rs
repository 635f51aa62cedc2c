// src/jmh/table.rs

// --- Imports ---
use crate::utils::error::TableError;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Constants ---
/// First word of the JMH result header line.
pub const HEADER_KEYWORD: &str = "Benchmark";
/// Secondary column keyword that must appear on the header line.
pub const COLUMN_KEYWORD: &str = "Mode";
/// Mode column value for throughput runs.
pub const DEFAULT_MODE_MARKER: &str = "thrpt";
/// Header used when the runner output carries rows but no header line.
pub const DEFAULT_HEADER: &str =
    "Benchmark                                     Mode  Cnt      Score     Error  Units";

// How much of the runner output to quote back when nothing could be parsed
const SNIPPET_LINES: usize = 5;
const SNIPPET_MAX_CHARS: usize = 400;

// --- Regex Patterns (Lazy Static) ---
// The first table: a newline-prefixed "Benchmark  Mode" header up to the next blank line or end of input.
static FIRST_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n(Benchmark\s+Mode[\s\S]*?)(?:\n\s*\n|\z)")
        .expect("Failed to compile FIRST_TABLE_RE")
});

// --- Data Structures ---

/// Which lines count as header and result rows in the runner output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFormat {
    pub mode_marker: String,
    pub default_header: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            mode_marker: DEFAULT_MODE_MARKER.to_string(),
            default_header: DEFAULT_HEADER.to_string(),
        }
    }
}

impl TableFormat {
    pub fn with_mode_marker(mode_marker: impl Into<String>) -> Self {
        Self {
            mode_marker: mode_marker.into(),
            ..Self::default()
        }
    }

    /// A header line starts with `Benchmark` (leading whitespace ignored) and mentions `Mode`.
    pub fn is_header(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.starts_with(HEADER_KEYWORD) && trimmed.contains(COLUMN_KEYWORD)
    }

    /// A result row carries the mode marker somewhere on the line.
    pub fn is_result_row(&self, line: &str) -> bool {
        line.contains(self.mode_marker.as_str())
    }
}

/// One header line followed by data rows, in runner order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub header: String,
    pub rows: Vec<String>,
}

impl ResultTable {
    pub fn new(header: impl Into<String>, rows: Vec<String>) -> Self {
        Self {
            header: header.into(),
            rows,
        }
    }

    /// Splits table text into header and rows. The header is the first header-shaped line;
    /// without one, the format's default header is used and every line is a row.
    pub fn parse(text: &str, format: &TableFormat) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        match lines.iter().position(|line| format.is_header(line)) {
            Some(idx) => Self::new(
                lines[idx],
                lines[idx + 1..].iter().map(|l| l.to_string()).collect(),
            ),
            None => Self::new(
                format.default_header.clone(),
                lines.iter().map(|l| l.to_string()).collect(),
            ),
        }
    }

    /// Header first, then rows.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.as_str()).chain(self.rows.iter().map(String::as_str))
    }

    pub fn render(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// --- Extraction ---

/// Extracts the first JMH result table from raw runner output.
///
/// The standard table is the `Benchmark  Mode ...` block that runs until the next blank
/// line. When the output has no such block, every line carrying the mode marker is
/// collected instead, under the first header line seen anywhere (or the default header).
/// Only a run with no result rows at all is an error.
pub fn extract_first_table(output: &str, format: &TableFormat) -> Result<ResultTable, TableError> {
    if let Some(caps) = FIRST_TABLE_RE.captures(output) {
        let text = caps[1].trim_matches('\n');
        let table = ResultTable::parse(text, format);
        tracing::debug!("Found standard result table with {} row(s)", table.rows.len());
        return Ok(table);
    }

    let rows: Vec<String> = output
        .lines()
        .filter(|line| format.is_result_row(line))
        .map(str::to_string)
        .collect();

    if rows.is_empty() {
        return Err(TableError::NoRows {
            marker: format.mode_marker.clone(),
            snippet: snippet(output),
        });
    }

    let header = output
        .lines()
        .find(|line| line.starts_with(HEADER_KEYWORD) && line.contains(COLUMN_KEYWORD))
        .map(str::to_string)
        .unwrap_or_else(|| format.default_header.clone());

    tracing::warn!(
        "No standard result table found; collected {} loose \"{}\" line(s) instead",
        rows.len(),
        format.mode_marker
    );
    Ok(ResultTable::new(header, rows))
}

fn snippet(output: &str) -> String {
    let head = output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIPPET_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    head.chars().take(SNIPPET_MAX_CHARS).collect()
}
