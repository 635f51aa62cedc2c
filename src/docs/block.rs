// src/docs/block.rs

// --- Imports ---
use crate::jmh::table::ResultTable;
use regex::Regex;

// --- Constants ---
pub const DEFAULT_BEGIN_MARKER: &str = "<pre>";
pub const DEFAULT_END_MARKER: &str = "</pre>";

// Javadoc continuation prefix in front of the begin marker, e.g. " * " or "\t*".
const PREFIX_PATTERN: &str = r"[ \t]*\*[ \t]*";

// --- Data Structures ---

/// Begin/end markers delimiting an example block inside a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMarkers {
    pub begin: String,
    pub end: String,
}

impl Default for BlockMarkers {
    fn default() -> Self {
        Self {
            begin: DEFAULT_BEGIN_MARKER.to_string(),
            end: DEFAULT_END_MARKER.to_string(),
        }
    }
}

/// A located block: byte range `start..end` in the document (from the start of the begin
/// marker line up to and including the end marker) and the prefix captured before the
/// begin marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedBlock {
    pub start: usize,
    pub end: usize,
    pub prefix: String,
}

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub substitutions: usize,
}

// --- Locator / Rewriter ---

pub struct BlockLocator {
    markers: BlockMarkers,
    pattern: Regex,
}

impl BlockLocator {
    pub fn new(markers: BlockMarkers) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"(?m)^(?P<prefix>{}){}[\s\S]*?{}",
            PREFIX_PATTERN,
            regex::escape(&markers.begin),
            regex::escape(&markers.end),
        ))?;
        Ok(Self { markers, pattern })
    }

    pub fn markers(&self) -> &BlockMarkers {
        &self.markers
    }

    /// Cheap lexical check before any regex work: the document must mention both the begin
    /// marker and the result mode marker somewhere.
    pub fn is_candidate(&self, text: &str, mode_marker: &str) -> bool {
        text.contains(self.markers.begin.as_str()) && text.contains(mode_marker)
    }

    /// Every non-overlapping block in document order. Each block ends at the first end
    /// marker after its begin marker.
    pub fn locate(&self, text: &str) -> Vec<EmbeddedBlock> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let prefix = caps.name("prefix")?;
                Some(EmbeddedBlock {
                    start: whole.start(),
                    end: whole.end(),
                    prefix: prefix.as_str().to_string(),
                })
            })
            .collect()
    }

    /// Renders `table` as a block with `prefix` in front of every line, marker lines
    /// included. Trailing whitespace of table lines is dropped; no line ending after the end marker.
    pub fn render_block(&self, prefix: &str, table: &ResultTable, line_ending: &str) -> String {
        let mut block = format!("{}{}{}", prefix, self.markers.begin, line_ending);
        for line in table.lines() {
            block.push_str(prefix);
            block.push_str(line.trim_end());
            block.push_str(line_ending);
        }
        block.push_str(prefix);
        block.push_str(&self.markers.end);
        block
    }

    /// Replaces the body of every located block with `table` in a single forward pass.
    pub fn rewrite(&self, text: &str, table: &ResultTable) -> Rewrite {
        let blocks = self.locate(text);
        let line_ending = line_ending(text);
        let mut out = String::with_capacity(text.len());
        let mut last_pos = 0;

        for block in &blocks {
            out.push_str(&text[last_pos..block.start]);
            out.push_str(&self.render_block(&block.prefix, table, line_ending));
            last_pos = block.end;
        }
        out.push_str(&text[last_pos..]);

        Rewrite {
            text: out,
            substitutions: blocks.len(),
        }
    }
}

/// `"\r\n"` for documents that use CRLF line endings, `"\n"` otherwise.
fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}
