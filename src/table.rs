//! Markdown table detection and fixed-width rendering.
//!
//! Tables are found with a line-based heuristic rather than a Markdown parser.
//! Each accepted table is re-rendered with padded columns inside a code fence
//! so it lines up in a monospaced block. Anything that does not parse as a
//! table is passed through untouched.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

const DELIMITER: char = '|';
const CELL_JOIN: &str = " | ";
const SEPARATOR_JOIN: &str = "-|-";
const FENCE: &str = "```";

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|[\s\-|:]+\|$").unwrap());

/// A line that can open a table: trimmed, it begins and ends with `|` and
/// holds at least two of them.
pub fn is_row_like(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with(DELIMITER) && trimmed.ends_with(DELIMITER)
}

/// A header/body separator such as `|---|:---:|`.
pub fn is_separator(line: &str) -> bool {
    SEPARATOR.is_match(line.trim())
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn continues_table(line: &str) -> bool {
    !is_blank(line) && line.contains(DELIMITER)
}

/// Whether `lines[idx]` belongs to a table region that is already open.
///
/// A single blank line is tolerated when the line after it continues the
/// table; a second blank line ends the region.
fn extends_region(lines: &[&str], idx: usize) -> bool {
    match lines.get(idx) {
        Some(line) if is_blank(line) => {
            lines.get(idx + 1).is_some_and(|next| continues_table(next))
        }
        Some(line) => continues_table(line),
        None => false,
    }
}

/// Parsed table: rows of trimmed cells, separator rows removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse the lines of a candidate region.
    ///
    /// Returns `None` when no row yields any cells.
    pub fn parse(lines: &[&str]) -> Option<Self> {
        let rows: Vec<Vec<String>> = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !is_separator(line))
            .filter_map(parse_row)
            .collect();

        if rows.is_empty() { None } else { Some(Self { rows }) }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Display width of the widest cell in each column.
    ///
    /// Rows shorter than the widest row simply do not contribute to the
    /// trailing columns.
    pub fn column_widths(&self) -> Vec<usize> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..columns)
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render as a fenced, fixed-width block with a dash rule under the
    /// first row.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = Vec::with_capacity(self.rows.len() + 3);
        out.push(FENCE.to_string());

        for (i, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| pad(cell, width))
                .collect();
            out.push(cells.join(CELL_JOIN));

            if i == 0 {
                let rule: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();
                out.push(rule.join(SEPARATOR_JOIN));
            }
        }

        out.push(FENCE.to_string());
        out.join("\n")
    }
}

/// Split `|a|b|` into `["a", "b"]`, dropping the outermost fields.
fn parse_row(line: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() < 3 {
        return None;
    }
    let cells: Vec<String> = parts[1..parts.len() - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect();
    if cells.is_empty() { None } else { Some(cells) }
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(fill))
}

#[derive(Clone, Copy)]
enum Scan {
    Scanning,
    Collecting { start: usize },
}

/// Replace every table region in `text` with its rendered block.
///
/// Regions with fewer than two non-blank lines, or without a single parseable
/// row, are left exactly as they were.
pub fn reformat_tables(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut state = Scan::Scanning;
    let mut cursor = 0;

    loop {
        match state {
            Scan::Scanning => {
                let Some(line) = lines.get(cursor) else {
                    break;
                };
                if is_row_like(line) {
                    trace!(line = cursor, "table candidate");
                    state = Scan::Collecting { start: cursor };
                } else {
                    out.push(line.to_string());
                }
                cursor += 1;
            }
            Scan::Collecting { start } => {
                if extends_region(&lines, cursor) {
                    cursor += 1;
                    continue;
                }

                let region = &lines[start..cursor];
                let filled = region.iter().filter(|line| !is_blank(line)).count();
                if filled < 2 {
                    debug!(line = start, "table candidate too short");
                    out.push(lines[start].to_string());
                    cursor = start + 1;
                } else if let Some(table) = Table::parse(region) {
                    debug!(
                        line = start,
                        rows = table.rows().len(),
                        columns = table.column_widths().len(),
                        "table reformatted"
                    );
                    out.push(table.render());
                } else {
                    debug!(line = start, "table candidate has no parseable rows");
                    out.extend(region.iter().map(|line| line.to_string()));
                }
                state = Scan::Scanning;
            }
        }
    }

    out.join("\n")
}
