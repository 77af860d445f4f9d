use regex::Regex;
use std::sync::OnceLock;

use crate::parsing::rope::span::Span;

/// Pipe table syntax: a header row, a delimiter row, then body rows.
pub struct PipeTable;

impl PipeTable {
    pub const SEPARATOR: char = '|';

    /// Whether a line can be a table row at all.
    pub fn is_row(remainder: &str) -> bool {
        remainder.contains(Self::SEPARATOR)
    }

    /// `| --- | :---: |` style delimiter row.
    pub fn is_delimiter_row(remainder: &str) -> bool {
        static DELIMITER: OnceLock<Regex> = OnceLock::new();
        let re = DELIMITER.get_or_init(|| {
            Regex::new(r"^\|?[ \t]*:?-+:?[ \t]*(\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$")
                .expect("Invalid table delimiter regex")
        });
        Self::is_row(remainder) && re.is_match(remainder.trim_end_matches(['\r', '\n']))
    }

    /// Splits a row into cell spans, `base` being the byte offset of `row`.
    ///
    /// One leading and one trailing pipe are row borders, not separators.
    /// Escaped pipes (`\|`) stay inside their cell. Cell spans are trimmed.
    pub fn split_cells(row: &str, base: usize) -> Vec<Span> {
        let row = row.trim_end_matches(['\r', '\n']);
        let bytes = row.as_bytes();
        let lead = row.len() - row.trim_start().len();
        let mut start = lead;
        let mut end = row.trim_end().len();
        if bytes.get(start) == Some(&b'|') {
            start += 1;
        }
        if end > start && bytes[end - 1] == b'|' && (end < 2 || bytes[end - 2] != b'\\') {
            end -= 1;
        }

        let mut cells = Vec::new();
        let mut cell_start = start;
        let mut i = start;
        while i < end {
            match bytes[i] {
                b'\\' => i += 2,
                b'|' => {
                    cells.push(Self::trimmed(row, cell_start, i, base));
                    i += 1;
                    cell_start = i;
                }
                _ => i += 1,
            }
        }
        cells.push(Self::trimmed(row, cell_start, end.max(cell_start), base));
        cells
    }

    fn trimmed(row: &str, start: usize, end: usize, base: usize) -> Span {
        let cell = &row[start..end];
        let lead = cell.len() - cell.trim_start().len();
        let text = cell.trim();
        Span {
            start: base + start + lead,
            end: base + start + lead + text.len(),
        }
    }
}
