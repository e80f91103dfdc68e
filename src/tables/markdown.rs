// src/tables/markdown.rs

use std::iter::Peekable;
use std::str::Lines;
use tracing::trace;

use super::RawTable;

/// Lazily yields pipe tables from a markdown document.
///
/// A table is a maximal run of lines starting with `|`. The header/body
/// separator (`|---|:--:|`) is dropped; runs without at least one data row
/// are skipped.
pub struct MarkdownTables<'a> {
    lines: Peekable<Lines<'a>>,
}

impl<'a> MarkdownTables<'a> {
    pub fn new(document: &'a str) -> Self {
        Self {
            lines: document.lines().peekable(),
        }
    }

    /// Next contiguous block of pipe lines, or `None` at end of input.
    fn next_block(&mut self) -> Option<Vec<&'a str>> {
        // skip to the first pipe line
        while let Some(line) = self.lines.peek() {
            if is_pipe_line(line) {
                break;
            }
            self.lines.next();
        }

        let mut block = Vec::new();
        while let Some(line) = self.lines.next_if(|l| is_pipe_line(l)) {
            block.push(line.trim_end());
        }
        if block.is_empty() {
            None
        } else {
            Some(block)
        }
    }
}

impl Iterator for MarkdownTables<'_> {
    type Item = RawTable;

    fn next(&mut self) -> Option<RawTable> {
        loop {
            let block = self.next_block()?;
            if let Some(table) = block_to_table(&block) {
                return Some(table);
            }
            trace!(lines = block.len(), "skipping undersized pipe block");
        }
    }
}

fn is_pipe_line(line: &str) -> bool {
    line.starts_with('|')
}

fn block_to_table(block: &[&str]) -> Option<RawTable> {
    let (header_line, rest) = block.split_first()?;
    let headers = split_cells(header_line);

    let body = match rest.first() {
        Some(first) if is_separator(first) => &rest[1..],
        _ => rest,
    };
    if body.is_empty() {
        return None;
    }

    Some(RawTable {
        headers,
        rows: body.iter().map(|l| split_cells(l)).collect(),
    })
}

/// `| a | b |` → `["a", "b"]`.
pub(crate) fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|c| c.trim().to_string())
        .collect()
}

fn is_separator(line: &str) -> bool {
    let cells = split_cells(line);
    cells
        .iter()
        .any(|c| c.contains('-'))
        && cells
            .iter()
            .all(|c| c.chars().all(|ch| matches!(ch, '-' | ':' | ' ')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_cells_and_strips_outer_pipes() {
        assert_eq!(split_cells("| a | b c |  |"), vec!["a", "b c", ""]);
    }

    #[test]
    fn separator_detection() {
        assert!(is_separator("|---|:--:|---:|"));
        assert!(is_separator("| --- | --- |"));
        assert!(!is_separator("| D2s_v3 | 2 |"));
        assert!(!is_separator("|  |  |"));
    }

    #[test]
    fn header_and_separator_only_is_skipped() {
        let doc = "| Size | vCPU |\n|---|---|\n";
        assert_eq!(MarkdownTables::new(doc).count(), 0);
    }

    #[test]
    fn blocks_are_split_by_non_pipe_lines() {
        let doc = "\
| Size | vCPU |
|---|---|
| A | 1 |

text between

| Size | Network bandwidth |
|---|---|
| A | 10 |
| B | 20 |";
        let tables: Vec<_> = MarkdownTables::new(doc).collect();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows, vec![vec!["A", "1"]]);
        assert_eq!(tables[1].rows.len(), 2);
        assert_eq!(tables[1].headers, vec!["Size", "Network bandwidth"]);
    }

    #[test]
    fn indented_pipes_are_not_tables() {
        let doc = "  | Size | vCPU |\n  | A | 1 |\n";
        assert_eq!(MarkdownTables::new(doc).count(), 0);
    }
}
