// src/tables/mod.rs
pub mod csv_export;
pub mod html;
pub mod markdown;

use markdown::MarkdownTables;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Header cells, as the document wrote them (trimmed).
    pub headers: Vec<String>,
    /// Each data row, one trimmed String per cell. Rows may be shorter or
    /// longer than `headers`.
    pub rows: Vec<Vec<String>>,
}

/// Every structurally valid table in `document`, in document order: pipe
/// tables first, then `<table>` elements when the text carries HTML.
///
/// Never fails; an empty or table-free document yields nothing. Calling it
/// again on the same input yields the same tables.
pub fn locate(document: &str) -> impl Iterator<Item = RawTable> + '_ {
    let html_tables = if has_html_table(document) {
        html::tables(document)
    } else {
        Vec::new()
    };
    MarkdownTables::new(document).chain(html_tables)
}

fn has_html_table(document: &str) -> bool {
    document
        .as_bytes()
        .windows(6)
        .any(|w| w.eq_ignore_ascii_case(b"<table"))
}
