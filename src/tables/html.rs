// src/tables/html.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use super::RawTable;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("table selector"));
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").expect("cell selector"));
static THEAD_TR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead tr").expect("thead selector"));
static TBODY_TR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody tr").expect("tbody selector"));

/// Extract every `<table>` of an HTML document (or an HTML fragment
/// embedded in markdown). Tables without a header row or data rows are
/// skipped.
pub fn tables(document: &str) -> Vec<RawTable> {
    let doc = Html::parse_document(document);
    doc.select(&TABLE)
        .filter_map(|t| {
            let table = table_from_element(t);
            if table.is_none() {
                trace!("skipping html table without header or body rows");
            }
            table
        })
        .collect()
}

fn table_from_element(table: ElementRef<'_>) -> Option<RawTable> {
    let head = own_rows(table, &THEAD_TR);
    let body = own_rows(table, &TBODY_TR);

    let (headers, rows) = match (head.first(), body.is_empty()) {
        (Some(h), false) => (row_cells(*h), body),
        (Some(h), true) => {
            // thead without tbody: everything after the header rows is data
            let all = own_rows(table, &TR);
            let data = all.into_iter().filter(|r| !head.contains(r)).collect();
            (row_cells(*h), data)
        }
        (None, _) => {
            let mut all = own_rows(table, &TR).into_iter();
            let first = all.next()?;
            (row_cells(first), all.collect())
        }
    };

    if headers.is_empty() {
        return None;
    }
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(row_cells)
        .filter(|r| !r.is_empty())
        .collect();
    if rows.is_empty() {
        return None;
    }

    Some(RawTable { headers, rows })
}

/// Rows of `table` itself; rows of nested tables are not ours.
fn own_rows<'a>(table: ElementRef<'a>, sel: &Selector) -> Vec<ElementRef<'a>> {
    table
        .select(sel)
        .filter(|tr| closest_table(*tr) == Some(table))
        .collect()
}

fn closest_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

fn row_cells(tr: ElementRef<'_>) -> Vec<String> {
    tr.select(&CELL)
        .filter(|c| c.parent().and_then(ElementRef::wrap) == Some(tr))
        .map(cell_text)
        .collect()
}

/// Visible text with whitespace runs collapsed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
