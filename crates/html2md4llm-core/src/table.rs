//! Pipe-table rendering.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::generate::render_element;
use crate::node::Element;

static RE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A rendered table row
struct Row {
    cells: Vec<String>,
    has_header_cell: bool,
}

/// Render a `table` element as a Markdown pipe table.
///
/// The header is the first row holding a `th` cell, or the first row when
/// no row does. Short rows are padded to the widest row.
pub(crate) fn render_table(table: &Element, indent: usize) -> String {
    let rows: Vec<Row> = collect_rows(table)
        .into_iter()
        .filter_map(|tr| render_row(tr, indent))
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    let header = rows.iter().position(|r| r.has_header_cell).unwrap_or(0);
    let columns = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let prefix = " ".repeat(indent);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(&rows[header].cells, columns, &prefix));
    lines.push(format!("{prefix}|{}", " --- |".repeat(columns)));
    for (i, row) in rows.iter().enumerate() {
        if i != header {
            lines.push(format_row(&row.cells, columns, &prefix));
        }
    }

    lines.join("\n")
}

/// Rows directly under the table and one level inside row groups, in
/// document order
fn collect_rows(table: &Element) -> Vec<&Element> {
    let mut rows = Vec::new();
    for child in table.element_children() {
        match child.tag.as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child.element_children().filter(|e| e.tag == "tr"));
            }
            _ => {}
        }
    }
    rows
}

fn render_row(tr: &Element, indent: usize) -> Option<Row> {
    let mut cells = Vec::new();
    let mut has_header_cell = false;

    for cell in tr.element_children() {
        match cell.tag.as_str() {
            "th" => has_header_cell = true,
            "td" => {}
            _ => continue,
        }
        let rendered = render_element(cell, indent);
        cells.push(normalize_cell(&rendered));
    }

    if cells.is_empty() {
        None
    } else {
        Some(Row {
            cells,
            has_header_cell,
        })
    }
}

/// Fit rendered cell content on one line of a pipe table
fn normalize_cell(content: &str) -> String {
    let content = content.replace("\r\n", "\n");
    let content = RE_NEWLINES.replace_all(&content, "<br>");
    let content = RE_WHITESPACE.replace_all(&content, " ");
    content.replace('|', "\\|").trim().to_string()
}

fn format_row(cells: &[String], columns: usize, prefix: &str) -> String {
    let mut line = format!("{prefix}|");
    for i in 0..columns {
        line.push(' ');
        line.push_str(cells.get(i).map(String::as_str).unwrap_or(""));
        line.push_str(" |");
    }
    line
}
