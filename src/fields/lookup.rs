use tracing::info;

use crate::narrative::render_blocks;
use crate::structure::{Document, Section, Table};

pub fn section_by_number<'a>(document: &'a Document, number: &str) -> Option<&'a Section> {
    let section = document.section_by_number(number);
    if section.is_none() {
        info!(number, "no section with number");
    }
    section
}

pub fn section_by_title_contains<'a>(
    document: &'a Document,
    fragment: &str,
) -> Option<&'a Section> {
    let section = document.section_by_title_contains(fragment);
    if section.is_none() {
        info!(fragment, "no section title contains fragment");
    }
    section
}

pub fn find_section<'a>(
    document: &'a Document,
    number: Option<&str>,
    title_fragment: Option<&str>,
) -> Option<&'a Section> {
    number
        .and_then(|number| section_by_number(document, number))
        .or_else(|| {
            title_fragment.and_then(|fragment| section_by_title_contains(document, fragment))
        })
}

pub fn section_text_or(
    document: &Document,
    number: Option<&str>,
    title_fragment: Option<&str>,
    default: &str,
) -> String {
    match find_section(document, number, title_fragment) {
        Some(section) if !section.items.is_empty() => render_blocks(&section.items),
        Some(section) => {
            info!(number = ?section.number, "section has no content, using default");
            default.to_string()
        }
        None => default.to_string(),
    }
}

pub fn table_row_value(table: &Table, label: &str) -> String {
    let Some(row) = table.find_row(label) else {
        info!(label, "no table row for label");
        return String::new();
    };

    let label_column = row
        .find_cell(label)
        .or_else(|| row.cells.first())
        .map(|cell| cell.column)
        .unwrap_or(0);

    match row.next_cell(label_column) {
        Some(cell) => cell.text().trim().to_string(),
        None => {
            info!(label, "table row has no value cell");
            String::new()
        }
    }
}
