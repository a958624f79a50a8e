use quick_xml::escape::escape;

use crate::structure::{Block, List, ListEntry, Table};

pub fn render_blocks(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        render_block(block, &mut html);
    }
    html
}

fn render_block(block: &Block, html: &mut String) {
    match block {
        Block::Paragraph(paragraph) => {
            if paragraph.classes.is_empty() {
                html.push_str("<p>");
            } else {
                html.push_str("<p class=\"");
                html.push_str(&escape(paragraph.classes.join(" ").as_str()));
                html.push_str("\">");
            }
            push_text(&paragraph.text, html);
            html.push_str("</p>");
        }
        Block::List(list) => render_list(list, html),
        Block::Table(table) => render_table(table, html),
        Block::Image(image) => {
            let alt = image.path.rsplit('/').next().unwrap_or(image.path.as_str());
            html.push_str("<img src=\"");
            html.push_str(&escape(image.path.as_str()));
            html.push_str("\" alt=\"");
            html.push_str(&escape(alt));
            html.push_str("\"/>");
        }
    }
}

fn render_list(list: &List, html: &mut String) {
    html.push_str("<ul>");
    let mut entries = list.items.iter().peekable();
    while let Some(entry) = entries.next() {
        html.push_str("<li>");
        match entry {
            ListEntry::Item(item) => {
                push_text(&item.text, html);
                while let Some(ListEntry::List(nested)) = entries.peek() {
                    render_list(nested, html);
                    entries.next();
                }
            }
            // a nested list with no preceding item at this level
            ListEntry::List(nested) => render_list(nested, html),
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
}

fn render_table(table: &Table, html: &mut String) {
    html.push_str("<table>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row.cells.iter().filter(|cell| cell.is_anchor) {
            html.push_str("<td");
            if cell.h_span > 1 {
                html.push_str(&format!(" colspan=\"{}\"", cell.h_span));
            }
            if cell.v_span > 1 {
                html.push_str(&format!(" rowspan=\"{}\"", cell.v_span));
            }
            html.push('>');
            html.push_str(&render_blocks(&cell.items));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
}

fn push_text(text: &str, html: &mut String) {
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        html.push_str(&escape(first));
    }
    for line in lines {
        html.push_str("<br/>");
        html.push_str(&escape(line));
    }
}
