use serde::Serialize;

use super::list::List;
use super::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Paragraph),
    List(List),
    Table(Table),
    Image(Image),
}

impl Block {
    pub fn text(&self) -> String {
        match self {
            Block::Paragraph(paragraph) => paragraph.text.clone(),
            Block::List(list) => list.text(),
            Block::Table(table) => table.text(),
            Block::Image(_) => String::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::List(_) => "list",
            Block::Table(_) => "table",
            Block::Image(_) => "image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

impl Paragraph {
    pub fn new(text: &str, style_name: &str) -> Self {
        let class = style_class(style_name);
        Self {
            text: text.to_string(),
            classes: if class.is_empty() || class == "normal" {
                Vec::new()
            } else {
                vec![class]
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub path: String,
}

pub fn blocks_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<String>>()
        .join("\n")
}

fn style_class(style_name: &str) -> String {
    let mut class = String::with_capacity(style_name.len());
    for ch in style_name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            class.push(ch.to_ascii_lowercase());
        } else if !class.ends_with('-') {
            class.push('-');
        }
    }
    class.trim_matches('-').to_string()
}
