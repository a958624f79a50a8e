use serde::Serialize;
use tracing::debug;

use super::render::render_blocks;
use crate::structure::Document;

pub const CONTENT_ID_PREFIX: &str = "NarrativeContent_";
pub const ITEM_ID_PREFIX: &str = "NarrativeContentItem_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeContentNode {
    pub id: String,
    pub section_number: Option<String>,
    pub section_title: Option<String>,
    pub content_reference: String,
    pub child_ids: Vec<String>,
    pub previous_id: Option<String>,
    pub next_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeContentItem {
    pub id: String,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub contents: Vec<NarrativeContentNode>,
    pub items: Vec<NarrativeContentItem>,
}

impl Narrative {
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn content(&self, id: &str) -> Option<&NarrativeContentNode> {
        self.contents.iter().find(|node| node.id == id)
    }

    pub fn item_for(&self, node: &NarrativeContentNode) -> Option<&NarrativeContentItem> {
        self.items
            .iter()
            .find(|item| item.id == node.content_reference)
    }
}

pub fn flatten(document: &Document) -> Narrative {
    let mut narrative = Narrative::default();
    emit(document, document.root().index, &mut narrative);
    link(&mut narrative.contents);

    debug!(nodes = narrative.contents.len(), "flattened section tree");
    narrative
}

fn emit(document: &Document, index: usize, narrative: &mut Narrative) -> String {
    let Some(section) = document.section(index) else {
        return String::new();
    };

    let ordinal = narrative.contents.len() + 1;
    let id = format!("{CONTENT_ID_PREFIX}{ordinal}");
    let item_id = format!("{ITEM_ID_PREFIX}{ordinal}");

    narrative.items.push(NarrativeContentItem {
        id: item_id.clone(),
        name: section.title.clone().unwrap_or_else(|| item_id.clone()),
        text: render_blocks(&section.items),
    });
    let position = narrative.contents.len();
    narrative.contents.push(NarrativeContentNode {
        id: id.clone(),
        section_number: section.number.clone(),
        section_title: section.title.clone(),
        content_reference: item_id,
        child_ids: Vec::new(),
        previous_id: None,
        next_id: None,
    });

    for &child in &section.children {
        let child_id = emit(document, child, narrative);
        narrative.contents[position].child_ids.push(child_id);
    }

    id
}

fn link(contents: &mut [NarrativeContentNode]) {
    let ids = contents
        .iter()
        .map(|node| node.id.clone())
        .collect::<Vec<String>>();

    for (position, node) in contents.iter_mut().enumerate() {
        node.previous_id = position
            .checked_sub(1)
            .and_then(|previous| ids.get(previous))
            .cloned();
        node.next_id = ids.get(position + 1).cloned();
    }
}
