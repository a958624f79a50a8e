//! Office Open XML block-stream source.
//!
//! Reads a `.docx` package once into memory and yields the body as a flat,
//! document-ordered stream of [`RawBlock`]s, plus the image relationship table
//! used to resolve embedded graphics.

use std::collections::HashMap;

use quick_xml::events::BytesStart;
use serde::Serialize;

use crate::error::{Anomaly, ExtractError};

mod body;
mod grid;
mod package;
#[cfg(test)]
mod tests;

pub use package::{DocxPackage, PackageContents};

use body::*;
use grid::*;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";
pub const DEFAULT_STYLE_NAME: &str = "Normal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBlock {
    Paragraph(RawParagraph),
    Table(RawTable),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParagraph {
    pub text: String,
    pub style_name: String,
    pub indent_level: Option<u32>,
    pub has_graphic: bool,
    pub graphic_rel_ids: Vec<String>,
}

impl RawParagraph {
    pub fn styled(style_name: &str, text: &str) -> Self {
        Self {
            text: text.to_string(),
            style_name: style_name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub row: usize,
    pub coordinates: GridCoordinates,
    pub blocks: Vec<RawBlock>,
}

/// Grid position of the merged region a cell belongs to. `right` and `bottom`
/// are exclusive; `bottom` is `None` when the vertical extent is unreliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCoordinates {
    pub top: usize,
    pub left: usize,
    pub right: usize,
    pub bottom: Option<usize>,
}

pub trait RelationshipResolver {
    fn resolve(&self, rel_id: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRelationships {
    targets: HashMap<String, String>,
}

impl ImageRelationships {
    pub fn insert(&mut self, rel_id: &str, path: &str) {
        self.targets.insert(rel_id.to_string(), path.to_string());
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        let mut paths = self
            .targets
            .values()
            .map(String::as_str)
            .collect::<Vec<&str>>();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}

impl RelationshipResolver for ImageRelationships {
    fn resolve(&self, rel_id: &str) -> Option<&str> {
        self.targets.get(rel_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyleNames {
    names: HashMap<String, String>,
}

impl StyleNames {
    pub fn display_name(&self, style_id: &str) -> String {
        self.names
            .get(style_id)
            .cloned()
            .unwrap_or_else(|| style_id.to_string())
    }
}

fn attr_value(element: &BytesStart, local_key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn local_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).to_string()
}
