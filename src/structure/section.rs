use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::block::{Block, Image, Paragraph, blocks_text};
use super::classify::{BlockClassifier, Classification, strip_bullet};
use super::list::{List, ListAdd, ListItem};
use super::table::{Cell, Row, Table};
use crate::config::{ExtractionProfile, MAX_HEADING_DEPTH};
use crate::docx::{RawBlock, RawParagraph, RawTable, RelationshipResolver};
use crate::error::{Anomaly, ExtractError};

pub const ROOT_LEVEL: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub index: usize,
    pub title: Option<String>,
    pub number: Option<String>,
    pub level: u32,
    pub items: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Section {
    fn root() -> Self {
        Self {
            index: 0,
            title: None,
            number: None,
            level: ROOT_LEVEL,
            items: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn text(&self) -> String {
        blocks_text(&self.items)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.items.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    sections: Vec<Section>,
    #[serde(skip)]
    by_number: HashMap<String, usize>,
    #[serde(skip)]
    by_title: HashMap<String, usize>,
    anomalies: Vec<Anomaly>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            sections: vec![Section::root()],
            by_number: HashMap::new(),
            by_title: HashMap::new(),
            anomalies: Vec::new(),
        }
    }
}

impl Document {
    pub fn root(&self) -> &Section {
        &self.sections[0]
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn section_by_number(&self, number: &str) -> Option<&Section> {
        self.by_number
            .get(number.trim())
            .map(|&index| &self.sections[index])
    }

    pub fn section_by_title(&self, title: &str) -> Option<&Section> {
        self.by_title
            .get(title.trim())
            .map(|&index| &self.sections[index])
    }

    pub fn section_by_title_contains(&self, fragment: &str) -> Option<&Section> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.sections.iter().find(|section| {
            section
                .title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&needle))
        })
    }

    pub fn children<'a>(&'a self, section: &'a Section) -> impl Iterator<Item = &'a Section> {
        section.children.iter().map(|&index| &self.sections[index])
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.sections.iter().flat_map(Section::tables)
    }

    pub fn images(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        for section in &self.sections {
            collect_image_paths(&section.items, &mut paths);
        }
        paths
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    fn register(&mut self, section: Section) -> usize {
        let index = self.sections.len();
        if let Some(number) = section.number.as_ref().filter(|number| !number.is_empty()) {
            self.by_number.insert(number.clone(), index);
        }
        if let Some(title) = section.title.as_ref() {
            if let Some(previous) = self.by_title.insert(title.clone(), index) {
                debug!(
                    title = %title,
                    previous,
                    index,
                    "duplicate section title replaces index entry"
                );
            }
        }
        if let Some(parent) = section.parent {
            self.sections[parent].children.push(index);
        }
        self.sections.push(section);
        index
    }
}

fn collect_image_paths<'a>(blocks: &'a [Block], paths: &mut Vec<&'a str>) {
    for block in blocks {
        match block {
            Block::Image(image) => paths.push(image.path.as_str()),
            Block::Table(table) => {
                for cell in table.anchor_cells() {
                    collect_image_paths(&cell.items, paths);
                }
            }
            Block::Paragraph(_) | Block::List(_) => {}
        }
    }
}

pub struct SectionAssembler<'a> {
    classifier: &'a BlockClassifier,
    images: &'a dyn RelationshipResolver,
    max_depth: u32,
    counters: Vec<u32>,
    open: Vec<usize>,
    document: Document,
}

impl<'a> SectionAssembler<'a> {
    pub fn new(
        classifier: &'a BlockClassifier,
        images: &'a dyn RelationshipResolver,
        max_depth: u32,
    ) -> Self {
        let max_depth = max_depth.clamp(1, MAX_HEADING_DEPTH);
        Self {
            classifier,
            images,
            max_depth,
            counters: vec![0; max_depth as usize + 1],
            open: Vec::new(),
            document: Document::default(),
        }
    }

    pub fn push(&mut self, block: RawBlock) -> Result<(), ExtractError> {
        match block {
            RawBlock::Paragraph(paragraph) => self.push_paragraph(paragraph),
            RawBlock::Table(table) => {
                let mut anomalies = Vec::new();
                let table = self.build_table(table, &mut anomalies)?;
                self.document.anomalies.extend(anomalies);
                self.current_items().push(Block::Table(table));
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Document {
        info!(
            sections = self.document.sections.len(),
            anomalies = self.document.anomalies.len(),
            "assembled section tree"
        );
        self.document
    }

    fn push_paragraph(&mut self, paragraph: RawParagraph) {
        let (classification, anomaly) = self.classifier.classify(&paragraph, self.images);
        let blank = paragraph.text.trim().is_empty();
        if blank
            && matches!(
                classification,
                Classification::ListItem(_) | Classification::Paragraph
            )
        {
            return;
        }

        if let Some(anomaly) = anomaly {
            warn!(style = %paragraph.style_name, "heading level unparsable, defaulting to 0");
            self.document.anomalies.push(anomaly);
        }

        match classification {
            Classification::Heading(level) => self.open_section(&paragraph.text, level),
            Classification::Image(path) => {
                self.current_items().push(Block::Image(Image { path }));
            }
            Classification::ListItem(level) => {
                let item = ListItem::new(strip_bullet(paragraph.text.trim()), level);
                if let Some(anomaly) = append_list_item(self.current_items(), item) {
                    self.document.anomalies.push(anomaly);
                }
            }
            Classification::Paragraph => {
                let block = Block::Paragraph(Paragraph::new(
                    paragraph.text.trim(),
                    &paragraph.style_name,
                ));
                self.current_items().push(block);
            }
        }
    }

    fn open_section(&mut self, text: &str, level: u32) {
        let level = if level > self.max_depth {
            warn!(level, max_depth = self.max_depth, "heading deeper than supported, clamping");
            self.document.anomalies.push(Anomaly::HeadingDepthClamped {
                level,
                max_depth: self.max_depth,
            });
            self.max_depth
        } else {
            level
        };

        let depth = level as usize;
        self.counters[depth] += 1;
        for counter in self.counters.iter_mut().skip(depth + 1) {
            *counter = 0;
        }
        let number = self.counters[1..=depth]
            .iter()
            .map(u32::to_string)
            .collect::<Vec<String>>()
            .join(".");

        while let Some(&top) = self.open.last() {
            if self.document.sections[top].level < level {
                break;
            }
            self.open.pop();
        }
        let parent = self.open.last().copied().unwrap_or(0);

        let title = text.trim();
        let section = Section {
            index: self.document.sections.len(),
            title: (!title.is_empty()).then(|| title.to_string()),
            number: Some(number),
            level,
            items: Vec::new(),
            parent: Some(parent),
            children: Vec::new(),
        };
        debug!(number = ?section.number, level, "opened section");
        let index = self.document.register(section);
        self.open.push(index);
    }

    fn current_items(&mut self) -> &mut Vec<Block> {
        let index = self.open.last().copied().unwrap_or(0);
        &mut self.document.sections[index].items
    }

    fn build_table(
        &self,
        raw: RawTable,
        anomalies: &mut Vec<Anomaly>,
    ) -> Result<Table, ExtractError> {
        anomalies.extend(raw.anomalies);
        let mut table = Table::default();

        for raw_row in raw.rows {
            let mut row = Row::default();
            for raw_cell in raw_row.cells {
                let coordinates = raw_cell.coordinates;
                let mut content = Some(raw_cell.blocks);

                for column in coordinates.left..coordinates.right.max(coordinates.left + 1) {
                    let (mut cell, anomaly) = Cell::from_grid(raw_cell.row, column, coordinates);
                    anomalies.extend(anomaly);
                    if cell.is_anchor {
                        if let Some(blocks) = content.take() {
                            cell.items = self.build_cell_items(blocks, anomalies)?;
                        }
                    }
                    row.add(cell);
                }
                if let Some(blocks) = content {
                    if blocks.iter().any(|block| matches!(block, RawBlock::Table(_))) {
                        return Err(nested_table());
                    }
                }
            }
            table.add(row);
        }

        Ok(table)
    }

    fn build_cell_items(
        &self,
        blocks: Vec<RawBlock>,
        anomalies: &mut Vec<Anomaly>,
    ) -> Result<Vec<Block>, ExtractError> {
        let mut items = Vec::new();

        for block in blocks {
            let paragraph = match block {
                RawBlock::Paragraph(paragraph) => paragraph,
                RawBlock::Table(_) => return Err(nested_table()),
            };
            let (classification, _) = self.classifier.classify(&paragraph, self.images);
            let text = paragraph.text.trim();
            match classification {
                Classification::Image(path) => items.push(Block::Image(Image { path })),
                _ if text.is_empty() => {}
                Classification::ListItem(level) => {
                    let item = ListItem::new(strip_bullet(text), level);
                    anomalies.extend(append_list_item(&mut items, item));
                }
                Classification::Heading(_) | Classification::Paragraph => {
                    items.push(Block::Paragraph(Paragraph::new(text, &paragraph.style_name)));
                }
            }
        }

        Ok(items)
    }
}

fn append_list_item(items: &mut Vec<Block>, item: ListItem) -> Option<Anomaly> {
    let outcome = match items.last_mut() {
        Some(Block::List(list)) if item.level >= list.level => list.add(item),
        _ => {
            let mut list = List::new(item.level);
            let outcome = list.add(item);
            items.push(Block::List(list));
            outcome
        }
    };

    match outcome {
        ListAdd::Appended => None,
        ListAdd::AppendedAfterJump { from, to } => Some(Anomaly::ListLevelJump { from, to }),
        ListAdd::Dropped { level, list_level } => {
            Some(Anomaly::ListLevelUnderflow { level, list_level })
        }
    }
}

fn nested_table() -> ExtractError {
    ExtractError::UnsupportedNesting("table nested inside a table cell".to_string())
}

pub fn assemble(
    blocks: Vec<RawBlock>,
    images: &dyn RelationshipResolver,
    profile: &ExtractionProfile,
) -> Result<Document, ExtractError> {
    let classifier = BlockClassifier::new(profile)?;
    let mut assembler = SectionAssembler::new(&classifier, images, profile.heading_depth);
    for block in blocks {
        assembler.push(block)?;
    }
    Ok(assembler.finish())
}
