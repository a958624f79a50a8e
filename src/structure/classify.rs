use regex::Regex;

use crate::config::ExtractionProfile;
use crate::docx::{RawParagraph, RelationshipResolver};
use crate::error::{Anomaly, ExtractError};

pub const BULLET_GLYPH: char = '\u{2022}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Heading(u32),
    ListItem(u32),
    Image(String),
    Paragraph,
}

#[derive(Debug)]
pub struct BlockClassifier {
    heading_patterns: [Regex; 2],
    list_style_names: Vec<String>,
}

impl BlockClassifier {
    pub fn new(profile: &ExtractionProfile) -> Result<Self, ExtractError> {
        Ok(Self {
            heading_patterns: [
                Regex::new(r"(?i)^\d{2}\s+Heading\s+(\S+)$")?,
                Regex::new(r"(?i)^Heading\s+(\S+)$")?,
            ],
            list_style_names: profile
                .list_style_names
                .iter()
                .map(|name| name.trim().to_lowercase())
                .collect(),
        })
    }

    pub fn classify(
        &self,
        paragraph: &RawParagraph,
        images: &dyn RelationshipResolver,
    ) -> (Classification, Option<Anomaly>) {
        if let Some((level, anomaly)) = self.heading_level(&paragraph.style_name) {
            return (Classification::Heading(level), anomaly);
        }

        if paragraph.has_graphic {
            if let Some(path) = paragraph
                .graphic_rel_ids
                .iter()
                .find_map(|rel_id| images.resolve(rel_id))
            {
                return (Classification::Image(path.to_string()), None);
            }
        }

        if let Some(level) = self.list_level(paragraph) {
            return (Classification::ListItem(level), None);
        }

        (Classification::Paragraph, None)
    }

    fn heading_level(&self, style_name: &str) -> Option<(u32, Option<Anomaly>)> {
        let style = style_name.trim();
        let captures = self
            .heading_patterns
            .iter()
            .find_map(|pattern| pattern.captures(style))?;
        let raw_level = captures.get(1).map(|value| value.as_str()).unwrap_or("");

        match raw_level.parse::<u32>() {
            Ok(level) => Some((level, None)),
            Err(_) => Some((
                0,
                Some(Anomaly::UnparsableHeadingLevel {
                    style: style.to_string(),
                }),
            )),
        }
    }

    fn list_level(&self, paragraph: &RawParagraph) -> Option<u32> {
        if let Some(level) = paragraph.indent_level {
            return Some(level);
        }

        let style = paragraph.style_name.trim().to_lowercase();
        if self.list_style_names.iter().any(|name| *name == style) {
            return Some(0);
        }

        if paragraph.text.starts_with(BULLET_GLYPH) {
            return Some(0);
        }

        None
    }
}

pub fn strip_bullet(text: &str) -> &str {
    text.strip_prefix(BULLET_GLYPH)
        .map(str::trim_start)
        .unwrap_or(text)
}
