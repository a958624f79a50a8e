use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ExtractError;

pub const DEFAULT_HEADING_DEPTH: u32 = 6;
pub const MAX_HEADING_DEPTH: u32 = 9;
pub const DEFAULT_ADDRESS_DELIMITER: &str = "|";
pub const DEFAULT_ADDRESS_PLACEHOLDER: &str = "Address not provided";
pub const DEFAULT_TITLE_PAGE_ANCHOR: &str = "Full Title";

const DEFAULT_LIST_STYLES: &[&str] = &[
    "List Paragraph",
    "List Bullet",
    "List Bullet 2",
    "List Bullet 3",
    "List Number",
    "List Number 2",
    "List Number 3",
    "List Continue",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionProfile {
    pub heading_depth: u32,
    pub list_style_names: Vec<String>,
    pub address_delimiter: String,
    pub address_placeholder: String,
    pub title_page_anchor: String,
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self {
            heading_depth: DEFAULT_HEADING_DEPTH,
            list_style_names: DEFAULT_LIST_STYLES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            address_delimiter: DEFAULT_ADDRESS_DELIMITER.to_string(),
            address_placeholder: DEFAULT_ADDRESS_PLACEHOLDER.to_string(),
            title_page_anchor: DEFAULT_TITLE_PAGE_ANCHOR.to_string(),
        }
    }
}

impl ExtractionProfile {
    pub fn load_from_file(path: &Path) -> Result<Self, ExtractError> {
        let raw = fs::read(path)
            .map_err(|err| ExtractError::io(format!("profile {}", path.display()), err))?;
        let profile: ExtractionProfile =
            serde_json::from_slice(&raw).map_err(|err| ExtractError::Profile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        Ok(profile.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.heading_depth == 0 {
            self.heading_depth = DEFAULT_HEADING_DEPTH;
        } else if self.heading_depth > MAX_HEADING_DEPTH {
            warn!(
                heading_depth = self.heading_depth,
                max = MAX_HEADING_DEPTH,
                "heading depth beyond supported range, clamping"
            );
            self.heading_depth = MAX_HEADING_DEPTH;
        }
        self
    }
}
