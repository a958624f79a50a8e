//! Structural extraction for clinical-trial protocol documents.
//!
//! A `.docx` package is read into a flat block stream, classified, assembled
//! into a numbered section tree, flattened into linked narrative content and
//! mined for title-page and design fields.

pub mod config;
pub mod docx;
pub mod error;
pub mod fields;
pub mod narrative;
pub mod structure;

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::ExtractionProfile;
use crate::docx::{DocxPackage, RawBlock, RelationshipResolver};
use crate::error::ExtractError;
use crate::fields::{ProtocolRecord, extract_record};
use crate::narrative::{Narrative, flatten};
use crate::structure::{Document, assemble};

#[derive(Debug, Clone, Serialize)]
pub struct ParsedProtocol {
    pub document: Document,
    pub narrative: Narrative,
    pub record: ProtocolRecord,
}

pub fn parse_blocks(
    blocks: Vec<RawBlock>,
    images: &dyn RelationshipResolver,
    profile: &ExtractionProfile,
) -> Result<ParsedProtocol, ExtractError> {
    let document = assemble(blocks, images, profile)?;
    let narrative = flatten(&document);
    let record = extract_record(&document, profile);

    info!(
        sections = document.sections().len(),
        narrative_nodes = narrative.len(),
        anomalies = document.anomalies().len(),
        "parsed protocol"
    );

    Ok(ParsedProtocol {
        document,
        narrative,
        record,
    })
}

pub fn parse_docx_bytes(
    bytes: Vec<u8>,
    profile: &ExtractionProfile,
) -> Result<ParsedProtocol, ExtractError> {
    let contents = DocxPackage::from_bytes(bytes)?.read()?;
    parse_blocks(contents.blocks, &contents.images, profile)
}

pub fn parse_docx_file(
    path: &Path,
    profile: &ExtractionProfile,
) -> Result<ParsedProtocol, ExtractError> {
    let contents = DocxPackage::open(path)?.read()?;
    parse_blocks(contents.blocks, &contents.images, profile)
}
