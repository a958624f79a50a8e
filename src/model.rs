use serde::{Deserialize, Serialize};

use protocol_extract::ParsedProtocol;
use protocol_extract::config::ExtractionProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolEntry {
    pub filename: String,
    pub doc_id: String,
    pub size_bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub protocol_count: usize,
    pub protocols: Vec<ProtocolEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionPaths {
    pub source_path: String,
    pub output_path: String,
    pub db_path: Option<String>,
    pub media_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionCounts {
    pub sections: usize,
    pub tables: usize,
    pub narrative_contents: usize,
    pub images: usize,
    pub media_written: usize,
    pub anomalies: usize,
}

#[derive(Debug, Serialize)]
pub struct ExtractionOutput<'a> {
    pub manifest_version: u32,
    pub run_id: String,
    pub doc_id: String,
    pub sha256: String,
    pub extracted_at: String,
    pub paths: ExtractionPaths,
    pub counts: ExtractionCounts,
    pub profile: &'a ExtractionProfile,
    pub protocol: &'a ParsedProtocol,
}
