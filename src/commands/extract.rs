use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use protocol_extract::config::ExtractionProfile;
use protocol_extract::docx::DocxPackage;
use protocol_extract::error::Anomaly;
use protocol_extract::{ParsedProtocol, parse_blocks};

use super::store::{DB_FILENAME, StoredDocument, open_store, replace_document};
use crate::cli::ExtractArgs;
use crate::model::{ExtractionCounts, ExtractionOutput, ExtractionPaths};
use crate::util::{
    doc_id_from_sha256, ensure_directory, now_utc_string, sha256_bytes, utc_compact_string,
    write_json_pretty,
};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("extract-{}", utc_compact_string(started_ts));
    let profile = load_profile(args.profile.as_deref())?;

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let sha256 = sha256_bytes(&bytes);
    let doc_id = doc_id_from_sha256(&sha256);
    info!(input = %args.input.display(), doc_id = %doc_id, run_id = %run_id, "starting extraction");

    let mut package = DocxPackage::from_bytes(bytes)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let contents = package
        .read()
        .with_context(|| format!("failed to read document body of {}", args.input.display()))?;
    let protocol = parse_blocks(contents.blocks, &contents.images, &profile)
        .with_context(|| format!("processing failed for {}", args.input.display()))?;
    log_anomalies(protocol.document.anomalies());

    let media_written = match args.media_dir.as_deref() {
        Some(media_dir) => write_media(&mut package, &protocol, &media_dir.join(&doc_id))?,
        None => 0,
    };

    let extracted_at = now_utc_string();
    let db_path = args
        .store
        .then(|| {
            args.db_path
                .clone()
                .unwrap_or_else(|| args.cache_root.join(DB_FILENAME))
        });
    if let Some(db_path) = db_path.as_deref() {
        let filename = args
            .input
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let mut connection = open_store(db_path)?;
        replace_document(
            &mut connection,
            &StoredDocument {
                doc_id: &doc_id,
                filename,
                sha256: &sha256,
                extracted_at: &extracted_at,
            },
            &protocol,
        )
        .with_context(|| format!("failed to store extraction in {}", db_path.display()))?;
    }

    let output_path = args.output_path.clone().unwrap_or_else(|| {
        args.cache_root
            .join("extractions")
            .join(format!("{doc_id}.json"))
    });
    let output = ExtractionOutput {
        manifest_version: 1,
        run_id,
        doc_id,
        sha256,
        extracted_at,
        paths: ExtractionPaths {
            source_path: args.input.display().to_string(),
            output_path: output_path.display().to_string(),
            db_path: db_path.as_ref().map(|path| path.display().to_string()),
            media_dir: args.media_dir.as_ref().map(|path| path.display().to_string()),
        },
        counts: ExtractionCounts {
            sections: protocol.document.sections().len(),
            tables: protocol.document.tables().count(),
            narrative_contents: protocol.narrative.len(),
            images: protocol.document.images().len(),
            media_written,
            anomalies: protocol.document.anomalies().len(),
        },
        profile: &profile,
        protocol: &protocol,
    };

    write_json_pretty(&output_path, &output)?;
    info!(
        path = %output_path.display(),
        sections = output.counts.sections,
        narrative_contents = output.counts.narrative_contents,
        "extraction completed"
    );

    Ok(())
}

pub fn load_profile(path: Option<&Path>) -> Result<ExtractionProfile> {
    match path {
        Some(path) => ExtractionProfile::load_from_file(path)
            .with_context(|| format!("failed to load extraction profile {}", path.display())),
        None => Ok(ExtractionProfile::default()),
    }
}

fn log_anomalies(anomalies: &[Anomaly]) {
    if anomalies.is_empty() {
        return;
    }
    warn!(count = anomalies.len(), "extraction completed with structural anomalies");
}

fn write_media(
    package: &mut DocxPackage,
    protocol: &ParsedProtocol,
    media_dir: &Path,
) -> Result<usize> {
    let mut paths = protocol.document.images();
    paths.sort_unstable();
    paths.dedup();
    if paths.is_empty() {
        return Ok(0);
    }

    ensure_directory(media_dir)?;
    for part in &paths {
        let bytes = package
            .media(part)
            .with_context(|| format!("failed to extract image part {part}"))?;
        let target = media_target(media_dir, part);
        fs::write(&target, bytes)
            .with_context(|| format!("failed to write {}", target.display()))?;
    }

    info!(count = paths.len(), dir = %media_dir.display(), "wrote media parts");
    Ok(paths.len())
}

fn media_target(media_dir: &Path, part: &str) -> PathBuf {
    let name = part.rsplit('/').next().unwrap_or(part);
    media_dir.join(name)
}
