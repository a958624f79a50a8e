use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{ProtocolEntry, ProtocolInventoryManifest};
use crate::util::{doc_id_from_sha256, now_utc_string, sha256_file, write_json_pretty};

pub const INVENTORY_FILENAME: &str = "protocol_inventory.json";

pub fn run(args: InventoryArgs) -> Result<()> {
    let source_dir = args
        .source_dir
        .clone()
        .unwrap_or_else(|| args.cache_root.join("sources"));
    let manifest = build_manifest(&source_dir)?;

    if args.dry_run {
        info!(
            protocol_count = manifest.protocol_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.cache_root.join("manifests").join(INVENTORY_FILENAME));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(protocol_count = manifest.protocol_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(source_dir: &Path) -> Result<ProtocolInventoryManifest> {
    let mut paths = discover_documents(source_dir)?;
    paths.sort();

    if paths.is_empty() {
        bail!("no .docx protocols found in {}", source_dir.display());
    }

    let mut protocols = Vec::with_capacity(paths.len());
    for path in paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;
        let size_bytes = fs::metadata(&path)
            .with_context(|| format!("failed to inspect {}", path.display()))?
            .len();
        let sha256 = sha256_file(&path)?;

        protocols.push(ProtocolEntry {
            filename,
            doc_id: doc_id_from_sha256(&sha256),
            size_bytes,
            sha256,
        });
    }

    Ok(ProtocolInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: source_dir.display().to_string(),
        protocol_count: protocols.len(),
        protocols,
    })
}

fn discover_documents(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    let entries = fs::read_dir(source_dir)
        .with_context(|| format!("failed to read {}", source_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", source_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_docx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("docx"))
            .unwrap_or(false);
        // Word lock files share the extension
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("~$"))
            .unwrap_or(false);

        if is_docx && !is_lock_file {
            documents.push(path);
        }
    }

    Ok(documents)
}
