use std::fs;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use super::inventory::INVENTORY_FILENAME;
use super::store::{DB_FILENAME, query_count};
use crate::cli::StatusArgs;
use crate::model::ProtocolInventoryManifest;

pub fn run(args: StatusArgs) -> Result<()> {
    let inventory_path = args.cache_root.join("manifests").join(INVENTORY_FILENAME);
    let extractions_dir = args.cache_root.join("extractions");
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.cache_root.join(DB_FILENAME));

    info!(cache_root = %args.cache_root.display(), "status requested");

    if inventory_path.exists() {
        let raw = fs::read(&inventory_path)
            .with_context(|| format!("failed to read {}", inventory_path.display()))?;
        let inventory: ProtocolInventoryManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", inventory_path.display()))?;

        info!(
            generated_at = %inventory.generated_at,
            source = %inventory.source_directory,
            protocol_count = inventory.protocol_count,
            "loaded inventory manifest"
        );
    } else {
        warn!(path = %inventory_path.display(), "inventory manifest missing");
    }

    if extractions_dir.is_dir() {
        let extraction_count = fs::read_dir(&extractions_dir)
            .with_context(|| format!("failed to read {}", extractions_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .count();
        info!(
            path = %extractions_dir.display(),
            extractions = extraction_count,
            "extraction files"
        );
    } else {
        warn!(path = %extractions_dir.display(), "extractions directory missing");
    }

    if db_path.exists() {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        let documents = query_count(&conn, "SELECT COUNT(*) FROM documents").unwrap_or(0);
        let sections = query_count(&conn, "SELECT COUNT(*) FROM sections").unwrap_or(0);
        let contents = query_count(&conn, "SELECT COUNT(*) FROM narrative_contents").unwrap_or(0);
        let schema_version = conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'db_schema_version'",
                [],
                |row| row.get::<_, String>(0),
            )
            .unwrap_or_default();

        info!(
            path = %db_path.display(),
            schema_version = %schema_version,
            documents,
            sections,
            narrative_contents = contents,
            "database status"
        );
    } else {
        warn!(path = %db_path.display(), "database file missing");
    }

    Ok(())
}
