use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use tracing::info;

use protocol_extract::ParsedProtocol;
use protocol_extract::narrative::render_blocks;

use crate::util::{ensure_directory, now_utc_string};

pub const DB_SCHEMA_VERSION: &str = "0.1.0";
pub const DB_FILENAME: &str = "protocols.sqlite";

#[derive(Debug, Clone)]
pub struct StoredDocument<'a> {
    pub doc_id: &'a str,
    pub filename: &'a str,
    pub sha256: &'a str,
    pub extracted_at: &'a str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub sections: usize,
    pub narrative_contents: usize,
    pub narrative_content_items: usize,
}

pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    let connection =
        Connection::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS documents (
          doc_id TEXT PRIMARY KEY,
          filename TEXT NOT NULL,
          sha256 TEXT NOT NULL,
          extracted_at TEXT NOT NULL,
          full_title TEXT,
          trial_phase_code TEXT,
          anomaly_count INTEGER NOT NULL DEFAULT 0,
          record_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sections (
          doc_id TEXT NOT NULL,
          section_index INTEGER NOT NULL,
          parent_index INTEGER,
          number TEXT,
          title TEXT,
          level INTEGER NOT NULL,
          html TEXT NOT NULL,
          PRIMARY KEY (doc_id, section_index),
          FOREIGN KEY(doc_id) REFERENCES documents(doc_id)
        );

        CREATE TABLE IF NOT EXISTS narrative_contents (
          doc_id TEXT NOT NULL,
          content_id TEXT NOT NULL,
          order_index INTEGER NOT NULL,
          section_number TEXT,
          section_title TEXT,
          content_item_id TEXT NOT NULL,
          child_ids TEXT NOT NULL,
          previous_id TEXT,
          next_id TEXT,
          PRIMARY KEY (doc_id, content_id),
          FOREIGN KEY(doc_id) REFERENCES documents(doc_id)
        );

        CREATE TABLE IF NOT EXISTS narrative_content_items (
          doc_id TEXT NOT NULL,
          item_id TEXT NOT NULL,
          name TEXT NOT NULL,
          text TEXT NOT NULL,
          PRIMARY KEY (doc_id, item_id),
          FOREIGN KEY(doc_id) REFERENCES documents(doc_id)
        );

        CREATE INDEX IF NOT EXISTS idx_sections_doc_number ON sections(doc_id, number);
        CREATE INDEX IF NOT EXISTS idx_narrative_contents_doc_order ON narrative_contents(doc_id, order_index);
        ",
    )?;

    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_updated_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [now_utc_string()],
    )?;

    Ok(())
}

pub fn replace_document(
    connection: &mut Connection,
    document: &StoredDocument<'_>,
    protocol: &ParsedProtocol,
) -> Result<StoreCounts> {
    let record_json =
        serde_json::to_string(&protocol.record).context("failed to serialize protocol record")?;
    let tx = connection.transaction()?;
    let mut counts = StoreCounts::default();

    for table in [
        "narrative_content_items",
        "narrative_contents",
        "sections",
        "documents",
    ] {
        tx.execute(&format!("DELETE FROM {table} WHERE doc_id = ?1"), [document.doc_id])
            .with_context(|| format!("failed to clear {table} for {}", document.doc_id))?;
    }

    tx.execute(
        "
        INSERT INTO documents(
          doc_id, filename, sha256, extracted_at, full_title, trial_phase_code,
          anomaly_count, record_json
        )
        VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ",
        params![
            document.doc_id,
            document.filename,
            document.sha256,
            document.extracted_at,
            protocol.record.title_page.full_title,
            protocol.record.title_page.trial_phase.code,
            protocol.document.anomalies().len() as i64,
            record_json,
        ],
    )?;

    {
        let mut section_statement = tx.prepare(
            "
            INSERT INTO sections(doc_id, section_index, parent_index, number, title, level, html)
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )?;
        for section in protocol.document.sections() {
            section_statement.execute(params![
                document.doc_id,
                section.index as i64,
                section.parent.map(|parent| parent as i64),
                section.number,
                section.title,
                section.level,
                render_blocks(&section.items),
            ])?;
            counts.sections += 1;
        }

        let mut content_statement = tx.prepare(
            "
            INSERT INTO narrative_contents(
              doc_id, content_id, order_index, section_number, section_title,
              content_item_id, child_ids, previous_id, next_id
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )?;
        for (order_index, node) in protocol.narrative.contents.iter().enumerate() {
            let child_ids =
                serde_json::to_string(&node.child_ids).context("failed to serialize child ids")?;
            content_statement.execute(params![
                document.doc_id,
                node.id,
                order_index as i64,
                node.section_number,
                node.section_title,
                node.content_reference,
                child_ids,
                node.previous_id,
                node.next_id,
            ])?;
            counts.narrative_contents += 1;
        }

        let mut item_statement = tx.prepare(
            "
            INSERT INTO narrative_content_items(doc_id, item_id, name, text)
            VALUES(?1, ?2, ?3, ?4)
            ",
        )?;
        for item in &protocol.narrative.items {
            item_statement.execute(params![document.doc_id, item.id, item.name, item.text])?;
            counts.narrative_content_items += 1;
        }
    }

    tx.commit()?;
    info!(
        doc_id = document.doc_id,
        sections = counts.sections,
        narrative_contents = counts.narrative_contents,
        "stored extraction"
    );

    Ok(counts)
}

pub fn query_count(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}
