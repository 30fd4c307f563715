use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS dataset (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            source_path TEXT NOT NULL,
            row_count   INTEGER NOT NULL,
            imported_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS column_name (
            dataset_id  INTEGER NOT NULL,
            col_idx     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            PRIMARY KEY (dataset_id, col_idx),
            FOREIGN KEY (dataset_id) REFERENCES dataset(id)
        );

        CREATE TABLE IF NOT EXISTS cell (
            dataset_id  INTEGER NOT NULL,
            row_idx     INTEGER NOT NULL,
            col_idx     INTEGER NOT NULL,
            value       TEXT NOT NULL,
            PRIMARY KEY (dataset_id, row_idx, col_idx),
            FOREIGN KEY (dataset_id) REFERENCES dataset(id)
        );

        CREATE TABLE IF NOT EXISTS cell_change (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            dataset_id      INTEGER NOT NULL,
            row_idx         INTEGER NOT NULL,
            col_idx         INTEGER NOT NULL,
            original_value  TEXT NOT NULL,
            new_value       TEXT NOT NULL,
            committed_at    TEXT NOT NULL,
            FOREIGN KEY (dataset_id) REFERENCES dataset(id)
        );

        CREATE INDEX IF NOT EXISTS idx_cell_dataset_row
            ON cell(dataset_id, row_idx);

        CREATE INDEX IF NOT EXISTS idx_cell_change_dataset
            ON cell_change(dataset_id, id);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
