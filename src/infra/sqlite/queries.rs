use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::{params, OptionalExtension, Transaction};

use crate::domain::entities::edit::ChangeRecord;
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::{CellChangeLog, DatasetMeta, TabularData};

pub fn insert_header_names(
    tx: &Transaction<'_>,
    dataset_id: i64,
    headers: &[String],
) -> Result<()> {
    let mut insert_header = tx
        .prepare("INSERT INTO column_name(dataset_id, col_idx, name) VALUES (?1, ?2, ?3)")
        .context("failed to prepare header insert")?;

    for (col_idx, name) in headers.iter().enumerate() {
        insert_header
            .execute(params![dataset_id, col_idx as i64, name])
            .context("failed to insert header")?;
    }

    Ok(())
}

pub fn list_datasets(db_path: &Path) -> Result<Vec<DatasetMeta>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, name, row_count, source_path
             FROM dataset
             ORDER BY id ASC",
        )
        .context("failed to prepare datasets query")?;

    let datasets = stmt
        .query_map([], |row| {
            Ok(DatasetMeta {
                id: row.get::<_, i64>(0)?.into(),
                name: row.get(1)?,
                row_count: row.get(2)?,
                source_path: row.get(3)?,
            })
        })
        .context("failed to query datasets")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect datasets")?;

    Ok(datasets)
}

/// Loads every column and row of a dataset in storage order.
pub fn load_dataset(db_path: &Path, dataset_id: i64) -> Result<TabularData> {
    let conn = open_connection(db_path)?;

    let row_count: i64 = conn
        .query_row(
            "SELECT row_count FROM dataset WHERE id = ?1",
            params![dataset_id],
            |row| row.get(0),
        )
        .optional()
        .context("failed to query dataset")?
        .with_context(|| format!("dataset #{dataset_id} does not exist"))?;

    let mut columns_stmt = conn
        .prepare(
            "SELECT name
             FROM column_name
             WHERE dataset_id = ?1
             ORDER BY col_idx ASC",
        )
        .context("failed to prepare columns query")?;
    let columns = columns_stmt
        .query_map([dataset_id], |row| row.get::<_, String>(0))
        .context("failed to query columns")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect columns")?;
    drop(columns_stmt);

    let mut rows = vec![vec![String::new(); columns.len()]; row_count.max(0) as usize];

    let mut cells_stmt = conn
        .prepare(
            "SELECT row_idx, col_idx, value
             FROM cell
             WHERE dataset_id = ?1
             ORDER BY row_idx ASC, col_idx ASC",
        )
        .context("failed to prepare cell query")?;
    let mut cells = cells_stmt
        .query(params![dataset_id])
        .context("failed to run cell query")?;

    while let Some(row) = cells.next().context("failed to read cell")? {
        let row_idx: i64 = row.get(0).context("failed to read row_idx")?;
        let col_idx: i64 = row.get(1).context("failed to read col_idx")?;
        let value: String = row.get(2).context("failed to read value")?;

        if let Some(dest_cell) = rows
            .get_mut(row_idx as usize)
            .and_then(|dest_row| dest_row.get_mut(col_idx as usize))
        {
            *dest_cell = value;
        }
    }

    Ok(TabularData { columns, rows })
}

pub fn create_dataset_from_rows(
    db_path: &Path,
    name: &str,
    source_path: &str,
    columns: &[String],
    rows: &[Vec<String>],
) -> Result<i64> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start dataset create transaction")?;

    let dataset_id = insert_dataset(&tx, name, source_path, columns, rows)?;

    tx.commit().context("failed to commit dataset create")?;
    Ok(dataset_id)
}

/// Inserts a dataset with its header and cells inside an existing transaction.
pub fn insert_dataset(
    tx: &Transaction<'_>,
    name: &str,
    source_path: &str,
    columns: &[String],
    rows: &[Vec<String>],
) -> Result<i64> {
    if columns.is_empty() {
        bail!("dataset {name:?} has no header columns")
    }
    if let Some((idx, column)) = columns
        .iter()
        .enumerate()
        .find(|&(idx, column)| columns[..idx].contains(column))
    {
        bail!("dataset {name:?} repeats column {column:?} at position {}", idx + 1)
    }

    tx.execute(
        "INSERT INTO dataset(name, source_path, row_count) VALUES (?1, ?2, ?3)",
        params![name, source_path, rows.len() as i64],
    )
    .context("failed to insert dataset")?;
    let dataset_id = tx.last_insert_rowid();

    insert_header_names(tx, dataset_id, columns)?;

    let mut insert_cell = tx
        .prepare("INSERT INTO cell(dataset_id, row_idx, col_idx, value) VALUES (?1, ?2, ?3, ?4)")
        .context("failed to prepare cell insert")?;
    for (row_idx, row) in rows.iter().enumerate() {
        for col_idx in 0..columns.len() {
            let value = row.get(col_idx).map(String::as_str).unwrap_or("");
            insert_cell
                .execute(params![dataset_id, row_idx as i64, col_idx as i64, value])
                .context("failed to insert dataset cell")?;
        }
    }

    Ok(dataset_id)
}

/// Writes a batch of cell edits in one transaction, recording each one in the
/// `cell_change` audit table. A cell whose stored value no longer matches the
/// change's original value fails the whole batch.
pub fn apply_cell_changes(db_path: &Path, dataset_id: i64, changes: &[ChangeRecord]) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start update transaction")?;
    let committed_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    for change in changes {
        let row_idx: i64 = change
            .row_id
            .parse()
            .with_context(|| format!("invalid row id: {:?}", change.row_id))?;
        let col_idx: i64 = tx
            .query_row(
                "SELECT col_idx FROM column_name WHERE dataset_id = ?1 AND name = ?2
                 ORDER BY col_idx ASC LIMIT 1",
                params![dataset_id, change.column_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to resolve column")?
            .with_context(|| format!("unknown column: {:?}", change.column_id))?;

        let updated = tx
            .execute(
                "UPDATE cell SET value = ?1
                 WHERE dataset_id = ?2 AND row_idx = ?3 AND col_idx = ?4 AND value = ?5",
                params![
                    change.new_value,
                    dataset_id,
                    row_idx,
                    col_idx,
                    change.original_value
                ],
            )
            .context("failed to update cell")?;
        if updated != 1 {
            bail!(
                "row {} column {:?} no longer holds {:?}",
                change.row_number,
                change.column_id,
                change.original_value
            )
        }

        tx.execute(
            "INSERT INTO cell_change(dataset_id, row_idx, col_idx, original_value, new_value, committed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                dataset_id,
                row_idx,
                col_idx,
                change.original_value,
                change.new_value,
                committed_at
            ],
        )
        .context("failed to record cell change")?;
    }

    tx.commit().context("failed to commit cell changes")?;
    Ok(())
}

pub fn list_cell_changes(db_path: &Path, dataset_id: i64) -> Result<Vec<CellChangeLog>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT ch.row_idx, COALESCE(cn.name, ''), ch.original_value, ch.new_value, ch.committed_at
             FROM cell_change ch
             LEFT JOIN column_name cn
               ON cn.dataset_id = ch.dataset_id AND cn.col_idx = ch.col_idx
             WHERE ch.dataset_id = ?1
             ORDER BY ch.id ASC",
        )
        .context("failed to prepare change log query")?;

    let changes = stmt
        .query_map(params![dataset_id], |row| {
            Ok(CellChangeLog {
                row_idx: row.get(0)?,
                column: row.get(1)?,
                original_value: row.get(2)?,
                new_value: row.get(3)?,
                committed_at: row.get(4)?,
            })
        })
        .context("failed to query change log")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect change log")?;

    Ok(changes)
}
