use std::path::Path;

use anyhow::{Context, Result};

use crate::infra::import::unique_column_names;
use crate::infra::sqlite::queries::insert_dataset;
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::TabularData;
use crate::ImportResult;

/// Reads a CSV file with a mandatory header row. Short records are padded with
/// empty cells and repeated header names get a numeric suffix.
pub fn read_csv(csv_path: &Path) -> Result<TabularData> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let columns = unique_column_names(
        reader
            .headers()
            .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
            .iter()
            .map(str::to_string)
            .collect(),
    );

    if columns.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let row = (0..columns.len())
            .map(|col_idx| record.get(col_idx).unwrap_or("").to_string())
            .collect();
        rows.push(row);
    }

    Ok(TabularData { columns, rows })
}

pub fn import_csv_to_sqlite(db_path: &Path, csv_path: &Path) -> Result<ImportResult> {
    init_db(db_path)?;
    let data = read_csv(csv_path)?;

    let source_path = csv_path.to_string_lossy().into_owned();
    let dataset_name = csv_path
        .file_stem()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("dataset")
        .to_string();

    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;
    let dataset_id = insert_dataset(&tx, &dataset_name, &source_path, &data.columns, &data.rows)?;
    tx.commit().context("failed to commit import transaction")?;

    tracing::info!(dataset_id, rows = data.rows.len(), path = %csv_path.display(), "csv imported");

    Ok(ImportResult {
        dataset_id,
        row_count: data.rows.len() as i64,
    })
}
