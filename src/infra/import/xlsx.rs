use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::infra::import::unique_column_names;
use crate::infra::sqlite::queries::insert_dataset;
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::ImportResult;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// Splits a sheet into header and body rows. Leading blank rows are skipped;
/// blank header cells get a positional name and repeated names a suffix.
pub fn split_header(rows: Vec<Vec<String>>) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let mut rows = rows
        .into_iter()
        .skip_while(|row| row.iter().all(|cell| cell.trim().is_empty()));
    let header = rows.next()?;
    let columns = unique_column_names(
        header
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = name.trim().to_string();
                if name.is_empty() {
                    format!("column_{}", idx + 1)
                } else {
                    name
                }
            })
            .collect(),
    );
    let body = rows
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    Some((columns, body))
}

/// Imports every non-empty worksheet as its own dataset, all in one transaction.
pub fn import_xlsx_to_sqlite(db_path: &Path, xlsx_path: &Path) -> Result<Vec<ImportResult>> {
    init_db(db_path)?;

    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open xlsx: {}", xlsx_path.display()))?;
    let source_path = xlsx_path.to_string_lossy().into_owned();

    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start xlsx import transaction")?;

    let mut results = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read sheet: {sheet_name}"))?;
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|r| r.iter().map(cell_to_string).collect())
            .collect();
        let Some((columns, body)) = split_header(rows) else {
            continue;
        };

        let dataset_id = insert_dataset(
            &tx,
            &sheet_name,
            &format!("{source_path}#{sheet_name}"),
            &columns,
            &body,
        )?;
        results.push(ImportResult {
            dataset_id,
            row_count: body.len() as i64,
        });
    }

    if results.is_empty() {
        anyhow::bail!("workbook has no sheet with a header row: {}", xlsx_path.display())
    }
    tx.commit().context("failed to commit xlsx import")?;
    tracing::info!(sheets = results.len(), path = %xlsx_path.display(), "workbook imported");

    Ok(results)
}
