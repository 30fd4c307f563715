use std::collections::HashMap;

use crate::domain::entities::edit::CellKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetId(pub i64);

impl From<i64> for DatasetId {
    fn from(value: i64) -> Self {
        DatasetId(value)
    }
}

impl From<DatasetId> for i64 {
    fn from(value: DatasetId) -> Self {
        value.0
    }
}

/// Display values for one bound dataset, as supplied by the grid host.
///
/// Row identifiers are the stringified storage row index, so they stay stable
/// across re-renders of the same dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridData {
    pub dataset_id: Option<DatasetId>,
    pub columns: Vec<String>,
    pub row_ids: Vec<String>,
    values: HashMap<CellKey, String>,
}

impl GridData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(dataset_id: Option<DatasetId>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut values = HashMap::new();
        let mut row_ids = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.into_iter().enumerate() {
            let row_id = row_idx.to_string();
            for (col_idx, column) in columns.iter().enumerate() {
                let value = row.get(col_idx).cloned().unwrap_or_default();
                values.insert(CellKey::new(row_id.clone(), column.clone()), value);
            }
            row_ids.push(row_id);
        }
        Self {
            dataset_id,
            columns,
            row_ids,
            values,
        }
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn value(&self, key: &CellKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Overwrites the displayed value of an existing cell. Unknown keys are ignored.
    pub fn set_value(&mut self, key: &CellKey, value: String) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// 1-based display row number for a row id.
    pub fn row_number(&self, row_id: &str) -> Option<usize> {
        self.row_ids.iter().position(|id| id == row_id).map(|idx| idx + 1)
    }

    pub fn col_idx(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column_id)
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.row_ids
            .iter()
            .map(|row_id| {
                self.columns
                    .iter()
                    .map(|column| {
                        self.values
                            .get(&CellKey::new(row_id.clone(), column.clone()))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_ids.len()
    }
}
