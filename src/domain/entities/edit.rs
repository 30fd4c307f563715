use std::fmt;

/// Textual representation of a cell value. Compared with exact string equality.
pub type RawValue = String;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row_id: String,
    pub column_id: String,
}

impl CellKey {
    pub fn new(row_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            column_id: column_id.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row_id, self.column_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyChange {
    pub original_value: RawValue,
    pub new_value: RawValue,
}

/// One line of the save summary, and one element of a commit-sink payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub row_id: String,
    /// 1-based position of the row in the bound dataset.
    pub row_number: usize,
    pub column_id: String,
    pub original_value: RawValue,
    pub new_value: RawValue,
}

impl ChangeRecord {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.row_id.clone(), self.column_id.clone())
    }
}
