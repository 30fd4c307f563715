use crate::domain::entities::dataset::DatasetId;
use crate::domain::entities::edit::ChangeRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    Message(String),
}

impl RepoError {
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        RepoError::Message(format!("{err:#}"))
    }
}

pub trait DatasetRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn list_datasets(&self) -> Result<Vec<DatasetMeta>, RepoError>;
    fn load_dataset(&self, id: DatasetId) -> Result<TabularData, RepoError>;

    fn create_dataset(
        &self,
        meta: NewDatasetMeta,
        data: TabularData,
    ) -> Result<DatasetId, RepoError>;
    /// Applies every change or none of them.
    fn apply_cell_changes(&self, id: DatasetId, changes: &[ChangeRecord]) -> Result<(), RepoError>;
    fn list_cell_changes(&self, id: DatasetId) -> Result<Vec<CellChangeLog>, RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMeta {
    pub id: DatasetId,
    pub name: String,
    pub row_count: i64,
    pub source_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDatasetMeta {
    pub name: String,
    pub source_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One persisted entry of the change audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChangeLog {
    pub row_idx: i64,
    pub column: String,
    pub original_value: String,
    pub new_value: String,
    pub committed_at: String,
}
