use async_trait::async_trait;

use crate::domain::entities::dataset::DatasetId;
use crate::domain::entities::edit::ChangeRecord;
use crate::usecase::ports::repo::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("commit rejected: {0}")]
    Rejected(String),
    #[error("no dataset is bound to the grid")]
    NoDataset,
    #[error(transparent)]
    Storage(#[from] RepoError),
}

/// Everything the grid hands to persistence in one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitBatch {
    pub dataset_id: Option<DatasetId>,
    pub changes: Vec<ChangeRecord>,
}

/// Asynchronous persistence of committed cell changes.
///
/// Implementations must report all-or-nothing: `Ok` means every change in the
/// batch is durable, `Err` means none of them are.
#[async_trait(?Send)]
pub trait CommitSink {
    async fn commit(&self, batch: &CommitBatch) -> Result<(), CommitError>;
}
