use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::entities::dataset::DatasetId;
use crate::domain::entities::edit::ChangeRecord;
use crate::usecase::ports::commit_sink::{CommitBatch, CommitError, CommitSink};
use crate::usecase::ports::repo::{CellChangeLog, DatasetRepository, NewDatasetMeta, RepoError, TabularData};

/// Persists grid saves through a [`DatasetRepository`].
pub struct EditService {
    repo: Arc<dyn DatasetRepository>,
}

impl EditService {
    pub fn new(repo: Arc<dyn DatasetRepository>) -> Self {
        Self { repo }
    }

    pub fn apply_changes(&self, dataset_id: DatasetId, changes: &[ChangeRecord]) -> Result<(), RepoError> {
        self.repo.apply_cell_changes(dataset_id, changes)
    }

    pub fn create_dataset(
        &self,
        meta: NewDatasetMeta,
        data: TabularData,
    ) -> Result<DatasetId, RepoError> {
        self.repo.create_dataset(meta, data)
    }

    pub fn change_history(&self, dataset_id: DatasetId) -> Result<Vec<CellChangeLog>, RepoError> {
        self.repo.list_cell_changes(dataset_id)
    }
}

#[async_trait(?Send)]
impl CommitSink for EditService {
    async fn commit(&self, batch: &CommitBatch) -> Result<(), CommitError> {
        let dataset_id = batch.dataset_id.ok_or(CommitError::NoDataset)?;
        self.apply_changes(dataset_id, &batch.changes)?;
        info!(dataset = dataset_id.0, count = batch.changes.len(), "changes persisted");
        Ok(())
    }
}
