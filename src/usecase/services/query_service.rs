use std::sync::Arc;

use crate::domain::entities::dataset::{DatasetId, GridData};
use crate::usecase::ports::repo::{DatasetMeta, DatasetRepository, RepoError};

pub struct QueryService {
    repo: Arc<dyn DatasetRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn DatasetRepository>) -> Self {
        Self { repo }
    }

    pub fn list_datasets(&self) -> Result<Vec<DatasetMeta>, RepoError> {
        self.repo.list_datasets()
    }

    pub fn load_grid(&self, dataset_id: DatasetId) -> Result<GridData, RepoError> {
        let data = self.repo.load_dataset(dataset_id)?;
        Ok(GridData::from_rows(Some(dataset_id), data.columns, data.rows))
    }
}
