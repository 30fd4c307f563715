use std::path::PathBuf;

use crate::domain::entities::dataset::DatasetId;
use crate::domain::entities::edit::ChangeRecord;
use crate::infra::sqlite::queries::{
    apply_cell_changes, create_dataset_from_rows, list_cell_changes, list_datasets, load_dataset,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{
    CellChangeLog, DatasetMeta, DatasetRepository, NewDatasetMeta, RepoError, TabularData,
};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl DatasetRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(RepoError::from_anyhow)
    }

    fn list_datasets(&self) -> Result<Vec<DatasetMeta>, RepoError> {
        list_datasets(&self.db_path).map_err(RepoError::from_anyhow)
    }

    fn load_dataset(&self, id: DatasetId) -> Result<TabularData, RepoError> {
        load_dataset(&self.db_path, id.0).map_err(RepoError::from_anyhow)
    }

    fn create_dataset(
        &self,
        meta: NewDatasetMeta,
        data: TabularData,
    ) -> Result<DatasetId, RepoError> {
        let dataset_id = create_dataset_from_rows(
            &self.db_path,
            &meta.name,
            &meta.source_path,
            &data.columns,
            &data.rows,
        )
        .map_err(RepoError::from_anyhow)?;

        Ok(DatasetId(dataset_id))
    }

    fn apply_cell_changes(&self, id: DatasetId, changes: &[ChangeRecord]) -> Result<(), RepoError> {
        apply_cell_changes(&self.db_path, id.0, changes).map_err(RepoError::from_anyhow)
    }

    fn list_cell_changes(&self, id: DatasetId) -> Result<Vec<CellChangeLog>, RepoError> {
        list_cell_changes(&self.db_path, id.0).map_err(RepoError::from_anyhow)
    }
}
