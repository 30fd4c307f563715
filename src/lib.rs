use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub mod domain;
pub mod infra;
pub mod usecase;

#[cfg(feature = "desktop")]
pub mod app;
#[cfg(feature = "desktop")]
pub mod ui;


pub use domain::edit::focus::{KeyPress, Target};
pub use domain::entities::dataset::{DatasetId, GridData};
pub use domain::entities::edit::{CellKey, ChangeRecord, DirtyChange};
pub use usecase::services::grid_edit_controller::{
    CellView, GridEditController, SaveError, SaveSummary, SwitchDecision,
};

pub const DB_PATH_ENV: &str = "GRID_EDITOR_DB";
pub const DB_FILE_NAME: &str = "datasets.sqlite";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResult {
    pub dataset_id: i64,
    pub row_count: i64,
}

/// Start-up configuration for the desktop shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub webview_data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            db_path: db_path_from_env()?,
            webview_data_dir: default_webview_data_dir()?,
        })
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "grid-editor")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join(DB_FILE_NAME))
}

/// `GRID_EDITOR_DB` if set, otherwise the per-user default.
pub fn db_path_from_env() -> Result<PathBuf> {
    resolve_db_path(std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
}

/// An explicit, non-empty override wins over the per-user data directory.
pub fn resolve_db_path(db_override: Option<PathBuf>) -> Result<PathBuf> {
    match db_override {
        Some(path) if !path.as_os_str().is_empty() => Ok(path),
        _ => default_db_path(),
    }
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
