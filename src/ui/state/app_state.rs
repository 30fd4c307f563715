use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::dataset::DatasetId;
use crate::usecase::ports::repo::DatasetMeta;
use crate::GridEditController;

/// Signals shared by the root component. Must be created unconditionally in
/// the component body, like any other hook.
pub struct AppState {
    pub datasets: Signal<Vec<DatasetMeta>>,
    pub selected_dataset_id: Signal<Option<DatasetId>>,
    pub controller: Signal<GridEditController>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub show_save_prompt: Signal<bool>,
    pub dataset_dropdown_open: Signal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            datasets: use_signal(Vec::<DatasetMeta>::new),
            selected_dataset_id: use_signal(|| None::<DatasetId>),
            controller: use_signal(GridEditController::default),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
            show_save_prompt: use_signal(|| false),
            dataset_dropdown_open: use_signal(|| false),
        }
    }
}
