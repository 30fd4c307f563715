use std::sync::Arc;

use dioxus::prelude::*;
use rfd::FileDialog;
use tracing::{error, info};

use crate::domain::edit::focus::Target;
use crate::domain::entities::dataset::DatasetId;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::ui::components::data_table::DataTable;
use crate::ui::components::dialogs::{SaveDialog, SwitchDialog};
use crate::ui::components::dropdown::{DropdownOption, DropdownSelect};
use crate::ui::components::editable_cell::{key_press, report_pointer_down};
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::commit_sink::CommitSink;
use crate::usecase::ports::repo::DatasetRepository;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::query_service::QueryService;
use crate::{db_path_from_env, GridEditController, SwitchDecision};

const BUTTON_STYLE: &str = "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";

fn load_grid_into(
    query_service: &QueryService,
    dataset_id: DatasetId,
    mut controller: Signal<GridEditController>,
    mut selected_dataset_id: Signal<Option<DatasetId>>,
    mut status: Signal<String>,
) {
    match query_service.load_grid(dataset_id) {
        Ok(grid) => {
            let rows = grid.row_count();
            controller.write().bind_dataset(grid);
            selected_dataset_id.set(Some(dataset_id));
            status.set(format!("Loaded dataset #{} ({rows} rows)", dataset_id.0));
        }
        Err(err) => {
            error!(dataset = dataset_id.0, error = %err, "failed to load dataset");
            status.set(format!("Failed to load dataset: {err}"));
        }
    }
}

#[component]
pub fn App() -> Element {
    let db_path = match db_path_from_env() {
        Ok(path) => path,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to resolve the database path: {err}" }
                }
            };
        }
    };

    let AppState {
        mut datasets,
        selected_dataset_id,
        mut controller,
        mut busy,
        mut status,
        mut show_save_prompt,
        dataset_dropdown_open,
    } = AppState::new();

    let repo = Arc::new(SqliteRepo {
        db_path: db_path.clone(),
    });
    let query_service = Arc::new(QueryService::new(repo.clone()));
    let edit_service = Arc::new(EditService::new(repo.clone()));
    let import_service = Arc::new(ImportService::new(db_path));

    let repo_for_init = repo.clone();
    let query_service_for_init = query_service.clone();
    use_effect(move || {
        *busy.write() = true;
        let init_result = repo_for_init
            .init()
            .and_then(|_| query_service_for_init.list_datasets());
        match init_result {
            Ok(available) => {
                let first_dataset = available.first().map(|dataset| dataset.id);
                datasets.set(available);
                match first_dataset {
                    Some(dataset_id) => load_grid_into(
                        &query_service_for_init,
                        dataset_id,
                        controller,
                        selected_dataset_id,
                        status,
                    ),
                    None => status.set("No datasets yet. Import a CSV or XLSX file.".to_string()),
                }
            }
            Err(err) => {
                error!(error = %err, "database initialisation failed");
                datasets.set(Vec::new());
                status.set(format!("Failed to initialise the database: {err}"));
            }
        }
        *busy.write() = false;
    });

    let (has_changes, saving, pending_switch, pending_count) = {
        let controller = controller.read();
        (
            controller.has_unsaved_changes(),
            controller.is_saving(),
            controller.pending_switch(),
            controller.ledger().size(),
        )
    };

    let dataset_options: Vec<DropdownOption> = datasets()
        .iter()
        .map(|dataset| DropdownOption {
            value: dataset.id.0.to_string(),
            label: format!("{} ({} rows)", dataset.name, dataset.row_count),
        })
        .collect();

    let query_service_for_select = query_service.clone();
    let query_service_for_import = query_service.clone();
    let query_service_for_switch = query_service.clone();

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 12px; background: #fff; min-height: 100vh; box-sizing: border-box;",
            onmousedown: move |_| report_pointer_down(controller, Target::Outside),
            onkeydown: move |event: KeyboardEvent| {
                controller.write().key_down(key_press(&event.key()), Target::Outside);
            },

            div {
                style: "display: flex; gap: 8px; align-items: center; margin-bottom: 12px; position: sticky; top: 0; background: #fff; z-index: 900; padding: 8px 0;",
                DropdownSelect {
                    label: "Dataset",
                    options: dataset_options,
                    selected: selected_dataset_id().map(|id| id.0.to_string()),
                    disabled: busy(),
                    open: dataset_dropdown_open,
                    on_select: move |value: String| {
                        let Ok(raw_id) = value.parse::<i64>() else {
                            return;
                        };
                        let target = DatasetId(raw_id);
                        if selected_dataset_id() == Some(target) {
                            return;
                        }
                        let decision = controller.write().request_dataset_switch(target);
                        match decision {
                            SwitchDecision::Proceed(dataset_id) => load_grid_into(
                                &query_service_for_select,
                                dataset_id,
                                controller,
                                selected_dataset_id,
                                status,
                            ),
                            SwitchDecision::ConfirmationRequired(_) => {
                                status.set("Unsaved changes must be discarded first".to_string());
                            }
                        }
                    },
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        let Some(file_path) = FileDialog::new()
                            .add_filter("Spreadsheets", &["csv", "xlsx", "xlsm", "xls", "ods"])
                            .pick_file()
                        else {
                            return;
                        };

                        *busy.write() = true;
                        status.set(format!("Importing {}", file_path.display()));
                        match import_service.import_file(&file_path) {
                            Ok(imported) => {
                                info!(path = %file_path.display(), datasets = imported.len(), "import finished");
                                match query_service_for_import.list_datasets() {
                                    Ok(available) => datasets.set(available),
                                    Err(err) => status.set(format!("Failed to reload datasets: {err}")),
                                }
                                if let Some(first) = imported.first() {
                                    let target = DatasetId(first.dataset_id);
                                    let decision = controller.write().request_dataset_switch(target);
                                    match decision {
                                        SwitchDecision::Proceed(dataset_id) => load_grid_into(
                                            &query_service_for_import,
                                            dataset_id,
                                            controller,
                                            selected_dataset_id,
                                            status,
                                        ),
                                        SwitchDecision::ConfirmationRequired(_) => {
                                            status.set(format!(
                                                "Imported {} dataset(s); unsaved changes must be discarded before opening",
                                                imported.len()
                                            ));
                                        }
                                    }
                                }
                            }
                            Err(err) => {
                                error!(path = %file_path.display(), error = %err, "import failed");
                                status.set(format!("Import failed: {err:#}"));
                            }
                        }
                        *busy.write() = false;
                    },
                    "Import"
                }

                if has_changes {
                    span { style: "color: #a66b00;", "{pending_count} unsaved" }
                    button {
                        style: BUTTON_STYLE,
                        disabled: saving,
                        onclick: move |_| {
                            let restored = controller.write().revert_all();
                            status.set(format!("Reverted {restored} change(s)"));
                        },
                        "Cancel"
                    }
                    button {
                        style: BUTTON_STYLE,
                        disabled: saving,
                        onclick: move |_| show_save_prompt.set(true),
                        "Save Changes"
                    }
                }

                span { style: "margin-left: auto; color: #555;", "{status}" }
            }

            DataTable { controller }

            if show_save_prompt() {
                SaveDialog {
                    controller,
                    on_close: move |_| show_save_prompt.set(false),
                    on_confirm: move |_| {
                        let ticket = match controller.write().begin_save() {
                            Ok(ticket) => ticket,
                            Err(err) => {
                                status.set(err.to_string());
                                show_save_prompt.set(false);
                                return;
                            }
                        };
                        let edit_service = edit_service.clone();
                        spawn(async move {
                            let result = edit_service.commit(ticket.batch()).await;
                            let finished = controller.write().finish_save(ticket, result);
                            match finished {
                                Ok(count) => {
                                    status.set(format!("Saved {count} change(s)"));
                                    show_save_prompt.set(false);
                                }
                                Err(err) => status.set(format!("Save failed: {err}")),
                            }
                        });
                    },
                }
            }

            if pending_switch.is_some() {
                SwitchDialog {
                    on_back: move |_| {
                        controller.write().cancel_dataset_switch();
                        status.set("Dataset switch cancelled".to_string());
                    },
                    on_confirm: move |_| {
                        let target = controller.write().confirm_dataset_switch();
                        if let Some(dataset_id) = target {
                            load_grid_into(
                                &query_service_for_switch,
                                dataset_id,
                                controller,
                                selected_dataset_id,
                                status,
                            );
                        }
                    },
                }
            }
        }
    }
}
