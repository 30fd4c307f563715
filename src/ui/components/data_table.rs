use dioxus::prelude::*;

use crate::domain::entities::edit::CellKey;
use crate::ui::components::editable_cell::EditableCell;
use crate::GridEditController;

const HEADER_CELL_STYLE: &str = "position: sticky; top: 0; background: #f4f4f4; border: 1px solid #bbb; padding: 6px; text-align: left; z-index: 1;";

#[component]
pub fn DataTable(controller: Signal<GridEditController>) -> Element {
    let (columns, row_ids) = {
        let controller = controller.read();
        let grid = controller.grid();
        (grid.columns.clone(), grid.row_ids.clone())
    };

    if columns.is_empty() {
        return rsx! {
            div { style: "padding: 24px; color: #666;", "No dataset loaded." }
        };
    }

    rsx! {
        div {
            style: "overflow: auto; max-height: calc(100vh - 140px); border: 1px solid #ddd;",
            table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                thead {
                    tr {
                        th { style: "{HEADER_CELL_STYLE} width: 48px;", "#" }
                        for column in columns.iter() {
                            th { key: "{column}", style: "{HEADER_CELL_STYLE}", "{column}" }
                        }
                    }
                }
                tbody {
                    for (row_idx, row_id) in row_ids.iter().enumerate() {
                        tr { key: "{row_id}",
                            td { style: "border: 1px solid #bbb; padding: 4px; text-align: center; color: #888;",
                                "{row_idx + 1}"
                            }
                            for column in columns.iter() {
                                EditableCell {
                                    key: "{row_id}:{column}",
                                    cell: CellKey::new(row_id.clone(), column.clone()),
                                    controller,
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
