use dioxus::prelude::*;

use crate::GridEditController;

const OVERLAY_STYLE: &str = "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1100;";
const PANEL_STYLE: &str = "background: #fff; padding: 16px; border: 1px solid #999; min-width: 320px; max-width: 720px; max-height: 80vh; overflow: auto;";

/// Lists every pending change before it is handed to the commit sink.
#[component]
pub fn SaveDialog(
    controller: Signal<GridEditController>,
    on_confirm: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let (summary, saving) = {
        let controller = controller.read();
        (controller.save_summary(), controller.is_saving())
    };
    let label = summary.count_label();

    rsx! {
        div { style: OVERLAY_STYLE,
            div { style: PANEL_STYLE,
                div { style: "margin-bottom: 8px; font-weight: 600;", "Save Changes" }
                div { style: "margin-bottom: 12px;",
                    "Are you sure you want to save all your changes? This will update the database with your modifications."
                }
                if !summary.changes.is_empty() {
                    div { style: "margin-bottom: 12px; padding: 8px; background: #eef4ff; border: 1px solid #c9dafc;",
                        div { style: "margin-bottom: 6px; font-weight: 600;", "Changes to be saved ({label})" }
                        for change in summary.changes.iter() {
                            div {
                                key: "{change.row_id}:{change.column_id}",
                                style: "padding: 4px 0; border-top: 1px solid #dde6fb;",
                                div { style: "font-weight: 600;", "Row {change.row_number} • {change.column_id}" }
                                div { style: "display: flex; gap: 6px; font-family: monospace;",
                                    span { style: "color: #a33; text-decoration: line-through;", "{change.original_value}" }
                                    span { "→" }
                                    span { style: "color: #2a7a2a;", "{change.new_value}" }
                                }
                            }
                        }
                    }
                }
                div { style: "display: flex; gap: 8px; justify-content: flex-end;",
                    button {
                        disabled: saving,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        disabled: saving,
                        onclick: move |_| on_confirm.call(()),
                        if saving { "Saving..." } else { "Save Changes" }
                    }
                }
            }
        }
    }
}

/// Shown while a dataset switch waits for the user to discard pending changes.
#[component]
pub fn SwitchDialog(on_back: EventHandler<()>, on_confirm: EventHandler<()>) -> Element {
    rsx! {
        div { style: OVERLAY_STYLE,
            div { style: PANEL_STYLE,
                div { style: "margin-bottom: 8px; font-weight: 600;", "Unsaved Changes" }
                div { style: "margin-bottom: 12px;",
                    "You have unsaved changes. If you switch tables now, your changes will be lost. Are you sure you want to continue?"
                }
                div { style: "display: flex; gap: 8px; justify-content: flex-end;",
                    button { onclick: move |_| on_back.call(()), "Back" }
                    button { onclick: move |_| on_confirm.call(()), "I'm Sure" }
                }
            }
        }
    }
}
