use dioxus::prelude::*;

use crate::domain::edit::focus::{KeyPress, PointerDisposition, Target};
use crate::domain::edit::session::HostEffect;
use crate::domain::entities::edit::CellKey;
use crate::{CellView, GridEditController};

const CELL_STYLE: &str = "border: 1px solid #bbb; padding: 4px; min-width: 80px;";

pub fn key_press(key: &Key) -> KeyPress {
    match key {
        Key::Enter => KeyPress::Enter,
        Key::Escape => KeyPress::Escape,
        Key::Tab => KeyPress::Tab,
        _ => KeyPress::Other,
    }
}

/// Reports a pointer-down and, when the controller deferred a resolution,
/// schedules the tick that delivers it.
pub fn report_pointer_down(mut controller: Signal<GridEditController>, target: Target) {
    let disposition = controller.write().pointer_down(target);
    if let PointerDisposition::Deferred(_) = disposition {
        spawn(async move {
            controller.write().run_deferred();
        });
    }
}

fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn input_id(cell: &CellKey) -> String {
    format!(
        "cell-input-{}-{}",
        sanitize_id(&cell.row_id),
        sanitize_id(&cell.column_id)
    )
}

#[component]
pub fn EditableCell(cell: CellKey, mut controller: Signal<GridEditController>) -> Element {
    let view = controller.read().cell_view(&cell);

    match view {
        CellView::Editing { draft } => {
            let id = input_id(&cell);
            let select_script = format!("document.getElementById('{id}')?.select();");
            let cell_for_mount = cell.clone();
            let cell_for_input = cell.clone();
            let cell_for_pointer = cell.clone();
            rsx! {
                td {
                    style: "{CELL_STYLE} background: #eef4ff;",
                    input {
                        id: "{id}",
                        style: "width: 100%; box-sizing: border-box;",
                        value: "{draft}",
                        onmounted: move |event: MountedEvent| {
                            let focus_here = controller
                                .write()
                                .take_effects()
                                .into_iter()
                                .any(|HostEffect::FocusAndSelect(key)| key == cell_for_mount);
                            let select = select_script.clone();
                            async move {
                                if focus_here {
                                    let _ = event.data().set_focus(true).await;
                                    let _ = dioxus::document::eval(&select);
                                }
                            }
                        },
                        oninput: move |event: FormEvent| {
                            controller.write().update_draft(&cell_for_input, event.value());
                        },
                        onkeydown: move |event: KeyboardEvent| {
                            match key_press(&event.key()) {
                                press @ (KeyPress::Enter | KeyPress::Escape) => {
                                    event.stop_propagation();
                                    controller.write().editor_key(press);
                                }
                                // Focus is still inside the editor; the blur that follows ends the edit.
                                KeyPress::Tab => event.stop_propagation(),
                                KeyPress::Other => {}
                            }
                        },
                        onmousedown: move |event: MouseEvent| {
                            event.stop_propagation();
                            report_pointer_down(controller, Target::EditSurface(cell_for_pointer.clone()));
                        },
                        onfocusout: move |_| {
                            controller.write().focus_out();
                        },
                    }
                }
            }
        }
        CellView::Display { value, dirty } => {
            let background = if dirty { "#fff4c2" } else { "transparent" };
            let cell_for_pointer = cell.clone();
            rsx! {
                td {
                    style: "{CELL_STYLE} background: {background}; cursor: text;",
                    title: if dirty { "Unsaved change" } else { "" },
                    onmousedown: move |event: MouseEvent| {
                        event.stop_propagation();
                        report_pointer_down(controller, Target::Cell(cell_for_pointer.clone()));
                    },
                    onclick: move |_| {
                        controller.write().start_edit(cell.clone());
                    },
                    "{value}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_ids_only_contain_safe_characters() {
        let id = input_id(&CellKey::new("12", "unit price (€)"));

        assert_eq!(id, "cell-input-12-unit_price____");
    }

    #[test]
    fn keys_map_to_edit_terminators() {
        assert_eq!(key_press(&Key::Enter), KeyPress::Enter);
        assert_eq!(key_press(&Key::Escape), KeyPress::Escape);
        assert_eq!(key_press(&Key::Tab), KeyPress::Tab);
        assert_eq!(key_press(&Key::Character("a".to_string())), KeyPress::Other);
    }
}
