use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

fn selected_label(options: &[DropdownOption], selected: Option<&str>) -> String {
    selected
        .and_then(|value| options.iter().find(|opt| opt.value == value))
        .map(|opt| opt.label.clone())
        .unwrap_or_else(|| "(none)".to_string())
}

#[component]
pub fn DropdownSelect(
    label: &'static str,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    disabled: bool,
    mut open: Signal<bool>,
    on_select: EventHandler<String>,
) -> Element {
    let current = selected_label(&options, selected.as_deref());

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            span { "{label}" }
            button {
                style: "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                disabled,
                onclick: move |event| {
                    event.stop_propagation();
                    open.set(!open());
                },
                "{current}"
            }

            if open() {
                div {
                    style: "position: absolute; left: 0; top: 100%; min-width: 200px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200;",
                    onclick: move |event| event.stop_propagation(),
                    {options.iter().map(|opt| {
                        let value = opt.value.clone();
                        let label = opt.label.clone();
                        let is_selected = selected.as_deref() == Some(value.as_str());
                        let background = if is_selected { "#eef4ff" } else { "transparent" };
                        rsx!(
                            div {
                                key: "{value}",
                                style: "padding: 8px 10px; cursor: pointer; background: {background};",
                                onclick: move |_| {
                                    open.set(false);
                                    on_select.call(value.clone());
                                },
                                "{label}"
                            }
                        )
                    })}
                }
            }
        }
    }
}
