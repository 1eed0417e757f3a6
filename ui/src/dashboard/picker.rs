use dioxus::prelude::*;

use api::FranchiseOption;

pub const PICKER_PLACEHOLDER: &str = "Select a Movie Franchise";

#[component]
pub fn FranchisePicker(options: Vec<FranchiseOption>, selected: Signal<Option<String>>) -> Element {
    let mut selected = selected;
    let current = selected().unwrap_or_default();

    rsx! {
        div { class: "dashboard-picker",
            label { r#for: "franchise-picker", class: "dashboard-picker__label", "Franchise" }
            if options.is_empty() {
                p { class: "dashboard-card__placeholder",
                    "No franchise datasets were found on the server."
                }
            } else {
                select {
                    id: "franchise-picker",
                    class: "dashboard-picker__select",
                    value: "{current}",
                    onchange: move |evt| {
                        let value = evt.value();
                        selected.set((!value.is_empty()).then_some(value));
                    },
                    option { value: "", disabled: true, "{PICKER_PLACEHOLDER}" }
                    for opt in options.iter() {
                        option {
                            key: "{opt.value}",
                            value: "{opt.value}",
                            selected: opt.value == current,
                            "{opt.label}"
                        }
                    }
                }
            }
        }
    }
}
