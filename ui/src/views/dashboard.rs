use dioxus::prelude::*;
use tracing::{debug, warn};

use api::{hover_point, list_franchises, load_franchise, DashboardView, Figure, HoverEvent};

use crate::components::AppHeader;
use crate::dashboard::{FranchisePicker, MovieDetailPanel, PerformanceChart};

/// The whole dashboard: picker, chart and the hover-driven detail panel.
#[component]
pub fn Dashboard() -> Element {
    let franchises = use_resource(list_franchises);
    let mut selected = use_signal(|| None::<String>);
    let mut hover = use_signal(|| None::<HoverEvent>);

    // Default to the first catalog entry once the list arrives.
    use_effect(move || {
        if let Some(Ok(options)) = franchises.read().as_ref() {
            if selected.peek().is_none() {
                if let Some(first) = options.first() {
                    debug!("Defaulting to franchise {:?}", first.value);
                    selected.set(Some(first.value.clone()));
                }
            }
        }
    });

    // A new franchise means a new figure; old hover indices don't apply.
    use_effect(move || {
        let _ = selected();
        hover.set(None);
    });

    let view = use_resource(move || async move {
        let Some(name) = selected() else {
            return Ok(None);
        };
        load_franchise(name.clone()).await.map(Some).inspect_err(|err| {
            warn!("load_franchise({name:?}) failed: {err}");
        })
    });

    let options = match franchises.read().as_ref() {
        Some(Ok(options)) => options.clone(),
        _ => Vec::new(),
    };
    let list_error = match franchises.read().as_ref() {
        Some(Err(err)) => Some(format!("Couldn't load the franchise list: {err}")),
        _ => None,
    };

    let loading = !view.finished();
    let current: Option<DashboardView> = match view.read().as_ref() {
        Some(Ok(Some(view))) => Some(view.clone()),
        Some(Err(err)) => Some(DashboardView {
            franchise: selected().unwrap_or_default(),
            figure: Figure::empty(),
            error: Some(err.to_string()),
        }),
        _ => None,
    };

    let (figure, panel, franchise) = match current {
        Some(view) => {
            let panel = hover_point(&view, hover());
            (view.figure, panel, view.franchise)
        }
        None => (Figure::empty(), api::DetailPanel::placeholder(), String::new()),
    };
    let franchise_label = options
        .iter()
        .find(|opt| opt.value == franchise)
        .map(|opt| opt.label.clone())
        .unwrap_or_default();

    rsx! {
        AppHeader {}

        main { class: "page page-dashboard",
            if let Some(message) = list_error {
                p { class: "dashboard__error", "{message}" }
            }

            FranchisePicker { options, selected }

            div { class: "dashboard__panels",
                PerformanceChart { figure, hover, loading }
                MovieDetailPanel { panel, franchise: franchise_label }
            }
        }
    }
}
