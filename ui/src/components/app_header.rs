use dioxus::prelude::*;

const THEME_CSS: Asset = asset!("/assets/theme/main.css");

pub const APP_TITLE: &str = "Performance and Sentiment Analyzer: Movie Franchises";

/// Page header. Also pulls in the dashboard stylesheet, so any host that
/// renders it gets the theme.
#[component]
pub fn AppHeader() -> Element {
    rsx! {
        document::Title { "{APP_TITLE}" }
        document::Link { rel: "stylesheet", href: THEME_CSS }

        header { class: "app-header",
            h1 { class: "app-header__title", "{APP_TITLE}" }
        }
    }
}
