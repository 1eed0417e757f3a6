use dioxus::prelude::*;

use ui::views::Dashboard;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Dashboard {},
}

#[cfg(feature = "server")]
fn main() {
    use dioxus::logger::tracing::{info, warn};

    let (config, problems) = api::DashboardConfig::load();
    if let Err(err) = dioxus::logger::init(config.log_level()) {
        eprintln!("Logger already initialised: {err}");
    }
    for problem in problems {
        warn!("{problem}; value ignored");
    }

    let ctx = api::DashboardContext::from_config(config);
    info!(
        "Serving {} franchise(s) from {:?}",
        ctx.catalog.len(),
        ctx.config.csv_dir
    );

    LaunchBuilder::server().with_context(ctx).launch(App);
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        Router::<Route> {}
    }
}
