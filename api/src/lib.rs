//! Data layer and server functions for Reelscope.
//!
//! Everything here is plain Rust except the two `#[server]` functions at the
//! bottom, which the client calls and the server answers from the
//! [`DashboardContext`] installed at launch.

use dioxus::prelude::*;

pub mod catalog;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod detail;
pub mod error;
pub mod handlers;
pub mod smoothing;

pub use catalog::{FranchiseCatalog, FranchiseOption};
pub use chart::{Figure, HoverEvent, Trace, TraceMode, TracePoint};
pub use config::DashboardConfig;
pub use detail::{DetailPanel, Media, MetricCard, MetricIcon, PanelState, StatLine};
pub use handlers::{hover_point, select_franchise, DashboardContext, DashboardView};

/// Dropdown entries, in catalog order. The first one is the default selection.
#[server]
pub async fn list_franchises() -> Result<Vec<FranchiseOption>, ServerFnError> {
    let FromContext(ctx): FromContext<DashboardContext> = extract().await?;
    Ok(ctx.catalog.options())
}

/// Load `name` and build its figure. Load failures come back inside the view.
#[server]
pub async fn load_franchise(name: String) -> Result<DashboardView, ServerFnError> {
    let FromContext(ctx): FromContext<DashboardContext> = extract().await?;
    Ok(select_franchise(&ctx, &name))
}
