//! One handler per UI event: franchise selected, point hovered.
//!
//! Both are plain functions over the immutable [`DashboardContext`], so the
//! whole update cycle is testable without a browser.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::FranchiseCatalog;
use crate::chart::{build_figure, Figure, HoverEvent};
use crate::config::DashboardConfig;
use crate::dataset::load_dataset;
use crate::detail::{render_detail, DetailPanel};
use crate::error::DatasetError;

/// Startup state shared by every request. Never mutated after launch.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub catalog: Arc<FranchiseCatalog>,
    pub config: Arc<DashboardConfig>,
}

impl DashboardContext {
    /// Scan the configured dataset directory once.
    pub fn from_config(config: DashboardConfig) -> Self {
        let catalog = FranchiseCatalog::scan(&config.csv_dir);
        if catalog.is_empty() {
            warn!(
                "No *_movies.csv datasets found in {:?}; the franchise list will be empty",
                config.csv_dir
            );
        }
        Self::new(catalog, config)
    }

    pub fn new(catalog: FranchiseCatalog, config: DashboardConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }
}

/// Everything the client needs after a franchise selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub franchise: String,
    pub figure: Figure,
    /// Set when the dataset couldn't be loaded; the figure is then empty.
    pub error: Option<String>,
}

impl DashboardView {
    pub fn failed(franchise: &str, error: &DatasetError) -> Self {
        Self {
            franchise: franchise.to_string(),
            figure: Figure::empty(),
            error: Some(error.to_string()),
        }
    }
}

/// Franchise selected: reload its dataset from disk and rebuild the figure.
/// Failures are confined to the returned view.
pub fn select_franchise(ctx: &DashboardContext, name: &str) -> DashboardView {
    match franchise_figure(ctx, name) {
        Ok(figure) => {
            info!("Built figure for {name:?}");
            DashboardView {
                franchise: name.to_string(),
                figure,
                error: None,
            }
        }
        Err(err) => {
            warn!("Couldn't load franchise {name:?}: {err}");
            DashboardView::failed(name, &err)
        }
    }
}

fn franchise_figure(ctx: &DashboardContext, name: &str) -> Result<Figure, DatasetError> {
    let franchise = ctx
        .catalog
        .get(name)
        .ok_or_else(|| DatasetError::UnknownFranchise(name.to_string()))?;
    let dataset = load_dataset(&franchise.path)?;
    Ok(build_figure(&dataset, ctx.config.smoothing_points))
}

/// Point hovered (or hover cleared): the detail panel for the current view.
pub fn hover_point(view: &DashboardView, hover: Option<HoverEvent>) -> DetailPanel {
    match &view.error {
        Some(message) => DetailPanel::unavailable(message),
        None => render_detail(&view.figure, hover),
    }
}
