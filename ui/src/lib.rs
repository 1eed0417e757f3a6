//! Shared UI crate for Reelscope: the dashboard view and its components.

pub mod core;
pub mod dashboard;
pub mod views;

pub mod components {
    pub mod app_header;
    pub use app_header::{AppHeader, APP_TITLE};
}
