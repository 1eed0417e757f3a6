mod chart;
pub use chart::PerformanceChart;

mod detail;
pub use detail::MovieDetailPanel;

mod picker;
pub use picker::{FranchisePicker, PICKER_PLACEHOLDER};

pub mod plot;
