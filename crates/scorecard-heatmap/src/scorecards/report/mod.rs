mod builder;
pub mod views;

pub use builder::{build_heatmap, HeatmapRequest};
pub use views::{CellMode, HeatmapColumn, HeatmapReport, HeatmapRow, RowStats};
