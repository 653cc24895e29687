use super::super::domain::{GroupByDimension, GroupKey, UnknownValue};
use super::super::hierarchy::Breadcrumb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What each heatmap cell shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellMode {
    /// Pass rate per rule.
    #[default]
    Rules,
    /// Share of entities at each ladder level.
    Levels,
}

impl CellMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Levels => "levels",
        }
    }
}

impl FromStr for CellMode {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rules" | "rule" => Ok(Self::Rules),
            "levels" | "level" => Ok(Self::Levels),
            _ => Err(UnknownValue(value.to_string())),
        }
    }
}

impl fmt::Display for CellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapColumn {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowStats {
    pub entity_count: usize,
    pub average_score: f64,
    pub average_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub key: GroupKey,
    pub label: String,
    /// Row for the drill-down node itself, holding only its direct members.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_focus: bool,
    pub stats: RowStats,
    pub cells: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapReport {
    pub dimension: GroupByDimension,
    pub dimension_label: &'static str,
    pub hierarchical: bool,
    pub cell_mode: CellMode,
    pub columns: Vec<HeatmapColumn>,
    pub rows: Vec<HeatmapRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl HeatmapReport {
    pub fn row(&self, key: &str) -> Option<&HeatmapRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key == key)
    }

    /// Sum of row entity counts; an entity in several rows counts once per row.
    pub fn total_memberships(&self) -> usize {
        self.rows.iter().map(|row| row.stats.entity_count).sum()
    }
}
