//! Scorecard heatmap engine: filtering, grouping, hierarchy rollups, rule
//! averages and sorting over an in-memory score snapshot.

pub mod averages;
pub mod catalog;
pub mod domain;
pub mod filters;
pub mod grouping;
pub mod hierarchy;
pub mod predicates;
pub mod report;
pub mod sorting;

#[cfg(test)]
pub(crate) mod tests;

pub use averages::{average_rule_scores, level_distribution, rule_averages, RuleAverage};
pub use catalog::{FilterLookups, ScorecardCatalog};
pub use domain::{
    GroupByDimension, GroupKey, HierarchyNode, Ladder, Rule, RuleOutcome, RuleOutcomeType,
    ScoreRecord, ServiceId,
};
pub use filters::{filter_scores, ScoreFilters};
pub use grouping::{group_scores, GroupedScores};
pub use hierarchy::{find_hierarchy_item, resolve_drill_down, rollup_scores, Breadcrumb};
pub use predicates::{combine_filters, CombinedFilter, FilterDefinition, FilterSelection};
pub use report::{build_heatmap, CellMode, HeatmapReport, HeatmapRequest};
pub use sorting::{sort_buckets, SortBy, SortColumn};
