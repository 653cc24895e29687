use super::super::averages::{level_distribution, rule_averages, RuleAverage};
use super::super::catalog::{FilterLookups, ScorecardCatalog};
use super::super::domain::{GroupByDimension, GroupKey, HierarchyNode, Ladder, Level, ScoreRecord};
use super::super::filters::{filter_scores, ScoreFilters};
use super::super::grouping::{group_scores, GroupedScores};
use super::super::hierarchy::{
    breadcrumbs, find_hierarchy_item, resolve_drill_down, rollup_scores, DrillDownScope,
};
use super::super::predicates::CombinedFilter;
use super::super::sorting::{mean_percentage, sort_buckets, SortBy};
use super::views::{CellMode, HeatmapColumn, HeatmapReport, HeatmapRow, RowStats};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Everything the viewer controls: dimension, facets, sort, drill-down path
/// and cell mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRequest {
    pub dimension: GroupByDimension,
    #[serde(default)]
    pub filters: ScoreFilters,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub cells: CellMode,
}

impl HeatmapRequest {
    pub fn new(dimension: GroupByDimension) -> Self {
        Self {
            dimension,
            filters: ScoreFilters::default(),
            sort_by: None,
            path: Vec::new(),
            cells: CellMode::default(),
        }
    }
}

impl Default for HeatmapRequest {
    fn default() -> Self {
        Self::new(GroupByDimension::Entity)
    }
}

enum Columns {
    Rules(Vec<RuleAverage>),
    Levels(Ladder),
}

impl Columns {
    fn for_records(mode: CellMode, records: &[&ScoreRecord], catalog: &ScorecardCatalog) -> Self {
        match mode {
            CellMode::Rules => Self::Rules(rule_averages(records)),
            CellMode::Levels => Self::Levels(
                catalog
                    .ladder
                    .clone()
                    .unwrap_or_else(|| ladder_from_records(records)),
            ),
        }
    }

    fn headers(&self) -> Vec<HeatmapColumn> {
        match self {
            Self::Rules(averages) => averages
                .iter()
                .map(|average| HeatmapColumn {
                    key: average.rule_id.to_string(),
                    label: average.display_name.clone(),
                })
                .collect(),
            Self::Levels(ladder) => ladder
                .ordered_level_names()
                .into_iter()
                .map(|name| HeatmapColumn {
                    key: name.to_string(),
                    label: name.to_string(),
                })
                .collect(),
        }
    }

    fn cells(&self, records: &[&ScoreRecord]) -> Vec<Option<f64>> {
        match self {
            Self::Rules(columns) => {
                let averages: HashMap<_, _> = rule_averages(records)
                    .into_iter()
                    .map(|average| (average.rule_id, average.average))
                    .collect();
                columns
                    .iter()
                    .map(|column| averages.get(&column.rule_id).copied())
                    .collect()
            }
            Self::Levels(ladder) => level_distribution(records, ladder)
                .into_iter()
                .map(Some)
                .collect(),
        }
    }
}

/// Ladder made of the first-ladder levels seen in `records`, used when the
/// catalog carries no ladder definition.
fn ladder_from_records(records: &[&ScoreRecord]) -> Ladder {
    let mut seen = HashSet::new();
    let levels: Vec<Level> = records
        .iter()
        .filter_map(|record| record.ladder_levels.first())
        .filter_map(|assignment| assignment.current_level.as_ref())
        .filter(|level| seen.insert(level.name.clone()))
        .cloned()
        .collect();

    Ladder {
        name: String::new(),
        levels,
    }
}

struct RowSource<'a> {
    key: GroupKey,
    label: String,
    is_focus: bool,
    records: Vec<&'a ScoreRecord>,
}

/// Runs the full heatmap pipeline over one score snapshot.
///
/// Records pass the facet filters and the optional dialog predicate, are
/// grouped along the requested dimension, rolled up through the catalog
/// hierarchy for team and domain views, sorted, and finally turned into rows.
pub fn build_heatmap(
    scores: &[ScoreRecord],
    catalog: &ScorecardCatalog,
    request: &HeatmapRequest,
    predicate: Option<&CombinedFilter<'_, ScoreRecord>>,
) -> HeatmapReport {
    let lookups = FilterLookups::build(scores, catalog);
    let filtered: Vec<&ScoreRecord> = filter_scores(scores, &request.filters, &lookups)
        .into_iter()
        .filter(|record| predicate.map_or(true, |predicate| predicate.matches(record)))
        .collect();

    let domain_tags = catalog.domain_tags_by_service();
    let grouped = group_scores(
        filtered.iter().copied(),
        request.dimension,
        Some(&domain_tags),
    );
    let columns = Columns::for_records(request.cells, &filtered, catalog);

    let forest = catalog.hierarchy_for(request.dimension);
    let scope = drill_down_scope(request, forest);

    let sources = match scope {
        Some(scope) => hierarchical_rows(&grouped, scope, request.sort_by, catalog),
        None => flat_rows(grouped, request, forest, catalog),
    };

    let rows: Vec<HeatmapRow> = sources
        .into_iter()
        .map(|source| HeatmapRow {
            stats: row_stats(&source.records),
            cells: columns.cells(&source.records),
            key: source.key,
            label: source.label,
            is_focus: source.is_focus,
        })
        .collect();

    debug!(
        dimension = request.dimension.label(),
        filtered = filtered.len(),
        rows = rows.len(),
        hierarchical = scope.is_some(),
        "built scorecard heatmap"
    );

    HeatmapReport {
        dimension: request.dimension,
        dimension_label: request.dimension.label(),
        hierarchical: scope.is_some(),
        cell_mode: request.cells,
        columns: columns.headers(),
        rows,
        breadcrumbs: match scope {
            Some(_) => breadcrumbs(forest, &request.path),
            None => Vec::new(),
        },
    }
}

fn drill_down_scope<'h>(
    request: &HeatmapRequest,
    forest: &'h [HierarchyNode],
) -> Option<DrillDownScope<'h>> {
    if !request.dimension.is_hierarchical() || forest.is_empty() {
        return None;
    }

    let scope = resolve_drill_down(forest, &request.path);
    if scope.is_none() {
        warn!(
            path = ?request.path,
            dimension = request.dimension.label(),
            "drill-down path not found in hierarchy, showing flat view"
        );
    }
    scope
}

fn hierarchical_rows<'a>(
    grouped: &GroupedScores<'a>,
    scope: DrillDownScope<'_>,
    sort_by: Option<SortBy>,
    catalog: &ScorecardCatalog,
) -> Vec<RowSource<'a>> {
    let rolled_up = rollup_scores(grouped, scope.rollup_forest(), scope.focus_tag());
    let mut rows = Vec::new();

    if let Some(focus) = scope.focus {
        let direct = grouped.get(focus.tag()).unwrap_or(&[]);
        if !direct.is_empty() {
            rows.push(RowSource {
                key: focus.tag().to_string(),
                label: focus.name().to_string(),
                is_focus: true,
                records: direct.to_vec(),
            });
        }
    }

    let mut seen = HashSet::new();
    let mut names = HashMap::new();
    let mut entries = Vec::new();
    for node in scope.candidates {
        if !seen.insert(node.tag()) {
            continue;
        }
        let records = rolled_up.get(node.tag()).unwrap_or(&[]);
        if records.is_empty() {
            continue;
        }
        names.insert(node.tag(), node.name());
        entries.push((node.tag().to_string(), records.to_vec()));
    }

    // Rollups are never keyed by a single entity, so hierarchy rows sort like
    // any grouped view.
    let dimension = GroupByDimension::Team;
    for (key, records) in sort_buckets(entries, sort_by, dimension, catalog) {
        let label = names
            .get(key.as_str())
            .map(|name| name.to_string())
            .unwrap_or_else(|| key.clone());
        rows.push(RowSource {
            key,
            label,
            is_focus: false,
            records,
        });
    }

    rows
}

fn flat_rows<'a>(
    grouped: GroupedScores<'a>,
    request: &HeatmapRequest,
    forest: &[HierarchyNode],
    catalog: &ScorecardCatalog,
) -> Vec<RowSource<'a>> {
    let entries = grouped.into_entries();
    sort_buckets(entries, request.sort_by, request.dimension, catalog)
        .into_iter()
        .map(|(key, records)| RowSource {
            label: row_label(&key, &records, request.dimension, forest, catalog),
            key,
            is_focus: false,
            records,
        })
        .collect()
}

fn row_label(
    key: &str,
    records: &[&ScoreRecord],
    dimension: GroupByDimension,
    forest: &[HierarchyNode],
    catalog: &ScorecardCatalog,
) -> String {
    if dimension == GroupByDimension::Entity {
        if let Some(record) = records.first() {
            return catalog.display_name(record).to_string();
        }
    }

    find_hierarchy_item(forest, key)
        .map(|node| node.name().to_string())
        .unwrap_or_else(|| key.to_string())
}

fn row_stats(records: &[&ScoreRecord]) -> RowStats {
    let average_score = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|record| record.score).sum::<f64>() / records.len() as f64
    };

    RowStats {
        entity_count: records.len(),
        average_score,
        average_percentage: mean_percentage(records),
    }
}
