use scorecard_heatmap::scorecards::domain::RuleId;
use scorecard_heatmap::scorecards::predicates::RuleFilterKind;
use scorecard_heatmap::scorecards::{
    CellMode, FilterSelection, GroupByDimension, ScoreRecord, ScorecardCatalog, SortColumn,
};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse {} as JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn load_scores(path: &Path) -> Result<Vec<ScoreRecord>, InputError> {
    read_json(path)
}

/// Loads the catalog, or an empty one when no file is given.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<ScorecardCatalog, InputError> {
    match path {
        Some(path) => read_json(path),
        None => Ok(ScorecardCatalog::default()),
    }
}

/// Dialog selection for failing and passing rule ids.
pub(crate) fn rule_selection(
    failing: &[RuleId],
    passing: &[RuleId],
    match_all: bool,
) -> FilterSelection {
    let mut selection = FilterSelection::new();

    for (kind, ids) in [
        (RuleFilterKind::Failing, failing),
        (RuleFilterKind::Passing, passing),
    ] {
        for id in ids {
            selection.check(kind.label(), &id.to_string());
        }
        if match_all {
            selection.set_one_of(kind.label(), false);
        }
    }

    selection
}

pub(crate) fn parse_dimension(raw: &str) -> Result<GroupByDimension, String> {
    raw.parse().map_err(|_| {
        format!("'{raw}' is not a dimension (entity, service_group, team, domain, level)")
    })
}

pub(crate) fn parse_sort_column(raw: &str) -> Result<SortColumn, String> {
    raw.parse()
        .map_err(|_| format!("'{raw}' is not a sort column (identifier, score, percentage)"))
}

pub(crate) fn parse_cell_mode(raw: &str) -> Result<CellMode, String> {
    raw.parse()
        .map_err(|_| format!("'{raw}' is not a cell mode (rules, levels)"))
}
