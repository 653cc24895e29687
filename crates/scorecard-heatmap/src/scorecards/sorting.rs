use super::catalog::ScorecardCatalog;
use super::domain::{GroupByDimension, GroupKey, ScoreRecord, UnknownValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Identifier,
    Score,
    Percentage,
}

impl SortColumn {
    pub const fn ordered() -> [Self; 3] {
        [Self::Identifier, Self::Score, Self::Percentage]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Score => "score",
            Self::Percentage => "percentage",
        }
    }
}

impl FromStr for SortColumn {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identifier" | "name" | "key" => Ok(Self::Identifier),
            "score" => Ok(Self::Score),
            "percentage" | "percent" => Ok(Self::Percentage),
            _ => Err(UnknownValue(value.to_string())),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub column: SortColumn,
    #[serde(default)]
    pub desc: bool,
}

impl SortBy {
    pub const fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            desc: false,
        }
    }

    pub const fn descending(column: SortColumn) -> Self {
        Self { column, desc: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
        }
    }
}

/// Orders buckets by `sort_by`, keeping insertion order when it is `None`.
///
/// The sort is stable in both directions, so ties always keep their incoming
/// relative order.
pub fn sort_buckets<'a>(
    entries: Vec<(GroupKey, Vec<&'a ScoreRecord>)>,
    sort_by: Option<SortBy>,
    dimension: GroupByDimension,
    catalog: &ScorecardCatalog,
) -> Vec<(GroupKey, Vec<&'a ScoreRecord>)> {
    let Some(sort_by) = sort_by else {
        return entries;
    };

    let mut keyed: Vec<(SortValue, (GroupKey, Vec<&'a ScoreRecord>))> = entries
        .into_iter()
        .map(|entry| {
            let value = sort_value(&entry.0, &entry.1, sort_by.column, dimension, catalog);
            (value, entry)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        if sort_by.desc {
            b.compare(a)
        } else {
            a.compare(b)
        }
    });

    keyed.into_iter().map(|(_, entry)| entry).collect()
}

fn sort_value(
    key: &str,
    records: &[&ScoreRecord],
    column: SortColumn,
    dimension: GroupByDimension,
    catalog: &ScorecardCatalog,
) -> SortValue {
    let entity_view = dimension == GroupByDimension::Entity;

    match column {
        SortColumn::Identifier => {
            let identifier = match records.first() {
                Some(record) if entity_view => catalog.display_name(record),
                _ => key,
            };
            SortValue::Text(identifier.to_lowercase())
        }
        SortColumn::Score if entity_view => {
            SortValue::Number(records.first().map(|record| record.score).unwrap_or(0.0))
        }
        SortColumn::Score => SortValue::Number(records.len() as f64),
        SortColumn::Percentage => SortValue::Number(mean_percentage(records)),
    }
}

/// Mean `score_percentage` of a bucket, 0 when empty.
pub fn mean_percentage(records: &[&ScoreRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records
        .iter()
        .map(|record| record.score_percentage)
        .sum::<f64>()
        / records.len() as f64
}
