use super::catalog::FilterLookups;
use super::domain::{
    DomainId, ScoreRecord, ServiceId, NO_DOMAIN_ID, NO_GROUP, NO_LEVEL, NO_OWNER, NO_TEAM,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Selected values per facet. An empty facet is inactive and matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFilters {
    #[serde(default)]
    pub service_ids: Vec<ServiceId>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub domain_ids: Vec<DomainId>,
    #[serde(default)]
    pub levels: Vec<String>,
}

impl ScoreFilters {
    pub fn is_empty(&self) -> bool {
        self.service_ids.is_empty()
            && self.groups.is_empty()
            && self.teams.is_empty()
            && self.users.is_empty()
            && self.domain_ids.is_empty()
            && self.levels.is_empty()
    }

    /// True when `record` passes every active facet.
    pub fn matches(&self, record: &ScoreRecord, lookups: &FilterLookups) -> bool {
        let service_ok =
            self.service_ids.is_empty() || self.service_ids.contains(&record.service_id);

        service_ok
            && facet_matches(&self.groups, lookups.groups(record.service_id), |group| {
                group == NO_GROUP
            })
            && facet_matches(&self.teams, &record.teams, |team| team == NO_TEAM)
            && facet_matches(&self.users, lookups.owners(record.service_id), |user| {
                user == NO_OWNER
            })
            && facet_matches(&self.domain_ids, lookups.domains(record.service_id), |id| {
                *id == NO_DOMAIN_ID
            })
            && levels_match(&self.levels, record)
    }
}

/// Keeps records passing every facet, preserving their relative order.
pub fn filter_scores<'a>(
    scores: &'a [ScoreRecord],
    filters: &ScoreFilters,
    lookups: &FilterLookups,
) -> Vec<&'a ScoreRecord> {
    if filters.is_empty() {
        return scores.iter().collect();
    }

    let filtered: Vec<&ScoreRecord> = scores
        .iter()
        .filter(|record| filters.matches(record, lookups))
        .collect();

    debug!(
        before = scores.len(),
        after = filtered.len(),
        "applied scorecard filters"
    );

    filtered
}

fn facet_matches<T, F>(selected: &[T], values: &[T], is_sentinel: F) -> bool
where
    T: PartialEq,
    F: Fn(&T) -> bool,
{
    if selected.is_empty() {
        return true;
    }

    if values.is_empty() {
        return selected.iter().any(is_sentinel);
    }

    values.iter().any(|value| selected.contains(value))
}

fn levels_match(selected: &[String], record: &ScoreRecord) -> bool {
    if selected.is_empty() {
        return true;
    }

    let mut assigned = record.level_names().peekable();
    if assigned.peek().is_none() {
        return selected.iter().any(|level| level == NO_LEVEL);
    }

    assigned.any(|level| selected.iter().any(|candidate| candidate == level))
}
