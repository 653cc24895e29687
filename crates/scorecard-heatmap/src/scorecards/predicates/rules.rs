use super::{FilterDefinition, FilterValue, Predicate};
use crate::scorecards::domain::{
    RuleId, RuleOutcomeType, ScoreRecord, NO_GROUP, NO_LEVEL, NO_TEAM,
};
use std::collections::BTreeSet;

/// The record holds an applicable, non-positive outcome for the rule.
///
/// A record with no outcome at all for the rule is neither failing nor passing.
pub fn failing_rule(rule_id: RuleId) -> Predicate<ScoreRecord> {
    Box::new(move |record: &ScoreRecord| {
        record
            .outcomes_for(rule_id)
            .any(|outcome| outcome.is_failing())
    })
}

pub fn passing_rule(rule_id: RuleId) -> Predicate<ScoreRecord> {
    Box::new(move |record: &ScoreRecord| {
        record
            .outcomes_for(rule_id)
            .any(|outcome| outcome.is_passing())
    })
}

pub fn exempt_rule(rule_id: RuleId) -> Predicate<ScoreRecord> {
    outcome_of_type(rule_id, RuleOutcomeType::NotApplicable)
}

pub fn not_evaluated_rule(rule_id: RuleId) -> Predicate<ScoreRecord> {
    outcome_of_type(rule_id, RuleOutcomeType::NotEvaluated)
}

fn outcome_of_type(rule_id: RuleId, outcome_type: RuleOutcomeType) -> Predicate<ScoreRecord> {
    Box::new(move |record: &ScoreRecord| {
        record
            .outcomes_for(rule_id)
            .any(|outcome| outcome.outcome_type == outcome_type)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFilterKind {
    Failing,
    Passing,
    Exempt,
    NotEvaluated,
}

impl RuleFilterKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Failing,
            Self::Passing,
            Self::Exempt,
            Self::NotEvaluated,
        ]
    }

    /// Category name shown in the filter dialog.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Failing => "Failing rules",
            Self::Passing => "Passing rules",
            Self::Exempt => "Exempt rules",
            Self::NotEvaluated => "Not evaluated rules",
        }
    }

    pub fn predicate(self, rule_id: RuleId) -> Predicate<ScoreRecord> {
        match self {
            Self::Failing => failing_rule(rule_id),
            Self::Passing => passing_rule(rule_id),
            Self::Exempt => exempt_rule(rule_id),
            Self::NotEvaluated => not_evaluated_rule(rule_id),
        }
    }
}

/// One option per rule seen in `scores`, keyed by rule id and ordered by
/// display name.
pub fn rule_filter_definition(
    kind: RuleFilterKind,
    scores: &[ScoreRecord],
) -> FilterDefinition<ScoreRecord> {
    let mut rules: BTreeSet<(String, RuleId)> = BTreeSet::new();
    for record in scores {
        for outcome in &record.rules {
            rules.insert((outcome.rule.display_name().to_string(), outcome.rule.id));
        }
    }

    let values = rules.into_iter().map(|(label, rule_id)| FilterValue {
        id: rule_id.to_string(),
        label,
        value: rule_id,
    });

    FilterDefinition::new(kind.label(), values, |rule_id: &RuleId| {
        kind.predicate(*rule_id)
    })
}

pub fn rule_filter_definitions(scores: &[ScoreRecord]) -> Vec<FilterDefinition<ScoreRecord>> {
    RuleFilterKind::ordered()
        .into_iter()
        .map(|kind| rule_filter_definition(kind, scores))
        .collect()
}

pub fn team_filter_definition(scores: &[ScoreRecord]) -> FilterDefinition<ScoreRecord> {
    membership_definition("Teams", scores, NO_TEAM, |record| {
        record.teams.iter().map(String::as_str).collect()
    })
}

pub fn group_filter_definition(scores: &[ScoreRecord]) -> FilterDefinition<ScoreRecord> {
    membership_definition("Service groups", scores, NO_GROUP, |record| {
        record.tags.iter().map(String::as_str).collect()
    })
}

pub fn level_filter_definition(scores: &[ScoreRecord]) -> FilterDefinition<ScoreRecord> {
    membership_definition("Levels", scores, NO_LEVEL, |record| {
        record.level_name().into_iter().collect()
    })
}

/// Options for every value seen across `scores`, plus the sentinel when some
/// record has no value at all.
fn membership_definition(
    name: &str,
    scores: &[ScoreRecord],
    sentinel: &'static str,
    memberships: fn(&ScoreRecord) -> Vec<&str>,
) -> FilterDefinition<ScoreRecord> {
    let mut values: Vec<String> = Vec::new();
    let mut needs_sentinel = false;

    for record in scores {
        let found = memberships(record);
        needs_sentinel |= found.is_empty();
        for value in found {
            if !values.iter().any(|existing| existing == value) {
                values.push(value.to_string());
            }
        }
    }
    values.sort();
    if needs_sentinel {
        values.push(sentinel.to_string());
    }

    let options = values.into_iter().map(|value| FilterValue {
        id: value.clone(),
        label: value.clone(),
        value,
    });

    FilterDefinition::new(name, options, move |value: &String| -> Predicate<ScoreRecord> {
        let value = value.clone();
        Box::new(move |record: &ScoreRecord| {
            let found = memberships(record);
            if value == sentinel {
                found.is_empty()
            } else {
                found.contains(&value.as_str())
            }
        })
    })
}
