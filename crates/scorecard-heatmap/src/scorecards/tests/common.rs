use crate::scorecards::domain::{
    HierarchyNode, HierarchyNodeInfo, Level, LevelAssignment, Rule, RuleId, RuleOutcome,
    RuleOutcomeType, ScoreRecord, ServiceId,
};

pub(crate) fn record(service_id: ServiceId, component_ref: &str) -> ScoreRecord {
    ScoreRecord {
        service_id,
        component_ref: component_ref.to_string(),
        score: 0.0,
        score_percentage: 0.0,
        total_possible_score: 0.0,
        rules: Vec::new(),
        teams: Vec::new(),
        tags: Vec::new(),
        ladder_levels: Vec::new(),
        last_updated: None,
    }
}

pub(crate) fn scored(mut record: ScoreRecord, score: f64, percentage: f64) -> ScoreRecord {
    record.score = score;
    record.score_percentage = percentage;
    record
}

pub(crate) fn with_teams(mut record: ScoreRecord, teams: &[&str]) -> ScoreRecord {
    record.teams = teams.iter().map(|team| team.to_string()).collect();
    record
}

pub(crate) fn with_tags(mut record: ScoreRecord, tags: &[&str]) -> ScoreRecord {
    record.tags = tags.iter().map(|tag| tag.to_string()).collect();
    record
}

pub(crate) fn with_level(mut record: ScoreRecord, level: &str) -> ScoreRecord {
    record.ladder_levels.push(LevelAssignment {
        ladder_name: Some("Production readiness".to_string()),
        current_level: Some(Level {
            name: level.to_string(),
            rank: None,
            color: None,
        }),
    });
    record
}

pub(crate) fn rule(id: RuleId, expression: &str) -> Rule {
    Rule {
        id,
        expression: expression.to_string(),
        title: None,
        weight: 1.0,
    }
}

pub(crate) fn with_outcome(
    mut record: ScoreRecord,
    rule: &Rule,
    outcome_type: RuleOutcomeType,
    score: Option<f64>,
) -> ScoreRecord {
    record.rules.push(RuleOutcome {
        rule: rule.clone(),
        outcome_type,
        score,
        requested_date: None,
        approved_date: None,
    });
    record
}

pub(crate) fn passing(record: ScoreRecord, rule: &Rule) -> ScoreRecord {
    with_outcome(record, rule, RuleOutcomeType::Applicable, Some(1.0))
}

pub(crate) fn failing(record: ScoreRecord, rule: &Rule) -> ScoreRecord {
    with_outcome(record, rule, RuleOutcomeType::Applicable, Some(0.0))
}

pub(crate) fn exempt(record: ScoreRecord, rule: &Rule) -> ScoreRecord {
    with_outcome(record, rule, RuleOutcomeType::NotApplicable, None)
}

pub(crate) fn node(tag: &str, children: Vec<HierarchyNode>) -> HierarchyNode {
    HierarchyNode {
        node: HierarchyNodeInfo {
            tag: tag.to_string(),
            name: format!("{tag} name"),
        },
        ordered_children: children,
    }
}

pub(crate) fn leaf(tag: &str) -> HierarchyNode {
    node(tag, Vec::new())
}

pub(crate) fn component_refs(records: &[&ScoreRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.component_ref.clone())
        .collect()
}
