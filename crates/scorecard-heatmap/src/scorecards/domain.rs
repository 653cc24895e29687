use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ServiceId = u64;
pub type DomainId = i64;
pub type RuleId = u64;
pub type GroupKey = String;

pub const NO_TEAM: &str = "No team";
pub const NO_GROUP: &str = "No group";
pub const NO_LEVEL: &str = "No Level";
pub const NO_OWNER: &str = "No owner";
pub const NO_DOMAIN_ID: DomainId = -1;
pub const NO_DOMAIN: &str = "-1";

/// Rule definition attached to every outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: RuleId,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub weight: f64,
}

impl Rule {
    /// Title when present, otherwise the raw expression.
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.expression,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleOutcomeType {
    Applicable,
    NotApplicable,
    NotEvaluated,
}

impl RuleOutcomeType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applicable => "Applicable",
            Self::NotApplicable => "Exempt",
            Self::NotEvaluated => "Not Evaluated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub rule: Rule,
    #[serde(rename = "type")]
    pub outcome_type: RuleOutcomeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
}

impl RuleOutcome {
    pub fn is_applicable(&self) -> bool {
        self.outcome_type == RuleOutcomeType::Applicable
    }

    /// Applicable and scored above zero.
    pub fn is_passing(&self) -> bool {
        self.is_applicable() && self.score.unwrap_or(0.0) > 0.0
    }

    pub fn is_failing(&self) -> bool {
        self.is_applicable() && self.score.unwrap_or(0.0) <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ladder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_level: Option<Level>,
}

/// Ordered maturity tiers of a scorecard ladder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ladder {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl Ladder {
    /// Level names ordered by rank; unranked levels keep their listed order after ranked ones.
    pub fn ordered_level_names(&self) -> Vec<&str> {
        let mut levels: Vec<&Level> = self.levels.iter().collect();
        levels.sort_by_key(|level| level.rank.unwrap_or(u32::MAX));
        levels.into_iter().map(|level| level.name.as_str()).collect()
    }
}

/// Snapshot of one entity's evaluation against a scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub service_id: ServiceId,
    pub component_ref: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub score_percentage: f64,
    #[serde(default)]
    pub total_possible_score: f64,
    #[serde(default)]
    pub rules: Vec<RuleOutcome>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ladder_levels: Vec<LevelAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ScoreRecord {
    /// Level of the first ladder, which is the one the heatmap groups by.
    pub fn level_name(&self) -> Option<&str> {
        self.ladder_levels
            .first()
            .and_then(|assignment| assignment.current_level.as_ref())
            .map(|level| level.name.as_str())
    }

    /// Every level currently assigned across ladders.
    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.ladder_levels
            .iter()
            .filter_map(|assignment| assignment.current_level.as_ref())
            .map(|level| level.name.as_str())
    }

    pub fn outcomes_for(&self, rule_id: RuleId) -> impl Iterator<Item = &RuleOutcome> {
        self.rules
            .iter()
            .filter(move |outcome| outcome.rule.id == rule_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNodeInfo {
    pub tag: String,
    pub name: String,
}

/// One node of a team or domain forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub node: HierarchyNodeInfo,
    #[serde(default)]
    pub ordered_children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn tag(&self) -> &str {
        &self.node.tag
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }
}

/// Catalog metadata for one entity, keyed by component ref.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_emails: Vec<String>,
    #[serde(default)]
    pub group_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRef {
    pub id: DomainId,
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupByDimension {
    Entity,
    ServiceGroup,
    Team,
    Domain,
    Level,
}

impl GroupByDimension {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Entity,
            Self::ServiceGroup,
            Self::Team,
            Self::Domain,
            Self::Level,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::ServiceGroup => "Service Group",
            Self::Team => "Team",
            Self::Domain => "Domain",
            Self::Level => "Level",
        }
    }

    /// Bucket for records with no membership; entities always have exactly one key.
    pub const fn sentinel(self) -> Option<&'static str> {
        match self {
            Self::Entity => None,
            Self::ServiceGroup => Some(NO_GROUP),
            Self::Team => Some(NO_TEAM),
            Self::Domain => Some(NO_DOMAIN),
            Self::Level => Some(NO_LEVEL),
        }
    }

    /// Dimensions backed by an organizational forest.
    pub const fn is_hierarchical(self) -> bool {
        matches!(self, Self::Team | Self::Domain)
    }
}

impl FromStr for GroupByDimension {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value
            .trim()
            .to_ascii_lowercase()
            .replace(|c: char| c == '-' || c == ' ', "_")
            .as_str()
        {
            "entity" | "service" => Ok(Self::Entity),
            "service_group" | "group" => Ok(Self::ServiceGroup),
            "team" => Ok(Self::Team),
            "domain" => Ok(Self::Domain),
            "level" => Ok(Self::Level),
            _ => Err(UnknownValue(value.to_string())),
        }
    }
}

impl fmt::Display for GroupByDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a dimension, sort column or cell mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized value '{0}'")]
pub struct UnknownValue(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn score_record_defaults_missing_arrays() {
        let record: ScoreRecord = serde_json::from_value(json!({
            "serviceId": 7,
            "componentRef": "component:default/payments",
            "score": 3.0,
            "scorePercentage": 0.75,
            "totalPossibleScore": 4.0
        }))
        .expect("record deserializes");

        assert!(record.rules.is_empty());
        assert!(record.teams.is_empty());
        assert!(record.ladder_levels.is_empty());
        assert_eq!(record.level_name(), None);
    }

    #[test]
    fn outcome_type_uses_api_casing() {
        let outcome: RuleOutcome = serde_json::from_value(json!({
            "rule": { "id": 1, "expression": "git != null", "weight": 1.0 },
            "type": "NOT_APPLICABLE",
            "approvedDate": "2024-03-01T12:00:00Z"
        }))
        .expect("outcome deserializes");

        assert_eq!(outcome.outcome_type, RuleOutcomeType::NotApplicable);
        assert!(outcome.approved_date.is_some());
        assert!(!outcome.is_passing());
        assert!(!outcome.is_failing());
    }

    #[test]
    fn display_name_falls_back_to_expression() {
        let rule = Rule {
            id: 1,
            expression: "oncall != null".to_string(),
            title: Some("  ".to_string()),
            weight: 1.0,
        };
        assert_eq!(rule.display_name(), "oncall != null");
    }

    #[test]
    fn dimension_parses_cli_spellings() {
        assert_eq!(
            "service-group".parse::<GroupByDimension>(),
            Ok(GroupByDimension::ServiceGroup)
        );
        assert_eq!("TEAM".parse::<GroupByDimension>(), Ok(GroupByDimension::Team));
        let err = "owner".parse::<GroupByDimension>().expect_err("unknown dimension");
        assert_eq!(err.to_string(), "unrecognized value 'owner'");
    }

    #[test]
    fn ladder_orders_levels_by_rank() {
        let ladder = Ladder {
            name: "Production readiness".to_string(),
            levels: vec![
                Level {
                    name: "Gold".to_string(),
                    rank: Some(3),
                    color: None,
                },
                Level {
                    name: "Bronze".to_string(),
                    rank: Some(1),
                    color: None,
                },
                Level {
                    name: "Silver".to_string(),
                    rank: Some(2),
                    color: None,
                },
            ],
        };
        assert_eq!(ladder.ordered_level_names(), vec!["Bronze", "Silver", "Gold"]);
    }
}
