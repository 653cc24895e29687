use super::domain::{Ladder, RuleId, RuleOutcomeType, ScoreRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Pass rate of one rule across a scoped set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleAverage {
    pub rule_id: RuleId,
    pub display_name: String,
    pub applicable: usize,
    pub passing: usize,
    pub average: f64,
}

#[derive(Debug, Default)]
struct RuleTally {
    display_name: String,
    num_applicable_services: usize,
    total_services_score: usize,
}

/// Per-rule pass rates ordered by rule display name.
///
/// Exempt and not-yet-evaluated outcomes still register the rule but count
/// toward neither side of the ratio, so a rule that never applied averages 0.
pub fn rule_averages(records: &[&ScoreRecord]) -> Vec<RuleAverage> {
    let mut tallies: HashMap<RuleId, RuleTally> = HashMap::new();

    for record in records {
        for outcome in &record.rules {
            let tally = tallies
                .entry(outcome.rule.id)
                .or_insert_with(|| RuleTally {
                    display_name: outcome.rule.display_name().to_string(),
                    ..RuleTally::default()
                });

            if outcome.outcome_type != RuleOutcomeType::Applicable {
                continue;
            }

            tally.num_applicable_services += 1;
            if outcome.score.unwrap_or(0.0) > 0.0 {
                tally.total_services_score += 1;
            }
        }
    }

    let mut averages: Vec<RuleAverage> = tallies
        .into_iter()
        .map(|(rule_id, tally)| RuleAverage {
            rule_id,
            average: tally.total_services_score as f64
                / tally.num_applicable_services.max(1) as f64,
            display_name: tally.display_name,
            applicable: tally.num_applicable_services,
            passing: tally.total_services_score,
        })
        .collect();

    averages.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then(a.rule_id.cmp(&b.rule_id))
    });
    averages
}

/// Average values only, in the same column order as [`rule_averages`].
pub fn average_rule_scores(records: &[&ScoreRecord]) -> Vec<f64> {
    rule_averages(records)
        .into_iter()
        .map(|average| average.average)
        .collect()
}

/// Share of records sitting at each ladder level, ordered by level rank.
pub fn level_distribution(records: &[&ScoreRecord], ladder: &Ladder) -> Vec<f64> {
    let total = records.len().max(1) as f64;
    ladder
        .ordered_level_names()
        .into_iter()
        .map(|level| {
            let count = records
                .iter()
                .filter(|record| record.level_name() == Some(level))
                .count();
            count as f64 / total
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecards::domain::Level;
    use crate::scorecards::tests::common::{
        exempt, failing, passing, record, rule, with_level, with_outcome,
    };

    fn round(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }

    #[test]
    fn exempt_outcomes_do_not_count() {
        let git = rule(1, "git != null");
        let scores = vec![
            passing(record(1, "a"), &git),
            failing(record(2, "b"), &git),
            exempt(record(3, "c"), &git),
        ];
        let refs: Vec<&ScoreRecord> = scores.iter().collect();

        let averages = rule_averages(&refs);

        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].applicable, 2);
        assert_eq!(averages[0].passing, 1);
        assert_eq!(averages[0].average, 0.5);
    }

    #[test]
    fn columns_follow_display_name_order() {
        let git = rule(1, "repository.git != null");
        let oncall = rule(2, "oncall != null");
        let description = rule(3, "description != null");

        let scores = vec![
            failing(passing(passing(record(1, "a"), &description), &oncall), &git),
            passing(failing(passing(record(2, "b"), &description), &oncall), &git),
            passing(failing(passing(record(3, "c"), &description), &oncall), &git),
        ];
        let refs: Vec<&ScoreRecord> = scores.iter().collect();

        let averages = rule_averages(&refs);
        let names: Vec<_> = averages
            .iter()
            .map(|average| average.display_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "description != null",
                "oncall != null",
                "repository.git != null"
            ]
        );

        let values: Vec<_> = average_rule_scores(&refs).into_iter().map(round).collect();
        assert_eq!(values, vec![1.0, 0.33, 0.67]);
    }

    #[test]
    fn rule_never_applicable_averages_zero() {
        let git = rule(1, "git != null");
        let scores = vec![with_outcome(
            record(1, "a"),
            &git,
            RuleOutcomeType::NotEvaluated,
            None,
        )];
        let refs: Vec<&ScoreRecord> = scores.iter().collect();

        assert_eq!(average_rule_scores(&refs), vec![0.0]);
    }

    #[test]
    fn titles_take_precedence_over_expressions() {
        let mut titled = rule(9, "zzz");
        titled.title = Some("Has README".to_string());
        let plain = rule(1, "owners != null");
        let scores = vec![passing(passing(record(1, "a"), &plain), &titled)];
        let refs: Vec<&ScoreRecord> = scores.iter().collect();

        let averages = rule_averages(&refs);

        assert_eq!(averages[0].display_name, "Has README");
        assert_eq!(averages[1].display_name, "owners != null");
    }

    #[test]
    fn level_distribution_uses_ladder_order() {
        let ladder = Ladder {
            name: "Maturity".to_string(),
            levels: vec![
                Level {
                    name: "Silver".to_string(),
                    rank: Some(2),
                    color: None,
                },
                Level {
                    name: "Bronze".to_string(),
                    rank: Some(1),
                    color: None,
                },
            ],
        };
        let scores = vec![
            with_level(record(1, "a"), "Bronze"),
            with_level(record(2, "b"), "Silver"),
            with_level(record(3, "c"), "Bronze"),
            record(4, "d"),
        ];
        let refs: Vec<&ScoreRecord> = scores.iter().collect();

        assert_eq!(level_distribution(&refs, &ladder), vec![0.5, 0.25]);
    }
}
