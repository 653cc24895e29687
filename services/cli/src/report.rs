use crate::infra::{
    load_catalog, load_scores, parse_cell_mode, parse_dimension, parse_sort_column,
    rule_selection,
};
use crate::render::{render_json, render_table, OutputFormat};
use crate::CliError;
use clap::Args;
use scorecard_heatmap::config::ReportConfig;
use scorecard_heatmap::error::AppError;
use scorecard_heatmap::scorecards::domain::{DomainId, RuleId, ServiceId};
use scorecard_heatmap::scorecards::predicates::{rule_filter_definitions, RuleFilterKind};
use scorecard_heatmap::scorecards::{
    build_heatmap, combine_filters, CellMode, FilterDefinition, GroupByDimension,
    HeatmapRequest, ScoreFilters, ScoreRecord, SortBy, SortColumn,
};
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON array of score records
    #[arg(long)]
    pub(crate) scores: PathBuf,
    /// JSON catalog with entity metadata, domain memberships, hierarchies and ladder
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Dimension to group by (defaults to HEATMAP_GROUP_BY)
    #[arg(long, value_parser = parse_dimension)]
    pub(crate) group_by: Option<GroupByDimension>,
    /// Column to sort rows by (defaults to HEATMAP_SORT_COLUMN)
    #[arg(long, value_parser = parse_sort_column)]
    pub(crate) sort: Option<SortColumn>,
    /// Sort in descending order
    #[arg(long)]
    pub(crate) desc: bool,
    /// Drill-down path of hierarchy tags, outermost first
    #[arg(long = "path")]
    pub(crate) path: Vec<String>,
    /// Keep entities owned by this team
    #[arg(long = "team")]
    pub(crate) teams: Vec<String>,
    /// Keep entities in this service group
    #[arg(long = "group")]
    pub(crate) groups: Vec<String>,
    /// Keep entities at this ladder level
    #[arg(long = "level")]
    pub(crate) levels: Vec<String>,
    /// Keep entities owned by this user email
    #[arg(long = "user")]
    pub(crate) users: Vec<String>,
    /// Keep this service id
    #[arg(long = "service-id")]
    pub(crate) service_ids: Vec<ServiceId>,
    /// Keep entities in this domain id (-1 for entities without a domain)
    #[arg(long = "domain-id", allow_negative_numbers = true)]
    pub(crate) domain_ids: Vec<DomainId>,
    /// Keep entities failing this rule id
    #[arg(long = "failing-rule")]
    pub(crate) failing_rules: Vec<RuleId>,
    /// Keep entities passing this rule id
    #[arg(long = "passing-rule")]
    pub(crate) passing_rules: Vec<RuleId>,
    /// Require every listed rule instead of any of them
    #[arg(long)]
    pub(crate) match_all_rules: bool,
    /// Cell contents: per-rule pass rates or level distribution
    #[arg(long, value_parser = parse_cell_mode, default_value = "rules")]
    pub(crate) cells: CellMode,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

pub(crate) fn run_report(args: ReportArgs, defaults: &ReportConfig) -> Result<(), CliError> {
    let scores = load_scores(&args.scores)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let request = request_from_args(&args, defaults);

    let definitions = rule_filter_definitions(&scores);
    let selection = rule_selection(&args.failing_rules, &args.passing_rules, args.match_all_rules);
    warn_unknown_rules(&definitions, &args);
    let combined = combine_filters(&definitions, &selection);
    let predicate = (!combined.is_vacuous()).then_some(&combined);

    let report = build_heatmap(&scores, &catalog, &request, predicate);
    info!(
        records = scores.len(),
        rows = report.rows.len(),
        dimension = report.dimension_label,
        "heatmap report ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => render_table(&report, &mut out).map_err(AppError::from)?,
        OutputFormat::Json => render_json(&report, &mut out)?,
    }

    Ok(())
}

fn warn_unknown_rules(definitions: &[FilterDefinition<ScoreRecord>], args: &ReportArgs) {
    for (kind, ids) in [
        (RuleFilterKind::Failing, &args.failing_rules),
        (RuleFilterKind::Passing, &args.passing_rules),
    ] {
        let Some(definition) = definitions
            .iter()
            .find(|definition| definition.name == kind.label())
        else {
            continue;
        };
        for id in ids {
            if definition.option(&id.to_string()).is_none() {
                warn!(rule_id = *id, "rule does not occur in the score snapshot");
            }
        }
    }
}

fn request_from_args(args: &ReportArgs, defaults: &ReportConfig) -> HeatmapRequest {
    let sort_by = match args.sort {
        Some(column) => Some(SortBy {
            column,
            desc: args.desc,
        }),
        None => defaults.default_sort.map(|sort_by| SortBy {
            desc: sort_by.desc || args.desc,
            ..sort_by
        }),
    };

    HeatmapRequest {
        dimension: args.group_by.unwrap_or(defaults.default_group_by),
        filters: ScoreFilters {
            service_ids: args.service_ids.clone(),
            groups: args.groups.clone(),
            teams: args.teams.clone(),
            users: args.users.clone(),
            domain_ids: args.domain_ids.clone(),
            levels: args.levels.clone(),
        },
        sort_by,
        path: args.path.clone(),
        cells: args.cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ReportArgs {
        ReportArgs {
            scores: PathBuf::from("scores.json"),
            catalog: None,
            group_by: None,
            sort: None,
            desc: false,
            path: Vec::new(),
            teams: vec!["web".to_string()],
            groups: Vec::new(),
            levels: Vec::new(),
            users: Vec::new(),
            service_ids: Vec::new(),
            domain_ids: vec![-1],
            failing_rules: Vec::new(),
            passing_rules: Vec::new(),
            match_all_rules: false,
            cells: CellMode::Rules,
            format: OutputFormat::Table,
        }
    }

    fn defaults() -> ReportConfig {
        ReportConfig {
            default_group_by: GroupByDimension::Domain,
            default_sort: Some(SortBy::ascending(SortColumn::Identifier)),
        }
    }

    #[test]
    fn falls_back_to_configured_defaults() {
        let request = request_from_args(&args(), &defaults());

        assert_eq!(request.dimension, GroupByDimension::Domain);
        assert_eq!(request.sort_by, Some(SortBy::ascending(SortColumn::Identifier)));
        assert_eq!(request.filters.teams, vec!["web"]);
        assert_eq!(request.filters.domain_ids, vec![-1]);
    }

    #[test]
    fn explicit_arguments_override_defaults() {
        let mut args = args();
        args.group_by = Some(GroupByDimension::Level);
        args.sort = Some(SortColumn::Score);
        args.desc = true;

        let request = request_from_args(&args, &defaults());

        assert_eq!(request.dimension, GroupByDimension::Level);
        assert_eq!(request.sort_by, Some(SortBy::descending(SortColumn::Score)));
    }

    #[test]
    fn desc_flag_flips_configured_sort() {
        let mut args = args();
        args.desc = true;

        let request = request_from_args(&args, &defaults());

        assert_eq!(request.sort_by, Some(SortBy::descending(SortColumn::Identifier)));
    }
}
