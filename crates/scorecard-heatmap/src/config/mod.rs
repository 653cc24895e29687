use crate::scorecards::domain::GroupByDimension;
use crate::scorecards::sorting::{SortBy, SortColumn};
use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub report: ReportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let group_by = env::var("HEATMAP_GROUP_BY").unwrap_or_else(|_| "entity".to_string());
        let default_group_by = group_by
            .parse::<GroupByDimension>()
            .map_err(|_| ConfigError::InvalidGroupBy(group_by))?;

        let default_sort = match env::var("HEATMAP_SORT_COLUMN") {
            Ok(column) if !column.trim().is_empty() => {
                let column = column
                    .parse::<SortColumn>()
                    .map_err(|_| ConfigError::InvalidSortColumn(column))?;
                Some(SortBy {
                    column,
                    desc: env_flag("HEATMAP_SORT_DESC"),
                })
            }
            _ => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            report: ReportConfig {
                default_group_by,
                default_sort,
            },
        })
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied when a report request leaves them unset.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub default_group_by: GroupByDimension,
    pub default_sort: Option<SortBy>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidGroupBy(String),
    InvalidSortColumn(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGroupBy(value) => write!(
                f,
                "HEATMAP_GROUP_BY must name a dimension such as entity or team (got '{value}')"
            ),
            ConfigError::InvalidSortColumn(value) => write!(
                f,
                "HEATMAP_SORT_COLUMN must be one of identifier, score, percentage (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
