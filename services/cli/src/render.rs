use clap::ValueEnum;
use scorecard_heatmap::error::AppError;
use scorecard_heatmap::scorecards::report::{HeatmapReport, HeatmapRow};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

pub(crate) fn render_json(report: &HeatmapReport, out: &mut impl Write) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn render_table(report: &HeatmapReport, out: &mut impl Write) -> Result<(), io::Error> {
    write!(out, "Scorecard heatmap by {}", report.dimension_label)?;
    if !report.breadcrumbs.is_empty() {
        let trail: Vec<&str> = report
            .breadcrumbs
            .iter()
            .map(|crumb| crumb.name.as_str())
            .collect();
        write!(out, " ({})", trail.join(" > "))?;
    }
    writeln!(out)?;

    if report.columns.is_empty() {
        writeln!(out, "Columns: none")?;
    } else {
        writeln!(out, "Columns ({})", report.cell_mode)?;
        for (index, column) in report.columns.iter().enumerate() {
            writeln!(out, "  {}. {}", index + 1, column.label)?;
        }
    }

    if report.rows.is_empty() {
        writeln!(out, "\nRows: none")?;
        return Ok(());
    }

    writeln!(out, "\nRows")?;
    for row in &report.rows {
        writeln!(out, "{}", format_row(row))?;
    }

    Ok(())
}

fn format_row(row: &HeatmapRow) -> String {
    let focus = if row.is_focus { " [direct]" } else { "" };
    let cells: Vec<String> = row.cells.iter().map(|cell| format_cell(*cell)).collect();

    format!(
        "- {}{}: {} entities | avg score {:.2} | {:.0}% | {}",
        row.label,
        focus,
        row.stats.entity_count,
        row.stats.average_score,
        row.stats.average_percentage * 100.0,
        cells.join(" ")
    )
}

fn format_cell(cell: Option<f64>) -> String {
    match cell {
        Some(value) => format!("{:>4.0}%", value * 100.0),
        None => format!("{:>5}", "-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_heatmap::scorecards::hierarchy::Breadcrumb;
    use scorecard_heatmap::scorecards::report::{CellMode, HeatmapColumn, RowStats};
    use scorecard_heatmap::scorecards::GroupByDimension;

    fn report() -> HeatmapReport {
        HeatmapReport {
            dimension: GroupByDimension::Team,
            dimension_label: GroupByDimension::Team.label(),
            hierarchical: true,
            cell_mode: CellMode::Rules,
            columns: vec![
                HeatmapColumn {
                    key: "1".to_string(),
                    label: "git != null".to_string(),
                },
                HeatmapColumn {
                    key: "2".to_string(),
                    label: "oncall != null".to_string(),
                },
            ],
            rows: vec![HeatmapRow {
                key: "eng".to_string(),
                label: "Engineering".to_string(),
                is_focus: true,
                stats: RowStats {
                    entity_count: 2,
                    average_score: 1.5,
                    average_percentage: 0.5,
                },
                cells: vec![Some(1.0), None],
            }],
            breadcrumbs: vec![Breadcrumb {
                tag: "eng".to_string(),
                name: "Engineering".to_string(),
            }],
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn table_lists_columns_and_rows() {
        let mut out = Vec::new();
        render_table(&report(), &mut out).expect("render succeeds");
        let output = String::from_utf8(out).expect("utf8 output");

        assert!(output.starts_with("Scorecard heatmap by Team (Engineering)\n"));
        assert!(output.contains("  2. oncall != null"));
        assert!(output.contains(
            "- Engineering [direct]: 2 entities | avg score 1.50 | 50% |  100%     -"
        ));
    }

    #[test]
    fn json_serializes_report() {
        let mut out = Vec::new();
        render_json(&report(), &mut out).expect("render succeeds");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");

        assert_eq!(value["dimension"], "TEAM");
        assert_eq!(value["rows"][0]["isFocus"], true);
        assert_eq!(value["rows"][0]["cells"][1], serde_json::Value::Null);
        assert_eq!(value["breadcrumbs"][0]["name"], "Engineering");
    }

    #[test]
    fn json_write_failures_surface_as_json_errors() {
        let err = render_json(&report(), &mut ClosedPipe).expect_err("write fails");

        assert!(matches!(err, AppError::Json(_)));
        assert!(err.to_string().starts_with("json error:"));
    }
}
