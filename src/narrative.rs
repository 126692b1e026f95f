//! Rule-driven natural-language observations.
//!
//! [`generate_insights`] runs an ordered list of (predicate, template) rules
//! over the computed statistics and emits one sentence per finding. The
//! category order is fixed (overview, trend, skewness, correlation,
//! outliers, missing data) and within a category findings are sorted by
//! descending magnitude, then by column name, so the output is fully
//! deterministic.

use crate::config::InsightConfig;
use crate::etl::OutlierReport;
use crate::stats::{strong_pairs, ColumnStats, CorrelationMatrix};
use crate::table::{Column, ColumnKind, Table};
use serde::Serialize;

/// Minimum jointly valid rows before a time series is fitted for a trend.
const MIN_TREND_ROWS: usize = 10;

/// Maximum numeric columns fitted against each datetime column.
const TREND_NUMERIC_CAP: usize = 2;

/// The rule family that produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Overview,
    Trend,
    Skewness,
    Correlation,
    Outliers,
    MissingData,
}

/// One generated observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub text: String,
}

/// Generates the full ordered list of observations.
pub fn generate_insights(
    table: &Table,
    stats: &[ColumnStats],
    matrix: &CorrelationMatrix,
    outliers: &OutlierReport,
    config: &InsightConfig,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    overview_rule(table, &mut insights);
    trend_rules(table, &mut insights);
    skewness_rules(stats, config, &mut insights);
    correlation_rules(matrix, config, &mut insights);
    outlier_rules(outliers, &mut insights);
    missing_rules(stats, config, &mut insights);
    insights
}

fn overview_rule(table: &Table, out: &mut Vec<Insight>) {
    let mut numeric = 0usize;
    let mut categorical = 0usize;
    let mut datetime = 0usize;
    let mut other = 0usize;
    for (_, col) in table.iter() {
        match col.kind() {
            ColumnKind::Numeric => numeric += 1,
            ColumnKind::Categorical | ColumnKind::Boolean => categorical += 1,
            ColumnKind::Datetime => datetime += 1,
            ColumnKind::Text => other += 1,
        }
    }
    let mut breakdown: Vec<String> = Vec::new();
    if numeric > 0 {
        breakdown.push(format!("{numeric} numeric"));
    }
    if categorical > 0 {
        breakdown.push(format!("{categorical} categorical"));
    }
    if datetime > 0 {
        breakdown.push(format!("{datetime} datetime"));
    }
    if other > 0 {
        breakdown.push(format!("{other} text"));
    }
    out.push(Insight {
        category: InsightCategory::Overview,
        text: format!(
            "The dataset contains {} rows and {} columns ({}).",
            table.row_count(),
            table.column_count(),
            breakdown.join(", ")
        ),
    });
}

/// Fits each numeric series against row order along each datetime column and
/// reports the direction and fit quality.
fn trend_rules(table: &Table, out: &mut Vec<Insight>) {
    let datetime_cols: Vec<(&str, &Column)> = table
        .iter()
        .filter(|(_, col)| col.kind() == ColumnKind::Datetime)
        .collect();
    if datetime_cols.is_empty() {
        return;
    }
    let numeric_cols: Vec<(&str, &Column)> = table
        .iter()
        .filter(|(_, col)| col.kind() == ColumnKind::Numeric)
        .take(TREND_NUMERIC_CAP)
        .collect();

    for (dt_name, dt_col) in &datetime_cols {
        for (num_name, num_col) in &numeric_cols {
            let Some(values) = num_col.as_numeric() else {
                continue;
            };
            let mut points: Vec<(i64, f64)> = (0..table.row_count())
                .filter_map(|i| {
                    let ts = dt_col.datetime_at(i)?;
                    num_col.is_valid(i).then(|| (ts, values[i]))
                })
                .collect();
            if points.len() < MIN_TREND_ROWS {
                continue;
            }
            points.sort_by_key(|&(ts, _)| ts);
            let x: Vec<f64> = (0..points.len()).map(|i| i as f64).collect();
            let y: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
            let Some(fit) = u_analytics::regression::simple_linear_regression(&x, &y) else {
                continue;
            };
            let direction = if fit.slope > 0.0 {
                "an upward"
            } else {
                "a downward"
            };
            out.push(Insight {
                category: InsightCategory::Trend,
                text: format!(
                    "'{num_name}' shows {direction} trend over '{dt_name}' (R² = {:.2}).",
                    fit.r_squared
                ),
            });
        }
    }
}

fn skewness_rules(stats: &[ColumnStats], config: &InsightConfig, out: &mut Vec<Insight>) {
    let mut findings: Vec<(&str, f64)> = stats
        .iter()
        .filter_map(|s| {
            let ColumnStats::Numeric(n) = s else {
                return None;
            };
            let skew = n.skewness?;
            (skew.abs() > config.skew_threshold).then_some((n.name.as_str(), skew))
        })
        .collect();
    findings.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    for (name, skew) in findings {
        let direction = if skew > 0.0 { "right" } else { "left" };
        out.push(Insight {
            category: InsightCategory::Skewness,
            text: format!(
                "Column '{name}' is strongly {direction}-skewed (skewness {skew:.2}); \
                 a log or similar transformation may help."
            ),
        });
    }
}

fn correlation_rules(matrix: &CorrelationMatrix, config: &InsightConfig, out: &mut Vec<Insight>) {
    for pair in strong_pairs(matrix, config.strong_correlation, config.significance_level) {
        let direction = if pair.r > 0.0 { "positive" } else { "negative" };
        out.push(Insight {
            category: InsightCategory::Correlation,
            text: format!(
                "Strong {direction} correlation between '{}' and '{}' (r = {:.2}, p = {:.3}).",
                pair.col_a, pair.col_b, pair.r, pair.p_value
            ),
        });
    }
}

fn outlier_rules(outliers: &OutlierReport, out: &mut Vec<Insight>) {
    let mut findings: Vec<(&str, usize)> = outliers
        .iter()
        .map(|(name, &count)| (name.as_str(), count))
        .collect();
    findings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    for (name, count) in findings {
        let plural = if count == 1 { "value" } else { "values" };
        out.push(Insight {
            category: InsightCategory::Outliers,
            text: format!(
                "Column '{name}' contains {count} {plural} outside the interquartile fences."
            ),
        });
    }
}

fn missing_rules(stats: &[ColumnStats], config: &InsightConfig, out: &mut Vec<Insight>) {
    let mut findings: Vec<(&str, f64)> = stats
        .iter()
        .filter_map(|s| {
            let pct = s.missing_pct();
            (pct > config.high_missing_pct).then_some((s.name(), pct))
        })
        .collect();
    findings.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    for (name, pct) in findings {
        out.push(Insight {
            category: InsightCategory::MissingData,
            text: format!("Column '{name}' is missing {pct:.1}% of its values."),
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
