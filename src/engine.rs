//! Top-level entry point for the insight phase.
//!
//! [`compute_insights`] bundles the four analysis products over a cleaned
//! table: per-column statistics, the correlation matrix, chart
//! recommendations, and narrative observations. It is read-only over the
//! table; wire encoding of the report is the caller's concern (every field
//! derives `Serialize`).

use crate::charts::{select_charts, ChartSpec};
use crate::config::InsightConfig;
use crate::error::PipelineError;
use crate::etl::OutlierReport;
use crate::narrative::{generate_insights, Insight};
use crate::stats::{correlation_matrix, describe_table, ColumnStats, CorrelationMatrix};
use crate::table::Table;
use serde::Serialize;

/// Everything the insight phase produces for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    /// Per-column statistics, in table order.
    pub column_stats: Vec<ColumnStats>,
    /// Pearson correlation matrix over the numeric columns.
    pub correlation: CorrelationMatrix,
    /// Chart recommendations, in fixed emission order.
    pub charts: Vec<ChartSpec>,
    /// Narrative observations, in fixed category order.
    pub insights: Vec<Insight>,
}

/// Computes the full insight bundle over a (typically cleaned) table.
///
/// `outliers` is the report produced by the cleaning pipeline; pass an empty
/// report when analysing a table that skipped cleaning. Fails with
/// [`PipelineError::EmptyDataset`] for a table with no rows or no columns;
/// all-missing and non-numeric columns are tolerated and simply omitted
/// from numeric-only outputs.
///
/// # Example
///
/// ```
/// use cleansight::config::InsightConfig;
/// use cleansight::engine::compute_insights;
/// use cleansight::etl::OutlierReport;
/// use cleansight::loader::CsvLoader;
///
/// let csv = "x,y\n1,2\n2,4\n3,6\n4,8\n";
/// let table = CsvLoader::new().load_str(csv).unwrap();
/// let report = compute_insights(&table, &OutlierReport::new(), &InsightConfig::default())
///     .unwrap();
/// assert_eq!(report.column_stats.len(), 2);
/// assert!(!report.insights.is_empty());
/// ```
pub fn compute_insights(
    table: &Table,
    outliers: &OutlierReport,
    config: &InsightConfig,
) -> Result<InsightReport, PipelineError> {
    if table.column_count() == 0 || table.row_count() == 0 {
        return Err(PipelineError::EmptyDataset);
    }
    let column_stats = describe_table(table);
    let correlation = correlation_matrix(table);
    let charts = select_charts(table, &correlation, config);
    let insights = generate_insights(table, &column_stats, &correlation, outliers, config);
    Ok(InsightReport {
        column_stats,
        correlation,
        charts,
        insights,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────
