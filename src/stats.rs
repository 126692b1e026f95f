//! Descriptive statistics and correlation analysis.
//!
//! [`describe_table`] produces per-column statistics: the full numeric set
//! (moments via `u-numflow`, Fisher bias-corrected skewness/kurtosis) for
//! numeric columns, and a reduced count/distinct/mode summary for everything
//! else. [`correlation_matrix`] computes pairwise-complete Pearson
//! correlations between all numeric columns, with two-sided p-values from
//! `u-analytics`. Cells that cannot be computed (fewer than 3 jointly valid
//! rows, or zero variance) are `None` rather than a fake coefficient.
//!
//! # Example
//!
//! ```
//! use cleansight::loader::CsvLoader;
//! use cleansight::stats::correlation_matrix;
//!
//! let csv = "x,y\n1,2\n2,4\n3,6\n4,8\n";
//! let table = CsvLoader::new().load_str(csv).unwrap();
//! let matrix = correlation_matrix(&table);
//! let cell = matrix.get(0, 1).unwrap();
//! assert!((cell.r - 1.0).abs() < 1e-9);
//! ```

use crate::table::{Column, Table};
use serde::Serialize;
use std::collections::HashMap;

// ── Descriptive statistics ────────────────────────────────────────────

/// Full statistics for a numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct NumericStats {
    /// Column name.
    pub name: String,
    /// Number of valid (non-missing) values.
    pub count: usize,
    /// Percentage of missing values (0..=100).
    pub missing_pct: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` below 2 valid values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    /// Bias-corrected skewness (Fisher G1); `None` below 3 valid values.
    pub skewness: Option<f64>,
    /// Bias-corrected excess kurtosis (Fisher G2); `None` below 4 valid values.
    pub kurtosis: Option<f64>,
}

/// Reduced statistics for non-numeric columns (and numeric columns with no
/// valid values).
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    /// Column name.
    pub name: String,
    /// Number of valid (non-missing) values.
    pub count: usize,
    /// Number of distinct valid values.
    pub distinct_count: usize,
    /// Most frequent value, rendered as text. `None` when the column has no
    /// valid values or is a datetime column.
    pub mode: Option<String>,
    /// Percentage of missing values (0..=100).
    pub missing_pct: f64,
}

/// Per-column statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnStats {
    Numeric(NumericStats),
    Summary(SummaryStats),
}

impl ColumnStats {
    /// Column name regardless of variant.
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric(s) => &s.name,
            Self::Summary(s) => &s.name,
        }
    }

    /// Missing percentage regardless of variant.
    pub fn missing_pct(&self) -> f64 {
        match self {
            Self::Numeric(s) => s.missing_pct,
            Self::Summary(s) => s.missing_pct,
        }
    }
}

/// Computes statistics for every column, in table order.
///
/// Missing values never fail a statistic; only valid values contribute.
pub fn describe_table(table: &Table) -> Vec<ColumnStats> {
    table
        .iter()
        .map(|(name, col)| describe_column(name, col))
        .collect()
}

fn describe_column(name: &str, col: &Column) -> ColumnStats {
    let total = col.len();
    let count = col.valid_count();
    let missing_pct = if total > 0 {
        (total - count) as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    if let Some(valid) = col.valid_numeric_values() {
        if !valid.is_empty() {
            return ColumnStats::Numeric(NumericStats {
                name: name.to_string(),
                count,
                missing_pct,
                mean: u_numflow::stats::mean(&valid).unwrap_or(f64::NAN),
                median: u_numflow::stats::median(&valid).unwrap_or(f64::NAN),
                std_dev: u_numflow::stats::std_dev(&valid),
                min: u_numflow::stats::min(&valid).unwrap_or(f64::NAN),
                max: u_numflow::stats::max(&valid).unwrap_or(f64::NAN),
                skewness: u_numflow::stats::skewness(&valid),
                kurtosis: u_numflow::stats::kurtosis(&valid),
            });
        }
    }

    let (distinct_count, mode) = distinct_and_mode(col);
    ColumnStats::Summary(SummaryStats {
        name: name.to_string(),
        count,
        distinct_count,
        mode,
        missing_pct,
    })
}

/// Distinct valid value count and most frequent value (ties break toward
/// the lexicographically smaller rendering).
fn distinct_and_mode(col: &Column) -> (usize, Option<String>) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    match col {
        Column::Numeric { values, validity, .. } => {
            for i in validity.valid_indices() {
                *counts.entry(values[i].to_bits().to_string()).or_insert(0) += 1;
            }
            (counts.len(), None)
        }
        Column::Boolean { values, validity } => {
            for i in validity.valid_indices() {
                *counts
                    .entry(if values[i] { "true" } else { "false" }.to_string())
                    .or_insert(0) += 1;
            }
            let mode = max_count_key(counts.iter());
            (counts.len(), mode)
        }
        Column::Categorical { .. } | Column::Text { .. } => {
            for i in 0..col.len() {
                if let Some(s) = col.str_at(i) {
                    *counts.entry(s.to_string()).or_insert(0) += 1;
                }
            }
            let mode = max_count_key(counts.iter());
            (counts.len(), mode)
        }
        Column::Datetime { values, validity } => {
            for i in validity.valid_indices() {
                *counts.entry(values[i].to_string()).or_insert(0) += 1;
            }
            (counts.len(), None)
        }
    }
}

fn max_count_key<'a>(counts: impl Iterator<Item = (&'a String, &'a usize)>) -> Option<String> {
    counts
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(k, _)| k.clone())
}

// ── Correlation ───────────────────────────────────────────────────────

/// A single correlation cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    /// Pearson correlation coefficient, clamped to [-1, 1].
    pub r: f64,
    /// Two-sided p-value (t-test, n-2 degrees of freedom). `None` when the
    /// test itself is not computable.
    pub p_value: Option<f64>,
}

/// Symmetric Pearson correlation matrix over the numeric columns of a
/// table, in table order.
///
/// The diagonal is always `Some` with `r == 1.0`; off-diagonal cells are
/// `None` when the pair has fewer than 3 jointly valid rows or either side
/// has zero variance.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    cells: Vec<Option<Correlation>>,
}

impl CorrelationMatrix {
    /// Numeric column names, in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Matrix dimension.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the table had no numeric columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the cell at (i, j).
    pub fn get(&self, i: usize, j: usize) -> Option<&Correlation> {
        self.cells.get(i * self.names.len() + j)?.as_ref()
    }

    /// Iterates over the upper triangle (i < j) as (i, j, cell).
    pub fn upper_triangle(&self) -> impl Iterator<Item = (usize, usize, Option<&Correlation>)> {
        let n = self.names.len();
        (0..n).flat_map(move |i| {
            ((i + 1)..n).map(move |j| (i, j, self.get(i, j)))
        })
    }
}

/// Computes the pairwise-complete Pearson correlation matrix over all
/// numeric columns.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let numeric: Vec<(&str, &Column)> = table
        .iter()
        .filter(|(_, col)| col.as_numeric().is_some())
        .collect();
    let n = numeric.len();
    let names: Vec<String> = numeric.iter().map(|(name, _)| name.to_string()).collect();
    let mut cells: Vec<Option<Correlation>> = vec![None; n * n];

    for i in 0..n {
        cells[i * n + i] = Some(Correlation {
            r: 1.0,
            p_value: None,
        });
        for j in (i + 1)..n {
            let cell = pairwise_pearson(numeric[i].1, numeric[j].1);
            cells[i * n + j] = cell.clone();
            cells[j * n + i] = cell;
        }
    }

    CorrelationMatrix { names, cells }
}

/// Pearson r over the rows where both columns are valid.
fn pairwise_pearson(a: &Column, b: &Column) -> Option<Correlation> {
    let (Column::Numeric {
        values: xs,
        validity: vx,
        ..
    }, Column::Numeric {
        values: ys,
        validity: vy,
        ..
    }) = (a, b)
    else {
        return None;
    };

    let mut x = Vec::new();
    let mut y = Vec::new();
    for i in 0..xs.len().min(ys.len()) {
        if vx.is_valid(i) && vy.is_valid(i) {
            x.push(xs[i]);
            y.push(ys[i]);
        }
    }
    let n = x.len();
    if n < 3 {
        return None;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for k in 0..n {
        let dx = x[k] - mean_x;
        let dy = y[k] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);
    let p_value = u_analytics::correlation::pearson(&x, &y).map(|pr| pr.p_value);

    Some(Correlation { r, p_value })
}

/// A significantly correlated pair of columns.
#[derive(Debug, Clone, Serialize)]
pub struct StrongPair {
    pub col_a: String,
    pub col_b: String,
    pub r: f64,
    pub p_value: f64,
}

/// Extracts pairs with `|r| >= threshold` and `p < significance`, sorted by
/// `|r|` descending, then by column names.
pub fn strong_pairs(
    matrix: &CorrelationMatrix,
    threshold: f64,
    significance: f64,
) -> Vec<StrongPair> {
    let mut pairs: Vec<StrongPair> = matrix
        .upper_triangle()
        .filter_map(|(i, j, cell)| {
            let cell = cell?;
            let p = cell.p_value?;
            if cell.r.abs() >= threshold && p < significance {
                Some(StrongPair {
                    col_a: matrix.names()[i].clone(),
                    col_b: matrix.names()[j].clone(),
                    r: cell.r,
                    p_value: p,
                })
            } else {
                None
            }
        })
        .collect();
    pairs.sort_by(|a, b| {
        b.r.abs()
            .partial_cmp(&a.r.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.col_a.cmp(&b.col_a))
            .then_with(|| a.col_b.cmp(&b.col_b))
    });
    pairs
}

// ── Tests ─────────────────────────────────────────────────────────────
