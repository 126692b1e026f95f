//! Histogram binning and automatic chart-type selection.
//!
//! [`freedman_diaconis`] bins a numeric sample using the Freedman-Diaconis
//! rule with a square-root fallback for degenerate spreads. [`select_charts`]
//! walks a cleaned table and emits library-agnostic [`ChartSpec`] values in a
//! fixed, deterministic order: line charts for time series, grouped-mean bar
//! charts for categorical/numeric pairings, pie or bar charts for categorical
//! columns, histograms for numeric columns, scatter plots for correlated
//! pairs, and one correlation heatmap. Selection never mutates the table.

use crate::config::InsightConfig;
use crate::stats::CorrelationMatrix;
use crate::table::{Column, ColumnKind, Table};
use chrono::DateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Maximum numeric series paired with each datetime column.
const LINE_NUMERIC_CAP: usize = 3;

/// Maximum categorical columns used for grouped-mean bar charts.
const GROUPED_CATEGORY_CAP: usize = 3;

/// Maximum numeric columns averaged within each categorical grouping.
const GROUPED_NUMERIC_CAP: usize = 2;

// ── Chart model ───────────────────────────────────────────────────────

/// Chart type, chosen by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Histogram,
    Scatter,
    Heatmap,
}

/// A named value series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// An x/y point for scatter charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Renderer-agnostic chart payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    /// Labeled series (line, bar, pie, histogram).
    Series {
        labels: Vec<String>,
        series: Vec<Series>,
    },
    /// Point cloud (scatter).
    Points { points: Vec<Point> },
    /// Square matrix (heatmap); `None` cells were not computable.
    Matrix {
        columns: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    },
}

/// A single chart recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub data: ChartData,
}

// ── Histogram binning ─────────────────────────────────────────────────

/// Result of histogram binning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub n_bins: usize,
    pub bin_width: f64,
    /// Bin edges, `n_bins + 1` entries.
    pub edges: Vec<f64>,
    /// Value counts per bin; values equal to the maximum land in the last
    /// bin.
    pub counts: Vec<usize>,
}

/// Bins `values` with the Freedman-Diaconis rule: bin width
/// `2 * IQR * n^(-1/3)`, bin count `ceil(range / width)`, capped at
/// `max_bins` and floored at 1.
///
/// A zero IQR falls back to `ceil(sqrt(n))` bins; a zero range produces a
/// single bin. Returns `None` for fewer than 2 values or non-finite input.
pub fn freedman_diaconis(values: &[f64], max_bins: usize) -> Option<Histogram> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let min = u_numflow::stats::min(values)?;
    let max = u_numflow::stats::max(values)?;
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let range = max - min;
    if range == 0.0 {
        return Some(Histogram {
            n_bins: 1,
            bin_width: 1.0,
            edges: vec![min, min + 1.0],
            counts: vec![n],
        });
    }

    let q1 = u_numflow::stats::quantile(values, 0.25)?;
    let q3 = u_numflow::stats::quantile(values, 0.75)?;
    let iqr = q3 - q1;
    let fd_width = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);
    let raw_bins = if iqr <= 0.0 || fd_width <= 0.0 {
        (n as f64).sqrt().ceil()
    } else {
        (range / fd_width).ceil()
    };
    let n_bins = (raw_bins as usize).clamp(1, max_bins.max(1));
    let bin_width = range / n_bins as f64;

    let edges: Vec<f64> = (0..=n_bins).map(|i| min + i as f64 * bin_width).collect();
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let idx = (((v - min) / bin_width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram {
        n_bins,
        bin_width,
        edges,
        counts,
    })
}

// ── Chart selection ───────────────────────────────────────────────────

/// Chooses charts for a cleaned table.
///
/// Emission order is fixed: line, grouped-mean bar, pie/bar, histogram,
/// scatter, heatmap. Within each group, columns are visited in table order.
pub fn select_charts(
    table: &Table,
    matrix: &CorrelationMatrix,
    config: &InsightConfig,
) -> Vec<ChartSpec> {
    let mut charts = Vec::new();
    line_charts(table, config, &mut charts);
    grouped_mean_charts(table, config, &mut charts);
    category_charts(table, config, &mut charts);
    histogram_charts(table, config, &mut charts);
    scatter_charts(table, matrix, config, &mut charts);
    heatmap_chart(matrix, &mut charts);
    charts
}

fn line_charts(table: &Table, config: &InsightConfig, out: &mut Vec<ChartSpec>) {
    let datetime_cols: Vec<&str> = table
        .iter()
        .filter(|(_, col)| col.kind() == ColumnKind::Datetime)
        .map(|(name, _)| name)
        .collect();
    let numeric_cols: Vec<&str> = table
        .iter()
        .filter(|(_, col)| col.kind() == ColumnKind::Numeric)
        .map(|(name, _)| name)
        .take(LINE_NUMERIC_CAP)
        .collect();

    for dt_name in datetime_cols {
        let Some(dt_col) = table.column_by_name(dt_name) else {
            continue;
        };
        for num_name in &numeric_cols {
            let Some(num_col) = table.column_by_name(num_name) else {
                continue;
            };
            let Some(values) = num_col.as_numeric() else {
                continue;
            };
            let mut points: Vec<(i64, f64)> = (0..table.row_count())
                .filter_map(|i| {
                    let ts = dt_col.datetime_at(i)?;
                    num_col.is_valid(i).then(|| (ts, values[i]))
                })
                .collect();
            if points.is_empty() {
                continue;
            }
            points.sort_by_key(|&(ts, _)| ts);
            let points = stride_sample(points, config.max_line_points);

            let labels: Vec<String> = points.iter().map(|&(ts, _)| format_date(ts)).collect();
            let series = vec![Series {
                name: (*num_name).to_string(),
                values: points.iter().map(|&(_, v)| v).collect(),
            }];
            out.push(ChartSpec {
                kind: ChartKind::Line,
                title: format!("{num_name} over {dt_name}"),
                data: ChartData::Series { labels, series },
            });
        }
    }
}

/// One bar chart of per-category means for each (categorical, numeric)
/// pairing, limited to the largest means.
fn grouped_mean_charts(table: &Table, config: &InsightConfig, out: &mut Vec<ChartSpec>) {
    let cat_cols: Vec<(&str, &Column)> = table
        .iter()
        .filter(|(_, col)| col.kind() == ColumnKind::Categorical)
        .take(GROUPED_CATEGORY_CAP)
        .collect();
    let num_cols: Vec<(&str, &Column)> = table
        .iter()
        .filter(|(_, col)| col.kind() == ColumnKind::Numeric)
        .take(GROUPED_NUMERIC_CAP)
        .collect();

    for (cat_name, cat_col) in &cat_cols {
        for (num_name, num_col) in &num_cols {
            let Some(values) = num_col.as_numeric() else {
                continue;
            };
            let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
            for i in 0..table.row_count() {
                let Some(label) = cat_col.str_at(i) else {
                    continue;
                };
                if !num_col.is_valid(i) {
                    continue;
                }
                let entry = sums.entry(label).or_insert((0.0, 0));
                entry.0 += values[i];
                entry.1 += 1;
            }
            if sums.is_empty() {
                continue;
            }
            let mut means: Vec<(String, f64)> = sums
                .into_iter()
                .map(|(label, (sum, count))| (label.to_string(), sum / count as f64))
                .collect();
            means.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            means.truncate(config.top_n_categories.max(1));
            let (labels, values): (Vec<String>, Vec<f64>) = means.into_iter().unzip();
            out.push(ChartSpec {
                kind: ChartKind::Bar,
                title: format!("average {num_name} by {cat_name}"),
                data: ChartData::Series {
                    labels,
                    series: vec![Series {
                        name: format!("average {num_name}"),
                        values,
                    }],
                },
            });
        }
    }
}

fn category_charts(table: &Table, config: &InsightConfig, out: &mut Vec<ChartSpec>) {
    for (name, col) in table.iter() {
        let counts = match col {
            Column::Categorical { .. } => label_counts(col),
            Column::Boolean { values, validity } => {
                let mut counts: Vec<(String, usize)> = Vec::new();
                let trues = validity.valid_indices().filter(|&i| values[i]).count();
                let falses = validity.valid_count() - trues;
                if trues > 0 {
                    counts.push(("true".to_string(), trues));
                }
                if falses > 0 {
                    counts.push(("false".to_string(), falses));
                }
                counts
            }
            _ => continue,
        };
        if counts.is_empty() {
            continue;
        }

        let mut sorted = counts;
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        // Pie requires both few slices and few underlying rows.
        let total: usize = sorted.iter().map(|(_, count)| count).sum();
        if sorted.len() <= config.max_pie_categories && total <= config.max_pie_rows {
            let (labels, values): (Vec<String>, Vec<f64>) = sorted
                .into_iter()
                .map(|(label, count)| (label, count as f64))
                .unzip();
            out.push(ChartSpec {
                kind: ChartKind::Pie,
                title: format!("distribution of {name}"),
                data: ChartData::Series {
                    labels,
                    series: vec![Series {
                        name: name.to_string(),
                        values,
                    }],
                },
            });
        } else {
            let top_n = config.top_n_categories.max(1);
            let other: usize = sorted.iter().skip(top_n).map(|(_, c)| c).sum();
            let mut labels: Vec<String> = Vec::with_capacity(top_n + 1);
            let mut values: Vec<f64> = Vec::with_capacity(top_n + 1);
            for (label, count) in sorted.into_iter().take(top_n) {
                labels.push(label);
                values.push(count as f64);
            }
            if other > 0 {
                labels.push("other".to_string());
                values.push(other as f64);
            }
            out.push(ChartSpec {
                kind: ChartKind::Bar,
                title: format!("top categories of {name}"),
                data: ChartData::Series {
                    labels,
                    series: vec![Series {
                        name: name.to_string(),
                        values,
                    }],
                },
            });
        }
    }
}

fn histogram_charts(table: &Table, config: &InsightConfig, out: &mut Vec<ChartSpec>) {
    for (name, col) in table.iter() {
        let Some(valid) = col.valid_numeric_values() else {
            continue;
        };
        let Some(hist) = freedman_diaconis(&valid, config.max_histogram_bins) else {
            continue;
        };
        let labels: Vec<String> = hist
            .edges
            .windows(2)
            .map(|edge| format!("{:.3}..{:.3}", edge[0], edge[1]))
            .collect();
        let values: Vec<f64> = hist.counts.iter().map(|&c| c as f64).collect();
        out.push(ChartSpec {
            kind: ChartKind::Histogram,
            title: format!("distribution of {name}"),
            data: ChartData::Series {
                labels,
                series: vec![Series {
                    name: name.to_string(),
                    values,
                }],
            },
        });
    }
}

fn scatter_charts(
    table: &Table,
    matrix: &CorrelationMatrix,
    config: &InsightConfig,
    out: &mut Vec<ChartSpec>,
) {
    for (i, j, cell) in matrix.upper_triangle() {
        let Some(cell) = cell else {
            continue;
        };
        if cell.r.abs() < config.scatter_correlation {
            continue;
        }
        let name_a = &matrix.names()[i];
        let name_b = &matrix.names()[j];
        let (Some(col_a), Some(col_b)) =
            (table.column_by_name(name_a), table.column_by_name(name_b))
        else {
            continue;
        };
        let (Some(xs), Some(ys)) = (col_a.as_numeric(), col_b.as_numeric()) else {
            continue;
        };
        let points: Vec<Point> = (0..table.row_count())
            .filter(|&k| col_a.is_valid(k) && col_b.is_valid(k))
            .map(|k| Point { x: xs[k], y: ys[k] })
            .collect();
        let points = stride_sample(points, config.max_scatter_points);
        out.push(ChartSpec {
            kind: ChartKind::Scatter,
            title: format!("{name_a} vs {name_b}"),
            data: ChartData::Points { points },
        });
    }
}

fn heatmap_chart(matrix: &CorrelationMatrix, out: &mut Vec<ChartSpec>) {
    let n = matrix.len();
    if n < 2 {
        return;
    }
    let values: Vec<Vec<Option<f64>>> = (0..n)
        .map(|i| (0..n).map(|j| matrix.get(i, j).map(|c| c.r)).collect())
        .collect();
    out.push(ChartSpec {
        kind: ChartKind::Heatmap,
        title: "correlation heatmap".to_string(),
        data: ChartData::Matrix {
            columns: matrix.names().to_vec(),
            values,
        },
    });
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Valid label → count for a categorical column.
fn label_counts(col: &Column) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for i in 0..col.len() {
        if let Some(label) = col.str_at(i) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect()
}

/// Keeps at most `cap` items at an even stride, preserving order.
fn stride_sample<T>(items: Vec<T>, cap: usize) -> Vec<T> {
    let cap = cap.max(1);
    if items.len() <= cap {
        return items;
    }
    let stride = items.len().div_ceil(cap);
    items
        .into_iter()
        .step_by(stride)
        .collect()
}

fn format_date(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| epoch_secs.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CsvLoader;
    use crate::stats::correlation_matrix;
    use crate::table::ValidityMask;

    fn load(csv: &str) -> Table {
        CsvLoader::new().load_str(csv).unwrap()
    }

    // ── Binning ──────────────────────────────────────────────────

    #[test]
    fn fd_binning_uniform_data() {
        // 1000 uniform values over [0, 99.9]: FD width ≈ 10, so ~10 bins.
        let values: Vec<f64> = (0..1000).map(|i| i as f64 * 0.1).collect();
        let hist = freedman_diaconis(&values, 50).unwrap();
        assert!(
            (8..=13).contains(&hist.n_bins),
            "unexpected bin count {}",
            hist.n_bins
        );
        assert_eq!(hist.counts.iter().sum::<usize>(), 1000);
        assert_eq!(hist.edges.len(), hist.n_bins + 1);
    }

    #[test]
    fn fd_binning_respects_cap() {
        let values: Vec<f64> = (0..1000).map(|i| i as f64 * 0.1).collect();
        let hist = freedman_diaconis(&values, 5).unwrap();
        assert_eq!(hist.n_bins, 5);
    }

    #[test]
    fn fd_constant_column_single_bin() {
        let values = vec![7.0; 20];
        let hist = freedman_diaconis(&values, 50).unwrap();
        assert_eq!(hist.n_bins, 1);
        assert_eq!(hist.counts, vec![20]);
    }

    #[test]
    fn fd_zero_iqr_falls_back_to_sqrt() {
        // IQR is 0 but range is not.
        let mut values = vec![1.0; 14];
        values.push(2.0);
        values.push(3.0);
        let hist = freedman_diaconis(&values, 50).unwrap();
        assert_eq!(hist.n_bins, 4); // ceil(sqrt(16))
        assert_eq!(hist.counts.iter().sum::<usize>(), 16);
    }

    #[test]
    fn fd_max_value_in_last_bin() {
        let values = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        let hist = freedman_diaconis(&values, 50).unwrap();
        // The maximum must be counted, in the last bin, not lost past the edge.
        assert!(*hist.counts.last().unwrap() >= 1);
        assert_eq!(hist.counts.iter().sum::<usize>(), 10);
    }

    #[test]
    fn fd_too_small_sample() {
        assert!(freedman_diaconis(&[], 50).is_none());
        assert!(freedman_diaconis(&[1.0], 50).is_none());
    }

    // ── Selection ────────────────────────────────────────────────

    #[test]
    fn histogram_emitted_per_numeric_column() {
        let t = load("x,y\n1,10\n2,20\n3,30\n4,40\n");
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let histograms: Vec<&ChartSpec> = charts
            .iter()
            .filter(|c| c.kind == ChartKind::Histogram)
            .collect();
        assert_eq!(histograms.len(), 2);
        assert_eq!(histograms[0].title, "distribution of x");
    }

    #[test]
    fn pie_for_low_cardinality_category() {
        let t = load("c,x\na,1\nb,2\na,3\nb,4\na,5\n");
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let pie = charts.iter().find(|c| c.kind == ChartKind::Pie).unwrap();
        let ChartData::Series { labels, series } = &pie.data else {
            panic!("expected series data");
        };
        assert_eq!(labels, &["a", "b"]);
        assert_eq!(series[0].values, vec![3.0, 2.0]);
    }

    #[test]
    fn bar_with_other_bucket_for_high_cardinality() {
        // 12 distinct labels; default pie cap is 8 and top-N is 10.
        let mut csv = String::from("c,x\n");
        for i in 0..12 {
            for _ in 0..(13 - i) {
                csv.push_str(&format!("label{i:02},{i}\n"));
            }
        }
        let t = load(&csv);
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let bar = charts
            .iter()
            .find(|c| c.title == "top categories of c")
            .unwrap();
        assert_eq!(bar.kind, ChartKind::Bar);
        let ChartData::Series { labels, series } = &bar.data else {
            panic!("expected series data");
        };
        assert_eq!(labels.len(), 11); // top 10 + other
        assert_eq!(labels.last().unwrap(), "other");
        // Most frequent label first.
        assert_eq!(labels[0], "label00");
        assert_eq!(series[0].values[0], 13.0);
    }

    #[test]
    fn grouped_mean_bar_for_category_numeric_pair() {
        let csv = "c,x\na,1\nb,10\na,3\nb,20\na,2\nb,30\n";
        let t = load(csv);
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let bar = charts
            .iter()
            .find(|c| c.title == "average x by c")
            .unwrap();
        assert_eq!(bar.kind, ChartKind::Bar);
        let ChartData::Series { labels, series } = &bar.data else {
            panic!("expected series data");
        };
        // Largest mean first: b = 20, a = 2.
        assert_eq!(labels, &["b", "a"]);
        assert_eq!(series[0].values, vec![20.0, 2.0]);
    }

    #[test]
    fn grouped_mean_skips_missing_values() {
        let csv = "c,x\na,NA\nb,10\na,4\nb,20\na,2\nb,30\n";
        let t = load(csv);
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let bar = charts
            .iter()
            .find(|c| c.title == "average x by c")
            .unwrap();
        let ChartData::Series { series, .. } = &bar.data else {
            panic!("expected series data");
        };
        // The missing 'a' row is excluded: mean over {4, 2}.
        assert_eq!(series[0].values, vec![20.0, 3.0]);
    }

    #[test]
    fn pie_demoted_to_bar_above_row_cap() {
        let csv = "c,x\na,1\nb,2\na,3\nb,4\na,5\n";
        let t = load(csv);
        let m = correlation_matrix(&t);
        let config = InsightConfig {
            max_pie_rows: 4,
            ..InsightConfig::default()
        };
        let charts = select_charts(&t, &m, &config);
        assert!(!charts.iter().any(|c| c.kind == ChartKind::Pie));
        assert!(charts
            .iter()
            .any(|c| c.kind == ChartKind::Bar && c.title == "top categories of c"));
    }

    #[test]
    fn scatter_for_correlated_pair_only() {
        let t = load("x,y,noise\n1,2,9\n2,4,1\n3,6,8\n4,8,1\n5,10,9\n6,12,2\n");
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let scatters: Vec<&ChartSpec> = charts
            .iter()
            .filter(|c| c.kind == ChartKind::Scatter)
            .collect();
        assert!(scatters.iter().any(|c| c.title == "x vs y"));
        assert!(!scatters.iter().any(|c| c.title.contains("noise")));
    }

    #[test]
    fn heatmap_requires_two_numeric_columns() {
        let t = load("x\n1\n2\n3\n");
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        assert!(!charts.iter().any(|c| c.kind == ChartKind::Heatmap));

        let t2 = load("x,y\n1,3\n2,1\n3,8\n4,2\n");
        let m2 = correlation_matrix(&t2);
        let charts2 = select_charts(&t2, &m2, &InsightConfig::default());
        assert_eq!(
            charts2
                .iter()
                .filter(|c| c.kind == ChartKind::Heatmap)
                .count(),
            1
        );
    }

    #[test]
    fn line_chart_for_datetime_column() {
        let mut t = load("x\n10\n20\n30\n");
        t.add_column(
            "when".to_string(),
            Column::datetime(
                vec![1_700_172_800, 1_700_000_000, 1_700_086_400],
                ValidityMask::all_valid(3),
            ),
        )
        .unwrap();
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let line = charts.iter().find(|c| c.kind == ChartKind::Line).unwrap();
        assert_eq!(line.title, "x over when");
        let ChartData::Series { series, .. } = &line.data else {
            panic!("expected series data");
        };
        // Sorted by timestamp, not row order.
        assert_eq!(series[0].values, vec![20.0, 30.0, 10.0]);
    }

    #[test]
    fn emission_order_is_fixed() {
        let mut t = load("x,y,c\n1,2,a\n2,4,b\n3,6,a\n4,8,b\n5,10,a\n");
        t.add_column(
            "when".to_string(),
            Column::datetime(
                vec![
                    1_700_000_000,
                    1_700_086_400,
                    1_700_172_800,
                    1_700_259_200,
                    1_700_345_600,
                ],
                ValidityMask::all_valid(5),
            ),
        )
        .unwrap();
        let m = correlation_matrix(&t);
        let charts = select_charts(&t, &m, &InsightConfig::default());
        let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
        let first_line = kinds.iter().position(|&k| k == ChartKind::Line);
        let first_pie = kinds.iter().position(|&k| k == ChartKind::Pie);
        let first_hist = kinds.iter().position(|&k| k == ChartKind::Histogram);
        let first_scatter = kinds.iter().position(|&k| k == ChartKind::Scatter);
        let heatmap = kinds.iter().position(|&k| k == ChartKind::Heatmap);
        assert!(first_line < first_pie);
        assert!(first_pie < first_hist);
        assert!(first_hist < first_scatter);
        assert_eq!(heatmap, Some(kinds.len() - 1));
    }

    #[test]
    fn selection_is_deterministic() {
        let t = load("x,y,c\n1,2,a\n2,4,b\n3,6,a\n4,8,b\n5,10,a\n");
        let m = correlation_matrix(&t);
        let a = select_charts(&t, &m, &InsightConfig::default());
        let b = select_charts(&t, &m, &InsightConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn stride_sampling_caps_points() {
        let items: Vec<usize> = (0..1000).collect();
        let sampled = stride_sample(items, 200);
        assert!(sampled.len() <= 200);
        assert_eq!(sampled[0], 0);
    }
}
