//! Tunable thresholds for the ETL pipeline and the insight engine.
//!
//! Both configs implement [`Default`] with the values the stages were
//! designed around; callers override individual fields when a dataset
//! needs different behavior.
//!
//! # Example
//!
//! ```
//! use cleansight::config::EtlConfig;
//!
//! let config = EtlConfig {
//!     iqr_multiplier: 3.0, // only flag extreme outliers
//!     ..EtlConfig::default()
//! };
//! assert_eq!(config.skewness_threshold, 0.5);
//! ```

/// Configuration for the cleaning pipeline.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    /// Imputation picks the median instead of the mean once `|skewness|`
    /// reaches this value. Default: 0.5.
    pub skewness_threshold: f64,
    /// IQR fence multiplier `k` for outlier bounds `Q1 - k*IQR` and
    /// `Q3 + k*IQR`. Default: 1.5.
    pub iqr_multiplier: f64,
    /// Minimum fraction of sampled non-missing values that must parse as a
    /// date for a text column to be converted to datetime. Default: 0.9.
    pub date_parse_ratio: f64,
    /// Number of non-missing values sampled when probing a column for
    /// date-likeness. Default: 50.
    pub date_sample_size: usize,
    /// Skewness above which a strictly positive numeric column gets a
    /// derived natural-log companion column. Default: 2.0.
    pub log_transform_skewness: f64,
    /// Sentinel label used when imputing a categorical column that has no
    /// valid values to take a mode from. Default: `"unknown"`.
    pub missing_sentinel: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            skewness_threshold: 0.5,
            iqr_multiplier: 1.5,
            date_parse_ratio: 0.9,
            date_sample_size: 50,
            log_transform_skewness: 2.0,
            missing_sentinel: "unknown".to_string(),
        }
    }
}

/// Configuration for statistics, chart selection, and narrative generation.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// `|r|` at or above which a correlation counts as strong (narrative and
    /// `strong_pairs`). Default: 0.7.
    pub strong_correlation: f64,
    /// `|r|` at or above which a numeric pair earns a scatter chart.
    /// Default: 0.5.
    pub scatter_correlation: f64,
    /// Two-sided p-value below which a correlation counts as significant.
    /// Default: 0.05.
    pub significance_level: f64,
    /// `|skewness|` above which a column is called out as skewed in the
    /// narrative. Default: 1.0.
    pub skew_threshold: f64,
    /// Missing-value percentage above which a column is called out in the
    /// narrative. Default: 20.0.
    pub high_missing_pct: f64,
    /// Maximum distinct categories for a pie chart; columns above this get a
    /// bar chart of the top categories instead. Default: 8.
    pub max_pie_categories: usize,
    /// Maximum valid rows a pie chart may summarize; larger columns get a
    /// bar chart even at low cardinality. Default: 1000.
    pub max_pie_rows: usize,
    /// Number of categories shown in a bar chart before the remainder is
    /// folded into an `other` bucket. Default: 10.
    pub top_n_categories: usize,
    /// Hard cap on histogram bin count. Default: 50.
    pub max_histogram_bins: usize,
    /// Maximum points per series in a line chart before stride subsampling.
    /// Default: 200.
    pub max_line_points: usize,
    /// Maximum points in a scatter chart before stride subsampling.
    /// Default: 500.
    pub max_scatter_points: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            strong_correlation: 0.7,
            scatter_correlation: 0.5,
            significance_level: 0.05,
            skew_threshold: 1.0,
            high_missing_pct: 20.0,
            max_pie_categories: 8,
            max_pie_rows: 1000,
            top_n_categories: 10,
            max_histogram_bins: 50,
            max_line_points: 200,
            max_scatter_points: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etl_defaults() {
        let c = EtlConfig::default();
        assert_eq!(c.skewness_threshold, 0.5);
        assert_eq!(c.iqr_multiplier, 1.5);
        assert_eq!(c.date_parse_ratio, 0.9);
        assert_eq!(c.missing_sentinel, "unknown");
    }

    #[test]
    fn insight_defaults() {
        let c = InsightConfig::default();
        assert_eq!(c.strong_correlation, 0.7);
        assert_eq!(c.significance_level, 0.05);
        assert_eq!(c.max_pie_categories, 8);
        assert_eq!(c.max_pie_rows, 1000);
        assert_eq!(c.max_histogram_bins, 50);
    }

    #[test]
    fn override_single_field() {
        let c = EtlConfig {
            iqr_multiplier: 3.0,
            ..EtlConfig::default()
        };
        assert_eq!(c.iqr_multiplier, 3.0);
        assert_eq!(c.skewness_threshold, 0.5);
    }
}
