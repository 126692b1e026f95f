//! Nine-stage data cleaning pipeline with per-stage provenance.
//!
//! [`run_etl`] takes ownership of a freshly loaded [`Table`] and applies a
//! fixed stage order:
//!
//! 1. Column name standardisation (snake_case, deduplicated)
//! 2. Exact duplicate row removal
//! 3. Skew-aware missing value imputation
//! 4. Text-to-datetime conversion
//! 5. IQR outlier detection (flag only, never drop)
//! 6. Numeric width optimisation
//! 7. Feature engineering (date parts, log transforms)
//! 8. Categorical label normalisation
//! 9. Final integrity validation
//!
//! Every mutation appends a [`TransformationRecord`] to the ordered log.
//! Stages that find nothing to do append nothing, so running the pipeline
//! over already-clean output adds only stage 9's validation record. Outlier
//! counts go into the separate [`OutlierReport`] because flagged values stay
//! in the data.
//!
//! # Example
//!
//! ```
//! use cleansight::config::EtlConfig;
//! use cleansight::etl::run_etl;
//! use cleansight::loader::CsvLoader;
//!
//! let csv = " Order ID ,Amount\n1,10.5\n2,20.0\n2,20.0\n";
//! let table = CsvLoader::new().load_str(csv).unwrap();
//! let out = run_etl(table, &EtlConfig::default()).unwrap();
//! assert_eq!(out.table.column_names()[0], "order_id");
//! assert_eq!(out.table.row_count(), 2); // duplicate removed
//! ```

use crate::config::EtlConfig;
use crate::error::PipelineError;
use crate::table::{Column, ColumnKind, NumericWidth, Table, ValidityMask};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;

/// One entry in the ordered transformation log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformationRecord {
    /// Human-readable description of what the stage changed.
    pub description: String,
    /// Number of rows, values, or columns the change touched.
    pub affected: usize,
}

/// Column name → number of IQR-flagged values. Kept separate from the
/// transformation log because flagged rows are never removed.
pub type OutlierReport = BTreeMap<String, usize>;

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct EtlOutput {
    /// The cleaned table.
    pub table: Table,
    /// Ordered log of applied transformations.
    pub log: Vec<TransformationRecord>,
    /// Outlier counts per numeric column.
    pub outliers: OutlierReport,
}

/// Datetime formats probed during date conversion, most specific first.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Name suffixes of columns the feature stage derives. Derived columns are
/// never used as sources for further derivation.
const DERIVED_SUFFIXES: &[&str] = &["_year", "_month", "_day_of_week", "_is_weekend", "_log"];

/// Runs the nine cleaning stages over `table`.
///
/// Fails fast with [`PipelineError::Structural`] when the table has no rows
/// or no columns, or when the final integrity pass finds a violated shape
/// invariant.
pub fn run_etl(table: Table, config: &EtlConfig) -> Result<EtlOutput, PipelineError> {
    EtlPipeline::new(table, config.clone())?.run()
}

/// Owns the table for the duration of a pipeline run.
pub struct EtlPipeline {
    table: Table,
    log: Vec<TransformationRecord>,
    outliers: OutlierReport,
    config: EtlConfig,
}

impl EtlPipeline {
    /// Creates a pipeline, rejecting structurally empty input.
    pub fn new(table: Table, config: EtlConfig) -> Result<Self, PipelineError> {
        if table.column_count() == 0 {
            return Err(PipelineError::Structural {
                message: "table has no columns".to_string(),
            });
        }
        if table.row_count() == 0 {
            return Err(PipelineError::Structural {
                message: "table has no rows".to_string(),
            });
        }
        Ok(Self {
            table,
            log: Vec::new(),
            outliers: OutlierReport::new(),
            config,
        })
    }

    /// Applies all stages in order and returns the cleaned output.
    pub fn run(mut self) -> Result<EtlOutput, PipelineError> {
        self.standardize_columns()?;
        self.remove_duplicates()?;
        self.impute_missing();
        self.convert_dates()?;
        self.detect_outliers();
        self.optimize_widths();
        self.engineer_features()?;
        self.normalize_categories()?;
        self.validate()?;
        Ok(EtlOutput {
            table: self.table,
            log: self.log,
            outliers: self.outliers,
        })
    }

    fn record(&mut self, description: String, affected: usize) {
        self.log.push(TransformationRecord {
            description,
            affected,
        });
    }

    // ── Stage 1: column standardisation ──────────────────────────

    fn standardize_columns(&mut self) -> Result<(), PipelineError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut new_names = Vec::with_capacity(self.table.column_count());
        let mut changed = 0usize;
        for name in self.table.column_names() {
            let mut base = snake_case(name);
            if base.is_empty() {
                base = "column".to_string();
            }
            let mut candidate = base.clone();
            let mut suffix = 2usize;
            while seen.contains(&candidate) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            if candidate != *name {
                changed += 1;
            }
            seen.insert(candidate.clone());
            new_names.push(candidate);
        }
        if changed > 0 {
            self.table.rename_columns(new_names)?;
            self.record("standardized column names".to_string(), changed);
        }
        Ok(())
    }

    // ── Stage 2: duplicate row removal ───────────────────────────

    fn remove_duplicates(&mut self) -> Result<(), PipelineError> {
        let n = self.table.row_count();
        if n <= 1 {
            return Ok(());
        }
        let mut seen: HashSet<String> = HashSet::with_capacity(n);
        let mut keep = Vec::with_capacity(n);
        for row in 0..n {
            keep.push(seen.insert(row_key(&self.table, row)));
        }
        let removed = self.table.retain_rows(&keep)?;
        if removed > 0 {
            self.record("removed exact duplicate rows".to_string(), removed);
        }
        Ok(())
    }

    // ── Stage 3: skew-aware imputation ───────────────────────────

    fn impute_missing(&mut self) {
        let sentinel = self.config.missing_sentinel.clone();
        let skew_threshold = self.config.skewness_threshold;
        for idx in 0..self.table.column_count() {
            let name = self.table.column_names()[idx].clone();
            // Derived columns mirror the missing rows of their source;
            // filling them would desynchronize the two.
            if is_derived_name(&name) {
                continue;
            }
            let nulls = self.table.column(idx).map_or(0, |c| c.null_count());
            if nulls == 0 {
                continue;
            }
            let Some(col) = self.table.column_mut(idx) else {
                continue;
            };
            match col {
                Column::Numeric {
                    values, validity, ..
                } => {
                    let valid: Vec<f64> = validity.valid_indices().map(|i| values[i]).collect();
                    let Some(mean) = u_numflow::stats::mean(&valid) else {
                        continue; // entirely missing, nothing to impute from
                    };
                    let skew = u_numflow::stats::skewness(&valid);
                    let use_median = skew.map_or(false, |s| s.abs() >= skew_threshold);
                    let (fill, how) = if use_median {
                        let median = u_numflow::stats::median(&valid).unwrap_or(mean);
                        (median, "median")
                    } else {
                        (mean, "mean")
                    };
                    for i in 0..values.len() {
                        if !validity.is_valid(i) {
                            values[i] = fill;
                            validity.set_valid(i);
                        }
                    }
                    self.record(
                        format!("imputed missing values in '{name}' with {how}"),
                        nulls,
                    );
                }
                Column::Boolean { values, validity } => {
                    let mut trues = 0usize;
                    let mut falses = 0usize;
                    for i in validity.valid_indices() {
                        if values[i] {
                            trues += 1;
                        } else {
                            falses += 1;
                        }
                    }
                    if trues + falses == 0 {
                        continue;
                    }
                    let fill = trues > falses;
                    for i in 0..values.len() {
                        if !validity.is_valid(i) {
                            values[i] = fill;
                            validity.set_valid(i);
                        }
                    }
                    self.record(
                        format!("imputed missing values in '{name}' with mode"),
                        nulls,
                    );
                }
                Column::Categorical {
                    dictionary,
                    codes,
                    validity,
                } => {
                    let fill_code = match mode_code(codes, validity) {
                        Some(code) => code,
                        None => {
                            // entirely missing: introduce the sentinel label
                            let code = dictionary
                                .iter()
                                .position(|s| *s == sentinel)
                                .unwrap_or_else(|| {
                                    dictionary.push(sentinel.clone());
                                    dictionary.len() - 1
                                });
                            code as u32
                        }
                    };
                    for i in 0..codes.len() {
                        if !validity.is_valid(i) {
                            codes[i] = fill_code;
                            validity.set_valid(i);
                        }
                    }
                    self.record(
                        format!("imputed missing values in '{name}' with mode"),
                        nulls,
                    );
                }
                Column::Text { values, validity } => {
                    let fill = mode_text(values, validity).unwrap_or_else(|| sentinel.clone());
                    for i in 0..values.len() {
                        if !validity.is_valid(i) {
                            values[i] = fill.clone();
                            validity.set_valid(i);
                        }
                    }
                    self.record(
                        format!("imputed missing values in '{name}' with mode"),
                        nulls,
                    );
                }
                // Datetime nulls are left in place; inventing timestamps
                // would distort every derived date part.
                Column::Datetime { .. } => {}
            }
        }
    }

    // ── Stage 4: date conversion ─────────────────────────────────

    fn convert_dates(&mut self) -> Result<(), PipelineError> {
        for idx in 0..self.table.column_count() {
            let Some(col) = self.table.column(idx) else {
                continue;
            };
            if !matches!(col.kind(), ColumnKind::Text | ColumnKind::Categorical) {
                continue;
            }
            let n = col.len();
            let sample: Vec<&str> = (0..n)
                .filter_map(|i| col.str_at(i))
                .take(self.config.date_sample_size)
                .collect();
            if sample.is_empty() {
                continue;
            }
            let parsed_in_sample = sample
                .iter()
                .filter(|s| parse_timestamp(s).is_some())
                .count();
            let ratio = parsed_in_sample as f64 / sample.len() as f64;
            if ratio < self.config.date_parse_ratio {
                continue;
            }

            let mut values = Vec::with_capacity(n);
            let mut validity = ValidityMask::empty();
            let mut converted = 0usize;
            for i in 0..n {
                match col.str_at(i).and_then(parse_timestamp) {
                    Some(ts) => {
                        values.push(ts);
                        validity.push(true);
                        converted += 1;
                    }
                    None => {
                        values.push(0);
                        validity.push(false);
                    }
                }
            }
            let name = self.table.column_names()[idx].clone();
            self.table
                .replace_column(idx, Column::datetime(values, validity))?;
            self.record(format!("converted '{name}' to datetime"), converted);
        }
        Ok(())
    }

    // ── Stage 5: outlier detection ───────────────────────────────

    // Flag-only stage: counts go into the report, the data and the
    // transformation log are untouched.
    fn detect_outliers(&mut self) {
        let k = self.config.iqr_multiplier;
        for (name, col) in self.table.iter() {
            let Some(valid) = col.valid_numeric_values() else {
                continue;
            };
            if valid.len() < 4 {
                continue;
            }
            let (Some(q1), Some(q3)) = (
                u_numflow::stats::quantile(&valid, 0.25),
                u_numflow::stats::quantile(&valid, 0.75),
            ) else {
                continue;
            };
            let iqr = q3 - q1;
            let lower = q1 - k * iqr;
            let upper = q3 + k * iqr;
            let count = valid.iter().filter(|&&v| v < lower || v > upper).count();
            if count > 0 {
                self.outliers.insert(name.to_string(), count);
            }
        }
    }

    // ── Stage 6: width optimisation ──────────────────────────────

    fn optimize_widths(&mut self) {
        let mut saved = 0usize;
        let mut narrowed = 0usize;
        for idx in 0..self.table.column_count() {
            let Some(Column::Numeric {
                values,
                validity,
                width,
            }) = self.table.column_mut(idx)
            else {
                continue;
            };
            let best = narrowest_width(values, validity);
            if best.bytes() < width.bytes() {
                saved += (width.bytes() - best.bytes()) * values.len();
                narrowed += 1;
                *width = best;
            }
        }
        if saved > 0 {
            self.record(
                format!("narrowed numeric storage in {narrowed} columns, saving {saved} bytes"),
                narrowed,
            );
        }
    }

    // ── Stage 7: feature engineering ─────────────────────────────

    fn engineer_features(&mut self) -> Result<(), PipelineError> {
        // Snapshot source columns first; derived columns added below must
        // not become derivation sources themselves.
        let datetime_sources: Vec<String> = self
            .table
            .iter()
            .filter(|(name, col)| {
                col.kind() == ColumnKind::Datetime && !is_derived_name(name)
            })
            .map(|(name, _)| name.to_string())
            .collect();
        let numeric_sources: Vec<String> = self
            .table
            .iter()
            .filter(|(name, col)| {
                col.kind() == ColumnKind::Numeric && !is_derived_name(name)
            })
            .map(|(name, _)| name.to_string())
            .collect();

        for name in datetime_sources {
            let added = self.derive_date_parts(&name)?;
            if added > 0 {
                self.record(format!("derived date part columns from '{name}'"), added);
            }
        }

        for name in numeric_sources {
            let log_name = format!("{name}_log");
            if self.table.column_index(&log_name).is_some() {
                continue;
            }
            let Some(col) = self.table.column_by_name(&name) else {
                continue;
            };
            let Some(valid) = col.valid_numeric_values() else {
                continue;
            };
            let skewed = u_numflow::stats::skewness(&valid)
                .map_or(false, |s| s > self.config.log_transform_skewness);
            let strictly_positive = !valid.is_empty() && valid.iter().all(|&v| v > 0.0);
            if !skewed || !strictly_positive {
                continue;
            }
            let Column::Numeric {
                values, validity, ..
            } = col
            else {
                continue;
            };
            let transformed: Vec<f64> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| if validity.is_valid(i) { v.ln() } else { 0.0 })
                .collect();
            let mask = validity.clone();
            let affected = mask.valid_count();
            self.table
                .add_column(log_name.clone(), numeric_narrowed(transformed, mask))?;
            self.record(format!("added log-transformed column '{log_name}'"), affected);
        }
        Ok(())
    }

    /// Adds `_year`, `_month`, `_day_of_week`, and `_is_weekend` columns
    /// derived from a datetime column; returns how many were added.
    fn derive_date_parts(&mut self, name: &str) -> Result<usize, PipelineError> {
        let Some(Column::Datetime { values, validity }) = self.table.column_by_name(name)
        else {
            return Ok(0);
        };
        let values = values.clone();
        let validity = validity.clone();

        let mut years = Vec::with_capacity(values.len());
        let mut months = Vec::with_capacity(values.len());
        let mut weekdays = Vec::with_capacity(values.len());
        let mut weekends = Vec::with_capacity(values.len());
        let mut mask = ValidityMask::empty();
        for (i, &secs) in values.iter().enumerate() {
            match DateTime::from_timestamp(secs, 0) {
                Some(dt) if validity.is_valid(i) => {
                    let wd = dt.weekday().num_days_from_monday();
                    years.push(f64::from(dt.year()));
                    months.push(f64::from(dt.month()));
                    weekdays.push(f64::from(wd));
                    weekends.push(wd >= 5);
                    mask.push(true);
                }
                _ => {
                    years.push(0.0);
                    months.push(0.0);
                    weekdays.push(0.0);
                    weekends.push(false);
                    mask.push(false);
                }
            }
        }

        let mut added = 0usize;
        let derived: [(String, Column); 4] = [
            (
                format!("{name}_year"),
                numeric_narrowed(years, mask.clone()),
            ),
            (
                format!("{name}_month"),
                numeric_narrowed(months, mask.clone()),
            ),
            (
                format!("{name}_day_of_week"),
                numeric_narrowed(weekdays, mask.clone()),
            ),
            (
                format!("{name}_is_weekend"),
                Column::boolean(weekends, mask),
            ),
        ];
        for (derived_name, column) in derived {
            if self.table.column_index(&derived_name).is_none() {
                self.table.add_column(derived_name, column)?;
                added += 1;
            }
        }
        Ok(added)
    }

    // ── Stage 8: categorical normalisation ───────────────────────

    fn normalize_categories(&mut self) -> Result<(), PipelineError> {
        for idx in 0..self.table.column_count() {
            let name = self.table.column_names()[idx].clone();
            let Some(Column::Categorical {
                dictionary,
                codes,
                validity,
            }) = self.table.column_mut(idx)
            else {
                continue;
            };
            if dictionary
                .iter()
                .all(|label| *label == normalize_label(label))
            {
                continue;
            }

            let mut new_dictionary: Vec<String> = Vec::new();
            let mut label_to_code: HashMap<String, u32> = HashMap::new();
            let mut remap: Vec<u32> = Vec::with_capacity(dictionary.len());
            for label in dictionary.iter() {
                let normalized = normalize_label(label);
                let code = *label_to_code.entry(normalized.clone()).or_insert_with(|| {
                    new_dictionary.push(normalized);
                    (new_dictionary.len() - 1) as u32
                });
                remap.push(code);
            }
            let merged = dictionary.len() - new_dictionary.len();
            let mut touched = 0usize;
            for (i, code) in codes.iter_mut().enumerate() {
                let old_label_changed =
                    dictionary[*code as usize] != new_dictionary[remap[*code as usize] as usize];
                *code = remap[*code as usize];
                if validity.is_valid(i) && old_label_changed {
                    touched += 1;
                }
            }
            *dictionary = new_dictionary;
            self.record(
                format!("normalized category labels in '{name}' (merged {merged})"),
                touched,
            );
        }
        Ok(())
    }

    // ── Stage 9: final integrity pass ────────────────────────────

    fn validate(&mut self) -> Result<(), PipelineError> {
        let rows = self.table.row_count();
        if self.table.column_count() == 0 || rows == 0 {
            return Err(PipelineError::Structural {
                message: "table emptied during cleaning".to_string(),
            });
        }
        for (name, col) in self.table.iter() {
            if col.len() != rows {
                return Err(PipelineError::Structural {
                    message: format!(
                        "column '{name}' has {} rows, table has {rows}",
                        col.len()
                    ),
                });
            }
        }
        let mut seen = HashSet::new();
        for name in self.table.column_names() {
            if !seen.insert(name) {
                return Err(PipelineError::Structural {
                    message: format!("duplicate column name '{name}'"),
                });
            }
        }
        self.record("validated table integrity".to_string(), rows);
        Ok(())
    }
}

// ── Helper functions ──────────────────────────────────────────────────

/// Lowercases, replaces non-alphanumerics with `_`, collapses runs, trims.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_underscore = true; // suppress leading underscore
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_underscore = false;
        } else if !last_underscore {
            out.push('_');
            last_underscore = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Produces a string key for a row, suitable for hash-based duplicate
/// detection. Floats are keyed by bit pattern; null status is part of
/// the key.
fn row_key(table: &Table, row: usize) -> String {
    let mut key = String::new();
    for (i, (_, col)) in table.iter().enumerate() {
        if i > 0 {
            key.push('\x1F'); // unit separator
        }
        if !col.is_valid(row) {
            key.push_str("\x00NULL");
            continue;
        }
        match col {
            Column::Numeric { values, .. } => {
                let _ = write!(key, "{}", values[row].to_bits());
            }
            Column::Boolean { values, .. } => {
                key.push(if values[row] { 'T' } else { 'F' });
            }
            Column::Categorical { .. } | Column::Text { .. } => {
                key.push_str(col.str_at(row).unwrap_or(""));
            }
            Column::Datetime { values, .. } => {
                let _ = write!(key, "{}", values[row]);
            }
        }
    }
    key
}

/// Most frequent valid code; ties break toward the lower code.
fn mode_code(codes: &[u32], validity: &ValidityMask) -> Option<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for i in validity.valid_indices() {
        *counts.entry(codes[i]).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(code, _)| code)
}

/// Most frequent valid text value; ties break lexicographically.
fn mode_text(values: &[String], validity: &ValidityMask) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for i in validity.valid_indices() {
        *counts.entry(values[i].as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
        .map(|(value, _)| value.to_string())
}

/// Canonical form of a category label: trimmed and lowercased.
fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Parses a trimmed string as a timestamp (epoch seconds).
fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
        }
    }
    None
}

fn is_derived_name(name: &str) -> bool {
    DERIVED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Builds a numeric column already at its narrowest width. Columns created
/// after the width stage has run must not leave narrowing work for a later
/// pipeline pass.
fn numeric_narrowed(values: Vec<f64>, validity: ValidityMask) -> Column {
    let width = narrowest_width(&values, &validity);
    Column::Numeric {
        values,
        validity,
        width,
    }
}

/// Smallest width that represents every valid value without precision loss.
fn narrowest_width(values: &[f64], validity: &ValidityMask) -> NumericWidth {
    let mut any = false;
    let mut all_integral = true;
    let mut f32_exact = true;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for i in validity.valid_indices() {
        let v = values[i];
        if !v.is_finite() {
            return NumericWidth::Float64;
        }
        any = true;
        if v.fract() != 0.0 {
            all_integral = false;
        }
        if f64::from(v as f32) != v {
            f32_exact = false;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if !any {
        return NumericWidth::Float64;
    }
    if all_integral {
        if min >= f64::from(i8::MIN) && max <= f64::from(i8::MAX) {
            NumericWidth::Int8
        } else if min >= f64::from(i16::MIN) && max <= f64::from(i16::MAX) {
            NumericWidth::Int16
        } else if min >= f64::from(i32::MIN) && max <= f64::from(i32::MAX) {
            NumericWidth::Int32
        } else if min >= i64::MIN as f64 && max <= i64::MAX as f64 {
            NumericWidth::Int64
        } else {
            NumericWidth::Float64
        }
    } else if f32_exact {
        NumericWidth::Float32
    } else {
        NumericWidth::Float64
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CsvLoader;

    fn etl(csv: &str) -> EtlOutput {
        let table = CsvLoader::new().load_str(csv).unwrap();
        run_etl(table, &EtlConfig::default()).unwrap()
    }

    // ── Helpers ──────────────────────────────────────────────────

    #[test]
    fn snake_case_basics() {
        assert_eq!(snake_case(" Order ID "), "order_id");
        assert_eq!(snake_case("Total$Amount"), "total_amount");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("__x__"), "x");
        assert_eq!(snake_case("  "), "");
    }

    #[test]
    fn timestamp_parsing_formats() {
        assert!(parse_timestamp("2024-03-15").is_some());
        assert!(parse_timestamp("2024/03/15").is_some());
        assert!(parse_timestamp("03/15/2024").is_some());
        assert!(parse_timestamp("15.03.2024").is_some());
        assert!(parse_timestamp("2024-03-15 10:30:00").is_some());
        assert!(parse_timestamp("2024-03-15T10:30:00").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("15").is_none());
    }

    #[test]
    fn width_classification() {
        let all = ValidityMask::all_valid(3);
        assert_eq!(
            narrowest_width(&[1.0, 2.0, 100.0], &all),
            NumericWidth::Int8
        );
        assert_eq!(
            narrowest_width(&[1.0, 2.0, 1000.0], &all),
            NumericWidth::Int16
        );
        assert_eq!(
            narrowest_width(&[1.0, 2.0, 100_000.0], &all),
            NumericWidth::Int32
        );
        assert_eq!(
            narrowest_width(&[1.5, 2.5, 3.5], &all),
            NumericWidth::Float32
        );
        assert_eq!(
            narrowest_width(&[0.1, 0.2, 0.3], &all),
            NumericWidth::Float64
        );
    }

    // ── Stage behavior ───────────────────────────────────────────

    #[test]
    fn standardizes_and_deduplicates_names() {
        let out = etl(" Order ID ,order id,Amount\n1,2,3\n4,5,6\n");
        assert_eq!(
            out.table.column_names(),
            &["order_id", "order_id_2", "amount"]
        );
        assert!(out
            .log
            .iter()
            .any(|r| r.description.contains("standardized")));
    }

    #[test]
    fn empty_header_becomes_column() {
        let out = etl(" ,x\n1,2\n3,4\n");
        assert_eq!(out.table.column_names()[0], "column");
    }

    #[test]
    fn removes_exact_duplicates_keeping_first() {
        let out = etl("x,y\n1,a\n2,b\n1,a\n3,c\n1,a\n");
        assert_eq!(out.table.row_count(), 3);
        let rec = out
            .log
            .iter()
            .find(|r| r.description.contains("duplicate"))
            .unwrap();
        assert_eq!(rec.affected, 2);
    }

    #[test]
    fn duplicate_detection_respects_null_status() {
        // Row 2 has a null where row 1 has 0.0; not duplicates.
        let out = etl("x,y\n0,a\nNA,a\n0,a\n");
        assert_eq!(out.table.row_count(), 2);
    }

    #[test]
    fn imputes_symmetric_with_mean() {
        // 1..5 is symmetric, |skew| < 0.5 → mean = 3.0
        let out = etl("x\n1\n2\n3\n4\n5\nNA\n");
        let x = out.table.column_by_name("x").unwrap();
        assert_eq!(x.null_count(), 0);
        assert!((x.as_numeric().unwrap()[5] - 3.0).abs() < 1e-9);
        assert!(out.log.iter().any(|r| r.description.contains("mean")));
    }

    #[test]
    fn imputes_skewed_with_median() {
        // Heavy right tail pushes skewness past 0.5 → median fill.
        let out = etl("x\n1\n1\n2\n2\n3\n100\nNA\n");
        let x = out.table.column_by_name("x").unwrap();
        assert_eq!(x.null_count(), 0);
        let fill = x.as_numeric().unwrap()[6];
        assert!(fill < 4.0, "median fill expected, got {fill}");
        assert!(out.log.iter().any(|r| r.description.contains("median")));
    }

    #[test]
    fn imputes_categorical_with_mode() {
        let out = etl("c,x\na,1\na,2\nb,3\nNA,4\na,5\n");
        let c = out.table.column_by_name("c").unwrap();
        assert_eq!(c.null_count(), 0);
        assert_eq!(c.str_at(3), Some("a"));
    }

    #[test]
    fn converts_date_column() {
        let out = etl("when,x\n2024-01-01,1\n2024-01-02,2\n2024-01-03,3\n");
        let when = out.table.column_by_name("when").unwrap();
        assert_eq!(when.kind(), ColumnKind::Datetime);
        assert!(out
            .log
            .iter()
            .any(|r| r.description.contains("datetime")));
    }

    #[test]
    fn unparseable_dates_become_missing() {
        let csv = "when,x\n2024-01-01,1\n2024-01-02,2\n2024-01-03,3\n\
                   2024-01-04,4\n2024-01-05,5\n2024-01-06,6\n2024-01-07,7\n\
                   2024-01-08,8\n2024-01-09,9\noops,10\n";
        let out = etl(csv);
        let when = out.table.column_by_name("when").unwrap();
        assert_eq!(when.kind(), ColumnKind::Datetime);
        assert_eq!(when.null_count(), 1);
    }

    #[test]
    fn mostly_text_column_not_converted() {
        let out = etl("note,x\n2024-01-01,1\nhello,2\nworld,3\nfoo,4\n");
        let note = out.table.column_by_name("note").unwrap();
        assert_ne!(note.kind(), ColumnKind::Datetime);
    }

    #[test]
    fn iqr_flags_single_outlier() {
        let out = etl("x\n1\n2\n2\n3\n4\n5\n100\n");
        assert_eq!(out.outliers.get("x"), Some(&1));
        // Flagged, never dropped.
        assert_eq!(out.table.row_count(), 7);
    }

    #[test]
    fn outliers_do_not_log() {
        let out = etl("x\n1\n2\n2\n3\n4\n5\n100\n");
        assert!(!out
            .log
            .iter()
            .any(|r| r.description.contains("outlier")));
    }

    #[test]
    fn no_outliers_in_uniform_data() {
        let out = etl("x\n1\n2\n3\n4\n5\n6\n7\n8\n");
        assert!(out.outliers.is_empty());
    }

    #[test]
    fn widths_are_narrowed() {
        let out = etl("small,big\n1,100000\n2,200000\n3,300000\n");
        let small = out.table.column_by_name("small").unwrap();
        let big = out.table.column_by_name("big").unwrap();
        assert_eq!(small.numeric_width(), Some(NumericWidth::Int8));
        assert_eq!(big.numeric_width(), Some(NumericWidth::Int32));
        assert!(out.log.iter().any(|r| r.description.contains("narrowed")));
    }

    #[test]
    fn derives_date_parts() {
        // 2024-01-06 is a Saturday.
        let out = etl("when,x\n2024-01-05,1\n2024-01-06,2\n2024-01-07,3\n");
        assert!(out.table.column_by_name("when_year").is_some());
        assert!(out.table.column_by_name("when_month").is_some());
        let dow = out.table.column_by_name("when_day_of_week").unwrap();
        assert_eq!(dow.as_numeric().unwrap()[1], 5.0); // Saturday, 0 = Monday
        let weekend = out.table.column_by_name("when_is_weekend").unwrap();
        assert_eq!(weekend.kind(), ColumnKind::Boolean);
    }

    #[test]
    fn log_transform_for_heavy_skew() {
        let csv = "x\n1\n1\n1\n1\n1\n1\n1\n1\n1\n1000\n";
        let out = etl(csv);
        let log_col = out.table.column_by_name("x_log").unwrap();
        assert!((log_col.as_numeric().unwrap()[9] - 1000f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn no_log_transform_with_nonpositive_values() {
        let csv = "x\n0\n1\n1\n1\n1\n1\n1\n1\n1\n1000\n";
        let out = etl(csv);
        assert!(out.table.column_by_name("x_log").is_none());
    }

    #[test]
    fn normalizes_category_labels() {
        // 4 raw labels over 10 rows keeps the column categorical at load.
        let csv = "c,x\nRed,1\nred,2\n RED ,3\nblue,4\nred,5\nblue,6\nred,7\nred,8\nblue,9\nred,10\n";
        let out = etl(csv);
        let c = out.table.column_by_name("c").unwrap();
        assert_eq!(c.str_at(0), Some("red"));
        assert_eq!(c.str_at(2), Some("red"));
        assert_eq!(c.str_at(3), Some("blue"));
        assert!(out.log.iter().any(|r| r.description.contains("normalized")));
    }

    #[test]
    fn validation_record_always_present() {
        let out = etl("x\n1\n2\n3\n");
        let last = out.log.last().unwrap();
        assert!(last.description.contains("validated"));
        assert_eq!(last.affected, 3);
    }

    // ── Pipeline-level properties ────────────────────────────────

    #[test]
    fn empty_table_fails_fast() {
        let table = Table::new();
        let err = run_etl(table, &EtlConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Structural { .. }));
    }

    #[test]
    fn second_run_adds_only_validation_record() {
        let csv = "Order Date,Amount,Category\n\
                   2024-01-01,10.5,Food\n\
                   2024-01-02,20.0,food\n\
                   2024-01-02,20.0,food\n\
                   2024-01-03,NA,Travel\n\
                   2024-01-04,15.0,food\n\
                   2024-01-05,12.0,Food\n";
        let table = CsvLoader::new().load_str(csv).unwrap();
        let first = run_etl(table, &EtlConfig::default()).unwrap();
        assert!(first.log.len() > 1);

        let second = run_etl(first.table.clone(), &EtlConfig::default()).unwrap();
        assert_eq!(
            second.log.len(),
            1,
            "unexpected records: {:?}",
            second.log
        );
        assert!(second.log[0].description.contains("validated"));
        assert_eq!(second.table.row_count(), first.table.row_count());
        assert_eq!(second.table.column_names(), first.table.column_names());
    }

    #[test]
    fn post_run_invariants_hold() {
        let csv = "a,b,c\n1,x,2024-01-01\n2,y,2024-01-02\n3,x,2024-01-03\n";
        let out = etl(csv);
        let rows = out.table.row_count();
        for (_, col) in out.table.iter() {
            assert_eq!(col.len(), rows);
        }
        let names: HashSet<&String> = out.table.column_names().iter().collect();
        assert_eq!(names.len(), out.table.column_count());
    }
}
