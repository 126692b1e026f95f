//! CSV ingestion with automatic type inference.
//!
//! Loads CSV input into a [`Table`](crate::table::Table) with column kinds
//! inferred from content. The inference priority is:
//! Numeric → Boolean → Categorical → Text. Datetime detection happens later,
//! in the cleaning pipeline, where text columns that parse as dates are
//! converted.
//!
//! # Features
//!
//! - RFC 4180 parsing (quoted fields, escaped quotes, embedded newlines)
//!   via the `csv` crate
//! - Standard null markers recognized: empty, `NA`, `N/A`, `null`, `NULL`,
//!   `None`, `.`
//! - Low-cardinality strings are dictionary-encoded as Categorical
//! - Configurable delimiter, header flag, and null markers
//!
//! # Example
//!
//! ```
//! use cleansight::loader::CsvLoader;
//! use cleansight::table::ColumnKind;
//!
//! let csv = "name,value,active\nAlice,1.5,true\nBob,2.3,false\n";
//! let table = CsvLoader::new().load_str(csv).unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column(1).unwrap().kind(), ColumnKind::Numeric);
//! assert_eq!(table.column(2).unwrap().kind(), ColumnKind::Boolean);
//! ```

use crate::error::PipelineError;
use crate::table::{Column, Table, ValidityMask};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Standard null value markers recognized during loading.
const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", ".",
    "NaN", "nan", "NAN", "#N/A", "#NA",
];

/// Maximum unique-value ratio for a column to be classified as Categorical
/// instead of Text.
const CATEGORICAL_THRESHOLD: f64 = 0.5;

/// Maximum dictionary size for categorical columns.
const MAX_CATEGORICAL_UNIQUE: usize = 1000;

/// CSV loader configuration and entry point.
///
/// ```
/// use cleansight::loader::CsvLoader;
///
/// let csv = "a,b\n1,2\n3,4\n";
/// let table = CsvLoader::new().load_str(csv).unwrap();
/// assert_eq!(table.row_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    has_header: bool,
    null_markers: Vec<String>,
}

impl CsvLoader {
    /// Creates a loader with default settings (comma delimiter, header row,
    /// standard null markers).
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets whether the first row is a header (default: true).
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Sets custom null markers (replaces defaults).
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Loads a CSV string into a [`Table`].
    pub fn load_str(&self, input: &str) -> Result<Table, PipelineError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        self.load_reader(input.as_bytes())
    }

    /// Loads a CSV file from disk into a [`Table`].
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Table, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
    }

    fn load_reader(&self, input: &[u8]) -> Result<Table, PipelineError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(input);

        let headers: Option<Vec<String>> = if self.has_header {
            let record = reader.headers().map_err(csv_error)?;
            if record.is_empty() {
                return Ok(Table::new());
            }
            Some(record.iter().map(|s| s.to_string()).collect())
        } else {
            None
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result.map_err(csv_error)?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            if row.iter().all(|f| f.is_empty()) {
                continue;
            }
            let expected = headers
                .as_ref()
                .map(|h| h.len())
                .unwrap_or_else(|| rows.first().map_or(row.len(), |r| r.len()));
            if row.len() != expected {
                return Err(PipelineError::CsvParse {
                    line: row_idx + if self.has_header { 2 } else { 1 },
                    message: format!("expected {expected} fields, got {}", row.len()),
                });
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Ok(Table::new());
        }

        let n_cols = rows[0].len();
        let headers =
            headers.unwrap_or_else(|| (0..n_cols).map(|i| format!("col_{i}")).collect());

        // Transpose to column-major raw strings.
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); n_cols];
        for row in rows {
            for (col_idx, field) in row.into_iter().enumerate() {
                raw_columns[col_idx].push(field);
            }
        }

        let mut table = Table::new();
        for (name, raw_col) in headers.into_iter().zip(raw_columns.iter()) {
            let col = self.build_column(raw_col);
            table.add_column(name, col)?;
        }
        Ok(table)
    }

    // ── Type inference ───────────────────────────────────────────

    /// Checks if a trimmed value is a null marker.
    fn is_null(&self, value: &str) -> bool {
        let trimmed = value.trim();
        self.null_markers.iter().any(|m| m == trimmed)
    }

    /// Infers the column kind and builds a typed column.
    fn build_column(&self, raw_values: &[String]) -> Column {
        let n = raw_values.len();
        let trimmed: Vec<&str> = raw_values.iter().map(|s| s.trim()).collect();
        let null_flags: Vec<bool> = trimmed.iter().map(|s| self.is_null(s)).collect();

        let non_null: Vec<&str> = trimmed
            .iter()
            .zip(null_flags.iter())
            .filter(|(_, &is_null)| !is_null)
            .map(|(&v, _)| v)
            .collect();
        if non_null.is_empty() {
            // All null: default to numeric
            return Column::numeric(vec![0.0; n], ValidityMask::all_invalid(n));
        }

        if non_null.iter().all(|s| s.parse::<f64>().is_ok()) {
            return build_numeric(&trimmed, &null_flags);
        }
        if non_null.iter().all(|s| is_boolean_str(s)) {
            return build_boolean(&trimmed, &null_flags);
        }

        // Categorical vs Text: based on cardinality
        let unique: HashSet<&str> = non_null.iter().copied().collect();
        let ratio = unique.len() as f64 / non_null.len() as f64;
        if ratio < CATEGORICAL_THRESHOLD && unique.len() <= MAX_CATEGORICAL_UNIQUE {
            build_categorical(&trimmed, &null_flags)
        } else {
            build_text(&trimmed, &null_flags)
        }
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: csv::Error) -> PipelineError {
    let line = e
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(0);
    PipelineError::CsvParse {
        line,
        message: e.to_string(),
    }
}

// ── Column builders ───────────────────────────────────────────────────

fn build_numeric(values: &[&str], null_flags: &[bool]) -> Column {
    let mut nums = Vec::with_capacity(values.len());
    let mut validity = ValidityMask::empty();
    for (i, &val) in values.iter().enumerate() {
        if null_flags[i] {
            nums.push(0.0);
            validity.push(false);
        } else {
            nums.push(val.parse::<f64>().unwrap_or(0.0));
            validity.push(true);
        }
    }
    Column::numeric(nums, validity)
}

fn build_boolean(values: &[&str], null_flags: &[bool]) -> Column {
    let mut bools = Vec::with_capacity(values.len());
    let mut validity = ValidityMask::empty();
    for (i, &val) in values.iter().enumerate() {
        if null_flags[i] {
            bools.push(false);
            validity.push(false);
        } else {
            bools.push(parse_boolean_str(val));
            validity.push(true);
        }
    }
    Column::boolean(bools, validity)
}

fn build_categorical(values: &[&str], null_flags: &[bool]) -> Column {
    let mut dict_map: HashMap<String, u32> = HashMap::new();
    let mut dictionary: Vec<String> = Vec::new();
    let mut codes = Vec::with_capacity(values.len());
    let mut validity = ValidityMask::empty();
    for (i, &val) in values.iter().enumerate() {
        if null_flags[i] {
            codes.push(0);
            validity.push(false);
        } else {
            let code = if let Some(&existing) = dict_map.get(val) {
                existing
            } else {
                let code = dictionary.len() as u32;
                dictionary.push(val.to_string());
                dict_map.insert(val.to_string(), code);
                code
            };
            codes.push(code);
            validity.push(true);
        }
    }
    Column::categorical(dictionary, codes, validity)
}

fn build_text(values: &[&str], null_flags: &[bool]) -> Column {
    let mut texts = Vec::with_capacity(values.len());
    let mut validity = ValidityMask::empty();
    for (i, &val) in values.iter().enumerate() {
        if null_flags[i] {
            texts.push(String::new());
            validity.push(false);
        } else {
            texts.push(val.to_string());
            validity.push(true);
        }
    }
    Column::text(texts, validity)
}

// ── Helper functions ──────────────────────────────────────────────────

/// Checks if a string represents a boolean value.
fn is_boolean_str(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "t" | "f" | "y" | "n"
    )
}

/// Parses a boolean string to `bool`.
fn parse_boolean_str(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "yes" | "t" | "y")
}

// ── Tests ─────────────────────────────────────────────────────────────
