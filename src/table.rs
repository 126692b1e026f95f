//! Column-major table model for tabular data.
//!
//! The [`Table`] stores data in column-major order with typed columns and a
//! compact validity mask for tracking missing values. Unlike a read-only
//! frame, the table exposes the narrow mutation surface the ETL stages need:
//! renaming columns, filtering rows, and replacing or appending whole
//! columns. All columns always share one row count and column names are
//! unique.
//!
//! # Column kinds
//!
//! | Kind | Storage |
//! |------|---------|
//! | [`Numeric`](Column::Numeric) | `Vec<f64>` + mask + width classification |
//! | [`Boolean`](Column::Boolean) | `Vec<bool>` + mask |
//! | [`Categorical`](Column::Categorical) | dictionary + `Vec<u32>` codes |
//! | [`Text`](Column::Text) | `Vec<String>` + mask |
//! | [`Datetime`](Column::Datetime) | `Vec<i64>` epoch seconds + mask |
//!
//! # Example
//!
//! ```
//! use cleansight::table::{Table, Column, ValidityMask};
//!
//! let mut table = Table::new();
//! table.add_column(
//!     "temperature".to_string(),
//!     Column::numeric(vec![20.5, 21.3, 19.8], ValidityMask::all_valid(3)),
//! ).unwrap();
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.column_count(), 1);
//! ```

use crate::error::PipelineError;
use serde::Serialize;

// ── ValidityMask ──────────────────────────────────────────────────────

/// Bit-packed validity mask using `Vec<u64>`.
///
/// Each bit records whether the corresponding row holds a real value (1) or
/// is missing (0). One bit per row instead of one byte.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityMask {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityMask {
    /// Creates a mask where all `len` positions are valid.
    pub fn all_valid(len: usize) -> Self {
        let n_words = len.div_ceil(64);
        let mut bits = vec![u64::MAX; n_words];
        let trailing = len % 64;
        if trailing != 0 && n_words > 0 {
            bits[n_words - 1] = (1u64 << trailing) - 1;
        }
        Self { bits, len }
    }

    /// Creates a mask where all `len` positions are missing.
    pub fn all_invalid(len: usize) -> Self {
        Self {
            bits: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Creates an empty mask with no rows.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    /// Builds a mask from per-row validity flags.
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut mask = Self::empty();
        for &valid in flags {
            mask.push(valid);
        }
        mask
    }

    /// Returns `true` if the value at `idx` is valid (not missing).
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        let (word, bit) = (idx / 64, idx % 64);
        (self.bits[word] >> bit) & 1 == 1
    }

    /// Marks position `idx` as valid.
    #[inline]
    pub fn set_valid(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        self.bits[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Marks position `idx` as missing.
    #[inline]
    pub fn set_invalid(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        self.bits[idx / 64] &= !(1u64 << (idx % 64));
    }

    /// Appends a new position.
    pub fn push(&mut self, valid: bool) {
        let idx = self.len;
        self.len += 1;
        if idx / 64 >= self.bits.len() {
            self.bits.push(0);
        }
        if valid {
            self.bits[idx / 64] |= 1u64 << (idx % 64);
        }
    }

    /// Returns the total number of tracked positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the mask tracks zero positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts missing positions.
    pub fn null_count(&self) -> usize {
        let valid: usize = self.bits.iter().map(|w| w.count_ones() as usize).sum();
        self.len - valid
    }

    /// Counts valid positions.
    pub fn valid_count(&self) -> usize {
        self.len - self.null_count()
    }

    /// Returns an iterator over indices of valid positions.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.is_valid(i))
    }

    /// Returns a new mask keeping only positions where `keep[i]` is true.
    ///
    /// `keep` must have the same length as the mask.
    pub fn retain(&self, keep: &[bool]) -> Self {
        debug_assert_eq!(keep.len(), self.len);
        let mut out = Self::empty();
        for (i, &k) in keep.iter().enumerate() {
            if k {
                out.push(self.is_valid(i));
            }
        }
        out
    }
}

// ── ColumnKind ────────────────────────────────────────────────────────

/// Semantic kind inferred or assigned for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Continuous or integer numeric values (stored as `f64`).
    Numeric,
    /// Boolean (true/false) values.
    Boolean,
    /// Low-cardinality strings (dictionary-encoded).
    Categorical,
    /// High-cardinality or free-form text.
    Text,
    /// Timestamps stored as epoch seconds.
    Datetime,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Boolean => write!(f, "boolean"),
            Self::Categorical => write!(f, "categorical"),
            Self::Text => write!(f, "text"),
            Self::Datetime => write!(f, "datetime"),
        }
    }
}

// ── NumericWidth ──────────────────────────────────────────────────────

/// Memory-width classification for a numeric column.
///
/// Values are always stored as `f64`; the width records the narrowest
/// representation that holds every observed value without precision loss.
/// The dtype-optimisation stage assigns it and uses [`bytes`](Self::bytes)
/// for memory-reduction accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericWidth {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl NumericWidth {
    /// Bytes per value at this width.
    pub fn bytes(self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 | Self::Float64 => 8,
            Self::Float32 => 4,
        }
    }
}

impl std::fmt::Display for NumericWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int8 => write!(f, "int8"),
            Self::Int16 => write!(f, "int16"),
            Self::Int32 => write!(f, "int32"),
            Self::Int64 => write!(f, "int64"),
            Self::Float32 => write!(f, "float32"),
            Self::Float64 => write!(f, "float64"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with a validity mask for missing values.
///
/// Missing positions hold a default placeholder (0.0, false, empty string,
/// code 0, epoch 0) that must be ignored via the mask.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Dense `f64` values with a memory-width classification.
    Numeric {
        values: Vec<f64>,
        validity: ValidityMask,
        width: NumericWidth,
    },
    /// Boolean values.
    Boolean {
        values: Vec<bool>,
        validity: ValidityMask,
    },
    /// Dictionary-encoded categorical column: `dictionary` holds the unique
    /// labels, `codes` maps each row to a dictionary index.
    Categorical {
        dictionary: Vec<String>,
        codes: Vec<u32>,
        validity: ValidityMask,
    },
    /// Free-form text column.
    Text {
        values: Vec<String>,
        validity: ValidityMask,
    },
    /// Timestamps as epoch seconds.
    Datetime {
        values: Vec<i64>,
        validity: ValidityMask,
    },
}

impl Column {
    /// Creates a numeric column (width starts at `Float64`).
    pub fn numeric(values: Vec<f64>, validity: ValidityMask) -> Self {
        Self::Numeric {
            values,
            validity,
            width: NumericWidth::Float64,
        }
    }

    /// Creates a boolean column.
    pub fn boolean(values: Vec<bool>, validity: ValidityMask) -> Self {
        Self::Boolean { values, validity }
    }

    /// Creates a categorical column from a dictionary and codes.
    pub fn categorical(dictionary: Vec<String>, codes: Vec<u32>, validity: ValidityMask) -> Self {
        Self::Categorical {
            dictionary,
            codes,
            validity,
        }
    }

    /// Creates a text column.
    pub fn text(values: Vec<String>, validity: ValidityMask) -> Self {
        Self::Text { values, validity }
    }

    /// Creates a datetime column from epoch seconds.
    pub fn datetime(values: Vec<i64>, validity: ValidityMask) -> Self {
        Self::Datetime { values, validity }
    }

    /// Returns the kind of this column.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric { .. } => ColumnKind::Numeric,
            Self::Boolean { .. } => ColumnKind::Boolean,
            Self::Categorical { .. } => ColumnKind::Categorical,
            Self::Text { .. } => ColumnKind::Text,
            Self::Datetime { .. } => ColumnKind::Datetime,
        }
    }

    /// Returns the number of rows in this column.
    pub fn len(&self) -> usize {
        self.validity().len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the validity mask.
    pub fn validity(&self) -> &ValidityMask {
        match self {
            Self::Numeric { validity, .. }
            | Self::Boolean { validity, .. }
            | Self::Categorical { validity, .. }
            | Self::Text { validity, .. }
            | Self::Datetime { validity, .. } => validity,
        }
    }

    /// Returns the number of missing values.
    pub fn null_count(&self) -> usize {
        self.validity().null_count()
    }

    /// Returns the number of valid values.
    pub fn valid_count(&self) -> usize {
        self.validity().valid_count()
    }

    /// Returns `true` if the value at `idx` is valid.
    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Returns the raw numeric values, or `None` if not a numeric column.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Returns valid numeric values (missing excluded) as a new `Vec<f64>`.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Numeric { values, validity, .. } => {
                Some(validity.valid_indices().map(|i| values[i]).collect())
            }
            _ => None,
        }
    }

    /// Returns the width classification of a numeric column.
    pub fn numeric_width(&self) -> Option<NumericWidth> {
        match self {
            Self::Numeric { width, .. } => Some(*width),
            _ => None,
        }
    }

    /// Returns the string value at `idx` for categorical and text columns.
    pub fn str_at(&self, idx: usize) -> Option<&str> {
        match self {
            Self::Categorical {
                dictionary,
                codes,
                validity,
            } => {
                if validity.is_valid(idx) {
                    dictionary.get(codes[idx] as usize).map(|s| s.as_str())
                } else {
                    None
                }
            }
            Self::Text { values, validity } => {
                if validity.is_valid(idx) {
                    Some(&values[idx])
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Returns the epoch-second value at `idx` for datetime columns.
    pub fn datetime_at(&self, idx: usize) -> Option<i64> {
        match self {
            Self::Datetime { values, validity } => {
                if validity.is_valid(idx) {
                    Some(values[idx])
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Estimated in-memory footprint in bytes (values plus mask; numeric
    /// columns are accounted at their classified width).
    pub fn estimated_bytes(&self) -> usize {
        let mask_bytes = self.len().div_ceil(64) * 8;
        match self {
            Self::Numeric { values, width, .. } => values.len() * width.bytes() + mask_bytes,
            Self::Boolean { values, .. } => values.len() + mask_bytes,
            Self::Categorical {
                dictionary, codes, ..
            } => {
                let dict: usize = dictionary.iter().map(|s| s.len() + 24).sum();
                dict + codes.len() * 4 + mask_bytes
            }
            Self::Text { values, .. } => {
                values.iter().map(|s| s.len() + 24).sum::<usize>() + mask_bytes
            }
            Self::Datetime { values, .. } => values.len() * 8 + mask_bytes,
        }
    }

    /// Returns a copy keeping only rows where `keep[i]` is true.
    pub fn retain_rows(&self, keep: &[bool]) -> Column {
        fn filter<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(keep.iter())
                .filter(|(_, &k)| k)
                .map(|(v, _)| v.clone())
                .collect()
        }
        match self {
            Self::Numeric {
                values,
                validity,
                width,
            } => Self::Numeric {
                values: filter(values, keep),
                validity: validity.retain(keep),
                width: *width,
            },
            Self::Boolean { values, validity } => Self::Boolean {
                values: filter(values, keep),
                validity: validity.retain(keep),
            },
            Self::Categorical {
                dictionary,
                codes,
                validity,
            } => Self::Categorical {
                dictionary: dictionary.clone(),
                codes: filter(codes, keep),
                validity: validity.retain(keep),
            },
            Self::Text { values, validity } => Self::Text {
                values: filter(values, keep),
                validity: validity.retain(keep),
            },
            Self::Datetime { values, validity } => Self::Datetime {
                values: filter(values, keep),
                validity: validity.retain(keep),
            },
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────

/// Column-major tabular structure with unique column names and one shared
/// row count.
///
/// Mutated only by the ETL stages; treated as read-only by the statistics,
/// chart, and narrative phases.
#[derive(Debug, Clone)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Creates an empty table with no columns or rows.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Adds a named column.
    ///
    /// Fails if the column length differs from the existing row count
    /// (unless this is the first column) or the name is already taken.
    pub fn add_column(&mut self, name: String, column: Column) -> Result<(), PipelineError> {
        if self.names.iter().any(|n| *n == name) {
            return Err(PipelineError::DuplicateColumn { name });
        }
        let len = column.len();
        if self.columns.is_empty() {
            self.row_count = len;
        } else if len != self.row_count {
            return Err(PipelineError::LengthMismatch {
                expected: self.row_count,
                actual: len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns column names.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns the column at `index`.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns the column with the given `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Returns the index of the column with the given `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns an iterator over (name, column) pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .map(|s| s.as_str())
            .zip(self.columns.iter())
    }

    /// Returns (name, kind) pairs in table order.
    pub fn schema(&self) -> Vec<(&str, ColumnKind)> {
        self.names
            .iter()
            .zip(self.columns.iter())
            .map(|(name, col)| (name.as_str(), col.kind()))
            .collect()
    }

    /// Replaces all column names at once.
    ///
    /// Fails if the count differs or the new names are not unique.
    pub fn rename_columns(&mut self, new_names: Vec<String>) -> Result<(), PipelineError> {
        if new_names.len() != self.names.len() {
            return Err(PipelineError::LengthMismatch {
                expected: self.names.len(),
                actual: new_names.len(),
            });
        }
        for (i, name) in new_names.iter().enumerate() {
            if new_names[..i].contains(name) {
                return Err(PipelineError::DuplicateColumn { name: name.clone() });
            }
        }
        self.names = new_names;
        Ok(())
    }

    /// Replaces the column at `index`, keeping its name.
    pub fn replace_column(&mut self, index: usize, column: Column) -> Result<(), PipelineError> {
        if column.len() != self.row_count {
            return Err(PipelineError::LengthMismatch {
                expected: self.row_count,
                actual: column.len(),
            });
        }
        self.columns[index] = column;
        Ok(())
    }

    /// Returns a mutable reference to the column at `index`.
    pub fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    /// Keeps only rows where `keep[i]` is true; returns the number removed.
    pub fn retain_rows(&mut self, keep: &[bool]) -> Result<usize, PipelineError> {
        if keep.len() != self.row_count {
            return Err(PipelineError::LengthMismatch {
                expected: self.row_count,
                actual: keep.len(),
            });
        }
        let kept = keep.iter().filter(|&&k| k).count();
        let removed = self.row_count - kept;
        if removed == 0 {
            return Ok(0);
        }
        for col in &mut self.columns {
            *col = col.retain_rows(keep);
        }
        self.row_count = kept;
        Ok(removed)
    }

    /// Estimated in-memory footprint of all columns in bytes.
    pub fn estimated_bytes(&self) -> usize {
        self.columns.iter().map(|c| c.estimated_bytes()).sum()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── ValidityMask ─────────────────────────────────────────────

    #[test]
    fn mask_all_valid() {
        let m = ValidityMask::all_valid(100);
        assert_eq!(m.len(), 100);
        assert_eq!(m.null_count(), 0);
        assert!((0..100).all(|i| m.is_valid(i)));
    }

    #[test]
    fn mask_all_invalid() {
        let m = ValidityMask::all_invalid(70);
        assert_eq!(m.null_count(), 70);
        assert!((0..70).all(|i| !m.is_valid(i)));
    }

    #[test]
    fn mask_set_operations() {
        let mut m = ValidityMask::all_valid(10);
        m.set_invalid(3);
        m.set_invalid(7);
        assert_eq!(m.null_count(), 2);
        assert!(!m.is_valid(3));
        m.set_valid(3);
        assert_eq!(m.null_count(), 1);
    }

    #[test]
    fn mask_push_across_word_boundary() {
        let mut m = ValidityMask::empty();
        for i in 0..130 {
            m.push(i % 3 != 0);
        }
        assert_eq!(m.len(), 130);
        assert_eq!(m.null_count(), (0..130).filter(|i| i % 3 == 0).count());
    }

    #[test]
    fn mask_word_boundary_allocation() {
        assert_eq!(ValidityMask::all_valid(64).null_count(), 0);
        let m = ValidityMask::all_valid(65);
        assert!(m.is_valid(64));
        assert_eq!(m.null_count(), 0);
    }

    #[test]
    fn mask_from_flags_and_valid_indices() {
        let m = ValidityMask::from_flags(&[true, false, true, false, true]);
        let idx: Vec<usize> = m.valid_indices().collect();
        assert_eq!(idx, vec![0, 2, 4]);
    }

    #[test]
    fn mask_retain() {
        let mut m = ValidityMask::all_valid(5);
        m.set_invalid(1);
        let out = m.retain(&[true, true, false, true, false]);
        assert_eq!(out.len(), 3);
        assert!(out.is_valid(0));
        assert!(!out.is_valid(1)); // old index 1 was invalid
        assert!(out.is_valid(2)); // old index 3
    }

    // ── Column ───────────────────────────────────────────────────

    #[test]
    fn numeric_column_basics() {
        let col = Column::numeric(vec![1.0, 2.0, 3.0], ValidityMask::all_valid(3));
        assert_eq!(col.kind(), ColumnKind::Numeric);
        assert_eq!(col.len(), 3);
        assert_eq!(col.numeric_width(), Some(NumericWidth::Float64));
        assert_eq!(col.as_numeric(), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn numeric_valid_values_skip_missing() {
        let mut validity = ValidityMask::all_valid(4);
        validity.set_invalid(1);
        validity.set_invalid(3);
        let col = Column::numeric(vec![1.0, 0.0, 3.0, 0.0], validity);
        assert_eq!(col.null_count(), 2);
        assert_eq!(col.valid_numeric_values().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn categorical_column_lookup() {
        let dict = vec!["low".into(), "high".into()];
        let col = Column::categorical(dict, vec![0, 1, 0], ValidityMask::all_valid(3));
        assert_eq!(col.kind(), ColumnKind::Categorical);
        assert_eq!(col.str_at(0), Some("low"));
        assert_eq!(col.str_at(1), Some("high"));
    }

    #[test]
    fn text_column_missing_lookup() {
        let mut validity = ValidityMask::all_valid(2);
        validity.set_invalid(0);
        let col = Column::text(vec![String::new(), "world".into()], validity);
        assert_eq!(col.str_at(0), None);
        assert_eq!(col.str_at(1), Some("world"));
    }

    #[test]
    fn datetime_column_lookup() {
        let mut validity = ValidityMask::all_valid(3);
        validity.set_invalid(2);
        let col = Column::datetime(vec![1_700_000_000, 1_700_086_400, 0], validity);
        assert_eq!(col.kind(), ColumnKind::Datetime);
        assert_eq!(col.datetime_at(0), Some(1_700_000_000));
        assert_eq!(col.datetime_at(2), None);
    }

    #[test]
    fn column_retain_rows() {
        let mut validity = ValidityMask::all_valid(4);
        validity.set_invalid(2);
        let col = Column::numeric(vec![1.0, 2.0, 0.0, 4.0], validity);
        let kept = col.retain_rows(&[true, false, true, true]);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept.as_numeric(), Some(&[1.0, 0.0, 4.0][..]));
        assert!(!kept.is_valid(1));
    }

    #[test]
    fn width_bytes() {
        assert_eq!(NumericWidth::Int8.bytes(), 1);
        assert_eq!(NumericWidth::Int16.bytes(), 2);
        assert_eq!(NumericWidth::Float32.bytes(), 4);
        assert_eq!(NumericWidth::Float64.bytes(), 8);
    }

    // ── Table ────────────────────────────────────────────────────

    #[test]
    fn add_columns_and_lookup() {
        let mut t = Table::new();
        t.add_column(
            "x".into(),
            Column::numeric(vec![1.0, 2.0, 3.0], ValidityMask::all_valid(3)),
        )
        .unwrap();
        t.add_column(
            "y".into(),
            Column::numeric(vec![4.0, 5.0, 6.0], ValidityMask::all_valid(3)),
        )
        .unwrap();
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.column_names(), &["x", "y"]);
        assert!(t.column_by_name("y").is_some());
        assert!(t.column_by_name("z").is_none());
    }

    #[test]
    fn length_mismatch_rejected() {
        let mut t = Table::new();
        t.add_column(
            "x".into(),
            Column::numeric(vec![1.0, 2.0], ValidityMask::all_valid(2)),
        )
        .unwrap();
        let err = t
            .add_column(
                "y".into(),
                Column::numeric(vec![1.0], ValidityMask::all_valid(1)),
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::LengthMismatch { .. }));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut t = Table::new();
        t.add_column(
            "x".into(),
            Column::numeric(vec![1.0], ValidityMask::all_valid(1)),
        )
        .unwrap();
        let err = t
            .add_column(
                "x".into(),
                Column::numeric(vec![2.0], ValidityMask::all_valid(1)),
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateColumn { .. }));
    }

    #[test]
    fn rename_columns_checks_uniqueness() {
        let mut t = Table::new();
        t.add_column(
            "A".into(),
            Column::numeric(vec![1.0], ValidityMask::all_valid(1)),
        )
        .unwrap();
        t.add_column(
            "B".into(),
            Column::numeric(vec![2.0], ValidityMask::all_valid(1)),
        )
        .unwrap();
        assert!(t.rename_columns(vec!["a".into(), "a".into()]).is_err());
        t.rename_columns(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(t.column_names(), &["a", "b"]);
    }

    #[test]
    fn retain_rows_updates_all_columns() {
        let mut t = Table::new();
        t.add_column(
            "x".into(),
            Column::numeric(vec![1.0, 2.0, 3.0], ValidityMask::all_valid(3)),
        )
        .unwrap();
        t.add_column(
            "label".into(),
            Column::text(
                vec!["a".into(), "b".into(), "c".into()],
                ValidityMask::all_valid(3),
            ),
        )
        .unwrap();
        let removed = t.retain_rows(&[true, false, true]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column(0).unwrap().len(), 2);
        assert_eq!(t.column(1).unwrap().str_at(1), Some("c"));
    }

    #[test]
    fn schema_reports_kinds() {
        let mut t = Table::new();
        t.add_column(
            "x".into(),
            Column::numeric(vec![1.0], ValidityMask::all_valid(1)),
        )
        .unwrap();
        t.add_column(
            "when".into(),
            Column::datetime(vec![0], ValidityMask::all_valid(1)),
        )
        .unwrap();
        let schema = t.schema();
        assert_eq!(schema[0], ("x", ColumnKind::Numeric));
        assert_eq!(schema[1], ("when", ColumnKind::Datetime));
    }

    #[test]
    fn estimated_bytes_positive() {
        let mut t = Table::new();
        t.add_column(
            "x".into(),
            Column::numeric(vec![1.0, 2.0], ValidityMask::all_valid(2)),
        )
        .unwrap();
        assert!(t.estimated_bytes() > 0);
    }
}
