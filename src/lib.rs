//! # cleansight
//!
//! ETL cleaning pipeline and statistical insight engine for tabular data.
//!
//! cleansight takes an arbitrary user-supplied CSV dataset and produces a
//! cleaned table plus a structured bundle of statistics, chart
//! recommendations, and natural-language observations. It operates in two
//! distinct phases:
//!
//! - **Cleaning** — a deterministic nine-stage pipeline (name
//!   standardisation, deduplication, skew-aware imputation, date conversion,
//!   IQR outlier flagging, width optimisation, feature engineering,
//!   categorical normalisation, integrity validation) that logs every
//!   transformation it applies
//! - **Insight** — read-only analysis of the cleaned table: descriptive
//!   statistics, Pearson correlation with significance testing,
//!   Freedman-Diaconis histograms, automatic chart selection, and
//!   template-driven narrative generation
//!
//! ## Modules
//!
//! - [`table`] — Column-major tabular data model (Table, Column, ColumnKind)
//! - [`loader`] — CSV loading with automatic type inference
//! - [`config`] — Tunable thresholds for both phases
//! - [`etl`] — The nine-stage cleaning pipeline and its provenance log
//! - [`stats`] — Descriptive statistics and the correlation matrix
//! - [`charts`] — Histogram binning and chart-type selection
//! - [`narrative`] — Rule-driven insight sentences
//! - [`engine`] — The assembled insight report
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use cleansight::config::{EtlConfig, InsightConfig};
//! use cleansight::engine::compute_insights;
//! use cleansight::etl::run_etl;
//! use cleansight::loader::CsvLoader;
//!
//! let csv = " Order Date ,Amount\n2024-01-01,10.5\n2024-01-02,NA\n2024-01-03,12.0\n";
//! let table = CsvLoader::new().load_str(csv).unwrap();
//!
//! let cleaned = run_etl(table, &EtlConfig::default()).unwrap();
//! assert_eq!(cleaned.table.column_names()[0], "order_date");
//! assert!(cleaned.log.iter().any(|r| r.description.contains("imputed")));
//!
//! let report = compute_insights(
//!     &cleaned.table,
//!     &cleaned.outliers,
//!     &InsightConfig::default(),
//! )
//! .unwrap();
//! assert!(!report.insights.is_empty());
//! ```

pub mod charts;
pub mod config;
pub mod engine;
pub mod error;
pub mod etl;
pub mod loader;
pub mod narrative;
pub mod stats;
pub mod table;

pub use engine::{compute_insights, InsightReport};
pub use error::PipelineError;
pub use etl::{run_etl, EtlOutput};
