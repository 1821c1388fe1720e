//! Tabular data store for SDF.
//!
//! This crate provides typed, constrained [`Column`]s, a CSV-backed [`Table`]
//! row store, the column [`ValidationTable`] export and [`Tracker`]s that tie
//! columns and a table together.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use sdf_models::{DataKind, Value};
//! use sdf_table::{Bounds, Column, Tracker};
//!
//! let score = Column::new(DataKind::Int64, "Score")
//!     .with_limit(Bounds::range(0i64, 100i64))
//!     .unwrap();
//! let mut tracker = Tracker::init("site audit", vec![score], "/tmp/projects/demo".as_ref(), None).unwrap();
//!
//! let row = HashMap::from([("Score".to_string(), Value::Int64(42))]);
//! tracker.add_row(&row).unwrap();
//! tracker.save().unwrap();
//! ```

pub mod atomic;
pub mod column;
pub mod error;
pub mod schema;
pub mod table;
pub mod tracker;
pub mod validation;

pub use column::{Bounds, Column};
pub use error::{Result, TableError};
pub use schema::{load_schema, ColumnDefinition};
pub use table::{Row, Table, TABLE_EXTENSION};
pub use tracker::{SavedTracker, Tracker, DEFAULT_INDEX};
pub use validation::{ValidationRow, ValidationTable, VALIDATION_INDEX};
