//! Typed, constrained table columns.
//!
//! A [`Column`] validates candidate cell values in three steps, in order:
//!
//! 1. the value's kind matches the declared kind exactly
//! 2. the value lies strictly inside the limit (`min < v < max`, or
//!    `min < len(v) < max` for strings)
//! 3. the value is one of the declared options, if any
//!
//! Validation failures are answered with `false`, never with an error.

use std::cmp::Ordering;
use std::fmt;

use sdf_models::{DataKind, Tag, Value};
use tracing::{debug, warn};

use crate::error::{Result, TableError};

/// Default maximum length for string columns.
pub const DEFAULT_STR_MAX_LEN: i64 = 50;

/// Requested limit for a column.
///
/// Numeric columns take both `min` and `max`, each of the column's own kind.
/// String columns take only `max`, as an `Int64` length.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min: Option<Value>,
    pub max: Value,
}

impl Bounds {
    /// A `(min, max)` range for numeric columns.
    pub fn range(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self {
            min: Some(min.into()),
            max: max.into(),
        }
    }

    /// A maximum length for string columns.
    pub fn max_length(max: i64) -> Self {
        Self {
            min: None,
            max: Value::Int64(max),
        }
    }
}

/// A named column with a kind, an optional limit and optional options.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    tag: Tag,
    kind: DataKind,
    /// `(min, max)`; for strings the bounds are `Int64` lengths.
    limit: Option<(Value, Value)>,
    options: Vec<Value>,
}

impl Column {
    /// Creates a column, deriving its tag from `name`.
    ///
    /// String columns start with a `(0, 50)` length limit.
    pub fn new(kind: DataKind, name: impl Into<String>) -> Self {
        let name = name.into();
        let limit = match kind {
            DataKind::Str => Some((Value::Int64(0), Value::Int64(DEFAULT_STR_MAX_LEN))),
            _ => None,
        };
        Self {
            tag: Tag::from_name(&name),
            name,
            kind,
            limit,
            options: Vec::new(),
        }
    }

    /// Builder form of [`Column::set_limit`].
    pub fn with_limit(mut self, bounds: Bounds) -> Result<Self> {
        self.set_limit(bounds)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn limit(&self) -> Option<&(Value, Value)> {
        self.limit.as_ref()
    }

    pub fn options(&self) -> &[Value] {
        &self.options
    }

    pub fn num_options(&self) -> usize {
        self.options.len()
    }

    /// Checks that the value's kind is exactly the declared kind.
    pub fn kind_is_valid(&self, value: &Value) -> bool {
        value.kind() == Some(self.kind)
    }

    /// Checks the strict limit; passes when no limit is set.
    pub fn limit_is_valid(&self, value: &Value) -> bool {
        let Some((min, max)) = &self.limit else {
            return true;
        };

        let measured;
        let subject = match value {
            Value::Str(s) => {
                measured = Value::Int64(s.chars().count() as i64);
                &measured
            }
            other => other,
        };

        subject.compare(min) == Some(Ordering::Greater) && subject.compare(max) == Some(Ordering::Less)
    }

    /// Checks option membership; passes when no options are declared.
    pub fn option_is_valid(&self, value: &Value) -> bool {
        self.options.is_empty() || self.options.contains(value)
    }

    /// Runs the kind, limit and option checks in order.
    pub fn validate(&self, value: &Value) -> bool {
        self.kind_is_valid(value) && self.limit_is_valid(value) && self.option_is_valid(value)
    }

    /// Replaces the option set.
    ///
    /// Every candidate must pass the kind and limit checks; if one fails the
    /// previous options are kept and `false` is returned. An empty list
    /// clears the options.
    pub fn set_options(&mut self, options: Vec<Value>) -> bool {
        if options.is_empty() {
            warn!(column = %self.tag, "Setting column options to an empty list");
            self.options.clear();
            return true;
        }

        if let Some(bad) = options
            .iter()
            .find(|v| !(self.kind_is_valid(v) && self.limit_is_valid(v)))
        {
            warn!(
                column = %self.tag,
                value = %bad,
                value_kind = ?bad.kind(),
                expected = %self.kind,
                limit = ?self.limit,
                "Cannot set column options, candidate failed validation"
            );
            return false;
        }

        debug!(column = %self.tag, count = options.len(), "Column options set");
        self.options = options;
        true
    }

    /// Sets the column limit.
    ///
    /// Numeric kinds need `min` and `max` of the column's kind; strings need
    /// only an `Int64` `max` and get `min = 0`. Other kinds do not support
    /// limits: the limit is cleared and a warning logged.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidLimit`] if the bounds do not fit the kind.
    pub fn set_limit(&mut self, bounds: Bounds) -> Result<()> {
        if self.kind.is_numeric() {
            let Some(min) = bounds.min else {
                return Err(TableError::InvalidLimit(format!(
                    "{} columns need both min and max",
                    self.kind
                )));
            };
            for bound in [&min, &bounds.max] {
                if bound.kind() != Some(self.kind) {
                    return Err(TableError::InvalidLimit(format!(
                        "bound {} must be of kind {}",
                        bound, self.kind
                    )));
                }
            }
            self.limit = Some((min, bounds.max));
        } else if self.kind == DataKind::Str {
            if bounds.min.is_some() {
                return Err(TableError::InvalidLimit(
                    "string columns only take a max length".to_string(),
                ));
            }
            if !matches!(bounds.max, Value::Int64(_)) {
                return Err(TableError::InvalidLimit(
                    "string max length must be an int64".to_string(),
                ));
            }
            self.limit = Some((Value::Int64(0), bounds.max));
        } else {
            warn!(
                column = %self.tag,
                kind = %self.kind,
                "Limits can only be set for numbers and strings"
            );
            self.limit = None;
        }
        Ok(())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Column Name   : {}", self.name)?;
        writeln!(f, "Column Tag    : {}", self.tag)?;
        writeln!(f, "Column Type   : {}", self.kind)?;
        match &self.limit {
            Some((min, max)) => writeln!(f, "Column limit  : ({}, {})", min, max)?,
            None => writeln!(f, "Column limit  : none")?,
        }
        let options: Vec<String> = self.options.iter().map(|o| o.to_string()).collect();
        write!(f, "Column options: [{}]", options.join(", "))
    }
}
