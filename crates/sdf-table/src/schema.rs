//! JSON column definitions.
//!
//! A schema file is a JSON array of column definitions:
//!
//! ```json
//! [
//!   { "name": "Test Number", "kind": "int64", "min": 10, "max": 1000 },
//!   { "name": "Comment", "kind": "str", "max": 250 },
//!   { "name": "Categories Col", "kind": "str", "options": ["white", "red"] }
//! ]
//! ```

use std::fs;
use std::path::Path;

use sdf_models::{DataKind, Value};
use serde::{Deserialize, Serialize};

use crate::column::{Bounds, Column};
use crate::error::{Result, TableError};

/// Serializable description of a [`Column`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub kind: DataKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<serde_json::Value>,
}

impl ColumnDefinition {
    /// Builds the column, applying limit then options.
    ///
    /// # Errors
    /// Fails if the limit does not fit the kind or any option is rejected by
    /// the column.
    pub fn into_column(self) -> Result<Column> {
        let mut column = Column::new(self.kind, self.name);

        if let Some(bounds) = limit_bounds(self.kind, self.min.as_ref(), self.max.as_ref())? {
            column.set_limit(bounds)?;
        }

        if !self.options.is_empty() {
            let options = self
                .options
                .iter()
                .map(|o| Value::from_json(self.kind, o))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| TableError::InvalidOptions(column.tag().to_string()))?;
            if !column.set_options(options) {
                return Err(TableError::InvalidOptions(column.tag().to_string()));
            }
        }

        Ok(column)
    }
}

fn limit_bounds(
    kind: DataKind,
    min: Option<&serde_json::Value>,
    max: Option<&serde_json::Value>,
) -> Result<Option<Bounds>> {
    let convert = |kind: DataKind, json: &serde_json::Value| {
        Value::from_json(kind, json)
            .filter(|v| !v.is_null())
            .ok_or_else(|| TableError::InvalidLimit(format!("{} is not a valid {} bound", json, kind)))
    };

    match (min, max) {
        (None, None) => Ok(None),
        (None, Some(_)) | (Some(_), None) if kind.is_numeric() => Err(TableError::InvalidLimit(
            format!("{} columns need both min and max", kind),
        )),
        (Some(_), _) if kind == DataKind::Str => Err(TableError::InvalidLimit(
            "string columns only take a max length".to_string(),
        )),
        (Some(min), Some(max)) if kind.is_numeric() => Ok(Some(Bounds {
            min: Some(convert(kind, min)?),
            max: convert(kind, max)?,
        })),
        (_, Some(max)) if kind == DataKind::Str => Ok(Some(Bounds {
            min: None,
            max: convert(DataKind::Int64, max)?,
        })),
        // Kinds without limit support; the column logs and clears.
        (_, _) => Ok(Some(Bounds::max_length(0))),
    }
}

/// Reads a JSON schema file into columns.
pub fn load_schema(path: &Path) -> Result<Vec<Column>> {
    let text = fs::read_to_string(path).map_err(|source| TableError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let definitions: Vec<ColumnDefinition> = serde_json::from_str(&text)?;
    definitions
        .into_iter()
        .map(ColumnDefinition::into_column)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(value: serde_json::Value) -> ColumnDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_definition() {
        let column = definition(json!({"name": "Test Number", "kind": "int64", "min": 10, "max": 1000}))
            .into_column()
            .unwrap();
        assert_eq!(column.tag().as_str(), "Test_Number");
        assert_eq!(
            column.limit(),
            Some(&(Value::Int64(10), Value::Int64(1000)))
        );
    }

    #[test]
    fn test_string_definition_with_options() {
        let column = definition(json!({
            "name": "Categories Col",
            "kind": "str",
            "max": 20,
            "options": ["white", "red"]
        }))
        .into_column()
        .unwrap();
        assert_eq!(column.limit(), Some(&(Value::Int64(0), Value::Int64(20))));
        assert_eq!(column.num_options(), 2);
    }

    #[test]
    fn test_definition_rejects_half_numeric_limit() {
        let result = definition(json!({"name": "n", "kind": "float64", "max": 1.5})).into_column();
        assert!(matches!(result, Err(TableError::InvalidLimit(_))));
    }

    #[test]
    fn test_definition_rejects_wrong_option_kind() {
        let result = definition(json!({"name": "n", "kind": "int32", "options": [1, "two"]})).into_column();
        assert!(matches!(result, Err(TableError::InvalidOptions(_))));
    }

    #[test]
    fn test_bool_limit_is_dropped() {
        let column = definition(json!({"name": "Flag", "kind": "bool", "max": 3}))
            .into_column()
            .unwrap();
        assert!(column.limit().is_none());
    }

    #[test]
    fn test_load_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(
            &path,
            r#"[{"name": "A", "kind": "int8", "min": 0, "max": 10}, {"name": "B", "kind": "str"}]"#,
        )
        .unwrap();

        let columns = load_schema(&path).unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].kind(), DataKind::Int8);
    }
}
