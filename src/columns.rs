//! Flatten a selected object into an ordered column list.
//!
//! Nested objects are descended key by key. An array of objects contributes
//! the columns of its first element only; any other array is dropped. Every
//! scalar becomes one column whose path is `./` followed by the slash-joined
//! keys leading to it.

use crate::error::{Result, ShapeError};
use crate::types::ColumnSpec;
use serde_json::{Map, Value};

/// Builds columns for one record shape
#[derive(Debug, Clone, Copy)]
pub struct ColumnBuilder {
    max_depth: usize,
}

impl ColumnBuilder {
    pub fn new(max_depth: usize) -> Self {
        ColumnBuilder { max_depth }
    }

    /// Flatten `value`, which must be an object, under `prefix`
    pub fn build(&self, value: &Value, prefix: &str) -> Result<Vec<ColumnSpec>> {
        let Value::Object(map) = value else {
            return Err(ShapeError::mismatch(format!(
                "columns can only be built from an object, got {}",
                kind_of(value)
            )));
        };

        let mut columns = Vec::new();
        self.add_object(map, prefix, 0, &mut columns)?;
        Ok(columns)
    }

    fn add_object(
        &self,
        map: &Map<String, Value>,
        prefix: &str,
        depth: usize,
        columns: &mut Vec<ColumnSpec>,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(ShapeError::TooDeep {
                max_depth: self.max_depth,
            });
        }

        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}/{}", prefix, key)
            };

            match value {
                Value::Object(nested) => self.add_object(nested, &path, depth + 1, columns)?,
                Value::Array(items) => {
                    if let Some(Value::Object(first)) = items.first() {
                        self.add_object(first, &path, depth + 1, columns)?;
                    }
                }
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    columns.push(ColumnSpec::string(format!("./{}", path), key.as_str()));
                }
            }
        }

        Ok(())
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
