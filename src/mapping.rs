//! Assemble saved mappings for the three selection modes.
//!
//! Each mode resolves one object, flattens it with [`ColumnBuilder`] and
//! wraps the columns in a primary path describing how to find the record
//! set again.

use crate::columns::{kind_of, ColumnBuilder};
use crate::error::{Result, ShapeError};
use crate::locate::{is_numeric_key, numeric_object_label};
use crate::resolve::{find_named_object, find_numeric_object, find_record_array};
use crate::types::{ColumnMapping, ColumnSpec, InspectConfig, MappingMode, SavedMapping};
use serde_json::Value;
use tracing::info;

/// Map the records of the array stored under `name`.
///
/// Columns come from the first element, which must be an object.
pub fn map_array(data: &Value, name: &str, config: &InspectConfig) -> Result<SavedMapping> {
    let located = find_record_array(data, name, config)?;
    let first = match located.value {
        Value::Array(items) => items.first(),
        _ => None,
    };
    let first = match first {
        Some(value @ Value::Object(_)) => value,
        Some(other) => {
            return Err(ShapeError::mismatch(format!(
                "array '{}' holds {} values, not objects",
                name,
                kind_of(other)
            )))
        }
        None => return Err(ShapeError::mismatch(format!("array '{}' is empty", name))),
    };

    let columns = ColumnBuilder::new(config.max_depth).build(first, "")?;
    let mapping = ColumnMapping::new(format!("data.{}[]", name), columns);

    info!(array = name, columns = mapping.table.columns.len(), "built array mapping");
    Ok(SavedMapping {
        mode: MappingMode::Array,
        keys: vec![name.to_string()],
        mapping,
    })
}

/// Map an ID-indexed dictionary.
///
/// The first numeric key's value is the sample record. The key itself is
/// exposed as a leading `<name>_id` column and every other path is nested
/// under the `$<name>_id` placeholder.
pub fn map_numeric_object(data: &Value, name: &str, config: &InspectConfig) -> Result<SavedMapping> {
    let located = find_numeric_object(data, name, config)?;
    let dotpath = located.dotted();
    let Value::Object(dictionary) = located.value else {
        return Err(ShapeError::mismatch(format!(
            "'{}' is not a numeric-keyed object",
            dotpath
        )));
    };

    let sample = dictionary
        .iter()
        .find(|(key, _)| is_numeric_key(key))
        .map(|(_, value)| value)
        .ok_or_else(|| ShapeError::mismatch(format!("'{}' has no numeric keys", dotpath)))?;

    let label = if name.is_empty() {
        numeric_object_label(located.path.last().map(String::as_str), &config.root_label)
    } else {
        name.to_string()
    };
    let id_column = format!("{}_id", label);
    let placeholder = format!("${}", id_column);

    let mut columns = vec![ColumnSpec::string(placeholder.clone(), id_column)];
    columns.extend(ColumnBuilder::new(config.max_depth).build(sample, &placeholder)?);
    let mapping = ColumnMapping::new(format!("{}{{}}", dotpath), columns);

    info!(object = %label, path = %dotpath, columns = mapping.table.columns.len(), "built numeric-id mapping");
    Ok(SavedMapping {
        mode: MappingMode::NumericId,
        keys: vec![label],
        mapping,
    })
}

/// Map the first object stored under key `name`, wherever it is nested
pub fn map_named_object(data: &Value, name: &str, config: &InspectConfig) -> Result<SavedMapping> {
    let located = find_named_object(data, name, config)?;
    let columns = ColumnBuilder::new(config.max_depth).build(located.value, "")?;
    let mapping = ColumnMapping::new(format!("{}{{}}", located.dotted()), columns);

    info!(object = name, path = %located.dotted(), columns = mapping.table.columns.len(), "built named-object mapping");
    Ok(SavedMapping {
        mode: MappingMode::NamedObject,
        keys: vec![name.to_string()],
        mapping,
    })
}

/// Dispatch on `mode`
pub fn build_mapping(
    data: &Value,
    mode: MappingMode,
    name: &str,
    config: &InspectConfig,
) -> Result<SavedMapping> {
    match mode {
        MappingMode::Array => map_array(data, name, config),
        MappingMode::NumericId => map_numeric_object(data, name, config),
        MappingMode::NamedObject => map_named_object(data, name, config),
    }
}
