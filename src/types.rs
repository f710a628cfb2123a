use serde::{Deserialize, Serialize};

/// One flattened column: where the value lives relative to the record and
/// what to call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub path: String,
    pub data_type: String,
    pub column_name: String,
}

impl ColumnSpec {
    /// Every column is typed as a string; no type distinction is made.
    pub fn string(path: impl Into<String>, column_name: impl Into<String>) -> Self {
        ColumnSpec {
            path: path.into(),
            data_type: String::from("string"),
            column_name: column_name.into(),
        }
    }
}

/// The record set location plus its columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMapping {
    /// `data.<name>[]` for arrays, `<dotpath>{}` for dictionaries and objects
    pub primary_path: String,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub table: TableMapping,
}

impl ColumnMapping {
    pub fn new(primary_path: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        ColumnMapping {
            table: TableMapping {
                primary_path: primary_path.into(),
                columns,
            },
        }
    }
}

/// Which locator produced the selection a mapping was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingMode {
    #[serde(rename = "1")]
    Array,
    #[serde(rename = "2")]
    NumericId,
    #[serde(rename = "3")]
    NamedObject,
}

impl MappingMode {
    /// The literal tag stored alongside a saved mapping
    pub fn tag(self) -> &'static str {
        match self {
            MappingMode::Array => "1",
            MappingMode::NumericId => "2",
            MappingMode::NamedObject => "3",
        }
    }
}

/// A derived mapping together with what is needed to derive it again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMapping {
    pub mode: MappingMode,
    pub keys: Vec<String>,
    pub mapping: ColumnMapping,
}

/// Configuration for inspecting captured documents
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Deepest nesting level any traversal will enter (root = 0)
    pub max_depth: usize,

    /// Largest pasted payload accepted before parsing
    pub max_input_bytes: usize,

    /// Label used for the document root where a path name is expected
    pub root_label: String,
}

impl Default for InspectConfig {
    fn default() -> Self {
        InspectConfig {
            max_depth: 128,
            max_input_bytes: 1024 * 1024,
            root_label: String::from("root"),
        }
    }
}
