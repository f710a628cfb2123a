//! # Assay - JSON shape inspection for captured API responses
//!
//! Given a JSON document captured from a page's network traffic, locate the
//! shapes worth turning into a table and derive a reusable column mapping.
//!
//! ## Modules
//!
//! - **walk**: depth-limited traversal every other module builds on
//! - **locate**: catalogs of record arrays, numeric-keyed objects and named objects
//! - **resolve**: find a selected structure by name or dot path
//! - **columns**: flatten one object into `{path, dataType, columnName}` columns
//! - **mapping**: the three mapping modes (array, numeric id, named object)
//! - **capture** / **session**: captured responses and per-session inspection
//! - **writer**: JSON Lines persistence of saved mappings
//! - **logging**: `tracing` subscriber setup for the command-line tools
//!
//! ## Quick Start
//!
//! ```rust
//! use assay::{find_arrays, map_array, InspectConfig};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), assay::ShapeError> {
//! let data = json!({
//!     "data": {
//!         "users": [
//!             {"id": 1, "name": "Ann"},
//!             {"id": 2, "name": "Bob"}
//!         ]
//!     }
//! });
//!
//! let config = InspectConfig::default();
//! let arrays = find_arrays(&data, &config)?;
//! assert_eq!(arrays.get("users").unwrap(), ["id", "name"]);
//!
//! let saved = map_array(&data, "users", &config)?;
//! assert_eq!(saved.mapping.table.primary_path, "data.users[]");
//! // columns: ./id -> id, ./name -> name
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod columns;
pub mod error;
pub mod locate;
pub mod logging;
pub mod mapping;
pub mod resolve;
pub mod session;
pub mod types;
pub mod walk;
pub mod writer;

// Re-export commonly used types for convenience
pub use capture::{normalize_target_url, CaptureLog, CaptureSource, CapturedResponse};
pub use columns::ColumnBuilder;
pub use error::{ShapeError, Target};
pub use locate::{
    find_arrays, find_named_objects, find_numeric_objects, is_numeric_key, ArrayCatalog,
    NamedObjectCatalog, NumericObjectCatalog,
};
pub use mapping::{build_mapping, map_array, map_named_object, map_numeric_object};
pub use resolve::{
    find_named_object, find_numeric_object, find_numeric_object_path, find_record_array,
    resolve_by_dot_path, Located,
};
pub use session::InspectSession;
pub use types::{ColumnMapping, ColumnSpec, InspectConfig, MappingMode, SavedMapping, TableMapping};
pub use walk::{Flow, KeyPath, Node, PathWalker, Visitor};
pub use writer::{read_mappings, MappingRecord, MappingWriter};
