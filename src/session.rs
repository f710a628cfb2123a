//! Per-session inspection state.
//!
//! A session owns the responses captured for one page. Every lookup names the
//! response it works on, so independent sessions never observe each other's
//! documents.

use crate::capture::CaptureLog;
use crate::error::{Result, ShapeError, Target};
use crate::locate::{
    find_arrays, find_named_objects, find_numeric_objects, ArrayCatalog, NamedObjectCatalog,
    NumericObjectCatalog,
};
use crate::mapping::{map_array, map_named_object, map_numeric_object};
use crate::types::{InspectConfig, MappingMode, SavedMapping};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct InspectSession {
    log: CaptureLog,
    config: InspectConfig,
}

impl InspectSession {
    pub fn new(log: CaptureLog, config: InspectConfig) -> Self {
        InspectSession { log, config }
    }

    pub fn log(&self) -> &CaptureLog {
        &self.log
    }

    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    pub fn response(&self, url: &str) -> Result<&Value> {
        self.log.response_for(url)
    }

    pub fn arrays(&self, url: &str) -> Result<ArrayCatalog> {
        find_arrays(self.response(url)?, &self.config)
    }

    pub fn numeric_objects(&self, url: &str) -> Result<NumericObjectCatalog> {
        find_numeric_objects(self.response(url)?, &self.config)
    }

    pub fn named_objects(&self, url: &str) -> Result<NamedObjectCatalog> {
        find_named_objects(self.response(url)?, &self.config)
    }

    /// Derive a mapping for a selection taken from one of this session's
    /// catalogs.
    ///
    /// A selection the matching catalog does not list is rejected as
    /// [`ShapeError::MalformedSelection`].
    pub fn map(&self, url: &str, mode: MappingMode, selection: &str) -> Result<SavedMapping> {
        let data = self.response(url)?;

        let (listed, target) = match mode {
            MappingMode::Array => (find_arrays(data, &self.config)?.contains(selection), Target::Array),
            MappingMode::NumericId => (
                find_numeric_objects(data, &self.config)?.contains(selection),
                Target::NumericObject,
            ),
            MappingMode::NamedObject => (
                find_named_objects(data, &self.config)?.contains(selection),
                Target::NamedObject,
            ),
        };
        if !listed {
            warn!(url, mode = mode.tag(), selection, "selection not in catalog");
            return Err(ShapeError::MalformedSelection {
                target,
                name: selection.to_string(),
            });
        }

        match mode {
            MappingMode::Array => map_array(data, selection, &self.config),
            MappingMode::NumericId => map_numeric_object(data, selection, &self.config),
            MappingMode::NamedObject => map_named_object(data, selection, &self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CapturedResponse;
    use crate::types::ColumnSpec;
    use serde_json::json;

    const URL: &str = "https://site/api/feed";

    fn session(data: Value) -> InspectSession {
        let log = CaptureLog::from_records(vec![CapturedResponse {
            url: URL.to_string(),
            status: 200,
            method: "GET".to_string(),
            data: Some(data),
        }]);
        InspectSession::new(log, InspectConfig::default())
    }

    #[test]
    fn test_catalogs_for_url() {
        let s = session(json!({
            "data": {"users": [{"id": 1, "name": "Ann"}]},
            "byId": {"4": {"x": 1}}
        }));

        assert_eq!(s.arrays(URL).unwrap().get("users").unwrap(), ["id", "name"]);
        assert!(s.numeric_objects(URL).unwrap().contains("byId"));
        assert!(s.named_objects(URL).unwrap().contains("data"));
        assert!(s.arrays("https://other").unwrap_err().is_not_found());
    }

    #[test]
    fn test_map_each_mode() {
        let s = session(json!({
            "data": {"users": [{"id": 1, "name": "Ann"}]},
            "users": {"1": {"name": "Ann"}},
            "meta": {"owner": {"id": 5, "email": "x@y.com"}}
        }));

        let array = s.map(URL, MappingMode::Array, "users").unwrap();
        assert_eq!(array.mapping.table.primary_path, "data.users[]");

        let numeric = s.map(URL, MappingMode::NumericId, "users").unwrap();
        assert_eq!(numeric.mapping.table.primary_path, "users{}");

        let named = s.map(URL, MappingMode::NamedObject, "owner").unwrap();
        assert_eq!(named.mapping.table.primary_path, "meta.owner{}");
    }

    #[test]
    fn test_stale_selection_is_malformed() {
        let s = session(json!({"items": [{"a": 1}], "tags": ["x"]}));

        let err = s.map(URL, MappingMode::Array, "tags").unwrap_err();
        assert!(matches!(err, ShapeError::MalformedSelection { .. }));
        assert!(err.is_not_found());

        let err = s.map(URL, MappingMode::NamedObject, "items").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_every_listed_selection_maps() {
        let s = session(json!({
            "api.v1": {"1": {"name": "Ann"}, "2": {"name": "Bob"}},
            "x": {"v1.0": [{"a": 1}]},
            "cfg.main": {"port": 80}
        }));

        let numeric = s.numeric_objects(URL).unwrap();
        assert_eq!(numeric.entries()[0].object_name, "v1");
        for entry in numeric.entries() {
            let saved = s.map(URL, MappingMode::NumericId, &entry.object_name).unwrap();
            assert_eq!(saved.mapping.table.primary_path, "api.v1{}");
        }

        let arrays = s.arrays(URL).unwrap();
        assert!(arrays.contains("0"));
        for entry in arrays.entries() {
            s.map(URL, MappingMode::Array, &entry.name).unwrap();
        }

        for entry in s.named_objects(URL).unwrap().entries() {
            s.map(URL, MappingMode::NamedObject, &entry.object_name).unwrap();
        }
    }

    #[test]
    fn test_root_array_selection_maps() {
        let s = session(json!([{"id": 1}]));

        assert!(s.arrays(URL).unwrap().contains("root"));
        let saved = s.map(URL, MappingMode::Array, "root").unwrap();
        assert_eq!(saved.mapping.table.primary_path, "data.root[]");
        assert_eq!(saved.mapping.table.columns, vec![ColumnSpec::string("./id", "id")]);
    }

    #[test]
    fn test_named_selection_only_listed_outside_arrays() {
        let s = session(json!({"rows": [{"owner": {"id": 1}}]}));
        let err = s.map(URL, MappingMode::NamedObject, "owner").unwrap_err();
        assert!(matches!(err, ShapeError::MalformedSelection { .. }));
    }
}
