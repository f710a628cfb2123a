//! Locators that enumerate selectable shapes in a captured document
//!
//! - [`find_arrays`]: arrays whose first element is an object
//! - [`find_numeric_objects`]: objects keyed by decimal ids
//! - [`find_named_objects`]: objects reachable without passing through an array

use crate::error::Result;
use crate::types::InspectConfig;
use crate::walk::{key_label, Flow, Node, PathWalker, Visitor};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

// ASCII only: `\d` would also accept other Unicode digits
static NUMERIC_KEY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// True for non-empty keys made only of ASCII digits
pub fn is_numeric_key(key: &str) -> bool {
    NUMERIC_KEY_REGEX.is_match(key)
}

pub(crate) fn has_numeric_key(map: &Map<String, Value>) -> bool {
    map.keys().any(|k| is_numeric_key(k))
}

/// Name reported for a numeric-keyed object stored under `key`: its trimmed
/// label, or the root label when that is empty
pub(crate) fn numeric_object_label(key: Option<&str>, root_label: &str) -> String {
    let name = key_label(key, root_label).trim();
    if name.is_empty() {
        root_label.to_string()
    } else {
        name.to_string()
    }
}

fn ordered_keys(map: &Map<String, Value>) -> Vec<String> {
    map.keys().cloned().collect()
}

/// An array of records, named by the last dot-segment of its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayEntry {
    pub name: String,
    /// Keys of the first element, in document order
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrayCatalog {
    entries: Vec<ArrayEntry>,
}

impl ArrayCatalog {
    /// Replace the fields of an existing name in place, else append
    fn insert(&mut self, name: String, fields: Vec<String>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.fields = fields,
            None => self.entries.push(ArrayEntry { name, fields }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.fields.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn entries(&self) -> &[ArrayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Records first-element keys per full dotted path
#[derive(Default)]
struct ArrayCollector {
    by_path: Vec<(String, String, Vec<String>)>,
    index: HashMap<String, usize>,
    root_label: String,
}

impl<'a> Visitor<'a> for ArrayCollector {
    fn visit(&mut self, node: &Node<'a, '_>) -> Flow {
        if let Value::Array(items) = node.value {
            if let Some(Value::Object(first)) = items.first() {
                let dotted = node.path.dotted();
                let fields = ordered_keys(first);
                match self.index.get(&dotted) {
                    Some(&i) => self.by_path[i].2 = fields,
                    None => {
                        self.index.insert(dotted.clone(), self.by_path.len());
                        let name = node.path.label(&self.root_label).to_string();
                        self.by_path.push((dotted, name, fields));
                    }
                }
            }
        }
        Flow::Descend
    }
}

/// Find every array of objects and report the first element's keys.
///
/// Entries are keyed by terminal path name. When two different paths end in
/// the same name, the one recorded later wins.
pub fn find_arrays(data: &Value, config: &InspectConfig) -> Result<ArrayCatalog> {
    let mut collector = ArrayCollector {
        root_label: config.root_label.clone(),
        ..Default::default()
    };
    PathWalker::new(config.max_depth).walk(data, &mut collector)?;

    let mut catalog = ArrayCatalog::default();
    for (_, name, fields) in collector.by_path {
        catalog.insert(name, fields);
    }

    debug!(arrays = catalog.len(), "located record arrays");
    Ok(catalog)
}

/// An ID-indexed dictionary, e.g. `{"users": {"1": {...}, "2": {...}}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericObjectEntry {
    pub object_name: String,
    /// Column that will hold the numeric key, `<object_name>_id`
    pub key_id: String,
    /// Union of keys across all numeric-keyed children, sorted
    pub keys_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericObjectCatalog {
    entries: Vec<NumericObjectEntry>,
}

impl NumericObjectCatalog {
    pub fn get(&self, object_name: &str) -> Option<&NumericObjectEntry> {
        self.entries.iter().find(|e| e.object_name == object_name)
    }

    pub fn contains(&self, object_name: &str) -> bool {
        self.get(object_name).is_some()
    }

    pub fn entries(&self) -> &[NumericObjectEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
struct NumericCollector {
    order: Vec<String>,
    fields: HashMap<String, BTreeSet<String>>,
    root_label: String,
}

impl<'a> Visitor<'a> for NumericCollector {
    fn visit(&mut self, node: &Node<'a, '_>) -> Flow {
        let Value::Object(map) = node.value else {
            return Flow::Descend;
        };
        if !has_numeric_key(map) {
            return Flow::Descend;
        }

        let name = numeric_object_label(node.path.terminal(), &self.root_label);

        if !self.fields.contains_key(&name) {
            self.order.push(name.clone());
        }
        let union = self.fields.entry(name).or_default();
        for (key, child) in map {
            if !is_numeric_key(key) {
                continue;
            }
            if let Value::Object(record) = child {
                union.extend(record.keys().cloned());
            }
        }

        Flow::Descend
    }
}

/// Find objects keyed by decimal ids and union their children's keys per
/// containing object name
pub fn find_numeric_objects(data: &Value, config: &InspectConfig) -> Result<NumericObjectCatalog> {
    let mut collector = NumericCollector {
        root_label: config.root_label.clone(),
        ..Default::default()
    };
    PathWalker::new(config.max_depth).walk(data, &mut collector)?;

    let mut fields = collector.fields;
    let entries = collector
        .order
        .into_iter()
        .map(|object_name| {
            let keys_list = fields
                .remove(&object_name)
                .map(|set| set.into_iter().collect())
                .unwrap_or_default();
            NumericObjectEntry {
                key_id: format!("{}_id", object_name),
                object_name,
                keys_list,
            }
        })
        .collect();

    let catalog = NumericObjectCatalog { entries };
    debug!(objects = catalog.len(), "located numeric-keyed objects");
    Ok(catalog)
}

/// An object found outside of any array, with its own keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedObjectEntry {
    pub object_name: String,
    pub keys_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedObjectCatalog {
    entries: Vec<NamedObjectEntry>,
}

impl NamedObjectCatalog {
    pub fn contains(&self, object_name: &str) -> bool {
        self.entries.iter().any(|e| e.object_name == object_name)
    }

    pub fn entries(&self) -> &[NamedObjectEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
struct NamedCollector {
    entries: Vec<NamedObjectEntry>,
    seen: HashSet<NamedObjectEntry>,
    root_label: String,
}

impl<'a> Visitor<'a> for NamedCollector {
    fn visit(&mut self, node: &Node<'a, '_>) -> Flow {
        if node.inside_array {
            return Flow::Skip;
        }
        if let Value::Object(map) = node.value {
            let entry = NamedObjectEntry {
                object_name: node.path.label(&self.root_label).to_string(),
                keys_list: ordered_keys(map),
            };
            if self.seen.insert(entry.clone()) {
                self.entries.push(entry);
            }
        }
        Flow::Descend
    }
}

/// Enumerate objects reachable from the root without entering an array,
/// deduplicated by (name, keys)
pub fn find_named_objects(data: &Value, config: &InspectConfig) -> Result<NamedObjectCatalog> {
    let mut collector = NamedCollector {
        root_label: config.root_label.clone(),
        ..Default::default()
    };
    PathWalker::new(config.max_depth).walk(data, &mut collector)?;

    let catalog = NamedObjectCatalog {
        entries: collector.entries,
    };
    debug!(objects = catalog.len(), "located named objects");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> InspectConfig {
        InspectConfig::default()
    }

    #[test]
    fn test_numeric_key_detection() {
        assert!(is_numeric_key("007"));
        assert!(is_numeric_key("123"));
        assert!(!is_numeric_key("12a"));
        assert!(!is_numeric_key(""));
        assert!(!is_numeric_key("-1"));
        assert!(!is_numeric_key("١٢"));
    }

    #[test]
    fn test_arrays_use_first_element_only() {
        let doc = json!({"items": [{"a": 1, "b": 2}, {"a": 3}]});
        let catalog = find_arrays(&doc, &config()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("items").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_arrays_walk_all_elements() {
        let doc = json!({
            "pages": [
                {"n": 1, "rows": []},
                {"n": 2, "rows": [{"x": 1, "y": 2}]}
            ],
            "tags": ["a", "b"],
            "empty": []
        });
        let catalog = find_arrays(&doc, &config()).unwrap();

        assert_eq!(catalog.get("pages").unwrap(), ["n", "rows"]);
        assert_eq!(catalog.get("rows").unwrap(), ["x", "y"]);
        assert!(!catalog.contains("tags"));
        assert!(!catalog.contains("empty"));
    }

    #[test]
    fn test_arrays_terminal_name_collision_last_write_wins() {
        let doc = json!({
            "a": {"items": [{"first": 1}]},
            "b": {"items": [{"second": 2}]}
        });
        let catalog = find_arrays(&doc, &config()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("items").unwrap(), ["second"]);
    }

    #[test]
    fn test_root_array_uses_root_label() {
        let doc = json!([{"id": 1, "name": "Ann"}]);
        let catalog = find_arrays(&doc, &config()).unwrap();

        assert_eq!(catalog.get("root").unwrap(), ["id", "name"]);
    }

    #[test]
    fn test_dotted_keys_are_named_by_last_segment() {
        let doc = json!({
            "x": {"v1.0": [{"a": 1}]},
            "api.v1": {"1": {"name": "Ann"}},
            "cfg.main": {"port": 80}
        });
        let cfg = config();

        let arrays = find_arrays(&doc, &cfg).unwrap();
        assert_eq!(arrays.get("0").unwrap(), ["a"]);
        assert!(!arrays.contains("v1.0"));

        let numeric = find_numeric_objects(&doc, &cfg).unwrap();
        let v1 = numeric.get("v1").unwrap();
        assert_eq!(v1.key_id, "v1_id");
        assert_eq!(v1.keys_list, vec!["name"]);

        let named = find_named_objects(&doc, &cfg).unwrap();
        assert!(named.contains("main"));
        assert!(named.contains("v1"));
        assert!(!named.contains("cfg.main"));
    }

    #[test]
    fn test_numeric_objects_union_keys() {
        let doc = json!({
            "users": {
                "1": {"name": "Ann", "age": 30},
                "2": {"name": "Bob", "email": "b@x.io"},
                "3": "not an object"
            },
            "groups": [
                {"users": {"9": {"role": "admin"}}}
            ]
        });
        let catalog = find_numeric_objects(&doc, &config()).unwrap();

        assert_eq!(catalog.len(), 1);
        let users = catalog.get("users").unwrap();
        assert_eq!(users.key_id, "users_id");
        assert_eq!(users.keys_list, vec!["age", "email", "name", "role"]);
    }

    #[test]
    fn test_numeric_objects_root_and_scalar_children() {
        let doc = json!({"1": 10, "2": 20});
        let catalog = find_numeric_objects(&doc, &config()).unwrap();

        let root = catalog.get("root").unwrap();
        assert!(root.keys_list.is_empty());
        assert_eq!(root.key_id, "root_id");
    }

    #[test]
    fn test_numeric_objects_ignore_mixed_non_numeric() {
        let doc = json!({"meta": {"a1": {"x": 1}, "b": {"y": 2}}});
        let catalog = find_numeric_objects(&doc, &config()).unwrap();

        assert!(catalog.is_empty());
    }

    #[test]
    fn test_named_objects_stop_at_arrays() {
        let doc = json!({
            "meta": {"owner": {"id": 5, "email": "x@y.com"}},
            "list": [{"hidden": {"deep": 1}}]
        });
        let catalog = find_named_objects(&doc, &config()).unwrap();

        let names: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|e| e.object_name.as_str())
            .collect();
        assert_eq!(names, vec!["root", "meta", "owner"]);
        assert_eq!(catalog.entries()[2].keys_list, vec!["id", "email"]);
        assert!(!catalog.contains("hidden"));
    }

    #[test]
    fn test_named_objects_dedup_by_signature() {
        let doc = json!({
            "a": {"cfg": {"x": 1}},
            "b": {"cfg": {"x": 2}},
            "c": {"cfg": {"y": 3}}
        });
        let catalog = find_named_objects(&doc, &config()).unwrap();

        let cfgs: Vec<&NamedObjectEntry> = catalog
            .entries()
            .iter()
            .filter(|e| e.object_name == "cfg")
            .collect();
        assert_eq!(cfgs.len(), 2);
        assert_eq!(cfgs[0].keys_list, vec!["x"]);
        assert_eq!(cfgs[1].keys_list, vec!["y"]);
    }

    #[test]
    fn test_locators_are_idempotent() {
        let doc = json!({
            "data": {"users": [{"id": 1}], "byId": {"7": {"n": 1}, "8": {"m": 2}}},
            "meta": {"page": 1}
        });
        let cfg = config();

        assert_eq!(find_arrays(&doc, &cfg).unwrap(), find_arrays(&doc, &cfg).unwrap());
        assert_eq!(
            serde_json::to_string(&find_numeric_objects(&doc, &cfg).unwrap()).unwrap(),
            serde_json::to_string(&find_numeric_objects(&doc, &cfg).unwrap()).unwrap()
        );
        assert_eq!(
            find_named_objects(&doc, &cfg).unwrap(),
            find_named_objects(&doc, &cfg).unwrap()
        );
    }

    #[test]
    fn test_locators_respect_depth_limit() {
        let doc = json!({"a": {"b": {"c": {"d": [{"e": 1}]}}}});
        let cfg = InspectConfig {
            max_depth: 2,
            ..InspectConfig::default()
        };

        assert!(find_arrays(&doc, &cfg).is_err());
        assert!(find_numeric_objects(&doc, &cfg).is_err());
        assert!(find_named_objects(&doc, &cfg).is_err());
    }
}
