//! Locate a selected structure inside a document.
//!
//! All searches are first-match in the same pre-order the locators use.

use crate::error::{Result, ShapeError, Target};
use crate::locate::{has_numeric_key, numeric_object_label};
use crate::types::InspectConfig;
use crate::walk::{key_label, Flow, Node, PathWalker, Visitor};
use serde_json::Value;
use tracing::debug;

/// A sub-value together with the object keys leading to it
#[derive(Debug, Clone, PartialEq)]
pub struct Located<'a> {
    pub value: &'a Value,
    pub path: Vec<String>,
}

impl Located<'_> {
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }

    /// Catalog name of the located value, `root_label` for the document itself
    pub fn label<'s>(&'s self, root_label: &'s str) -> &'s str {
        key_label(self.path.last().map(String::as_str), root_label)
    }
}

struct NumericPathFinder<'a, 'n> {
    object_name: &'n str,
    root_label: &'n str,
    found: Option<Located<'a>>,
}

impl<'a> Visitor<'a> for NumericPathFinder<'a, '_> {
    fn visit(&mut self, node: &Node<'a, '_>) -> Flow {
        let Value::Object(map) = node.value else {
            return Flow::Descend;
        };
        if !has_numeric_key(map) {
            return Flow::Descend;
        }
        if self.object_name.is_empty()
            || numeric_object_label(node.path.terminal(), self.root_label) == self.object_name
        {
            self.found = Some(Located {
                value: node.value,
                path: node.path.to_owned_segments(),
            });
            return Flow::Stop;
        }
        Flow::Descend
    }
}

/// First numeric-keyed object named `object_name`.
///
/// An empty `object_name` matches any numeric-keyed object. The root answers
/// to the configured root label and resolves to the empty path.
pub fn find_numeric_object<'a>(
    data: &'a Value,
    object_name: &str,
    config: &InspectConfig,
) -> Result<Located<'a>> {
    let mut finder = NumericPathFinder {
        object_name,
        root_label: &config.root_label,
        found: None,
    };
    PathWalker::new(config.max_depth).walk(data, &mut finder)?;

    let located = finder
        .found
        .ok_or_else(|| ShapeError::not_found(Target::NumericObject, object_name))?;
    debug!(object = object_name, path = %located.dotted(), "resolved numeric-keyed object");
    Ok(located)
}

/// Dot path of the first numeric-keyed object named `object_name`.
///
/// Keys that themselves contain dots make the result ambiguous for
/// [`resolve_by_dot_path`]; use [`find_numeric_object`] to get the value.
pub fn find_numeric_object_path(
    data: &Value,
    object_name: &str,
    config: &InspectConfig,
) -> Result<String> {
    find_numeric_object(data, object_name, config).map(|located| located.dotted())
}

/// Follow `dotpath` key by key through nested objects.
///
/// The empty path is the document itself. Array indices are not supported.
pub fn resolve_by_dot_path<'a>(data: &'a Value, dotpath: &str) -> Result<&'a Value> {
    if dotpath.is_empty() {
        return Ok(data);
    }

    let mut current = data;
    for key in dotpath.split('.') {
        current = match current {
            Value::Object(map) => map
                .get(key)
                .ok_or_else(|| ShapeError::not_found(Target::DotPath, dotpath))?,
            _ => return Err(ShapeError::not_found(Target::DotPath, dotpath)),
        };
    }
    Ok(current)
}

/// Matches the first node labelled `name` that passes `accept`
struct KeyedFinder<'a, 'n> {
    name: &'n str,
    root_label: &'n str,
    accept: fn(&Value) -> bool,
    found: Option<Located<'a>>,
}

impl<'a> Visitor<'a> for KeyedFinder<'a, '_> {
    fn visit(&mut self, node: &Node<'a, '_>) -> Flow {
        if node.path.label(self.root_label) == self.name && (self.accept)(node.value) {
            self.found = Some(Located {
                value: node.value,
                path: node.path.to_owned_segments(),
            });
            return Flow::Stop;
        }
        Flow::Descend
    }
}

fn find_keyed<'a>(
    data: &'a Value,
    name: &str,
    accept: fn(&Value) -> bool,
    target: Target,
    config: &InspectConfig,
) -> Result<Located<'a>> {
    let mut finder = KeyedFinder {
        name,
        root_label: &config.root_label,
        accept,
        found: None,
    };
    PathWalker::new(config.max_depth).walk(data, &mut finder)?;

    let located = finder
        .found
        .ok_or_else(|| ShapeError::not_found(target, name))?;
    debug!(kind = %target, selection = name, path = %located.dotted(), "resolved selection");
    Ok(located)
}

/// First object labelled `name`, searching through arrays too.
///
/// Labels follow the catalogs: the last dot-segment of the key, and the
/// configured root label for the document itself.
pub fn find_named_object<'a>(
    data: &'a Value,
    name: &str,
    config: &InspectConfig,
) -> Result<Located<'a>> {
    find_keyed(data, name, Value::is_object, Target::NamedObject, config)
}

/// First non-empty array labelled `name`, the root array included
pub fn find_record_array<'a>(
    data: &'a Value,
    name: &str,
    config: &InspectConfig,
) -> Result<Located<'a>> {
    fn non_empty_array(value: &Value) -> bool {
        matches!(value, Value::Array(items) if !items.is_empty())
    }
    find_keyed(data, name, non_empty_array, Target::Array, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> InspectConfig {
        InspectConfig::default()
    }

    #[test]
    fn test_numeric_path_by_name() {
        let doc = json!({
            "meta": {"page": 1},
            "data": {"users": {"1": {"name": "Ann"}}, "posts": {"9": {"t": "x"}}}
        });

        assert_eq!(find_numeric_object_path(&doc, "posts", &config()).unwrap(), "data.posts");
        assert_eq!(find_numeric_object_path(&doc, "", &config()).unwrap(), "data.users");
    }

    #[test]
    fn test_numeric_path_at_root() {
        let doc = json!({"1": {"a": 1}});
        assert_eq!(find_numeric_object_path(&doc, "root", &config()).unwrap(), "");
    }

    #[test]
    fn test_numeric_path_requires_numeric_keys() {
        let doc = json!({"users": {"ann": {"age": 3}}});
        let err = find_numeric_object_path(&doc, "users", &config()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_dot_path_resolution() {
        let doc = json!({"a": {"b": {"c": 3}}, "list": [{"x": 1}]});

        assert_eq!(resolve_by_dot_path(&doc, "a.b.c").unwrap(), &json!(3));
        assert_eq!(resolve_by_dot_path(&doc, "").unwrap(), &doc);
        assert!(resolve_by_dot_path(&doc, "a.missing").unwrap_err().is_not_found());
        assert!(resolve_by_dot_path(&doc, "a.b.c.d").is_err());
        assert!(resolve_by_dot_path(&doc, "list.0").is_err());
    }

    #[test]
    fn test_named_object_through_arrays() {
        let doc = json!({
            "items": [
                {"owner": "plain string"},
                {"wrap": {"owner": {"id": 5}}}
            ],
            "owner": {"id": 6}
        });

        let found = find_named_object(&doc, "owner", &config()).unwrap();
        assert_eq!(found.value, &json!({"id": 5}));
        assert_eq!(found.path, vec!["items", "wrap", "owner"]);
        assert_eq!(found.dotted(), "items.wrap.owner");
    }

    #[test]
    fn test_record_array_skips_empty() {
        let doc = json!({
            "a": {"rows": []},
            "b": {"rows": [{"id": 1}]}
        });

        let found = find_record_array(&doc, "rows", &config()).unwrap();
        assert_eq!(found.path, vec!["b", "rows"]);
        assert!(find_record_array(&doc, "cols", &config()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_dotted_keys_resolve_by_label() {
        let doc = json!({
            "api.v1": {"1": {"name": "Ann"}},
            "feed": {"rows.all": [{"id": 1}]},
            "cfg.main": {"port": 80}
        });
        let cfg = config();

        let numeric = find_numeric_object(&doc, "v1", &cfg).unwrap();
        assert_eq!(numeric.path, vec!["api.v1"]);
        assert_eq!(numeric.value, &doc["api.v1"]);
        assert_eq!(numeric.label("root"), "v1");
        assert_eq!(find_numeric_object_path(&doc, "v1", &cfg).unwrap(), "api.v1");

        let rows = find_record_array(&doc, "all", &cfg).unwrap();
        assert_eq!(rows.path, vec!["feed", "rows.all"]);

        let main = find_named_object(&doc, "main", &cfg).unwrap();
        assert_eq!(main.value, &json!({"port": 80}));
    }

    #[test]
    fn test_root_answers_to_root_label() {
        let rows = json!([{"id": 1}]);
        let found = find_record_array(&rows, "root", &config()).unwrap();
        assert!(found.path.is_empty());
        assert_eq!(found.value, &rows);

        let obj = json!({"id": 1});
        let found = find_named_object(&obj, "root", &config()).unwrap();
        assert_eq!(found.dotted(), "");
        assert_eq!(found.label("root"), "root");

        assert!(find_record_array(&json!([]), "root", &config()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_every_finder_reports_not_found() {
        let doc = json!({"x": {"y": [1, 2]}});
        let cfg = config();

        assert!(find_numeric_object_path(&doc, "nope", &cfg).unwrap_err().is_not_found());
        assert!(find_named_object(&doc, "nope", &cfg).unwrap_err().is_not_found());
        assert!(find_record_array(&doc, "nope", &cfg).unwrap_err().is_not_found());
        assert!(resolve_by_dot_path(&doc, "nope").unwrap_err().is_not_found());
    }
}
