use http::Method;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// One slot of a parameter-extraction plan.
///
/// Slots are listed in capture order. `Index` and `Wildcard` slots each
/// consume one capture group; every `Optional` slot reads from the single
/// trailing optional group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSlot {
    /// Required parameter at this position
    Index(usize),
    /// Optional parameter at this position
    Optional(usize),
    /// Catch-all capture for the variadic parameter
    Wildcard,
}

impl Display for ParamSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamSlot::Index(i) => write!(f, "{i}"),
            ParamSlot::Optional(i) => write!(f, "~{i}"),
            ParamSlot::Wildcard => write!(f, "*"),
        }
    }
}

impl Serialize for ParamSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamSlot::Index(i) => serializer.serialize_u64(*i as u64),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

/// A resolved route: which action to call and how to bind its arguments.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RouteEntry {
    pub controller: String,
    pub action: String,
    pub parameters: Vec<ParamSlot>,
    pub name: Option<String>,
    pub cache: bool,
    pub duration: Option<u64>,
}

/// What a table key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Any HTTP verb
    Any(RouteEntry),
    /// Verb-specific entries, in registration order
    Verbs(Vec<(Method, RouteEntry)>),
}

impl RouteTarget {
    /// The entry serving `method`, if any.
    #[must_use]
    pub fn entry_for(&self, method: &Method) -> Option<&RouteEntry> {
        match self {
            RouteTarget::Any(entry) => Some(entry),
            RouteTarget::Verbs(verbs) => verbs.iter().find(|(m, _)| m == method).map(|(_, e)| e),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (Option<&Method>, &RouteEntry)> {
        let items: Vec<(Option<&Method>, &RouteEntry)> = match self {
            RouteTarget::Any(entry) => vec![(None, entry)],
            RouteTarget::Verbs(verbs) => verbs.iter().map(|(m, e)| (Some(m), e)).collect(),
        };
        items.into_iter()
    }
}

impl Serialize for RouteTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RouteTarget::Any(entry) => entry.serialize(serializer),
            RouteTarget::Verbs(verbs) => {
                let mut map = serializer.serialize_map(Some(verbs.len()))?;
                for (method, entry) in verbs {
                    map.serialize_entry(method.as_str(), entry)?;
                }
                map.end()
            }
        }
    }
}

/// A table write that replaced an existing route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overwrite {
    pub path: String,
    /// Verb of the replaced entry; `None` when the replaced entry was
    /// verb-agnostic
    pub verb: Option<Method>,
    /// `Controller::action` that was replaced
    pub previous: String,
    /// `Controller::action` that replaced it
    pub replacement: String,
}

fn qualified(entry: &RouteEntry) -> String {
    format!("{}::{}", entry.controller, entry.action)
}

/// Route table keyed by regex-bearing path.
///
/// Keys keep the position of their first insertion; overwriting a key
/// replaces its value in place, so first-match-wins lookups over
/// [`RouteTable::iter`] are stable across overwrites.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, RouteTarget)>,
    index: HashMap<String, usize>,
}

impl PartialEq for RouteTable {
    fn eq(&self, other: &Self) -> bool {
        self.routes == other.routes
    }
}

impl Eq for RouteTable {}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&RouteTarget> {
        self.index.get(path).map(|&i| &self.routes[i].1)
    }

    /// Entry for `path` and `method`, honoring verb-agnostic targets.
    #[must_use]
    pub fn entry(&self, path: &str, method: &Method) -> Option<&RouteEntry> {
        self.get(path)?.entry_for(method)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteTarget)> {
        self.routes.iter().map(|(p, t)| (p.as_str(), t))
    }

    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.routes.iter().map(|(p, _)| p.as_str()).collect()
    }

    /// Number of (path, verb) pairs; a verb-agnostic key counts once.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.routes
            .iter()
            .map(|(_, t)| match t {
                RouteTarget::Any(_) => 1,
                RouteTarget::Verbs(v) => v.len(),
            })
            .sum()
    }

    fn slot(&mut self, path: &str) -> Option<&mut RouteTarget> {
        let i = *self.index.get(path)?;
        Some(&mut self.routes[i].1)
    }

    fn push(&mut self, path: String, target: RouteTarget) {
        self.index.insert(path.clone(), self.routes.len());
        self.routes.push((path, target));
    }

    /// Register a verb-agnostic entry. Replaces whatever `path` held before.
    pub fn insert_any(&mut self, path: String, entry: RouteEntry) -> Vec<Overwrite> {
        let replacement = qualified(&entry);
        let Some(slot) = self.slot(&path) else {
            self.push(path, RouteTarget::Any(entry));
            return Vec::new();
        };
        let previous = std::mem::replace(slot, RouteTarget::Any(entry));
        let overwrites: Vec<Overwrite> = previous
            .entries()
            .map(|(verb, old)| Overwrite {
                path: path.clone(),
                verb: verb.cloned(),
                previous: qualified(old),
                replacement: replacement.clone(),
            })
            .collect();
        for o in &overwrites {
            debug!(path = %o.path, verb = ?o.verb, previous = %o.previous, replacement = %o.replacement, "Route overwritten");
        }
        overwrites
    }

    /// Register an entry for one verb. A verb-agnostic entry at `path` is
    /// replaced by a verb map holding only the new entry.
    pub fn insert_verb(&mut self, path: String, method: Method, entry: RouteEntry) -> Option<Overwrite> {
        let replacement = qualified(&entry);
        let Some(slot) = self.slot(&path) else {
            self.push(path, RouteTarget::Verbs(vec![(method, entry)]));
            return None;
        };
        let replaced = match slot {
            RouteTarget::Verbs(verbs) => match verbs.iter_mut().find(|(m, _)| *m == method) {
                Some((_, existing)) => Some((
                    Some(method.clone()),
                    qualified(&std::mem::replace(existing, entry)),
                )),
                None => {
                    verbs.push((method.clone(), entry));
                    None
                }
            },
            RouteTarget::Any(existing) => {
                let old = qualified(existing);
                *slot = RouteTarget::Verbs(vec![(method.clone(), entry)]);
                Some((None, old))
            }
        };
        replaced.map(|(verb, previous)| {
            debug!(path = %path, verb = %method, previous = %previous, replacement = %replacement, "Route overwritten");
            Overwrite {
                path,
                verb,
                previous,
                replacement,
            }
        })
    }

    /// Fold `other` into this table, key by key and verb by verb, with
    /// `other` winning collisions.
    pub fn merge(&mut self, other: RouteTable) -> Vec<Overwrite> {
        let mut overwrites = Vec::new();
        for (path, target) in other.routes {
            match target {
                RouteTarget::Any(entry) => overwrites.extend(self.insert_any(path, entry)),
                RouteTarget::Verbs(verbs) => {
                    for (method, entry) in verbs {
                        overwrites.extend(self.insert_verb(path.clone(), method, entry));
                    }
                }
            }
        }
        overwrites
    }

    /// Pretty JSON rendering, stable for a given table.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.routes.len()))?;
        for (path, target) in &self.routes {
            map.serialize_entry(path, target)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(action: &str) -> RouteEntry {
        RouteEntry {
            controller: "Users".to_string(),
            action: action.to_string(),
            parameters: vec![ParamSlot::Index(0), ParamSlot::Optional(1), ParamSlot::Wildcard],
            name: None,
            cache: false,
            duration: None,
        }
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(ParamSlot::Index(2).to_string(), "2");
        assert_eq!(ParamSlot::Optional(1).to_string(), "~1");
        assert_eq!(ParamSlot::Wildcard.to_string(), "*");
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut table = RouteTable::new();
        table.insert_any("/a/".to_string(), entry("first"));
        table.insert_any("/b/".to_string(), entry("second"));
        let overwrites = table.insert_any("/a/".to_string(), entry("third"));
        assert_eq!(table.paths(), vec!["/a/", "/b/"]);
        assert_eq!(overwrites.len(), 1);
        assert_eq!(overwrites[0].previous, "Users::first");
        assert_eq!(overwrites[0].replacement, "Users::third");
        assert_eq!(table.entry("/a/", &Method::PUT).map(|e| e.action.as_str()), Some("third"));
    }

    #[test]
    fn test_verb_entries() {
        let mut table = RouteTable::new();
        assert!(table.insert_verb("/a/".into(), Method::GET, entry("get")).is_none());
        assert!(table.insert_verb("/a/".into(), Method::POST, entry("post")).is_none());
        let o = table.insert_verb("/a/".into(), Method::GET, entry("get2")).unwrap();
        assert_eq!(o.verb, Some(Method::GET));
        assert_eq!(table.entry_count(), 2);
        assert!(table.entry("/a/", &Method::DELETE).is_none());
    }

    #[test]
    fn test_verb_write_replaces_any() {
        let mut table = RouteTable::new();
        table.insert_any("/a/".into(), entry("any"));
        let o = table.insert_verb("/a/".into(), Method::GET, entry("get")).unwrap();
        assert_eq!(o.previous, "Users::any");
        assert_eq!(o.verb, None);
        assert!(table.entry("/a/", &Method::POST).is_none());
    }

    #[test]
    fn test_any_write_replaces_verb_map() {
        let mut table = RouteTable::new();
        table.insert_verb("/a/".into(), Method::GET, entry("get"));
        table.insert_verb("/a/".into(), Method::POST, entry("post"));
        let overwrites = table.insert_any("/a/".into(), entry("any"));
        assert_eq!(overwrites.len(), 2);
        assert_eq!(overwrites[1].verb, Some(Method::POST));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut left = RouteTable::new();
        left.insert_verb("/a/".into(), Method::GET, entry("left"));
        let mut right = RouteTable::new();
        right.insert_verb("/a/".into(), Method::GET, entry("right"));
        right.insert_any("/b/".into(), entry("b"));
        let overwrites = left.merge(right);
        assert_eq!(overwrites.len(), 1);
        assert_eq!(left.entry("/a/", &Method::GET).map(|e| e.action.as_str()), Some("right"));
        assert_eq!(left.paths(), vec!["/a/", "/b/"]);
    }

    #[test]
    fn test_serialization_shape() {
        let mut table = RouteTable::new();
        table.insert_any("/any/".into(), entry("any"));
        table.insert_verb("/verbs/".into(), Method::GET, entry("get"));
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value["/any/"],
            json!({
                "controller": "Users",
                "action": "any",
                "parameters": [0, "~1", "*"],
                "name": null,
                "cache": false,
                "duration": null
            })
        );
        assert_eq!(value["/verbs/"]["GET"]["action"], json!("get"));
    }
}
