// Ignore lists and their canonical form.
//
// Callers describe what to leave out of a comparison as a list of entries:
//   - a bare key excludes that key and everything under it;
//   - a key with a nested list still compares the key's subtree, applying
//     the nested list one level down;
//   - a key whose nested list normalizes to nothing is excluded, as a bare
//     key would be.
//
// `normalize()` folds such a list into an `IgnoreSpec`, a per-level map
// from key to `Rule`. Duplicate keys resolve last-write-wins.

use std::collections::BTreeMap;

use crate::node::Key;

// ---------------------------------------------------------------------------
// Raw entries
// ---------------------------------------------------------------------------

/// One element of a caller-supplied ignore list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreEntry {
    /// Exclude the key and its whole subtree.
    Key(Key),
    /// Compare the key's subtree, excluding the nested entries below it.
    Nested(Key, Vec<IgnoreEntry>),
}

impl IgnoreEntry {
    pub fn key(key: impl Into<Key>) -> Self {
        Self::Key(key.into())
    }

    pub fn nested<I>(key: impl Into<Key>, entries: I) -> Self
    where
        I: IntoIterator<Item = IgnoreEntry>,
    {
        Self::Nested(key.into(), entries.into_iter().collect())
    }
}

impl From<&str> for IgnoreEntry {
    fn from(s: &str) -> Self {
        Self::key(s)
    }
}

impl From<String> for IgnoreEntry {
    fn from(s: String) -> Self {
        Self::key(s)
    }
}

// ---------------------------------------------------------------------------
// Canonical spec
// ---------------------------------------------------------------------------

/// What to do with a key at one level of the document. A `Nested` spec
/// is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Excluded,
    Nested(IgnoreSpec),
}

impl Rule {
    pub fn nested(&self) -> Option<&IgnoreSpec> {
        match self {
            Self::Nested(spec) => Some(spec),
            Self::Excluded => None,
        }
    }
}

/// Normalized ignore tree. Keys absent from the compared documents are
/// harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSpec {
    rules: BTreeMap<Key, Rule>,
}

/// Spec applied below keys that carry no nested rule.
static EMPTY_SPEC: IgnoreSpec = IgnoreSpec {
    rules: BTreeMap::new(),
};

impl IgnoreSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[IgnoreEntry]) -> Self {
        normalize(entries)
    }

    pub fn rule(&self, key: &Key) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn is_excluded(&self, key: &Key) -> bool {
        matches!(self.rules.get(key), Some(Rule::Excluded))
    }

    /// Spec to descend with below `key`; empty unless `key` is nested.
    pub fn child(&self, key: &Key) -> &IgnoreSpec {
        self.rules
            .get(key)
            .and_then(Rule::nested)
            .unwrap_or(&EMPTY_SPEC)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Rule)> {
        self.rules.iter()
    }

    /// Render the spec back into list form. `normalize(&spec.to_entries())`
    /// reproduces `spec`.
    pub fn to_entries(&self) -> Vec<IgnoreEntry> {
        self.rules
            .iter()
            .map(|(k, rule)| match rule {
                Rule::Excluded => IgnoreEntry::Key(k.clone()),
                Rule::Nested(spec) => IgnoreEntry::Nested(k.clone(), spec.to_entries()),
            })
            .collect()
    }
}

/// Fold an ignore list into its canonical spec.
pub fn normalize(entries: &[IgnoreEntry]) -> IgnoreSpec {
    let mut rules = BTreeMap::new();
    for entry in entries {
        match entry {
            IgnoreEntry::Key(k) => {
                rules.insert(k.clone(), Rule::Excluded);
            }
            IgnoreEntry::Nested(k, nested) => {
                let spec = normalize(nested);
                let rule = if spec.is_empty() {
                    Rule::Excluded
                } else {
                    Rule::Nested(spec)
                };
                rules.insert(k.clone(), rule);
            }
        }
    }
    IgnoreSpec { rules }
}

// ---------------------------------------------------------------------------
// JSON literals
// ---------------------------------------------------------------------------

/// Read a hand-written JSON ignore literal into entries.
///
/// Arrays list entries positionally: strings and non-negative integers are
/// bare keys, objects contribute their `key: value` pairs in place, and a
/// nested array is bound to its position. In an object, an array or object
/// value makes a nested entry; a scalar value is a bare key only when the
/// pair's key is an index. Anything else is dropped without error.
///
/// ```
/// use doccmp::ignore::{entries_from_json, IgnoreEntry};
///
/// let entries = entries_from_json(&serde_json::json!(["id", {"meta": ["stamp"]}]));
/// assert_eq!(
///     entries,
///     vec![
///         IgnoreEntry::key("id"),
///         IgnoreEntry::nested("meta", [IgnoreEntry::key("stamp")]),
///     ]
/// );
/// ```
#[cfg(feature = "json")]
pub fn entries_from_json(value: &serde_json::Value) -> Vec<IgnoreEntry> {
    use serde_json::Value;

    let mut out = Vec::new();
    match value {
        Value::Array(items) => {
            for (pos, item) in items.iter().enumerate() {
                match item {
                    Value::Object(map) => {
                        for (k, v) in map {
                            push_pair(&mut out, Key::name(k.as_str()), v);
                        }
                    }
                    Value::Array(_) => {
                        out.push(IgnoreEntry::Nested(Key::from(pos), entries_from_json(item)));
                    }
                    scalar => match scalar_key(scalar) {
                        Some(k) => out.push(IgnoreEntry::Key(k)),
                        None => log::debug!("dropping ignore entry {scalar} at position {pos}"),
                    },
                }
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                push_pair(&mut out, Key::name(k.as_str()), v);
            }
        }
        scalar => match scalar_key(scalar) {
            Some(k) => out.push(IgnoreEntry::Key(k)),
            None => log::debug!("dropping ignore literal {scalar}"),
        },
    }
    out
}

#[cfg(feature = "json")]
fn push_pair(out: &mut Vec<IgnoreEntry>, key: Key, value: &serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Array(_) | Value::Object(_) => {
            out.push(IgnoreEntry::Nested(key, entries_from_json(value)));
        }
        scalar if key.is_index() => match scalar_key(scalar) {
            Some(k) => out.push(IgnoreEntry::Key(k)),
            None => log::debug!("dropping ignore entry {scalar} under index {key}"),
        },
        scalar => log::debug!("dropping ignore pair {key}: {scalar}"),
    }
}

#[cfg(feature = "json")]
fn scalar_key(value: &serde_json::Value) -> Option<Key> {
    use serde_json::Value;

    match value {
        Value::String(s) => Some(Key::name(s.as_str())),
        Value::Number(n) => n.as_u64().map(Key::Index),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
