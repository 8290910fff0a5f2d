// Document tree model.
//
// A document is a Branch-rooted tree of `Node`s. Branches map `Key`s to
// child nodes; leaves hold a `Scalar`. Sequences are represented as
// branches keyed by index, so positional order carries no meaning beyond
// the index itself.

use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Key of a branch entry.
///
/// Names that spell a canonical non-negative decimal integer are stored as
/// `Index`, so `Key::from("3") == Key::from(3u64)`.
///
/// Negative integer names such as `"-1"` stay `Name`s: `Index` holds only
/// non-negative positions, so `Key::from("-1")` never matches an index key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Index(u64),
    Name(String),
}

impl Key {
    /// Build a key from a name, canonicalizing integer-like names.
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        match parse_index(&name) {
            Some(i) => Self::Index(i),
            None => Self::Name(name),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

/// `"0"`, `"42"` parse; `"01"`, `"+1"`, `"-1"`, `""` and overflowing
/// values do not.
fn parse_index(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    s.parse().ok()
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::name(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::name(s)
    }
}

impl From<u64> for Key {
    fn from(i: u64) -> Self {
        Self::Index(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Self::Index(i as u64)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Scalar / Node
// ---------------------------------------------------------------------------

/// Atomic leaf value. Equality is strict: the variant must match as well
/// as the value, so `Int(1)`, `Float(1.0)` and `Str("1")` all differ.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Mapping from key to child node. Entry order is irrelevant to comparison.
pub type Branch = BTreeMap<Key, Node>;

/// A document node: either an atomic leaf or a keyed branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Scalar),
    Branch(Branch),
}

impl Node {
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(b) => Some(b),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Scalar> {
        match self {
            Self::Leaf(s) => Some(s),
            Self::Branch(_) => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch(_))
    }

    /// Build a branch from `(key, node)` pairs. Later duplicates win.
    pub fn branch<K, I>(entries: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Self::Branch(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a branch keyed `0..n` from a sequence of nodes.
    pub fn sequence<I: IntoIterator<Item = Node>>(items: I) -> Self {
        Self::Branch(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::from(i), v))
                .collect(),
        )
    }
}

// Deep documents would recurse once per level in the derived drop glue.
// Detach grandchildren onto a heap stack so every node is dropped with an
// empty branch.
impl Drop for Node {
    fn drop(&mut self) {
        let Self::Branch(branch) = self else { return };
        if branch.is_empty() {
            return;
        }
        let mut pending = vec![std::mem::take(branch)];
        while let Some(branch) = pending.pop() {
            for (_, mut child) in branch {
                if let Self::Branch(grandchildren) = &mut child
                    && !grandchildren.is_empty()
                {
                    pending.push(std::mem::take(grandchildren));
                }
            }
        }
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Self::Leaf(s)
    }
}

impl From<Branch> for Node {
    fn from(b: Branch) -> Self {
        Self::Branch(b)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Leaf(Scalar::Str(s.to_owned()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Leaf(Scalar::Str(s))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Self::Leaf(Scalar::Int(i))
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Self::Leaf(Scalar::Float(x))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Leaf(Scalar::Bool(b))
    }
}

impl fmt::Display for Node {
    /// Compact single-line rendering, e.g. `{a: 1, b: {c: "x"}}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(s) => write!(f, "{s}"),
            Self::Branch(b) => {
                f.write_str("{")?;
                for (i, (k, v)) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON conversions
// ---------------------------------------------------------------------------

#[cfg(feature = "json")]
impl From<&serde_json::Value> for Node {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Leaf(Scalar::Null),
            Value::Bool(b) => Self::Leaf(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Leaf(Scalar::Int(i)),
                None => Self::Leaf(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Self::Leaf(Scalar::Str(s.clone())),
            Value::Array(items) => Self::sequence(items.iter().map(Node::from)),
            Value::Object(map) => Self::Branch(
                map.iter()
                    .map(|(k, v)| (Key::name(k.as_str()), Node::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        Self::from(&value)
    }
}

#[cfg(feature = "json")]
impl From<&Node> for serde_json::Value {
    /// Branches always render as objects; index keys become their decimal
    /// string.
    fn from(node: &Node) -> Self {
        use serde_json::Value;
        match node {
            Node::Leaf(Scalar::Null) => Value::Null,
            Node::Leaf(Scalar::Bool(b)) => Value::Bool(*b),
            Node::Leaf(Scalar::Int(i)) => Value::from(*i),
            Node::Leaf(Scalar::Float(x)) => serde_json::Number::from_f64(*x)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Node::Leaf(Scalar::Str(s)) => Value::String(s.clone()),
            Node::Branch(b) => Value::Object(
                b.iter()
                    .map(|(k, v)| (k.to_string(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
