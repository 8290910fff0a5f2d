// Tree differ: walks the left document against the right one.
//
// Only the left side drives iteration. A key that exists solely on the
// right never shows up in the result and never makes documents unequal.
// For each left key:
//   1. excluded by the ignore spec      -> skipped
//   2. absent on the right              -> `Missing(left)`
//   3. branch on both sides             -> descend, keep non-empty subtree
//   4. otherwise, strictly not equal    -> `Mismatch { left, right }`
//
// Traversal keeps its own frame stack instead of recursing, so document
// depth is bounded by heap, not by the native stack. Divergences borrow
// the compared values rather than copying subtrees, and dropping a deep
// `DiffTree` unwinds through a heap stack as well.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use crate::ignore::IgnoreSpec;
use crate::node::{Branch, Key, Node};

// ---------------------------------------------------------------------------
// Result tree
// ---------------------------------------------------------------------------

/// How a left-hand entry diverges from the right-hand document.
#[derive(Debug, Clone, PartialEq)]
pub enum Divergence<'a> {
    /// The key has no counterpart on the right. Holds the left value.
    Missing(&'a Node),
    /// At least one side is a leaf and the two values differ.
    Mismatch { left: &'a Node, right: &'a Node },
    /// Differences exist below this key. Never empty.
    Nested(DiffTree<'a>),
}

impl<'a> Divergence<'a> {
    /// The left-hand value, for leaf divergences.
    pub fn left(&self) -> Option<&'a Node> {
        match *self {
            Self::Missing(left) | Self::Mismatch { left, .. } => Some(left),
            Self::Nested(_) => None,
        }
    }
}

/// Structural difference between two branches. Empty means equal.
///
/// Borrows from the documents it was computed over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffTree<'a> {
    entries: BTreeMap<Key, Divergence<'a>>,
}

impl<'a> DiffTree<'a> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of divergent keys at this level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &Key) -> Option<&Divergence<'a>> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Divergence<'a>)> {
        self.entries.iter()
    }

    /// Every leaf divergence with its full key path, in key order.
    pub fn paths(&self) -> Vec<(Vec<Key>, &Divergence<'a>)> {
        let mut out = Vec::new();
        let mut path: Vec<Key> = Vec::new();
        let mut stack = vec![self.entries.iter()];

        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                None => {
                    stack.pop();
                    path.pop();
                }
                Some((key, Divergence::Nested(sub))) => {
                    path.push(key.clone());
                    stack.push(sub.entries.iter());
                }
                Some((key, leaf)) => {
                    let mut full = path.clone();
                    full.push(key.clone());
                    out.push((full, leaf));
                }
            }
        }
        out
    }

    /// JSON rendering: each divergent key maps to its left-hand
    /// value, nested differences to nested objects.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, div)| {
                    let value = match div {
                        Divergence::Nested(sub) => sub.to_json(),
                        Divergence::Missing(left) | Divergence::Mismatch { left, .. } => {
                            serde_json::Value::from(*left)
                        }
                    };
                    (k.to_string(), value)
                })
                .collect(),
        )
    }

    fn insert(&mut self, key: Key, div: Divergence<'a>) {
        self.entries.insert(key, div);
    }
}

impl Drop for DiffTree<'_> {
    fn drop(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let mut pending = vec![std::mem::take(&mut self.entries)];
        while let Some(entries) = pending.pop() {
            for (_, div) in entries {
                if let Divergence::Nested(mut sub) = div {
                    pending.push(std::mem::take(&mut sub.entries));
                }
            }
        }
    }
}

impl fmt::Display for DiffTree<'_> {
    /// One line per divergence, `/`-separated paths.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, div) in self.paths() {
            let path = path
                .iter()
                .map(Key::to_string)
                .collect::<Vec<_>>()
                .join("/");
            match div {
                Divergence::Missing(left) => {
                    writeln!(f, "{path}: missing on right (left = {left})")?
                }
                Divergence::Mismatch { left, right } => {
                    writeln!(f, "{path}: expected {left}, found {right}")?
                }
                Divergence::Nested(_) => {}
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// One pending branch pair on the work stack.
struct Frame<'a, 's> {
    /// Key under which this frame's result lands in its parent.
    key: Option<&'a Key>,
    entries: btree_map::Iter<'a, Key, Node>,
    right: &'a Branch,
    ignore: &'s IgnoreSpec,
    out: DiffTree<'a>,
}

impl<'a, 's> Frame<'a, 's> {
    fn new(
        key: Option<&'a Key>,
        left: &'a Branch,
        right: &'a Branch,
        ignore: &'s IgnoreSpec,
    ) -> Self {
        Self {
            key,
            entries: left.iter(),
            right,
            ignore,
            out: DiffTree::default(),
        }
    }

    /// Compare one left entry; returns a child frame when both sides branch.
    fn visit(&mut self, key: &'a Key, left: &'a Node) -> Option<Frame<'a, 's>> {
        if self.ignore.is_excluded(key) {
            log::trace!("skipping excluded key {key}");
            return None;
        }
        let Some(right) = self.right.get(key) else {
            log::trace!("key {key} missing on right");
            self.out.insert(key.clone(), Divergence::Missing(left));
            return None;
        };
        match (left, right) {
            (Node::Branch(l), Node::Branch(r)) => {
                Some(Frame::new(Some(key), l, r, self.ignore.child(key)))
            }
            _ if left != right => {
                log::trace!("key {key} differs");
                self.out
                    .insert(key.clone(), Divergence::Mismatch { left, right });
                None
            }
            _ => None,
        }
    }
}

/// Diff `left` against `right` under `ignore`.
///
/// ```
/// use doccmp::{diff, IgnoreSpec, Node};
///
/// let left = Node::branch([("a", Node::from(1i64)), ("b", Node::from(2i64))]);
/// let right = Node::branch([("a", Node::from(1i64))]);
/// let tree = diff(
///     left.as_branch().unwrap(),
///     right.as_branch().unwrap(),
///     &IgnoreSpec::new(),
/// );
/// assert_eq!(tree.len(), 1);
/// ```
pub fn diff<'a>(left: &'a Branch, right: &'a Branch, ignore: &IgnoreSpec) -> DiffTree<'a> {
    let mut stack = vec![Frame::new(None, left, right, ignore)];

    loop {
        let Some(frame) = stack.last_mut() else {
            return DiffTree::default();
        };
        if let Some((key, value)) = frame.entries.next() {
            if let Some(child) = frame.visit(key, value) {
                stack.push(child);
            }
            continue;
        }

        // Frame exhausted: fold it into its parent, or finish at the root.
        let Some(mut done) = stack.pop() else {
            return DiffTree::default();
        };
        let out = std::mem::take(&mut done.out);
        match (stack.last_mut(), done.key) {
            (Some(parent), Some(key)) => {
                if !out.is_empty() {
                    parent.out.insert(key.clone(), Divergence::Nested(out));
                }
            }
            _ => return out,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
