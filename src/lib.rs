//! doccmp: structural comparison of keyed document trees.
//!
//! The crate provides:
//! - A document model (`node`): branches of keys over atomic leaves
//! - Ignore lists and their canonical form (`ignore`)
//! - A left-driven tree differ (`diff`)
//! - Equality checks, diagnostics and batch comparison (`compare`)
//! - File loading behind a pluggable parser (`io`), with JSON and XML
//!   parsers behind the `json` and `xml` features
//!
//! # Quick Start
//!
//! ```
//! use doccmp::{compare, IgnoreEntry, Node};
//!
//! let left = Node::branch([
//!     ("id", Node::from("a1f3")),
//!     ("body", Node::branch([("title", Node::from("x")), ("stamp", Node::from(10i64))])),
//! ]);
//! let right = Node::branch([
//!     ("id", Node::from("9c2e")),
//!     ("body", Node::branch([("title", Node::from("x")), ("stamp", Node::from(20i64))])),
//! ]);
//!
//! let ignore = [
//!     IgnoreEntry::key("id"),
//!     IgnoreEntry::nested("body", [IgnoreEntry::key("stamp")]),
//! ];
//! let cmp = compare(left.as_branch().unwrap(), right.as_branch().unwrap(), &ignore);
//! assert!(cmp.is_equal(), "{}", cmp.diff());
//! ```

pub mod compare;
pub mod diff;
pub mod ignore;
pub mod io;
pub mod node;
#[cfg(feature = "xml")]
pub mod xml;

pub use compare::{Comparison, assert_equivalent, compare, compare_all, compare_with_spec, equals};
pub use diff::{DiffTree, Divergence, diff};
pub use ignore::{IgnoreEntry, IgnoreSpec, Rule, normalize};
pub use io::{Document, DocumentParser, LoadError, ParseError};
pub use node::{Branch, Key, Node, Scalar};

#[cfg(feature = "json")]
pub use ignore::entries_from_json;
#[cfg(feature = "json")]
pub use io::JsonParser;
#[cfg(feature = "xml")]
pub use xml::XmlParser;
