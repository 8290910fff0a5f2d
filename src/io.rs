// Document loading.
//
// Reads a source file fully into memory and hands the bytes to a
// `DocumentParser`. `JsonParser` covers JSON sources and `XmlParser`
// (in `xml`) covers XML; other formats plug in through the same trait.
//
// Failures are reported in load order: unreadable source, empty source,
// parser rejection, non-branch root.

use std::path::{Path, PathBuf};

use crate::compare::{self, Comparison};
use crate::ignore::IgnoreEntry;
use crate::node::{Branch, Node};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Parser rejection.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error type for document loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Missing file or insufficient permissions.
    #[error("{} is not readable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Zero-length source.
    #[error("{} is empty", .path.display())]
    Empty { path: PathBuf },
    #[error("{} could not be parsed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    /// The parsed root is a leaf rather than a branch.
    #[error("{} does not hold a keyed document", .path.display())]
    NotBranch { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Parser seam
// ---------------------------------------------------------------------------

/// Turns raw source bytes into a document tree.
pub trait DocumentParser {
    fn parse(&self, bytes: &[u8]) -> Result<Node, ParseError>;
}

/// JSON sources: objects and arrays become branches.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

#[cfg(feature = "json")]
impl DocumentParser for JsonParser {
    fn parse(&self, bytes: &[u8]) -> Result<Node, ParseError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| ParseError::new(e.to_string()))?;
        Ok(Node::from(&value))
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An immutable, branch-rooted document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Branch,
}

impl Document {
    pub fn new(root: Branch) -> Self {
        Self { root }
    }

    /// Load a JSON document from `path`.
    #[cfg(feature = "json")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with(path, &JsonParser)
    }

    /// Load an XML document from `path`.
    #[cfg(feature = "xml")]
    pub fn load_xml(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with(path, &crate::xml::XmlParser)
    }

    /// Load a document from `path` using `parser`.
    pub fn load_with<P>(path: impl AsRef<Path>, parser: &P) -> Result<Self, LoadError>
    where
        P: DocumentParser + ?Sized,
    {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::parse_source(path, &bytes, parser)?;
        log::debug!(
            "loaded {} ({} bytes, {} top-level keys)",
            path.display(),
            bytes.len(),
            doc.root.len()
        );
        Ok(doc)
    }

    /// Parse an in-memory source. `origin` names it in errors.
    pub fn from_bytes<P>(
        origin: impl AsRef<Path>,
        bytes: &[u8],
        parser: &P,
    ) -> Result<Self, LoadError>
    where
        P: DocumentParser + ?Sized,
    {
        Self::parse_source(origin.as_ref(), bytes, parser)
    }

    fn parse_source<P>(path: &Path, bytes: &[u8], parser: &P) -> Result<Self, LoadError>
    where
        P: DocumentParser + ?Sized,
    {
        if bytes.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        match parser.parse(bytes) {
            Ok(mut node) => match &mut node {
                Node::Branch(root) => Ok(Self {
                    root: std::mem::take(root),
                }),
                Node::Leaf(_) => Err(LoadError::NotBranch {
                    path: path.to_path_buf(),
                }),
            },
            Err(source) => Err(LoadError::Parse {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn root(&self) -> &Branch {
        &self.root
    }

    pub fn into_root(self) -> Branch {
        self.root
    }

    /// `true` when `other` matches this document outside the ignored keys.
    pub fn compare(&self, other: &Document, ignore: &[IgnoreEntry]) -> bool {
        compare::equals(&self.root, &other.root, ignore)
    }

    /// Like [`Document::compare`], keeping the diff tree.
    pub fn diff<'a>(&'a self, other: &'a Document, ignore: &[IgnoreEntry]) -> Comparison<'a> {
        compare::compare(&self.root, &other.root, ignore)
    }
}

impl From<Branch> for Document {
    fn from(root: Branch) -> Self {
        Self::new(root)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
