// XML sources.
//
// Elements map onto the shape an XML element takes once converted to a
// JSON object:
//   - the root element's content is the document; its tag is dropped
//   - attributes sit under an `@attributes` branch
//   - a child name used more than once becomes an index-keyed branch
//   - a text-only element is a string leaf, an empty one an empty branch
//   - text beside attributes lands under index 0
//
// Every leaf is a string. Text mixed with child elements is dropped, as
// are comments, processing instructions and namespace declarations.
// Elements are built on an explicit stack, so nesting depth is bounded by
// heap.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::io::{DocumentParser, ParseError};
use crate::node::{Branch, Key, Node};

/// Key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// XML sources, read with `quick-xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl DocumentParser for XmlParser {
    fn parse(&self, bytes: &[u8]) -> Result<Node, ParseError> {
        let text = std::str::from_utf8(bytes).map_err(|e| ParseError::new(e.to_string()))?;
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Node> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                ParseError::new(format!("at byte {}: {e}", reader.buffer_position()))
            })?;
            match event {
                Event::Start(ref e) => open.push(Element::open(e)?),
                Event::Empty(ref e) => {
                    let (name, node) = Element::open(e)?.close();
                    attach(&mut open, &mut root, name, node)?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape().map_err(|e| ParseError::new(e.to_string()))?;
                    if let Some(top) = open.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Event::CData(ref e) => {
                    if let Some(top) = open.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Event::End(_) => {
                    let Some(element) = open.pop() else {
                        return Err(ParseError::new("end tag without a matching start tag"));
                    };
                    let (name, node) = element.close();
                    attach(&mut open, &mut root, name, node)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(element) = open.last() {
            return Err(ParseError::new(format!("unclosed element <{}>", element.name)));
        }
        root.ok_or_else(|| ParseError::new("no root element"))
    }
}

// ---------------------------------------------------------------------------
// Element builder
// ---------------------------------------------------------------------------

/// An element whose end tag has not been read yet.
struct Element {
    name: String,
    attributes: Branch,
    children: Vec<(String, Node)>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Branch::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::new(format!("<{name}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::new(format!("<{name} {key}>: {e}")))?;
            attributes.insert(Key::name(key), Node::from(value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, Node) {
        let Element {
            name,
            attributes,
            children,
            text,
        } = self;

        if attributes.is_empty() && children.is_empty() {
            let node = if text.is_empty() {
                Node::Branch(Branch::new())
            } else {
                Node::from(text)
            };
            return (name, node);
        }

        let mut branch = Branch::new();
        if !attributes.is_empty() {
            branch.insert(Key::name(ATTRIBUTES_KEY), Node::Branch(attributes));
        }
        if children.is_empty() {
            if !text.is_empty() {
                branch.insert(Key::Index(0), Node::from(text));
            }
            return (name, Node::Branch(branch));
        }

        let mut grouped: BTreeMap<Key, Vec<Node>> = BTreeMap::new();
        for (child, node) in children {
            grouped.entry(Key::name(child)).or_default().push(node);
        }
        for (key, mut nodes) in grouped {
            let node = if nodes.len() == 1 {
                nodes.remove(0)
            } else {
                Node::sequence(nodes)
            };
            branch.insert(key, node);
        }
        (name, Node::Branch(branch))
    }
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Node>,
    name: String,
    node: Node,
) -> Result<(), ParseError> {
    match open.last_mut() {
        Some(parent) => parent.children.push((name, node)),
        None if root.is_some() => {
            return Err(ParseError::new(format!("second root element <{name}>")));
        }
        // A text-only root still yields a keyed document.
        None => {
            *root = Some(match node {
                leaf @ Node::Leaf(_) => Node::sequence([leaf]),
                branch => branch,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
