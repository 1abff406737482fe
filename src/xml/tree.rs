//! Generic XML node tree built from a quick-xml event stream

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, instrument};

use crate::error::{ParseError, Result};

/// Child of an element, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlChild {
    Element(XmlNode),
    Text(String),
    CData(String),
    Comment(String),
}

/// An element with its attributes in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlChild>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn first_attribute(&self) -> Option<(&str, &str)> {
        self.attributes
            .first()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Child elements, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|child| match child {
            XmlChild::Element(node) => Some(node),
            _ => None,
        })
    }

    /// Value of the first text child, if any
    pub fn first_text(&self) -> Option<&str> {
        self.children.iter().find_map(|child| match child {
            XmlChild::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &XmlNode, out: &mut String) {
    for child in &node.children {
        match child {
            XmlChild::Element(inner) => collect_text(inner, out),
            XmlChild::Text(text) | XmlChild::CData(text) => out.push_str(text),
            XmlChild::Comment(_) => {}
        }
    }
}

impl XmlChild {
    /// Text content of this child as a DOM would report it
    pub fn text_content(&self) -> String {
        match self {
            XmlChild::Element(node) => node.text_content(),
            XmlChild::Text(text) | XmlChild::CData(text) => text.clone(),
            XmlChild::Comment(_) => String::new(),
        }
    }
}

/// A parsed XML document; only the root element is retained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlNode,
}

impl XmlDocument {
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Parses a complete document. Text is kept verbatim so that rich-text
    /// bodies can be serialized back without losing whitespace.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    stack.push(start_node(&e)?);
                }
                Event::Empty(e) => {
                    let node = start_node(&e)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e.unescape()?.into_owned();
                        push_text(current, text);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                        current.children.push(XmlChild::CData(text));
                    }
                }
                Event::Comment(e) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                        current.children.push(XmlChild::Comment(text));
                    }
                }
                Event::Eof => break,
                // declaration, doctype and processing instructions carry nothing we use
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::Xml(format!("unclosed element <{}>", open.name)).into());
        }

        let root = root.ok_or(ParseError::MissingRoot)?;
        debug!(root = %root.name, "XML tree built");
        Ok(Self { root })
    }
}

fn start_node(element: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode::new(String::from_utf8_lossy(element.name().as_ref()));
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ParseError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlChild::Element(node)),
        // anything after the first root element is ignored
        None if root.is_none() => *root = Some(node),
        None => {}
    }
}

fn push_text(node: &mut XmlNode, text: String) {
    // adjacent text events form a single DOM text node
    if let Some(XmlChild::Text(existing)) = node.children.last_mut() {
        existing.push_str(&text);
    } else {
        node.children.push(XmlChild::Text(text));
    }
}
