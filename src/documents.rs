//! XML document handling
//!
//! This module provides an owned, immutable element tree for a parsed XML
//! document. Attributes (namespace declarations included) and child nodes are
//! kept in document order.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::wellformed;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// A single attribute as written in the start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, including any prefix (`xmlns:p`, `xsi:type`)
    pub name: String,
    /// Unescaped attribute value
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A child node of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Character data (text and CDATA sections, merged when adjacent)
    Text(String),
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element tag name as written, including any prefix
    pub name: String,
    /// Element attributes in document order
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get the tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the attributes
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Check if the element has attributes
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Get an attribute value by its full name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Iterate over the child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Check if the element has at least one child element
    pub fn has_child_elements(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Find child elements by tag name
    pub fn find_children(&self, name: &str) -> Vec<&Element> {
        self.child_elements().filter(|e| e.name == name).collect()
    }

    /// Concatenated text of this element and all its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Add text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text.into());
        self
    }

    fn push_text(&mut self, text: String) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }
}

/// XML Document representation
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse an XML document from a string
    ///
    /// The input is first checked for well-formedness; any violation,
    /// including nesting beyond the default depth limit, is reported as
    /// [`Error::MalformedXml`].
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::from_string_with_limits(xml, &Limits::default())
    }

    /// [`Document::from_string`] with an explicit nesting bound
    pub fn from_string_with_limits(xml: &str, limits: &Limits) -> Result<Self> {
        wellformed::check_with_limits(xml, limits)?;
        let root = Self::build_tree(xml)?;
        tracing::trace!(root = %root.name, "parsed document");
        Ok(Self { root })
    }

    fn build_tree(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);

        let mut element_stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    element_stack.push(Self::parse_element(&e)?);
                }
                Event::End(_) => {
                    let current = element_stack
                        .pop()
                        .ok_or_else(|| Error::malformed("unexpected closing tag"))?;
                    Self::attach(&mut element_stack, &mut root, current);
                }
                Event::Empty(e) => {
                    let element = Self::parse_element(&e)?;
                    Self::attach(&mut element_stack, &mut root, element);
                }
                Event::Text(e) => {
                    if let Some(current) = element_stack.last_mut() {
                        let raw = utf8(&e, "text")?;
                        current.push_text(unescape_text(&normalize_eol(raw))?);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = element_stack.last_mut() {
                        let raw = utf8(&e, "CDATA")?;
                        current.push_text(normalize_eol(raw).into_owned());
                    }
                }
                Event::Eof => break,
                _ => {} // Comments, processing instructions, declarations
            }
        }

        if !element_stack.is_empty() {
            return Err(Error::malformed("unclosed element at end of input"));
        }
        root.ok_or_else(|| Error::malformed("document has no root element"))
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Node::Element(element));
        } else {
            *root = Some(element);
        }
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart<'_>) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::malformed(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut element = Element::new(name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::malformed(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::malformed(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let raw = utf8(&attr.value, "attribute value")?;
            let attr_value = unescape_text(&normalize_attribute(raw))?;

            element.attributes.push(Attribute::new(attr_name, attr_value));
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Consume the document, returning its root element
    pub fn into_root(self) -> Element {
        self.root
    }
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| Error::malformed(format!("Invalid {}: {}", what, e)))
}

fn unescape_text(raw: &str) -> Result<String> {
    unescape(raw)
        .map(Cow::into_owned)
        .map_err(|e| Error::malformed(e.to_string()))
}

/// Line-end handling of XML 1.0 §2.11: `\r\n` and lone `\r` become `\n`
fn normalize_eol(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Attribute-value normalization of XML 1.0 §3.3.3 for CDATA attributes
///
/// Applied to the raw value, so whitespace written as a character
/// reference survives.
fn normalize_attribute(raw: &str) -> Cow<'_, str> {
    const WHITESPACE: &[char] = &['\t', '\n', '\r'];
    if raw.contains(WHITESPACE) {
        Cow::Owned(normalize_eol(raw).replace(WHITESPACE, " "))
    } else {
        Cow::Borrowed(raw)
    }
}
