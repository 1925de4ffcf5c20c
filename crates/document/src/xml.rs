//! Owned XML tree with order-preserving round-trip serialization.
//!
//! The reader drops whitespace-only text and the writer re-indents with two
//! spaces, so round-trips are byte-stable only up to indentation; element
//! order, attribute order, text, CDATA and comments are all preserved.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use brickplace_core::{CoreError, CoreResult};

/// One node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

/// An element: name, attributes in source order, children in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child element with the given name.
    pub fn child_element(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    pub(crate) fn child_element_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// Concatenated text and CDATA content of direct children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                _ => {}
            }
        }
        out
    }

    /// Replace the element's content with a single text node (or nothing,
    /// when `text` is empty).
    pub(crate) fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    pub(crate) fn push_child(&mut self, node: XmlNode) {
        self.children.push(node);
    }
}

/// Parse a complete XML document into its root element.
pub fn parse(src: &str) -> CoreResult<XmlElement> {
    let mut reader = Reader::from_str(src);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            CoreError::parse(format!(
                "malformed xml at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                place(&mut stack, &mut root, XmlNode::Element(element))?;
            }
            Event::End(_) => {
                // The reader already validated that the name matches.
                let element = stack
                    .pop()
                    .ok_or_else(|| CoreError::parse("unbalanced closing tag"))?;
                place(&mut stack, &mut root, XmlNode::Element(element))?;
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| CoreError::parse(format!("invalid text content: {e}")))?;
                place(&mut stack, &mut root, XmlNode::Text(value.into_owned()))?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let value = std::str::from_utf8(&bytes)
                    .map_err(|e| CoreError::parse(format!("non-utf8 cdata: {e}")))?;
                place(&mut stack, &mut root, XmlNode::CData(value.to_string()))?;
            }
            Event::Comment(text) => {
                let value = std::str::from_utf8(text.as_ref())
                    .map_err(|e| CoreError::parse(format!("non-utf8 comment: {e}")))?;
                place(&mut stack, &mut root, XmlNode::Comment(value.to_string()))?;
            }
        }
    }

    if !stack.is_empty() {
        return Err(CoreError::parse("unclosed element at end of input"));
    }
    root.ok_or_else(|| CoreError::parse("document has no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> CoreResult<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| CoreError::parse(format!("non-utf8 element name: {e}")))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| CoreError::parse(format!("bad attribute in <{name}>: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| CoreError::parse(format!("non-utf8 attribute name: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| CoreError::parse(format!("bad attribute value in <{name}>: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn place(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    node: XmlNode,
) -> CoreResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    match node {
        XmlNode::Element(element) => {
            if root.is_some() {
                return Err(CoreError::parse("multiple root elements"));
            }
            *root = Some(element);
        }
        // Stray comments or text outside the root carry no structure.
        _ => {}
    }
    Ok(())
}

/// Serialize a tree to a full document: XML declaration, then the root with
/// two-space indentation and a trailing newline.
pub fn serialize(root: &XmlElement) -> CoreResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| CoreError::parse(format!("serialize failed: {e}")))?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| CoreError::parse(format!("non-utf8 output: {e}")))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> CoreResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| CoreError::parse(format!("serialize failed: {e}")));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| CoreError::parse(format!("serialize failed: {e}")))?;
    for child in &element.children {
        match child {
            XmlNode::Element(el) => write_element(writer, el)?,
            XmlNode::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(|e| CoreError::parse(format!("serialize failed: {e}")))?,
            XmlNode::CData(t) => writer
                .write_event(Event::CData(BytesCData::new(t.as_str())))
                .map_err(|e| CoreError::parse(format!("serialize failed: {e}")))?,
            XmlNode::Comment(t) => writer
                .write_event(Event::Comment(BytesText::from_escaped(t.as_str())))
                .map_err(|e| CoreError::parse(format!("serialize failed: {e}")))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| CoreError::parse(format!("serialize failed: {e}")))
}
