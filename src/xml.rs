//! Minimal XML element tree
//!
//! Provides:
//! - Parsing a document into an owned `Element` tree (quick-xml events)
//! - Attribute and child lookup used by the converters
//! - Pretty-printed serialization with 2-space indentation

use anyhow::{Context, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

/// An XML element with its attributes, child elements and text content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Parse a whole document and return its root element
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    // End names are checked by the reader itself
                    let element = stack
                        .pop()
                        .context("Closing tag without a matching opening tag")?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().context("Invalid text content")?;
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(anyhow::anyhow!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    ))
                }
                // Declaration, DOCTYPE, comments and PIs carry nothing we read
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            anyhow::bail!("Unexpected end of document inside <{}>", open.name);
        }

        root.context("Document has no root element")
    }

    fn from_start(e: &BytesStart) -> Result<Self> {
        let mut element = Element::new(&String::from_utf8_lossy(e.name().as_ref()));
        for attr in e.attributes() {
            let attr = attr.with_context(|| format!("Malformed attribute on <{}>", element.name))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .with_context(|| format!("Invalid value for attribute '{}'", key))?
                .to_string();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => anyhow::bail!("Document has more than one root element"),
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        match self.text {
            Some(ref mut existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Read an attribute as a non-negative integer.
    ///
    /// Absent or unparsable values count as zero.
    pub fn number_attribute(&self, name: &str) -> u64 {
        self.attribute(name)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Direct child elements with the given tag, in document order
    pub fn children<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == tag)
    }

    /// All elements below this one with the given tag, depth-first in document order
    pub fn descendants<'a>(&'a self, tag: &'a str) -> Descendants<'a> {
        Descendants {
            stack: self.children.iter().rev().collect(),
            tag,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set an attribute, replacing any previous value and keeping its position
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Serialize this element (without an XML declaration)
    pub fn write_to<W: Write>(&self, inner: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(inner, b' ', 2);
        self.write_element(&mut writer)
    }

    /// Serialize this element into an indented string
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).context("Serialized XML is not valid UTF-8")
    }

    fn write_element<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer
                .write_event(Event::Empty(start))
                .with_context(|| format!("Failed to write <{}/>", self.name))?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .with_context(|| format!("Failed to write <{}>", self.name))?;
        if let Some(ref text) = self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .with_context(|| format!("Failed to write text of <{}>", self.name))?;
        }
        for child in &self.children {
            child.write_element(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .with_context(|| format!("Failed to write </{}>", self.name))?;
        Ok(())
    }
}

/// Depth-first iterator returned by [`Element::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
    tag: &'a str,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children.iter().rev());
            if node.name == self.tag {
                return Some(node);
            }
        }
        None
    }
}
