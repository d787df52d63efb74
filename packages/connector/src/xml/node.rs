//! Ordered element tree for feed documents.
//!
//! The feed pipeline works on a small owned tree instead of streaming
//! events because every stage mutates the document structurally: ads are
//! replaced wholesale during enrichment and selector-matched nodes are
//! removed during the equipment transform. Child order is significant
//! everywhere and is preserved by every operation.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// One named node: text content plus ordered children.
///
/// Attributes are carried through parsing and rendering but have no
/// meaning to the pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Create a leaf element with text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.text = text.into();
        element
    }

    /// Append a child, builder style.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child in place.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Text of the first child with the given name, parsed as an integer.
    ///
    /// Missing children and non-numeric text both read as 0, matching the
    /// integer cast the feed's consumers have always applied to the
    /// pagination fields.
    pub fn child_u64(&self, name: &str) -> u64 {
        self.child_text(name)
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Render this element and its subtree as an XML fragment.
    pub fn to_xml(&self) -> String {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap_or_default()
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        // Writing to a Vec cannot fail
        let _ = writer.write_event(Event::Start(start));
        if !self.text.is_empty() {
            let _ = writer.write_event(Event::Text(BytesText::new(self.text.as_str())));
        }
        for child in &self.children {
            child.write_into(writer);
        }
        let _ = writer.write_event(Event::End(BytesEnd::new(self.name.as_str())));
    }
}
