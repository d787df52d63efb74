//! The logical document every pipeline stage consumes and produces.

use crate::error::ParseError;
use crate::xml::Element;

/// A merged search result: the declared total plus all ads in order.
///
/// Ad order is page 1 first, in-page order preserved; every stage keeps
/// that order intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub total: u64,
    pub ads: Vec<Element>,
}

impl Document {
    /// Create a document from already-collected parts.
    pub fn new(total: u64, ads: Vec<Element>) -> Self {
        Self { total, ads }
    }

    /// Number of ads actually carried (may differ from the declared total).
    pub fn len(&self) -> usize {
        self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    /// Rebuild the `<searchResult>` envelope around the current state.
    pub fn to_element(&self) -> Element {
        let mut ads = Element::new("ads");
        for ad in &self.ads {
            ads.push_child(ad.clone());
        }
        Element::new("searchResult")
            .with_child(Element::with_text("total", self.total.to_string()))
            .with_child(ads)
    }

    /// Render the document as an XML string.
    pub fn to_xml(&self) -> String {
        self.to_element().to_xml()
    }

    /// Read a document back out of its envelope.
    pub fn from_element(root: &Element) -> Result<Self, ParseError> {
        let ads = root.child("ads").ok_or_else(|| ParseError::UnexpectedShape {
            reason: format!("<{}> has no <ads> container", root.name),
        })?;
        Ok(Self {
            total: root.child_u64("total"),
            ads: ads.children_named("ad").cloned().collect(),
        })
    }
}
