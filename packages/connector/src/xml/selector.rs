//! Field selectors: relative paths evaluated against an ad's subtree.
//!
//! A selector is one or more element names joined by `/`, for example
//! `airbag` or `features/specifics/abs`. Evaluation walks the child axis
//! only and returns matches in document order. Selectors that match
//! nothing are not an error; selectors that cannot be parsed are.

use crate::error::SelectorError;
use crate::xml::node::Element;

/// A parsed field selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    raw: String,
    segments: Vec<String>,
}

impl FieldSelector {
    /// Parse a single selector string.
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        let invalid = |reason: &str| SelectorError::Invalid {
            selector: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.trim().is_empty() {
            return Err(invalid("selector is empty"));
        }

        let mut segments = Vec::new();
        for segment in raw.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if segment.chars().any(char::is_whitespace) {
                return Err(invalid("whitespace in path segment"));
            }
            segments.push(segment.to_string());
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Parse a comma-separated selector list, preserving order.
    pub fn parse_list(fields: &str) -> Result<Vec<Self>, SelectorError> {
        fields.split(',').map(|f| Self::parse(f.trim())).collect()
    }

    /// The selector string as supplied (the `code` of produced equipment).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// All matching nodes under `scope`, in document order.
    pub fn matches<'a>(&self, scope: &'a Element) -> Vec<&'a Element> {
        let mut out = Vec::new();
        collect(scope, &self.segments, &mut out);
        out
    }

    /// Remove all matching nodes from `scope` and return them, in
    /// document order.
    pub fn take_matches(&self, scope: &mut Element) -> Vec<Element> {
        let mut out = Vec::new();
        take(scope, &self.segments, &mut out);
        out
    }
}

fn collect<'a>(element: &'a Element, segments: &[String], out: &mut Vec<&'a Element>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    for child in element.children.iter().filter(|c| &c.name == head) {
        if rest.is_empty() {
            out.push(child);
        } else {
            collect(child, rest, out);
        }
    }
}

fn take(element: &mut Element, segments: &[String], out: &mut Vec<Element>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        let mut index = 0;
        while index < element.children.len() {
            if element.children[index].name == *head {
                out.push(element.children.remove(index));
            } else {
                index += 1;
            }
        }
    } else {
        for child in element.children.iter_mut().filter(|c| c.name == *head) {
            take(child, rest, out);
        }
    }
}
