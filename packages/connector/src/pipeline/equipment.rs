//! Equipment transform: normalize selected ad fields into equipment
//! entries.
//!
//! For every ad, each selector's matches are extracted, removed from the
//! ad, and re-emitted as `equipment` entries under a new `equipments`
//! node. With [`MultiValuePolicy::Expand`] a per-ad `equipmentCollection`
//! summary is appended as well.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MultiValuePolicy;
use crate::document::Document;
use crate::error::SelectorError;
use crate::xml::{Element, FieldSelector};

/// One normalized equipment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// The selector that produced this entry.
    pub code: String,
    /// The extracted value text.
    pub value: String,
    /// `code` when the value is the literal `"true"`, else `code.value`.
    pub external_id: String,
}

impl Equipment {
    /// Build an entry, deriving its external id.
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        let code = code.into();
        let value = value.into();
        let external_id = if value == "true" {
            code.clone()
        } else {
            format!("{code}.{value}")
        };
        Self {
            code,
            value,
            external_id,
        }
    }

    /// Render as an `equipment` element.
    pub fn to_element(&self) -> Element {
        Element::new("equipment")
            .with_child(Element::with_text("code", &self.code))
            .with_child(Element::with_text("value", &self.value))
            .with_child(Element::with_text("external_id", &self.external_id))
    }
}

/// Parse a comma-separated selector list and run the transform.
pub fn transform_fields(
    doc: Document,
    fields: &str,
    policy: MultiValuePolicy,
) -> Result<Document, SelectorError> {
    let selectors = FieldSelector::parse_list(fields)?;
    Ok(transform(doc, &selectors, policy))
}

/// Normalize the selected fields of every ad into equipment entries.
///
/// Selectors matching nothing contribute no entries and are silently
/// skipped; with parsed selectors the transform itself cannot fail.
pub fn transform(
    mut doc: Document,
    selectors: &[FieldSelector],
    policy: MultiValuePolicy,
) -> Document {
    for ad in &mut doc.ads {
        let equipments = extract(ad, selectors, policy);
        debug!(entries = equipments.len(), "ad fields normalized");

        let mut container = Element::new("equipments");
        for entry in &equipments {
            container.push_child(entry.to_element());
        }
        ad.push_child(container);

        if policy == MultiValuePolicy::Expand {
            let collection = equipments
                .iter()
                .map(|e| e.external_id.as_str())
                .collect::<Vec<_>>()
                .join(",");
            ad.push_child(Element::with_text("equipmentCollection", collection));
        }
    }
    doc
}

/// Pull all selector matches out of an ad, in selector order then
/// document order.
fn extract(ad: &mut Element, selectors: &[FieldSelector], policy: MultiValuePolicy) -> Vec<Equipment> {
    let mut equipments = Vec::new();
    for selector in selectors {
        for node in selector.take_matches(ad) {
            // A node with `value` children is a multi-valued field;
            // otherwise its own text is the single value
            let values: Vec<String> = if node.children_named("value").next().is_some() {
                node.children_named("value").map(|v| v.text.clone()).collect()
            } else {
                vec![node.text.clone()]
            };

            match policy {
                MultiValuePolicy::Expand => {
                    for value in values {
                        equipments.push(Equipment::new(selector.as_str(), value));
                    }
                }
                MultiValuePolicy::Collapse => {
                    equipments.push(Equipment::new(selector.as_str(), values.join(",")));
                }
            }
        }
    }
    equipments
}
