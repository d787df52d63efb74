//! Parse raw response bodies into [`Element`] trees.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ParseError;
use crate::xml::node::Element;

/// Parse a fetched body as an XML document.
///
/// `url` identifies the source in error messages only.
pub fn parse_document(url: &str, body: &[u8]) -> Result<Element, ParseError> {
    let text = std::str::from_utf8(body).map_err(|_| ParseError::Encoding {
        url: url.to_string(),
    })?;
    parse_str(url, text)
}

/// Parse an XML string into its root element.
pub fn parse_str(url: &str, xml: &str) -> Result<Element, ParseError> {
    let xml_error = |source| ParseError::Xml {
        url: url.to_string(),
        source,
    };

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                stack.push(open_element(&start));
            }
            Event::Empty(start) => {
                attach(&mut stack, &mut root, open_element(&start));
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(cdata) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::End(_) => {
                // A stray end tag is rejected by the reader before we get here
                if let Some(finished) = stack.pop() {
                    attach(&mut stack, &mut root, finished);
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry
            // nothing the document model keeps
            _ => {}
        }
    }

    root.ok_or_else(|| ParseError::UnexpectedShape {
        reason: format!("no root element in response from {url}"),
    })
}

fn open_element(start: &quick_xml::events::BytesStart<'_>) -> Element {
    let mut element =
        Element::new(String::from_utf8_lossy(start.local_name().as_ref()).to_string());
    for attr in start.attributes().flatten() {
        element.attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).to_string(),
            String::from_utf8_lossy(&attr.value).to_string(),
        ));
    }
    element
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        // Only the first top-level element becomes the root
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let xml = r#"<?xml version="1.0"?>
            <searchResult>
                <total>2</total>
                <ads>
                    <ad><mobileAdId>1</mobileAdId></ad>
                    <ad><mobileAdId>2</mobileAdId></ad>
                </ads>
            </searchResult>"#;

        let root = parse_str("test://page", xml).unwrap();
        assert_eq!(root.name, "searchResult");
        assert_eq!(root.child_u64("total"), 2);

        let ads = root.child("ads").unwrap();
        let ids: Vec<_> = ads
            .children_named("ad")
            .map(|ad| ad.child_text("mobileAdId").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_parse_keeps_attributes_and_entities() {
        let root = parse_str("test://page", r#"<ad key="x">A &amp; B</ad>"#).unwrap();
        assert_eq!(root.attributes, vec![("key".to_string(), "x".to_string())]);
        assert_eq!(root.text, "A & B");
    }

    #[test]
    fn test_parse_empty_element() {
        let root = parse_str("test://page", "<ads><ad/></ads>").unwrap();
        assert_eq!(root.children_named("ad").count(), 1);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = parse_str("test://page", "<searchResult><total>1</searchResult>").unwrap_err();
        assert!(matches!(err, ParseError::Xml { .. }));
    }

    #[test]
    fn test_empty_body_is_an_error() {
        let err = parse_str("test://page", "   ").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_non_utf8_body_is_an_error() {
        let err = parse_document("test://page", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ParseError::Encoding { .. }));
    }

    #[test]
    fn test_round_trip() {
        let xml = "<ad><mobileAdId>42</mobileAdId><price>9000</price></ad>";
        let root = parse_str("test://page", xml).unwrap();
        assert_eq!(root.to_xml(), xml);
    }
}
