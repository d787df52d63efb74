//! Minimal XML support for the feed document shape.

pub mod node;
pub mod parse;
pub mod selector;

pub use node::Element;
pub use parse::{parse_document, parse_str};
pub use selector::FieldSelector;
