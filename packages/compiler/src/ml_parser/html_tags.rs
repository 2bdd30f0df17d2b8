//! HTML Tag Definitions
//!
//! Only the void set matters to the skeleton writer: void elements never get a
//! closing tag and never host children.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    static ref VOID_ELEMENTS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect();
}

/// HTML tag names are case insensitive.
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name) || VOID_ELEMENTS.contains(tag_name.to_lowercase().as_str())
}
