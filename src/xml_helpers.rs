//! Shared XML helpers for building the owned document tree.
//!
//! Attribute values and character data are kept in their raw (escaped)
//! form so that serialization reproduces the source byte-for-byte.

use std::borrow::Cow;

use quick_xml::events::BytesStart;

use crate::document::{Attribute, Element};
use crate::error::Result;

/// Convert raw XML bytes into an owned string.
///
/// The reader is fed from `&str`, so invalid UTF-8 cannot occur in practice;
/// any that does is replaced rather than rejected.
#[inline]
pub fn raw_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Get the qualified element name (including any namespace prefix).
#[inline]
pub fn qualified_name_string(e: &BytesStart) -> String {
    raw_string(e.name().as_ref())
}

/// Collect every attribute in source order with its raw, still-escaped value.
///
/// Malformed or duplicated attributes are reported as errors.
pub fn raw_attributes(e: &BytesStart) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        attributes.push(Attribute {
            name: raw_string(attr.key.as_ref()),
            value: raw_string(&attr.value),
        });
    }
    Ok(attributes)
}

/// Build an element (without children) from a start or empty tag.
pub fn element_from_start(e: &BytesStart, self_closing: bool) -> Result<Element> {
    Ok(Element {
        name: qualified_name_string(e),
        attributes: raw_attributes(e)?,
        children: Vec::new(),
        self_closing,
    })
}

/// Resolve entity and character references in a raw attribute value.
///
/// Values with broken references are returned as-is.
pub fn unescape_value(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Strip the namespace prefix from a qualified name.
#[inline]
pub fn local_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map_or(qualified, |(_, local)| local)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_raw_attributes_keep_order_and_escapes() {
        let e = make_start(r#"<text fill="red" data-label="a &amp; b" x="1" />"#);
        let attrs = raw_attributes(&e).unwrap();
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["fill", "data-label", "x"]);
        assert_eq!(attrs[1].value, "a &amp; b");
    }

    #[test]
    fn test_duplicate_attribute_is_error() {
        let e = make_start(r#"<rect fill="red" fill="blue" />"#);
        assert!(raw_attributes(&e).is_err());
    }

    #[test]
    fn test_element_from_start() {
        let e = make_start(r#"<svg:rect width="10" />"#);
        let el = element_from_start(&e, true).unwrap();
        assert_eq!(el.name, "svg:rect");
        assert!(el.self_closing);
        assert_eq!(el.attributes.len(), 1);
    }

    #[test]
    fn test_unescape_value() {
        assert_eq!(unescape_value("&#x23;FF0000"), "#FF0000");
        assert_eq!(unescape_value("plain"), "plain");
        assert_eq!(unescape_value("broken &bogus"), "broken &bogus");
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("svg:svg"), "svg");
        assert_eq!(local_name("svg"), "svg");
    }
}
