//! Owned SVG document tree
//!
//! Built from quick-xml events. Keeps everything outside the element
//! structure (declaration, doctype, comments, whitespace) so that an
//! unmodified tree serializes back to equivalent text.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{RecolorError, Result};
use crate::xml_helpers::{element_from_start, local_name, raw_string};

/// Name the root element must carry (namespace prefix ignored).
pub const SVG_ROOT: &str = "svg";

/// A single attribute with its raw (escaped) value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Written as `<name/>` in the source.
    pub self_closing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, still escaped.
    Text(String),
    CData(String),
    Comment(String),
    /// `<?xml ...?>` contents.
    Declaration(String),
    ProcessingInstruction(String),
    DocType(String),
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attr_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Visit this element and all descendant elements in document order.
    pub fn visit<F: FnMut(&Element)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            if let Node::Element(el) = child {
                el.visit(f);
            }
        }
    }

    /// Mutable variant of [`Element::visit`].
    pub fn visit_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.visit_mut(f);
            }
        }
    }

    /// Number of elements in this subtree, including self.
    pub fn element_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

/// A parsed SVG document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgDocument {
    /// Nodes before the root element.
    prolog: Vec<Node>,
    root: Element,
    /// Nodes after the root element.
    epilog: Vec<Node>,
}

impl SvgDocument {
    /// Parse text into a tree and check that the root is an `svg` element.
    pub fn parse(text: &str) -> Result<Self> {
        let doc = build_tree(text)?;
        doc.validate_root()?;
        Ok(doc)
    }

    /// Reject documents whose root element is not `svg`.
    pub fn validate_root(&self) -> Result<()> {
        if self.root.local_name() == SVG_ROOT {
            Ok(())
        } else {
            Err(RecolorError::InvalidRootElement(self.root.name.clone()))
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Serialize the tree back to XML text.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        for node in &self.prolog {
            write_node(&mut out, node);
        }
        write_element(&mut out, &self.root);
        for node in &self.epilog {
            write_node(&mut out, node);
        }
        out
    }
}

/// Tokenize `text` and assemble the element tree.
fn build_tree(text: &str) -> Result<SvgDocument> {
    let mut reader = Reader::from_str(text);
    reader.check_end_names(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut prolog = Vec::new();
    let mut root: Option<Element> = None;
    let mut epilog = Vec::new();

    loop {
        let node = match reader.read_event()? {
            Event::Start(ref e) => {
                stack.push(element_from_start(e, false)?);
                continue;
            }
            Event::Empty(ref e) => Node::Element(element_from_start(e, true)?),
            Event::End(ref e) => {
                let el = stack.pop().ok_or_else(|| {
                    RecolorError::Malformed(format!(
                        "unexpected closing tag </{}>",
                        raw_string(e.name().as_ref())
                    ))
                })?;
                Node::Element(el)
            }
            Event::Text(ref e) => Node::Text(raw_string(e)),
            Event::CData(ref e) => Node::CData(raw_string(e)),
            Event::Comment(ref e) => Node::Comment(raw_string(e)),
            Event::Decl(ref e) => Node::Declaration(raw_string(e)),
            Event::PI(ref e) => Node::ProcessingInstruction(raw_string(e)),
            Event::DocType(ref e) => Node::DocType(raw_string(e)),
            Event::Eof => break,
        };

        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
            continue;
        }

        match node {
            Node::Element(el) => {
                if root.is_some() {
                    return Err(RecolorError::Malformed(format!(
                        "multiple root elements (second is <{}>)",
                        el.name
                    )));
                }
                root = Some(el);
            }
            Node::Text(ref t) if !t.trim().is_empty() => {
                return Err(RecolorError::Malformed(
                    "text content outside the root element".to_string(),
                ));
            }
            other => {
                if root.is_some() {
                    epilog.push(other);
                } else {
                    prolog.push(other);
                }
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(RecolorError::Malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    let root =
        root.ok_or_else(|| RecolorError::Malformed("document has no root element".to_string()))?;

    Ok(SvgDocument {
        prolog,
        root,
        epilog,
    })
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(el) => write_element(out, el),
        Node::Text(t) => out.push_str(t),
        Node::CData(t) => {
            out.push_str("<![CDATA[");
            out.push_str(t);
            out.push_str("]]>");
        }
        Node::Comment(t) => {
            out.push_str("<!--");
            out.push_str(t);
            out.push_str("-->");
        }
        Node::Declaration(t) | Node::ProcessingInstruction(t) => {
            out.push_str("<?");
            out.push_str(t);
            out.push_str("?>");
        }
        Node::DocType(t) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(t);
            out.push('>');
        }
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.name);
    for attr in &el.attributes {
        // Values that came from single-quoted attributes may contain '"'
        let quote = if attr.value.contains('"') { '\'' } else { '"' };
        out.push(' ');
        out.push_str(&attr.name);
        out.push('=');
        out.push(quote);
        out.push_str(&attr.value);
        out.push(quote);
    }

    if el.self_closing && el.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &el.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
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

    #[test]
    fn test_parse_minimal_svg() {
        let doc = SvgDocument::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
        assert_eq!(doc.root().name, "svg");
        assert!(doc.root().self_closing);
    }

    #[test]
    fn test_roundtrip_preserves_markup() {
        let src = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- logo -->
<svg width="200" height="200" viewBox="0 0 200 200"><g id="a"><rect x="50" y="50" width="100" height="100" fill="#FF0000"/><text>A &amp; B</text></g><style><![CDATA[.x{fill:red}]]></style></svg>
"##;
        let doc = SvgDocument::parse(src).unwrap();
        assert_eq!(doc.to_xml(), src);
    }

    #[test]
    fn test_single_quoted_value_with_double_quote() {
        let src = r#"<svg><text font-family='"Open Sans"'>x</text></svg>"#;
        let doc = SvgDocument::parse(src).unwrap();
        assert_eq!(doc.to_xml(), src);
    }

    #[test]
    fn test_namespaced_root_is_accepted() {
        let doc = SvgDocument::parse(r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"></svg:svg>"#);
        assert!(doc.is_ok());
    }

    #[test]
    fn test_wrong_root_rejected() {
        let err = SvgDocument::parse("<html><body/></html>").unwrap_err();
        assert!(matches!(err, RecolorError::InvalidRootElement(ref n) if n == "html"));
    }

    #[test]
    fn test_non_xml_rejected() {
        assert!(SvgDocument::parse("this is not xml at all").is_err());
        assert!(SvgDocument::parse("").is_err());
        assert!(SvgDocument::parse("   ").is_err());
    }

    #[test]
    fn test_structural_errors_rejected() {
        assert!(SvgDocument::parse("<svg><g></svg>").is_err());
        assert!(SvgDocument::parse("<svg><g>").is_err());
        assert!(SvgDocument::parse("<svg/><svg/>").is_err());
        assert!(SvgDocument::parse(r#"<svg fill="a" fill="b"/>"#).is_err());
    }

    #[test]
    fn test_visit_document_order() {
        let doc = SvgDocument::parse("<svg><g><rect/><circle/></g><path/></svg>").unwrap();
        let mut names = Vec::new();
        doc.root().visit(&mut |el| names.push(el.name.clone()));
        assert_eq!(names, ["svg", "g", "rect", "circle", "path"]);
        assert_eq!(doc.root().element_count(), 5);
    }
}
