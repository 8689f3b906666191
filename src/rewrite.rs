//! Color rewriting
//!
//! Applies a [`ColorMapping`] to the same attributes and style declarations
//! the detector reads. Values that do not normalize into the mapping
//! (`none`, `url(...)`, unsupported formats) are left exactly as written.

use crate::color::normalize_color_with;
use crate::document::Element;
use crate::extract::{is_color_bearing, COLOR_ATTRIBUTES, STYLE_ATTRIBUTE};
use crate::palette::ColorMapping;
use crate::recolor::ParseOptions;
use crate::style::rewrite_declarations;
use crate::xml_helpers::unescape_value;

/// Rewrite mapped colors under `root` in place.
///
/// Returns the number of attribute values and style declarations changed.
pub fn rewrite_colors(root: &mut Element, mapping: &ColorMapping, options: ParseOptions) -> usize {
    let mut rewritten = 0;
    root.visit_mut(&mut |el| {
        if is_color_bearing(el) {
            rewritten += rewrite_element(el, mapping, options);
        }
    });
    tracing::debug!(rewritten, "rewrote color declarations");
    rewritten
}

fn rewrite_element(el: &mut Element, mapping: &ColorMapping, options: ParseOptions) -> usize {
    let target_for = |raw: &str| {
        normalize_color_with(&unescape_value(raw), options)
            .and_then(|color| mapping.get(&color))
            .map(|target| target.to_string())
    };

    let mut count = 0;
    for name in COLOR_ATTRIBUTES {
        if let Some(attr) = el.attr_mut(name) {
            if let Some(target) = target_for(&attr.value) {
                attr.value = target;
                count += 1;
            }
        }
    }

    if let Some(style) = el.attr_mut(STYLE_ATTRIBUTE) {
        let (new_style, replaced) = rewrite_declarations(&style.value, target_for);
        if replaced > 0 {
            style.value = new_style;
            count += replaced;
        }
    }

    count
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
    use crate::color::Color;
    use crate::document::SvgDocument;

    fn red_to_blue() -> ColorMapping {
        let palette = crate::palette::Palette::from_hex("#0000FF", "#0000FF", "#0000FF", "#0000FF")
            .unwrap();
        ColorMapping::build(&[Color::new(255, 0, 0)], &palette)
    }

    fn rewrite(svg: &str) -> (String, usize) {
        let mut doc = SvgDocument::parse(svg).unwrap();
        let n = rewrite_colors(doc.root_mut(), &red_to_blue(), ParseOptions::default());
        (doc.to_xml(), n)
    }

    #[test]
    fn test_rewrites_attributes() {
        let (out, n) = rewrite(r##"<svg><rect fill="red" stroke="rgb(255,0,0)" stop-color="#ff0000"/></svg>"##);
        assert_eq!(
            out,
            r##"<svg><rect fill="#0000FF" stroke="#0000FF" stop-color="#0000FF"/></svg>"##
        );
        assert_eq!(n, 3);
    }

    #[test]
    fn test_style_rewrite_keeps_other_declarations() {
        let (out, _) = rewrite(r#"<svg><rect style="FILL: red;opacity:0.7;stroke:none"/></svg>"#);
        assert_eq!(
            out,
            r##"<svg><rect style="FILL: #0000FF;opacity:0.7;stroke:none"/></svg>"##
        );
    }

    #[test]
    fn test_escaped_style_value_rewritten() {
        let (out, n) = rewrite(r#"<svg><rect style="fill:&#x23;FF0000;opacity:0.5"/></svg>"#);
        assert_eq!(
            out,
            r##"<svg><rect style="fill:#0000FF;opacity:0.5"/></svg>"##
        );
        assert_eq!(n, 1);
    }

    #[test]
    fn test_unmapped_values_untouched() {
        let src = r##"<svg><rect fill="url(#g)" stroke="none"/><rect fill="#00FF00"/></svg>"##;
        let (out, n) = rewrite(src);
        assert_eq!(out, src);
        assert_eq!(n, 0);
    }
}
