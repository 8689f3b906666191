//! Color detection
//!
//! Walks the document and collects every distinct color used in `fill`,
//! `stroke`, `stop-color` attributes and in the matching `style`
//! declarations. Gradient references (`url(#id)`) are skipped; the
//! gradient's own stops are picked up separately.

use std::collections::HashSet;

use crate::color::{classify_token, Color, ColorToken};
use crate::document::Element;
use crate::recolor::ParseOptions;
use crate::style::color_declarations;
use crate::xml_helpers::unescape_value;

/// Presentation attributes that carry a color.
pub const COLOR_ATTRIBUTES: [&str; 3] = ["fill", "stroke", "stop-color"];

/// Attribute holding inline CSS declarations.
pub const STYLE_ATTRIBUTE: &str = "style";

/// Appearance-ordered, duplicate-free set of canonical colors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectedColors {
    colors: Vec<Color>,
    seen: HashSet<Color>,
}

impl DetectedColors {
    /// Add a color; returns `false` if it was already present.
    pub fn insert(&mut self, color: Color) -> bool {
        if !self.seen.insert(color) {
            return false;
        }
        self.colors.push(color);
        true
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Result of scanning a document for colors.
#[derive(Clone, Debug, Default)]
pub struct ColorScan {
    pub detected: DetectedColors,
    /// Color values that were present but not understood, e.g. `hsl()`.
    pub unsupported: Vec<String>,
}

/// Whether an element carries any attribute the detector inspects.
pub fn is_color_bearing(el: &Element) -> bool {
    COLOR_ATTRIBUTES
        .iter()
        .chain(std::iter::once(&STYLE_ATTRIBUTE))
        .any(|name| el.has_attr(name))
}

/// Raw color values on one element, in inspection order: fill, stroke,
/// stop-color, then style declarations.
pub fn element_color_values(el: &Element) -> Vec<String> {
    let mut values = Vec::new();
    for name in COLOR_ATTRIBUTES {
        if let Some(attr) = el.attr(name) {
            values.push(unescape_value(&attr.value).into_owned());
        }
    }
    if let Some(style) = el.attr(STYLE_ATTRIBUTE) {
        for decl in color_declarations(&style.value) {
            values.push(unescape_value(decl.value(&style.value)).into_owned());
        }
    }
    values
}

/// Collect the colors used anywhere under `root`.
pub fn detect_colors(root: &Element, options: ParseOptions) -> ColorScan {
    let mut scan = ColorScan::default();

    root.visit(&mut |el| {
        if !is_color_bearing(el) {
            return;
        }
        for value in element_color_values(el) {
            match classify_token(&value, options) {
                ColorToken::Color(color) => {
                    scan.detected.insert(color);
                }
                ColorToken::Unsupported => {
                    tracing::debug!(element = %el.name, value = %value, "unsupported color value");
                    scan.unsupported.push(value);
                }
                ColorToken::Keyword | ColorToken::Reference => {}
            }
        }
    });

    scan
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
    use crate::document::SvgDocument;

    fn scan(svg: &str) -> ColorScan {
        let doc = SvgDocument::parse(svg).unwrap();
        detect_colors(doc.root(), ParseOptions::default())
    }

    fn detected_hex(svg: &str) -> Vec<String> {
        scan(svg)
            .detected
            .as_slice()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_appearance_order_and_dedup() {
        let svg = r##"<svg>
            <rect fill="#00ff00"/>
            <circle fill="red" stroke="#FF0000"/>
            <path stroke="rgb(0, 255, 0)" style="fill: blue"/>
        </svg>"##;
        assert_eq!(detected_hex(svg), ["#00FF00", "#FF0000", "#0000FF"]);
    }

    #[test]
    fn test_non_colors_excluded() {
        let svg = r##"<svg>
            <rect fill="none" stroke="transparent"/>
            <rect fill="url(#g)" stroke="currentColor"/>
            <rect style="fill:inherit"/>
        </svg>"##;
        assert!(scan(svg).detected.is_empty());
    }

    #[test]
    fn test_gradient_stops_detected() {
        let svg = r##"<svg>
            <defs>
                <linearGradient id="grad1">
                    <stop offset="0" style="stop-color:#FF0000;stop-opacity:1"/>
                    <stop offset="1" stop-color="#0000ff"/>
                </linearGradient>
            </defs>
            <rect fill="url(#grad1)"/>
        </svg>"##;
        assert_eq!(detected_hex(svg), ["#FF0000", "#0000FF"]);
    }

    #[test]
    fn test_unsupported_values_reported() {
        let result = scan(r##"<svg><rect fill="#F00" stroke="hsl(0,100%,50%)"/></svg>"##);
        assert!(result.detected.is_empty());
        assert_eq!(result.unsupported, ["#F00", "hsl(0,100%,50%)"]);
    }

    #[test]
    fn test_short_hex_when_enabled() {
        let doc = SvgDocument::parse(r##"<svg><rect fill="#F00"/></svg>"##).unwrap();
        let result = detect_colors(doc.root(), ParseOptions::extended());
        assert_eq!(result.detected.as_slice(), [Color::new(255, 0, 0)]);
    }

    #[test]
    fn test_root_attributes_inspected() {
        assert_eq!(detected_hex(r#"<svg fill="navy"><g/></svg>"#), ["#000080"]);
    }

    #[test]
    fn test_escaped_attribute_value() {
        assert_eq!(
            detected_hex(r#"<svg><rect fill="&#x23;abcdef"/></svg>"#),
            ["#ABCDEF"]
        );
    }

    #[test]
    fn test_escaped_style_declaration() {
        let result = scan(r#"<svg><rect style="fill:&#x23;FF0000;opacity:0.5"/></svg>"#);
        assert_eq!(result.detected.as_slice(), [Color::new(255, 0, 0)]);
        assert!(result.unsupported.is_empty());
    }

    #[test]
    fn test_is_color_bearing() {
        let doc = SvgDocument::parse(r#"<svg><g opacity="0.5"/><g style="x:y"/></svg>"#).unwrap();
        let flags: Vec<bool> = doc
            .root()
            .children
            .iter()
            .filter_map(|n| match n {
                crate::document::Node::Element(el) => Some(is_color_bearing(el)),
                _ => None,
            })
            .collect();
        assert_eq!(flags, [false, true]);
    }
}
