//! Common test utilities and SVG fixtures.
//!
//! Provides a small builder for assembling SVG documents plus helpers for
//! reading attribute values back out of recolored output.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use svg_recolor::document::{Element, SvgDocument};
use svg_recolor::{Color, Palette};

// ============================================================================
// Fixtures
// ============================================================================

/// The square from the recoloring property list.
pub const RED_SQUARE: &str = r##"<svg width="200" height="200" viewBox="0 0 200 200"><rect x="50" y="50" width="100" height="100" fill="#FF0000"/></svg>"##;

/// A logo with a gradient fill, a stroked outline and inline styles.
pub const GRADIENT_LOGO: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="120" height="120" viewBox="0 0 120 120">
  <defs>
    <linearGradient id="grad1" x1="0%" y1="0%" x2="100%" y2="0%">
      <stop offset="0%" style="stop-color:#FF0000;stop-opacity:1"/>
      <stop offset="100%" style="stop-color:rgb(255,255,0);stop-opacity:1"/>
    </linearGradient>
  </defs>
  <circle cx="60" cy="60" r="50" fill="url(#grad1)" stroke="navy" stroke-width="4"/>
  <text x="60" y="65" style="fill: white; font-family: sans-serif" text-anchor="middle">A</text>
</svg>"##;

/// Builder for small SVG documents.
#[derive(Default)]
pub struct SvgBuilder {
    root_attrs: Vec<(String, String)>,
    body: Vec<String>,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_attr(mut self, name: &str, value: &str) -> Self {
        self.root_attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a `<rect>` with the given attributes.
    pub fn rect(mut self, attrs: &[(&str, &str)]) -> Self {
        self.body.push(empty_element("rect", attrs));
        self
    }

    /// Add a `<path>` with the given attributes.
    pub fn path(mut self, attrs: &[(&str, &str)]) -> Self {
        self.body.push(empty_element("path", attrs));
        self
    }

    /// Add one `<rect>` per fill color.
    pub fn fills(mut self, colors: &[&str]) -> Self {
        for c in colors {
            self.body.push(empty_element("rect", &[("fill", *c)]));
        }
        self
    }

    /// Add raw markup.
    pub fn raw(mut self, markup: &str) -> Self {
        self.body.push(markup.to_string());
        self
    }

    pub fn build(self) -> String {
        let mut out = String::from("<svg");
        for (name, value) in &self.root_attrs {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        out.push('>');
        for part in &self.body {
            out.push_str(part);
        }
        out.push_str("</svg>");
        out
    }
}

fn empty_element(name: &str, attrs: &[(&str, &str)]) -> String {
    let mut out = format!("<{name}");
    for (k, v) in attrs {
        out.push_str(&format!(" {k}=\"{v}\""));
    }
    out.push_str("/>");
    out
}

// ============================================================================
// Palettes
// ============================================================================

/// Slots deliberately out of brightness order.
pub fn mixed_palette() -> Palette {
    Palette::from_hex("#3366CC", "#FAFAFA", "#FFCC00", "#101010").unwrap()
}

pub fn ocean_palette() -> Palette {
    Palette::from_hex("#05668D", "#028090", "#00A896", "#F0F3BD").unwrap()
}

pub fn hex(s: &str) -> Color {
    Color::parse_hex(s).unwrap()
}

// ============================================================================
// Output inspection
// ============================================================================

/// Values of `attr` on every element named `element`, in document order.
pub fn attr_values(svg: &str, element: &str, attr: &str) -> Vec<String> {
    let doc = SvgDocument::parse(svg).expect("output should parse");
    let mut values = Vec::new();
    doc.root().visit(&mut |el: &Element| {
        if el.name == element {
            if let Some(a) = el.attr(attr) {
                values.push(a.value.clone());
            }
        }
    });
    values
}
