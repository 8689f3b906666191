//! Inline `style` attribute scanning
//!
//! Only the paint properties are located; the rest of the declaration text
//! is never interpreted, so rewriting a value leaves everything around it
//! byte-identical.

use std::ops::Range;

/// Style properties that carry a color.
pub const COLOR_PROPERTIES: [&str; 3] = ["fill", "stroke", "stop-color"];

/// A color-bearing declaration inside a style string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Byte span of the property name, as written.
    pub property: Range<usize>,
    /// Byte span of the value, surrounding whitespace excluded.
    pub value: Range<usize>,
}

impl Declaration {
    pub fn property<'a>(&self, style: &'a str) -> &'a str {
        style.get(self.property.clone()).unwrap_or("")
    }

    pub fn value<'a>(&self, style: &'a str) -> &'a str {
        style.get(self.value.clone()).unwrap_or("")
    }
}

/// Find the `fill`, `stroke` and `stop-color` declarations in a style string.
///
/// Property names match case-insensitively and whitespace around `:` is
/// tolerated. Semicolons nested in parentheses (e.g. data URIs) do not split
/// declarations.
pub fn color_declarations(style: &str) -> Vec<Declaration> {
    declaration_spans(style)
        .into_iter()
        .filter_map(|span| parse_declaration(style, span))
        .collect()
}

/// Replace the value of each color declaration for which `map` returns a
/// replacement. Returns the new style string and the number of replacements.
pub fn rewrite_declarations<F>(style: &str, mut map: F) -> (String, usize)
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(style.len());
    let mut cursor = 0;
    let mut replaced = 0;

    for decl in color_declarations(style) {
        let Some(new_value) = map(decl.value(style)) else {
            continue;
        };
        out.push_str(style.get(cursor..decl.value.start).unwrap_or(""));
        out.push_str(&new_value);
        cursor = decl.value.end;
        replaced += 1;
    }
    out.push_str(style.get(cursor..).unwrap_or(""));

    (out, replaced)
}

/// Split a style string into `;`-separated declaration spans.
///
/// The string is still XML-escaped, so the `;` closing an `&name;` or
/// `&#...;` reference belongs to the value and never ends a declaration.
fn declaration_spans(style: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut in_reference = false;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        if in_reference {
            if c == ';' || !(c.is_ascii_alphanumeric() || c == '#') {
                in_reference = false;
            }
            if c == ';' {
                continue;
            }
        }
        match c {
            '&' => in_reference = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                spans.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }
    spans.push(start..style.len());
    spans
}

fn parse_declaration(style: &str, span: Range<usize>) -> Option<Declaration> {
    let text = style.get(span.clone())?;
    let colon = text.find(':')?;

    let name_part = text.get(..colon)?;
    let name = name_part.trim();
    if !COLOR_PROPERTIES
        .iter()
        .any(|p| name.eq_ignore_ascii_case(p))
    {
        return None;
    }
    let name_start = span.start + (name_part.len() - name_part.trim_start().len());

    let value_part = text.get(colon + 1..)?;
    let value = value_part.trim();
    if value.is_empty() {
        return None;
    }
    let value_start = span.start + colon + 1 + (value_part.len() - value_part.trim_start().len());

    Some(Declaration {
        property: name_start..name_start + name.len(),
        value: value_start..value_start + value.len(),
    })
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
    fn test_finds_paint_declarations() {
        let style = "fill:#FF0000; stroke : blue;opacity:0.5;STOP-COLOR:rgb(0, 0, 0)";
        let decls = color_declarations(style);
        let found: Vec<(&str, &str)> = decls
            .iter()
            .map(|d| (d.property(style), d.value(style)))
            .collect();
        assert_eq!(
            found,
            [
                ("fill", "#FF0000"),
                ("stroke", "blue"),
                ("STOP-COLOR", "rgb(0, 0, 0)")
            ]
        );
    }

    #[test]
    fn test_ignores_related_properties() {
        let style = "fill-opacity:0.5;stroke-width:2;fill-rule:evenodd";
        assert!(color_declarations(style).is_empty());
    }

    #[test]
    fn test_semicolon_inside_parentheses() {
        let style = "fill:url(data:image/png;base64,AAA);stroke:red";
        let decls = color_declarations(style);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value(style), "url(data:image/png;base64,AAA)");
        assert_eq!(decls[1].value(style), "red");
    }

    #[test]
    fn test_rewrite_preserves_surrounding_text() {
        let style = " Fill : red ;opacity:0.7; stroke:none";
        let (out, n) = rewrite_declarations(style, |v| {
            (v == "red").then(|| "#112233".to_string())
        });
        assert_eq!(out, " Fill : #112233 ;opacity:0.7; stroke:none");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_rewrite_without_matches_is_identity() {
        let style = "opacity:0.7;";
        let (out, n) = rewrite_declarations(style, |_| Some("x".to_string()));
        assert_eq!(out, style);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_character_reference_does_not_split() {
        let style = "fill:&#x23;FF0000;opacity:0.5;stroke:&#35;00FF00";
        let decls = color_declarations(style);
        let values: Vec<&str> = decls.iter().map(|d| d.value(style)).collect();
        assert_eq!(values, ["&#x23;FF0000", "&#35;00FF00"]);

        let (out, n) = rewrite_declarations(style, |v| {
            (v == "&#x23;FF0000").then(|| "#112233".to_string())
        });
        assert_eq!(out, "fill:#112233;opacity:0.5;stroke:&#35;00FF00");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_entity_reference_inside_value() {
        let style = "font-family:&quot;Sans&quot;;fill:red";
        let decls = color_declarations(style);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value(style), "red");
    }

    #[test]
    fn test_empty_value_skipped() {
        assert!(color_declarations("fill:;stroke: ").is_empty());
    }
}
