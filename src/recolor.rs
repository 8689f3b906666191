//! Recoloring entry points
//!
//! Two shapes of the same pipeline:
//! - [`parse`] returns an immutable [`ParsedSvg`] that can be recolored any
//!   number of times and shared freely between threads.
//! - [`SvgRecolorer`] keeps the last parse and its diagnostics, reporting
//!   failures as a boolean plus [`SvgRecolorer::errors`] instead of `Err`.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::document::SvgDocument;
use crate::error::{RecolorError, Result};
use crate::extract::{detect_colors, DetectedColors};
use crate::palette::{ColorMapping, Palette};
use crate::rewrite::rewrite_colors;

/// Options controlling color normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Also accept 3-digit `#RGB` shorthand.
    pub short_hex: bool,
}

impl ParseOptions {
    /// `#RRGGBB`, `rgb()` and the named-color table only.
    pub const fn strict() -> Self {
        Self { short_hex: false }
    }

    /// Strict formats plus `#RGB` shorthand.
    pub const fn extended() -> Self {
        Self { short_hex: true }
    }
}

/// A successfully parsed SVG document with its detected colors.
#[derive(Clone, Debug)]
pub struct ParsedSvg {
    document: SvgDocument,
    detected: DetectedColors,
    warnings: Vec<String>,
    options: ParseOptions,
}

/// Parse SVG text with the default options.
pub fn parse(text: &str) -> Result<ParsedSvg> {
    parse_with_options(text, ParseOptions::default())
}

/// Parse SVG text and detect its colors.
pub fn parse_with_options(text: &str, options: ParseOptions) -> Result<ParsedSvg> {
    let document = SvgDocument::parse(text)?;
    let scan = detect_colors(document.root(), options);

    let warnings = scan
        .unsupported
        .iter()
        .map(|value| format!("Unsupported color value '{value}' left unchanged"))
        .collect();

    tracing::debug!(
        elements = document.root().element_count(),
        colors = scan.detected.len(),
        unsupported = scan.unsupported.len(),
        "parsed svg"
    );

    Ok(ParsedSvg {
        document,
        detected: scan.detected,
        warnings,
        options,
    })
}

impl ParsedSvg {
    /// Distinct canonical colors in order of first appearance.
    pub fn detected_colors(&self) -> &[Color] {
        self.detected.as_slice()
    }

    /// Non-fatal diagnostics gathered while parsing.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn document(&self) -> &SvgDocument {
        &self.document
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Mapping from each detected color to its palette target.
    pub fn mapping(&self, palette: &Palette) -> ColorMapping {
        ColorMapping::build(self.detected.as_slice(), palette)
    }

    /// Recolor a copy of the document and serialize it.
    ///
    /// The parsed tree itself is never modified.
    pub fn replace_colors(&self, palette: &Palette) -> String {
        let mapping = self.mapping(palette);
        let mut copy = self.document.clone();
        rewrite_colors(copy.root_mut(), &mapping, self.options);
        copy.to_xml()
    }
}

/// Stateful recolorer holding the most recent parse.
///
/// Every call to [`SvgRecolorer::parse`] starts from a clean state.
#[derive(Clone, Debug, Default)]
pub struct SvgRecolorer {
    options: ParseOptions,
    parsed: Option<ParsedSvg>,
    errors: Vec<String>,
}

impl SvgRecolorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Parse `text`, replacing any previous document.
    ///
    /// Returns `false` on failure; the reason is available from
    /// [`SvgRecolorer::errors`].
    pub fn parse(&mut self, text: &str) -> bool {
        self.reset();
        match parse_with_options(text, self.options) {
            Ok(parsed) => {
                self.parsed = Some(parsed);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "svg parse failed");
                self.errors.push(e.to_string());
                false
            }
        }
    }

    /// Clear the document, diagnostics and detected colors.
    pub fn reset(&mut self) {
        self.parsed = None;
        self.errors.clear();
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    /// Colors detected by the last successful parse; empty otherwise.
    pub fn detect_colors(&self) -> &[Color] {
        self.parsed
            .as_ref()
            .map(ParsedSvg::detected_colors)
            .unwrap_or_default()
    }

    /// Recolored SVG text, or an empty string when nothing is parsed.
    pub fn replace_colors(&self, palette: &Palette) -> String {
        self.try_replace_colors(palette).unwrap_or_default()
    }

    /// Like [`SvgRecolorer::replace_colors`] but reports a missing parse.
    pub fn try_replace_colors(&self, palette: &Palette) -> Result<String> {
        match &self.parsed {
            Some(parsed) => Ok(parsed.replace_colors(palette)),
            None => {
                tracing::warn!("replace_colors called without a parsed document");
                Err(RecolorError::NotParsed)
            }
        }
    }

    /// Errors recorded by the last parse, in order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Non-fatal diagnostics from the last successful parse.
    pub fn warnings(&self) -> &[String] {
        self.parsed
            .as_ref()
            .map(ParsedSvg::warnings)
            .unwrap_or_default()
    }

    pub fn parsed(&self) -> Option<&ParsedSvg> {
        self.parsed.as_ref()
    }
}

/// Outcome of [`process_svg`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Colors detected in the source document.
    pub detected: Vec<Color>,
}

/// Parse, detect and recolor in one call.
pub fn process_svg(text: &str, palette: &Palette) -> ProcessResult {
    process_svg_with_options(text, palette, ParseOptions::default())
}

pub fn process_svg_with_options(
    text: &str,
    palette: &Palette,
    options: ParseOptions,
) -> ProcessResult {
    match parse_with_options(text, options) {
        Ok(parsed) => ProcessResult {
            success: true,
            svg: Some(parsed.replace_colors(palette)),
            errors: Vec::new(),
            warnings: parsed.warnings().to_vec(),
            detected: parsed.detected_colors().to_vec(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "svg processing failed");
            ProcessResult {
                success: false,
                errors: vec![e.to_string()],
                ..ProcessResult::default()
            }
        }
    }
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

    const LOGO: &str = r##"<svg viewBox="0 0 10 10"><rect fill="#000000"/><rect fill="white"/></svg>"##;

    fn palette() -> Palette {
        Palette::from_hex("#FF0000", "#00FF00", "#0000FF", "#FFFFFF").unwrap()
    }

    #[test]
    fn test_recolorer_state_machine() {
        let mut r = SvgRecolorer::new();
        assert!(!r.is_parsed());
        assert_eq!(r.replace_colors(&palette()), "");
        assert!(matches!(
            r.try_replace_colors(&palette()),
            Err(RecolorError::NotParsed)
        ));

        assert!(r.parse(LOGO));
        assert_eq!(r.detect_colors().len(), 2);
        assert!(r.errors().is_empty());

        assert!(!r.parse("<html/>"));
        assert!(r.detect_colors().is_empty());
        assert_eq!(r.errors().len(), 1);
        assert_eq!(r.replace_colors(&palette()), "");

        r.reset();
        assert!(r.errors().is_empty());
        assert!(!r.is_parsed());
    }

    #[test]
    fn test_parse_clears_previous_errors() {
        let mut r = SvgRecolorer::new();
        assert!(!r.parse("nope"));
        assert!(r.parse(LOGO));
        assert!(r.errors().is_empty());
    }

    #[test]
    fn test_replace_does_not_mutate_parse() {
        let parsed = parse(LOGO).unwrap();
        let before = parsed.document().to_xml();
        let _ = parsed.replace_colors(&palette());
        assert_eq!(parsed.document().to_xml(), before);
        assert_eq!(parsed.detected_colors().len(), 2);
    }

    #[test]
    fn test_process_svg_success() {
        let result = process_svg(LOGO, &palette());
        assert!(result.success);
        assert!(result.errors.is_empty());
        // black -> darkest (#0000FF), white -> lightest (#FFFFFF)
        assert_eq!(
            result.svg.as_deref(),
            Some(r##"<svg viewBox="0 0 10 10"><rect fill="#0000FF"/><rect fill="#FFFFFF"/></svg>"##)
        );
    }

    #[test]
    fn test_process_svg_failure() {
        let result = process_svg("<svg>", &palette());
        assert!(!result.success);
        assert!(result.svg.is_none());
        assert!(!result.errors[0].is_empty());
    }

    #[test]
    fn test_process_result_json_shape() {
        let json = serde_json::to_value(process_svg("<p/>", &palette())).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("svg").is_none());
        assert!(json["errors"][0].as_str().unwrap().contains("<p>"));
    }

    #[test]
    fn test_warnings_for_unsupported_values() {
        let parsed = parse(r##"<svg><rect fill="#abc"/></svg>"##).unwrap();
        assert_eq!(parsed.warnings().len(), 1);
        assert!(parse_with_options(r##"<svg><rect fill="#abc"/></svg>"##, ParseOptions::extended())
            .unwrap()
            .warnings()
            .is_empty());
    }

    #[test]
    fn test_recolorer_with_extended_options() {
        let svg = r##"<svg><rect fill="#F00"/></svg>"##;

        let mut strict = SvgRecolorer::with_options(ParseOptions::strict());
        assert!(strict.parse(svg));
        assert!(strict.detect_colors().is_empty());
        assert_eq!(strict.warnings().len(), 1);

        let mut extended = SvgRecolorer::with_options(ParseOptions::extended());
        assert!(extended.parse(svg));
        assert_eq!(extended.detect_colors(), [Color::new(255, 0, 0)]);
        assert!(extended.warnings().is_empty());
        assert_eq!(
            extended.parsed().map(ParsedSvg::options),
            Some(ParseOptions::extended())
        );
        // short hex is rewritten too
        assert_eq!(
            extended.replace_colors(&palette()),
            r##"<svg><rect fill="#0000FF"/></svg>"##
        );
    }

    #[test]
    fn test_default_options_are_strict() {
        assert_eq!(ParseOptions::default(), ParseOptions::strict());
        assert_eq!(parse("<svg/>").unwrap().options(), ParseOptions::strict());
    }
}
