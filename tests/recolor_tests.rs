//! End-to-end recoloring tests
//!
//! Parse → detect → replace on complete documents, checking that only
//! color declarations change.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{attr_values, hex, mixed_palette, ocean_palette, SvgBuilder, GRADIENT_LOGO, RED_SQUARE};
use svg_recolor::{parse, process_svg, SvgRecolorer};

// =============================================================================
// Structural preservation
// =============================================================================

#[test]
fn test_red_square_only_fill_changes() {
    let parsed = parse(RED_SQUARE).unwrap();
    let out = parsed.replace_colors(&mixed_palette());

    assert!(out.contains(r#"width="200""#));
    assert!(out.contains(r#"height="200""#));
    assert!(out.contains(r#"viewBox="0 0 200 200""#));
    assert!(out.contains(r#"x="50""#));
    assert!(out.contains(r#"y="50""#));

    // single color -> darkest palette entry
    assert_eq!(attr_values(&out, "rect", "fill"), ["#101010"]);
    assert_eq!(out, RED_SQUARE.replace("#FF0000", "#101010"));
}

#[test]
fn test_opacity_attributes_byte_identical() {
    let svg = SvgBuilder::new()
        .rect(&[("fill", "#FF0000"), ("fill-opacity", "0.5"), ("opacity", "0.7")])
        .rect(&[("fill", "#0000FF")])
        .build();
    let out = parse(&svg).unwrap().replace_colors(&ocean_palette());

    assert!(out.contains(r#"fill-opacity="0.5""#));
    assert!(out.contains(r#"opacity="0.7""#));
    assert_eq!(
        attr_values(&out, "rect", "fill-opacity"),
        attr_values(&svg, "rect", "fill-opacity")
    );
}

#[test]
fn test_gradient_reference_untouched_and_stops_remapped() {
    let svg = SvgBuilder::new()
        .raw(r#"<linearGradient id="grad1"><stop style="stop-color:#FF0000"/></linearGradient>"#)
        .rect(&[("fill", "url(#grad1)")])
        .build();
    let parsed = parse(&svg).unwrap();
    assert_eq!(parsed.detected_colors(), [hex("#FF0000")]);

    let out = parsed.replace_colors(&mixed_palette());
    assert_eq!(attr_values(&out, "rect", "fill"), ["url(#grad1)"]);
    assert_eq!(attr_values(&out, "stop", "style"), ["stop-color:#101010"]);
}

#[test]
fn test_full_logo_recolor() {
    let parsed = parse(GRADIENT_LOGO).unwrap();
    // appearance order: stops, then circle stroke, then text style
    assert_eq!(
        parsed.detected_colors(),
        [hex("#FF0000"), hex("#FFFF00"), hex("#000080"), hex("#FFFFFF")]
    );

    let out = parsed.replace_colors(&ocean_palette());

    // navy is darkest, white is lightest
    assert_eq!(attr_values(&out, "circle", "stroke"), ["#05668D"]);
    assert_eq!(attr_values(&out, "circle", "fill"), ["url(#grad1)"]);
    let text_style = attr_values(&out, "text", "style");
    assert_eq!(text_style, ["fill: #F0F3BD; font-family: sans-serif"]);

    // stop-opacity declarations survive next to the rewritten stop-color
    let stops = attr_values(&out, "stop", "style");
    assert_eq!(stops.len(), 2);
    assert!(stops.iter().all(|s| s.ends_with(";stop-opacity:1")));

    // everything outside color values is preserved
    assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(out.contains(r#"x1="0%" y1="0%" x2="100%" y2="0%""#));
    assert!(out.contains(r#"stroke-width="4""#));
    assert!(out.contains(">A</text>"));
}

#[test]
fn test_untouched_document_roundtrips() {
    let svg = SvgBuilder::new()
        .root_attr("viewBox", "0 0 10 10")
        .rect(&[("fill", "none"), ("stroke", "hsl(10, 50%, 50%)")])
        .raw("<!-- note --><g><title>Logo &amp; mark</title></g>")
        .build();
    let out = parse(&svg).unwrap().replace_colors(&ocean_palette());
    assert_eq!(out, svg);
}

#[test]
fn test_escaped_style_matches_escaped_attribute() {
    let in_attr = parse(r#"<svg><rect fill="&#x23;FF0000"/></svg>"#).unwrap();
    let in_style = parse(r#"<svg><rect style="fill:&#x23;FF0000;opacity:0.5"/></svg>"#).unwrap();
    assert_eq!(in_attr.detected_colors(), [hex("#FF0000")]);
    assert_eq!(in_style.detected_colors(), in_attr.detected_colors());
    assert!(in_style.warnings().is_empty());

    let out = in_style.replace_colors(&mixed_palette());
    assert_eq!(attr_values(&out, "rect", "style"), ["fill:#101010;opacity:0.5"]);
}

// =============================================================================
// Repeatability
// =============================================================================

#[test]
fn test_two_palettes_from_one_parse() {
    let svg = SvgBuilder::new().fills(&["#000000", "#FFFFFF"]).build();
    let parsed = parse(&svg).unwrap();

    let first = parsed.replace_colors(&mixed_palette());
    let second = parsed.replace_colors(&ocean_palette());

    assert_eq!(attr_values(&first, "rect", "fill"), ["#101010", "#FAFAFA"]);
    assert_eq!(attr_values(&second, "rect", "fill"), ["#05668D", "#F0F3BD"]);

    // detection on the original is unaffected by rewriting
    assert_eq!(parsed.detected_colors(), [hex("#000000"), hex("#FFFFFF")]);
    assert_eq!(parsed.replace_colors(&mixed_palette()), first);
}

#[test]
fn test_stateful_recolorer_repeatability() {
    let mut recolorer = SvgRecolorer::new();
    assert!(recolorer.parse(RED_SQUARE));
    let a = recolorer.replace_colors(&mixed_palette());
    let b = recolorer.replace_colors(&ocean_palette());
    assert_eq!(attr_values(&a, "rect", "fill"), ["#101010"]);
    assert_eq!(attr_values(&b, "rect", "fill"), ["#05668D"]);
    assert_eq!(recolorer.detect_colors(), [hex("#FF0000")]);
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn test_malformed_input_reports_diagnostics() {
    for input in ["this is not xml", "<html><body/></html>", "<svg><g></svg>", ""] {
        let mut recolorer = SvgRecolorer::new();
        assert!(!recolorer.parse(input), "accepted: {input:?}");
        assert!(!recolorer.errors().is_empty());
        assert!(recolorer.errors().iter().all(|e| !e.is_empty()));
        assert!(recolorer.detect_colors().is_empty());
        assert_eq!(recolorer.replace_colors(&ocean_palette()), "");
    }
}

#[test]
fn test_wrong_root_message_names_element() {
    let mut recolorer = SvgRecolorer::new();
    assert!(!recolorer.parse("<div fill=\"red\"/>"));
    assert!(recolorer.errors()[0].contains("div"));
}

#[test]
fn test_process_svg_roundtrip() {
    let result = process_svg(RED_SQUARE, &ocean_palette());
    assert!(result.success);
    assert_eq!(result.detected, [hex("#FF0000")]);
    assert_eq!(
        result.svg.as_deref().map(|s| attr_values(s, "rect", "fill")),
        Some(vec!["#05668D".to_string()])
    );

    let failed = process_svg("<svg", &ocean_palette());
    assert!(!failed.success);
    assert!(failed.svg.is_none());
    assert_eq!(failed.errors.len(), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_parsed_svg_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<svg_recolor::ParsedSvg>();

    let parsed = parse(GRADIENT_LOGO).unwrap();
    let palettes = [mixed_palette(), ocean_palette()];
    let shared = &parsed;
    let outputs: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = palettes
            .iter()
            .map(|p| s.spawn(move || shared.replace_colors(p)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outputs[0], parsed.replace_colors(&palettes[0]));
    assert_eq!(outputs[1], parsed.replace_colors(&palettes[1]));
}
