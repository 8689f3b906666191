//! Color token normalization tests
//!
//! Every supported encoding of a color must reduce to the same canonical
//! `#RRGGBB` value; keywords, references and unsupported formats must not
//! reach the detected set.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{hex, SvgBuilder};
use svg_recolor::color::{classify_token, ColorToken, NAMED_COLORS};
use svg_recolor::{normalize_color, parse, parse_with_options, ParseOptions};
use test_case::test_case;

#[test_case("red" ; "css name")]
#[test_case("Red" ; "css name mixed case")]
#[test_case("#FF0000" ; "uppercase hex")]
#[test_case("#ff0000" ; "lowercase hex")]
#[test_case("rgb(255,0,0)" ; "rgb function")]
#[test_case("rgb( 255 , 0 , 0 )" ; "rgb function with spaces")]
#[test_case("  #Ff0000\t" ; "surrounding whitespace")]
fn test_red_normalizes_to_canonical(token: &str) {
    assert_eq!(normalize_color(token).map(|c| c.to_string()).as_deref(), Some("#FF0000"));
}

#[test_case("none", ColorToken::Keyword ; "none")]
#[test_case("transparent", ColorToken::Keyword ; "transparent")]
#[test_case("INHERIT", ColorToken::Keyword ; "inherit uppercase")]
#[test_case("currentColor", ColorToken::Keyword ; "current color")]
#[test_case("url(#grad1)", ColorToken::Reference ; "gradient reference")]
#[test_case("#F00", ColorToken::Unsupported ; "short hex")]
#[test_case("hsl(0, 100%, 50%)", ColorToken::Unsupported ; "hsl")]
#[test_case("rgba(255,0,0,0.5)", ColorToken::Unsupported ; "rgba")]
#[test_case("goldenrod", ColorToken::Unsupported ; "name outside table")]
#[test_case("#FF00001", ColorToken::Unsupported ; "seven digit hex")]
fn test_non_color_tokens(token: &str, expected: ColorToken) {
    assert_eq!(classify_token(token, ParseOptions::default()), expected);
}

#[test]
fn test_every_named_color_is_canonical() {
    for (name, value) in NAMED_COLORS {
        let color = normalize_color(name).unwrap();
        assert_eq!(color.to_string(), value, "Failed for name: {name}");
        assert_eq!(normalize_color(&name.to_uppercase()), Some(color));
    }
}

#[test]
fn test_equivalent_encodings_collapse_in_detected_set() {
    let svg = SvgBuilder::new()
        .fills(&["red", "#FF0000", "#ff0000", "rgb(255,0,0)"])
        .build();
    assert_eq!(parse(&svg).unwrap().detected_colors(), [hex("#FF0000")]);
}

#[test]
fn test_non_colors_contribute_nothing() {
    let svg = SvgBuilder::new()
        .rect(&[("fill", "none")])
        .rect(&[("stroke", "transparent")])
        .rect(&[("fill", "url(#g)")])
        .path(&[("style", "fill:currentColor;stroke:inherit")])
        .build();
    assert!(parse(&svg).unwrap().detected_colors().is_empty());
}

#[test]
fn test_style_declarations_detected() {
    let svg = SvgBuilder::new()
        .path(&[("style", "FILL : teal;stroke-width:2;Stroke:rgb(0,0,128)")])
        .build();
    assert_eq!(
        parse(&svg).unwrap().detected_colors(),
        [hex("#008080"), hex("#000080")]
    );
}

#[test]
fn test_short_hex_option() {
    let svg = SvgBuilder::new().fills(&["#f00", "#FF0000"]).build();

    let strict = parse(&svg).unwrap();
    assert_eq!(strict.detected_colors(), [hex("#FF0000")]);
    assert_eq!(strict.warnings().len(), 1);

    let extended = parse_with_options(&svg, ParseOptions::extended()).unwrap();
    assert_eq!(extended.detected_colors(), [hex("#FF0000")]);
    assert!(extended.warnings().is_empty());

    // rewriting follows the same normalization as detection
    let palette = common::ocean_palette();
    let out = extended.replace_colors(&palette);
    assert_eq!(common::attr_values(&out, "rect", "fill"), ["#05668D", "#05668D"]);
    let out = strict.replace_colors(&palette);
    assert_eq!(common::attr_values(&out, "rect", "fill"), ["#f00", "#05668D"]);
}
