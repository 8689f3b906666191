//! Color normalization and luminance
//!
//! Reduces the textual color encodings found in SVG presentation attributes
//! (hex, `rgb()`, CSS names) to a canonical `#RRGGBB` value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecolorError;
use crate::recolor::ParseOptions;

/// CSS color names recognized during normalization (lowercase key, canonical hex)
pub const NAMED_COLORS: [(&str, &str); 21] = [
    ("red", "#FF0000"),
    ("green", "#008000"),
    ("blue", "#0000FF"),
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("yellow", "#FFFF00"),
    ("cyan", "#00FFFF"),
    ("magenta", "#FF00FF"),
    ("silver", "#C0C0C0"),
    ("gray", "#808080"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
    ("lime", "#00FF00"),
    ("aqua", "#00FFFF"),
    ("teal", "#008080"),
    ("navy", "#000080"),
    ("fuchsia", "#FF00FF"),
    ("purple", "#800080"),
    ("orange", "#FFA500"),
    ("brown", "#A52A2A"),
    ("pink", "#FFC0CB"),
];

/// Keywords that are valid paint values but carry no color of their own.
const NON_COLOR_KEYWORDS: [&str; 4] = ["none", "transparent", "inherit", "currentcolor"];

// ITU-R BT.709 weights, applied to gamma-encoded channels
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// A canonical RGB color, displayed as uppercase `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a strict `#RRGGBB` hex string (any case).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Parse a `#RGB` shorthand, doubling each digit.
    fn parse_short_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 3 {
            return None;
        }
        let mut digits = hex.chars().map(|c| c.to_digit(16));
        let mut next = || -> Option<u8> {
            let d = u8::try_from(digits.next()??).ok()?;
            Some(d * 17)
        };
        Some(Self {
            r: next()?,
            g: next()?,
            b: next()?,
        })
    }

    /// Relative brightness in `[0, 1]`. Lower is darker.
    ///
    /// Uses BT.709 weights on the raw channel values without gamma
    /// linearization, so it is only meaningful for ordering.
    pub fn luminance(self) -> f64 {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        LUMA_B.mul_add(b, LUMA_R.mul_add(r, LUMA_G * g))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = RecolorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_color(s).ok_or_else(|| RecolorError::InvalidPalette(format!("'{s}' is not a color")))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Classification of a raw paint token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorToken {
    /// A concrete color.
    Color(Color),
    /// `none`, `transparent`, `inherit` or `currentColor`.
    Keyword,
    /// A `url(...)` paint server reference (gradient, pattern).
    Reference,
    /// Anything not recognized (`hsl()`, unknown names, ...).
    Unsupported,
}

impl ColorToken {
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }
}

/// Classify a raw token as found in an attribute or style declaration.
pub fn classify_token(token: &str, options: ParseOptions) -> ColorToken {
    let token = token.trim();

    if NON_COLOR_KEYWORDS
        .iter()
        .any(|k| token.eq_ignore_ascii_case(k))
    {
        return ColorToken::Keyword;
    }

    if starts_with_ignore_case(token, "url(") {
        return ColorToken::Reference;
    }

    if token.starts_with('#') {
        let parsed = Color::parse_hex(token).or_else(|| {
            if options.short_hex {
                Color::parse_short_hex(token)
            } else {
                None
            }
        });
        return parsed.map_or(ColorToken::Unsupported, ColorToken::Color);
    }

    if let Some(color) = parse_rgb_function(token) {
        return ColorToken::Color(color);
    }

    lookup_named_color(token).map_or(ColorToken::Unsupported, ColorToken::Color)
}

/// Normalize a token to its canonical color under the default options.
pub fn normalize_color(token: &str) -> Option<Color> {
    classify_token(token, ParseOptions::default()).color()
}

/// Normalize a token to its canonical color.
pub fn normalize_color_with(token: &str, options: ParseOptions) -> Option<Color> {
    classify_token(token, options).color()
}

/// Look up a CSS color name (case-insensitive).
pub fn lookup_named_color(name: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| name.eq_ignore_ascii_case(n))
        .and_then(|(_, hex)| Color::parse_hex(hex))
}

/// Parse `rgb(r, g, b)` with integer channels in `0..=255`.
fn parse_rgb_function(token: &str) -> Option<Color> {
    if !starts_with_ignore_case(token, "rgb") {
        return None;
    }
    let rest = token.get(3..)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;

    let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>().ok());
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    if channels.next().is_some() {
        return None;
    }
    Some(Color { r, g, b })
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalent_tokens_normalize_identically() {
        for token in ["red", "RED", "#FF0000", "#ff0000", "rgb(255,0,0)", " rgb( 255 , 0 , 0 ) "] {
            assert_eq!(
                normalize_color(token).map(|c| c.to_string()),
                Some("#FF0000".to_string()),
                "Failed for token: {token}"
            );
        }
    }

    #[test]
    fn test_keywords_and_references_are_not_colors() {
        let opts = ParseOptions::default();
        assert_eq!(classify_token("none", opts), ColorToken::Keyword);
        assert_eq!(classify_token("Transparent", opts), ColorToken::Keyword);
        assert_eq!(classify_token("inherit", opts), ColorToken::Keyword);
        assert_eq!(classify_token("currentColor", opts), ColorToken::Keyword);
        assert_eq!(classify_token("url(#grad1)", opts), ColorToken::Reference);
        assert_eq!(classify_token("URL(#p)", opts), ColorToken::Reference);
    }

    #[test]
    fn test_unsupported_formats_discarded() {
        assert_eq!(normalize_color("#F00"), None);
        assert_eq!(normalize_color("hsl(0, 100%, 50%)"), None);
        assert_eq!(normalize_color("rebeccapurple"), None);
        assert_eq!(normalize_color("rgb(300,0,0)"), None);
        assert_eq!(normalize_color("rgb(1,2)"), None);
        assert_eq!(normalize_color("#GG0000"), None);
        assert_eq!(normalize_color(""), None);
    }

    #[test]
    fn test_short_hex_opt_in() {
        let color = normalize_color_with("#f80", ParseOptions::extended());
        assert_eq!(color, Some(Color::new(0xFF, 0x88, 0x00)));
    }

    #[test]
    fn test_named_table_values() {
        assert_eq!(lookup_named_color("orange"), Some(Color::new(0xFF, 0xA5, 0x00)));
        assert_eq!(lookup_named_color("Navy"), Some(Color::new(0, 0, 0x80)));
        assert_eq!(lookup_named_color("aqua"), lookup_named_color("cyan"));
    }

    #[test]
    fn test_luminance_extremes() {
        assert!(Color::new(0, 0, 0).luminance().abs() < f64::EPSILON);
        assert!((Color::new(255, 255, 255).luminance() - 1.0).abs() < 1e-9);
        // green dominates the weighting
        assert!(Color::new(0, 255, 0).luminance() > Color::new(255, 0, 0).luminance());
        assert!(Color::new(255, 0, 0).luminance() > Color::new(0, 0, 255).luminance());
    }

    #[test]
    fn test_display_is_uppercase_hex() {
        assert_eq!(Color::new(0xab, 0x0c, 0xde).to_string(), "#AB0CDE");
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let json = serde_json::to_string(&Color::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str("\"teal\"").unwrap();
        assert_eq!(back, Color::new(0, 0x80, 0x80));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
