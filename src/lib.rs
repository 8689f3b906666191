//! svg-recolor - palette recoloring for SVG logos
//!
//! Detects every distinct color a document uses in `fill`, `stroke` and
//! `stop-color` declarations and maps them onto a four-color palette:
//! - Hex, `rgb()` and CSS color names normalized to `#RRGGBB`
//! - Colors and palette ranked by luminance, darkest to lightest
//! - Gradients, opacity and all other markup left untouched
//!
//! # Usage (Rust)
//!
//! ```
//! use svg_recolor::{parse, Palette};
//!
//! let svg = r##"<svg><rect fill="red"/><circle fill="#FFFFFF"/></svg>"##;
//! let parsed = parse(svg).unwrap();
//! let palette = Palette::from_hex("#1B2A41", "#324A5F", "#CCC9DC", "#FFFFFF").unwrap();
//! let recolored = parsed.replace_colors(&palette);
//! assert!(recolored.contains(r##"fill="#1B2A41""##));
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { recolor_svg } from 'svg-recolor';
//! await init();
//! const out = recolor_svg(svg, { primary: '#1B2A41', secondary: '#324A5F', accent: '#CCC9DC', neutral: '#FFFFFF' });
//! ```

pub mod color;
pub mod document;
pub mod error;
pub mod extract;
pub mod palette;
pub mod recolor;
pub mod rewrite;
pub mod style;
pub mod xml_helpers;

use wasm_bindgen::prelude::*;

pub use color::{normalize_color, Color};
pub use error::{RecolorError, Result};
pub use palette::{ColorMapping, Palette};
pub use recolor::{
    parse, parse_with_options, process_svg, ParseOptions, ParsedSvg, ProcessResult, SvgRecolorer,
};

fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn palette_from_js(palette: JsValue) -> std::result::Result<Palette, JsValue> {
    serde_wasm_bindgen::from_value(palette)
        .map_err(|e| JsValue::from_str(&format!("Invalid palette: {e}")))
}

/// Detect the colors used in an SVG document
///
/// # Returns
/// An array of `#RRGGBB` strings in order of first appearance
///
/// # Errors
/// Returns an error if the text is not an SVG document.
#[wasm_bindgen]
pub fn detect_svg_colors(svg: &str) -> std::result::Result<js_sys::Array, JsValue> {
    init_panic_hook();
    let parsed = parse(svg).map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(parsed
        .detected_colors()
        .iter()
        .map(|c| JsValue::from_str(&c.to_string()))
        .collect())
}

/// Recolor an SVG document with a `{ primary, secondary, accent, neutral }` palette
///
/// # Errors
/// Returns an error if the palette is malformed or the text is not an SVG document.
#[wasm_bindgen]
#[allow(clippy::needless_pass_by_value)]
pub fn recolor_svg(svg: &str, palette: JsValue) -> std::result::Result<String, JsValue> {
    init_panic_hook();
    let palette = palette_from_js(palette)?;
    let parsed = parse(svg).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(parsed.replace_colors(&palette))
}

/// Parse, detect and recolor, returning `{ success, svg?, errors?, warnings?, detected }`
///
/// # Errors
/// Returns an error only if the palette is malformed; document problems are
/// reported in the result object.
#[wasm_bindgen]
#[allow(clippy::needless_pass_by_value)]
pub fn process_svg_js(svg: &str, palette: JsValue) -> std::result::Result<JsValue, JsValue> {
    init_panic_hook();
    let palette = palette_from_js(palette)?;
    let result = process_svg(svg, &palette);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Same as `process_svg_js` with the palette and result as JSON strings
///
/// # Errors
/// Returns an error if the palette JSON is malformed.
#[wasm_bindgen]
pub fn process_svg_json(svg: &str, palette_json: &str) -> std::result::Result<String, JsValue> {
    init_panic_hook();
    let palette = Palette::from_json(palette_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let result = process_svg(svg, &palette);

    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
