//! Structured error types for svg-recolor.
//!
//! Parse-time failures are surfaced as diagnostics by the stateful facade,
//! and as `Err` values by the free-function API.

/// All errors that can occur while parsing or recoloring an SVG document.
#[derive(Debug, thiserror::Error)]
pub enum RecolorError {
    /// XML tokenizer error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute (duplicate key, missing quotes, ...).
    #[error("XML attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Structural problem the tokenizer tolerates but a document tree cannot.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Well-formed XML whose root element is not `svg`.
    #[error("Invalid root element: expected <svg>, found <{0}>")]
    InvalidRootElement(String),

    /// Replacement requested without a successfully parsed document.
    #[error("No SVG document has been parsed")]
    NotParsed,

    /// A palette slot that is not a recognizable color.
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecolorError>;

#[cfg(target_arch = "wasm32")]
impl From<RecolorError> for wasm_bindgen::JsValue {
    fn from(e: RecolorError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
