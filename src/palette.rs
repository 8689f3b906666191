//! Target palettes and luminance-rank color mapping
//!
//! A palette has four named slots. Mapping ignores the slot names and
//! orders both the palette and the detected colors from darkest to
//! lightest, then spreads the detected colors across the four targets.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::color::{normalize_color, Color};
use crate::error::{RecolorError, Result};

/// Number of palette slots.
pub const PALETTE_SIZE: usize = 4;

/// Four target colors under named slots.
///
/// No brightness ordering is assumed between the slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub neutral: Color,
}

impl Palette {
    pub const fn new(primary: Color, secondary: Color, accent: Color, neutral: Color) -> Self {
        Self {
            primary,
            secondary,
            accent,
            neutral,
        }
    }

    /// Build a palette from color strings, one per slot.
    ///
    /// Each string may use any format the normalizer accepts.
    pub fn from_hex(primary: &str, secondary: &str, accent: &str, neutral: &str) -> Result<Self> {
        let slot = |name: &str, value: &str| {
            normalize_color(value).ok_or_else(|| {
                RecolorError::InvalidPalette(format!("{name} '{value}' is not a color"))
            })
        };
        Ok(Self {
            primary: slot("primary", primary)?,
            secondary: slot("secondary", secondary)?,
            accent: slot("accent", accent)?,
            neutral: slot("neutral", neutral)?,
        })
    }

    /// Parse a palette from a JSON object with the four slot keys.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RecolorError::InvalidPalette(e.to_string()))
    }

    /// Slot colors in declaration order.
    pub const fn colors(&self) -> [Color; PALETTE_SIZE] {
        [self.primary, self.secondary, self.accent, self.neutral]
    }

    /// Slot colors ordered darkest to lightest. Equal luminance keeps slot order.
    pub fn by_luminance(&self) -> [Color; PALETTE_SIZE] {
        let mut colors = self.colors();
        colors.sort_by(compare_luminance);
        colors
    }
}

fn compare_luminance(a: &Color, b: &Color) -> Ordering {
    a.luminance().total_cmp(&b.luminance())
}

/// Palette index for the `i`-th darkest of `n` detected colors.
///
/// Interior colors are placed at `round(i * 3 / (n - 1))`, rounding halves
/// away from zero. Integer form of that expression: `(6i + (n-1)) / 2(n-1)`.
pub fn palette_index(i: usize, n: usize) -> usize {
    let last = PALETTE_SIZE - 1;
    if n <= 1 || i == 0 {
        return 0;
    }
    if i >= n - 1 {
        return last;
    }
    let span = n - 1;
    ((2 * last * i + span) / (2 * span)).min(last)
}

/// Mapping from each detected color to its palette target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorMapping {
    /// (source, target) in detection order.
    entries: Vec<(Color, Color)>,
}

impl ColorMapping {
    /// Build the mapping for `detected` (in appearance order) onto `palette`.
    pub fn build(detected: &[Color], palette: &Palette) -> Self {
        let targets = palette.by_luminance();

        // sort_by is stable: ties keep appearance order
        let mut ranked: Vec<(usize, Color)> = detected.iter().copied().enumerate().collect();
        ranked.sort_by(|(_, a), (_, b)| compare_luminance(a, b));

        let n = ranked.len();
        let mut assigned: Vec<Option<Color>> = vec![None; n];
        for (rank, (original, color)) in ranked.into_iter().enumerate() {
            let target = targets
                .get(palette_index(rank, n))
                .copied()
                .unwrap_or(palette.primary);
            tracing::trace!(source = %color, target = %target, rank, "mapped color");
            if let Some(slot) = assigned.get_mut(original) {
                *slot = Some(target);
            }
        }

        let entries: Vec<(Color, Color)> = detected
            .iter()
            .zip(assigned)
            .filter_map(|(src, dst)| dst.map(|d| (*src, d)))
            .collect();

        tracing::debug!(colors = entries.len(), "built color mapping");
        Self { entries }
    }

    pub fn get(&self, source: &Color) -> Option<Color> {
        self.entries
            .iter()
            .find(|(src, _)| src == source)
            .map(|(_, dst)| *dst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Color, Color)> {
        self.entries.iter()
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

    fn hex(s: &str) -> Color {
        Color::parse_hex(s).unwrap()
    }

    fn sample_palette() -> Palette {
        // deliberately not in brightness order
        Palette::from_hex("#3366CC", "#FFFFFF", "#FFCC00", "#111111").unwrap()
    }

    #[test]
    fn test_by_luminance_ignores_slot_names() {
        let ordered = sample_palette().by_luminance();
        assert_eq!(
            ordered,
            [hex("#111111"), hex("#3366CC"), hex("#FFCC00"), hex("#FFFFFF")]
        );
    }

    #[test]
    fn test_palette_index_endpoints() {
        assert_eq!(palette_index(0, 1), 0);
        assert_eq!(palette_index(0, 2), 0);
        assert_eq!(palette_index(1, 2), 3);
        assert_eq!(palette_index(9, 10), 3);
    }

    #[test]
    fn test_palette_index_rounds_half_away_from_zero() {
        // n = 3: 1 * 3 / 2 = 1.5 -> 2
        assert_eq!(palette_index(1, 3), 2);
        // n = 5: 0.75 -> 1, 1.5 -> 2, 2.25 -> 2
        assert_eq!(palette_index(1, 5), 1);
        assert_eq!(palette_index(2, 5), 2);
        assert_eq!(palette_index(3, 5), 2);
        // n = 7: 0.5 -> 1, 1.0 -> 1, 1.5 -> 2, 2.0 -> 2, 2.5 -> 3
        let got: Vec<usize> = (0..7).map(|i| palette_index(i, 7)).collect();
        assert_eq!(got, [0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_palette_index_matches_float_formula() {
        for n in 3..40usize {
            for i in 1..n - 1 {
                #[allow(clippy::cast_precision_loss)]
                let expected = (i as f64 * 3.0 / (n - 1) as f64).round();
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let expected = expected as usize;
                assert_eq!(palette_index(i, n), expected.min(3), "i={i} n={n}");
            }
        }
    }

    #[test]
    fn test_single_color_maps_to_darkest() {
        let mapping = ColorMapping::build(&[hex("#FF0000")], &sample_palette());
        assert_eq!(mapping.get(&hex("#FF0000")), Some(hex("#111111")));
    }

    #[test]
    fn test_mapping_preserves_extremes() {
        let detected = [hex("#808080"), hex("#FFFFFF"), hex("#000000"), hex("#FF0000")];
        let mapping = ColorMapping::build(&detected, &sample_palette());
        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.get(&hex("#000000")), Some(hex("#111111")));
        assert_eq!(mapping.get(&hex("#FFFFFF")), Some(hex("#FFFFFF")));
    }

    #[test]
    fn test_mapping_keeps_detection_order() {
        let detected = [hex("#FFFFFF"), hex("#000000")];
        let mapping = ColorMapping::build(&detected, &sample_palette());
        let sources: Vec<Color> = mapping.iter().map(|(s, _)| *s).collect();
        assert_eq!(sources, detected);
    }

    #[test]
    fn test_three_colors_middle_rounds_up() {
        let detected = [hex("#FFFFFF"), hex("#808080"), hex("#000000")];
        let mapping = ColorMapping::build(&detected, &sample_palette());
        assert_eq!(mapping.get(&hex("#000000")), Some(hex("#111111")));
        assert_eq!(mapping.get(&hex("#808080")), Some(hex("#FFCC00")));
        assert_eq!(mapping.get(&hex("#FFFFFF")), Some(hex("#FFFFFF")));
    }

    #[test]
    fn test_equal_palette_slots_keep_slot_order() {
        let p = Palette::from_hex("#000000", "#000000", "#FFFFFF", "#FFFFFF").unwrap();
        assert_eq!(
            p.by_luminance(),
            [hex("#000000"), hex("#000000"), hex("#FFFFFF"), hex("#FFFFFF")]
        );
    }

    #[test]
    fn test_unseen_color_not_mapped() {
        let mapping = ColorMapping::build(&[hex("#FF0000")], &sample_palette());
        assert_eq!(mapping.get(&hex("#00FF00")), None);
        assert!(ColorMapping::build(&[], &sample_palette()).is_empty());
    }

    #[test]
    fn test_invalid_palette_slot() {
        let err = Palette::from_hex("#000000", "hsl(1,2%,3%)", "#FFFFFF", "#FFFFFF").unwrap_err();
        assert!(err.to_string().contains("secondary"));
    }

    #[test]
    fn test_palette_from_json() {
        let p = Palette::from_json(
            r##"{"primary":"#3366CC","secondary":"white","accent":"#ffcc00","neutral":"rgb(17,17,17)"}"##,
        )
        .unwrap();
        assert_eq!(p, sample_palette());
        assert!(Palette::from_json(r##"{"primary":"#000000"}"##).is_err());
    }

    #[test]
    fn test_palette_new_matches_from_hex() {
        let p = Palette::new(
            Color::new(0x33, 0x66, 0xCC),
            Color::new(0xFF, 0xFF, 0xFF),
            Color::new(0xFF, 0xCC, 0x00),
            Color::new(0x11, 0x11, 0x11),
        );
        assert_eq!(p, sample_palette());
        assert_eq!(p.by_luminance()[0], hex("#111111"));
    }
}
