use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::filter::EMPTY_MARKER;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of one categorical column (e.g. the drive mode)
/// to distinct text colours. Blank cells stay uncoloured.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: usize,
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map for column `column` from its distinct values.
    pub fn new(column: usize, distinct: &[String]) -> Self {
        let values: Vec<&String> = distinct.iter().filter(|v| *v != EMPTY_MARKER).collect();
        let mapping = values
            .iter()
            .zip(generate_palette(values.len()))
            .map(|(v, c)| ((*v).clone(), c))
            .collect();
        ColorMap { column, mapping }
    }

    /// Colour for a cell value, `None` for blanks and unknown values.
    pub fn color_for(&self, value: &str) -> Option<Color32> {
        self.mapping.get(value).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn empty_marker_gets_no_colour() {
        let distinct = vec!["AUTO".to_string(), "MANUAL".to_string(), EMPTY_MARKER.to_string()];
        let map = ColorMap::new(3, &distinct);
        assert!(map.color_for("AUTO").is_some());
        assert_ne!(map.color_for("AUTO"), map.color_for("MANUAL"));
        assert_eq!(map.color_for(""), None);
        assert_eq!(map.color_for(EMPTY_MARKER), None);
    }
}
