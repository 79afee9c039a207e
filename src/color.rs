use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// ColorBrewer "Set1": distinct qualitative colours for small group counts.
pub const SET1: [Color32; 9] = [
    Color32::from_rgb(228, 26, 28),
    Color32::from_rgb(55, 126, 184),
    Color32::from_rgb(77, 175, 74),
    Color32::from_rgb(152, 78, 163),
    Color32::from_rgb(255, 127, 0),
    Color32::from_rgb(255, 255, 51),
    Color32::from_rgb(166, 86, 40),
    Color32::from_rgb(247, 129, 191),
    Color32::from_rgb(153, 153, 153),
];

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Set1 when it has enough entries, evenly spaced hues otherwise.
pub fn qualitative_palette(n: usize) -> Vec<Color32> {
    if n <= SET1.len() {
        SET1[..n].to_vec()
    } else {
        generate_palette(n)
    }
}

// ---------------------------------------------------------------------------
// Color mapping: group value → Color32
// ---------------------------------------------------------------------------

/// Maps the groups of a chart's colour dimension to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map; colours are assigned in the order of `groups`.
    pub fn new(groups: &[String]) -> Self {
        let palette = qualitative_palette(groups.len());
        let mapping: BTreeMap<String, Color32> = groups
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a group; missing groups are grey.
    pub fn color_for(&self, group: Option<&str>) -> Color32 {
        group
            .and_then(|g| self.mapping.get(g))
            .copied()
            .unwrap_or(self.default_color)
    }
}
