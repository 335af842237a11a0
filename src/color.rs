use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

// ---------------------------------------------------------------------------
// Color mapping: series label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of one series family (regions, categories, ...) to colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            mapping: BTreeMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl ColorMap {
    /// Assign colours in the order labels are given.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = Vec::new();
        for label in labels {
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        let count = unique.len();
        let mapping: BTreeMap<String, Color32> = unique
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label.to_string(), hue_step(i, count)))
            .collect();

        ColorMap {
            mapping,
            ..Self::default()
        }
    }

    /// Look up the colour for a label; unseen labels get the default grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Colour `index` of `count`, hues spread evenly around the wheel starting at
/// a blue so a single series is not drawn in red.
fn hue_step(index: usize, count: usize) -> Color32 {
    let hue = (210.0 + 360.0 * index as f32 / count.max(1) as f32) % 360.0;
    let rgb: Srgb<u8> = Srgb::from_color(Hsl::new(hue, 0.65, 0.5)).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_labels_get_distinct_colours() {
        let map = ColorMap::new(["Northeast", "South", "West", "Midwest"]);
        let colours: Vec<Color32> = ["Northeast", "South", "West", "Midwest"]
            .iter()
            .map(|l| map.color_for(l))
            .collect();
        for (i, a) in colours.iter().enumerate() {
            assert!(colours[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn labels_keep_their_colour() {
        let map = ColorMap::new(["West", "South", "West"]);
        assert_ne!(map.color_for("West"), map.color_for("South"));
        assert_eq!(map.color_for("West"), hue_step(0, 2));
        assert_eq!(map.color_for("Midwest"), Color32::GRAY);
    }

    #[test]
    fn first_colour_is_blue() {
        let c = hue_step(0, 1);
        assert!(c.b() > c.r() && c.b() > c.g());
    }
}
