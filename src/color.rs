use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Country;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 160.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.45, 0.6);
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
// Color mapping: country → Color32
// ---------------------------------------------------------------------------

/// One fixed colour per country, shared by the box plot, bar chart and
/// country checkboxes.
#[derive(Debug, Clone)]
pub struct CountryColors {
    mapping: Vec<Color32>,
}

impl Default for CountryColors {
    fn default() -> Self {
        CountryColors {
            mapping: generate_palette(Country::ALL.len()),
        }
    }
}

impl CountryColors {
    pub fn color_for(&self, country: Country) -> Color32 {
        self.mapping
            .get(country.index())
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let colours = generate_palette(3);
        assert_eq!(colours.len(), 3);
        assert_ne!(colours[0], colours[1]);
        assert_ne!(colours[1], colours[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn every_country_has_a_colour() {
        let colours = CountryColors::default();
        for country in Country::ALL {
            assert_ne!(colours.color_for(country), Color32::GRAY);
        }
        assert_ne!(
            colours.color_for(Country::Benin),
            colours.color_for(Country::Togo)
        );
    }
}
