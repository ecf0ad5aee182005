use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Dashboard colour scheme
// ---------------------------------------------------------------------------

/// Main series colour: lines, histogram, bar charts.
pub const PRIMARY_BLUE: Color32 = Color32::from_rgb(0x15, 0x65, 0xC0);
pub const MEDIUM_BLUE: Color32 = Color32::from_rgb(0x64, 0xB5, 0xF6);
pub const LIGHT_BLUE: Color32 = Color32::from_rgb(0xF3, 0xF7, 0xFF);
pub const HEADER_BLUE: Color32 = Color32::from_rgb(0x1F, 0x4E, 0x79);
/// Fallback for statuses outside the known three.
pub const OTHER_BLUE: Color32 = Color32::from_rgb(0x19, 0x76, 0xD2);

const STATUS_COLORS: [(&str, Color32); 3] = [
    ("Accepted", PRIMARY_BLUE),
    ("Partially Accepted", MEDIUM_BLUE),
    ("Rejected", LIGHT_BLUE),
];

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 200.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
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
// Color mapping: claim status → Color32
// ---------------------------------------------------------------------------

/// Maps claim statuses to colours: the three known statuses use the fixed
/// blue scheme, anything else draws from a generated palette.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn for_statuses(statuses: &[String]) -> Self {
        let unknown: Vec<&String> = statuses
            .iter()
            .filter(|s| !STATUS_COLORS.iter().any(|(known, _)| known == s))
            .collect();
        let palette = generate_palette(unknown.len());

        let mut mapping: BTreeMap<String, Color32> = STATUS_COLORS
            .iter()
            .map(|(s, c)| (s.to_string(), *c))
            .collect();
        mapping.extend(unknown.into_iter().cloned().zip(palette));

        ColorMap {
            mapping,
            default_color: OTHER_BLUE,
        }
    }

    pub fn color_for(&self, status: &str) -> Color32 {
        self.mapping
            .get(status)
            .copied()
            .unwrap_or(self.default_color)
    }
}
