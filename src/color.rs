use std::fmt;

use palette::{Hsl, IntoColor, Srgb};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Rgb – a plain 8-bit colour, independent of the UI toolkit
// ---------------------------------------------------------------------------

/// An sRGB colour. Deserializes from `[r, g, b]` or a basic colour name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ColorSpec")]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Channels([u8; 3]),
    Name(String),
}

impl TryFrom<ColorSpec> for Rgb {
    type Error = String;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Channels([r, g, b]) => Ok(Rgb(r, g, b)),
            ColorSpec::Name(name) => {
                Rgb::named(&name).ok_or_else(|| format!("unknown colour name '{name}'"))
            }
        }
    }
}

impl Rgb {
    pub const RED: Rgb = Rgb(214, 39, 40);
    pub const GREEN: Rgb = Rgb(44, 160, 44);
    pub const BLUE: Rgb = Rgb(31, 119, 180);
    pub const ORANGE: Rgb = Rgb(255, 127, 14);
    pub const PURPLE: Rgb = Rgb(148, 103, 189);
    pub const CYAN: Rgb = Rgb(23, 190, 207);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Look up one of the colour names the plotting configs use.
    pub fn named(name: &str) -> Option<Rgb> {
        let rgb = match name.to_ascii_lowercase().as_str() {
            "red" => Rgb::RED,
            "green" => Rgb::GREEN,
            "blue" => Rgb::BLUE,
            "orange" => Rgb::ORANGE,
            "purple" => Rgb::PURPLE,
            "cyan" => Rgb::CYAN,
            "black" => Rgb::BLACK,
            _ => return None,
        };
        Some(rgb)
    }

    fn from_srgb(rgb: Srgb) -> Rgb {
        Rgb(
            (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
            (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
            (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }

    fn to_srgb(self) -> Srgb {
        Srgb::new(
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }

    /// A darker shade of the same hue, used for the paired baseline line.
    pub fn baseline_shade(self) -> Rgb {
        let mut hsl: Hsl = self.to_srgb().into_color();
        hsl.lightness *= 0.7;
        Rgb::from_srgb(hsl.into_color())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            Rgb::from_srgb(hsl.into_color())
        })
        .collect()
}
