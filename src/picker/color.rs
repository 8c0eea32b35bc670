// src/picker/color.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque 8-bit sRGB color. Alpha from the bitmap is dropped on sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const NEUTRAL: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, uppercase. This is the clipboard format.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Accepts `#RRGGBB`, `RRGGBB` and the short `#RGB` form, any case.
    pub fn from_hex(input: &str) -> Result<Self, String> {
        let s = input.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        let digits: Vec<u8> = s
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| format!("Invalid hex color: {input:?}"))?;
        match digits.as_slice() {
            [r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new(
                r1 * 16 + r0,
                g1 * 16 + g0,
                b1 * 16 + b0,
            )),
            _ => Err(format!("Invalid hex color: {input:?}")),
        }
    }

    /// Relative luminance in `0.0..=1.0`, used to pick a readable label color.
    pub fn luminance(self) -> f64 {
        fn channel(c: u8) -> f64 {
            let v = c as f64 / 255.0;
            if v <= 0.039_28 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    pub fn contrasting_text(self) -> Rgb {
        if self.luminance() > 0.4 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }

    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formats_uppercase_with_hash() {
        assert_eq!(Rgb::new(255, 0, 10).to_hex(), "#FF000A");
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(Rgb::from_hex("#ff8000"), Ok(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("  00FF00 "), Ok(Rgb::new(0, 255, 0)));
        assert_eq!(Rgb::from_hex("#fa0"), Ok(Rgb::new(255, 170, 0)));
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn text_contrast_follows_luminance() {
        assert_eq!(Rgb::WHITE.contrasting_text(), Rgb::BLACK);
        assert_eq!(Rgb::new(0, 0, 128).contrasting_text(), Rgb::WHITE);
    }
}
