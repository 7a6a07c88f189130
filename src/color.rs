//! RGBA color values with parsing and WCAG contrast helpers.

use palette::Srgb;
use resvg::tiny_skia;

use crate::error::RenderError;

/// An 8-bit-per-channel straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, RenderError> {
        let hex = s.trim().trim_start_matches('#');
        let err = || RenderError::InvalidColor(s.to_string());
        let parse = |chunk: &str| u8::from_str_radix(chunk, 16).map_err(|_| err());

        match hex.len() {
            3 => {
                let nibble = |i: usize| parse(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
            )),
            8 => Ok(Self::rgba(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
                parse(&hex[6..8])?,
            )),
            _ => Err(err()),
        }
    }

    /// Same color with alpha scaled by `alpha` (0..=1).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Same color forced fully opaque.
    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }

    /// Alpha as a 0..=1 float.
    pub fn alpha_f32(&self) -> f32 {
        self.a as f32 / 255.0
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// WCAG relative luminance of the color, ignoring alpha.
    pub fn relative_luminance(self) -> f32 {
        let lin = Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
        .into_linear();
        0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue
    }

    /// WCAG contrast ratio between two colors (1..=21).
    pub fn contrast_ratio(self, other: Color) -> f32 {
        let l1 = self.relative_luminance();
        let l2 = other.relative_luminance();
        let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
        (hi + 0.05) / (lo + 0.05)
    }

    /// Picks the candidate with the highest contrast against `background`.
    ///
    /// Used for badge text, which must stay legible over an arbitrary
    /// user-picked badge color.
    pub fn most_readable(background: Color, candidates: &[Color]) -> Color {
        candidates
            .iter()
            .copied()
            .max_by(|a, b| {
                background
                    .contrast_ratio(*a)
                    .total_cmp(&background.contrast_ratio(*b))
            })
            .unwrap_or(Color::BLACK)
    }
}
