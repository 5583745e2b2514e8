//! Color values for theme slots
//!
//! Supports:
//! - `#rgb`, `#rrggbb` and `#rrggbbaa` hex notation
//! - `rgba(r, g, b, a)` with `a` in 0.0..=1.0
//! - WCAG relative luminance and contrast ratio

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an alpha channel
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Parse a CSS-style color string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let inner = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        // Unsigned decimal channels only
        let channel = |part: &str| -> Option<u8> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse().ok()
        };
        let (r, g, b) = match parts.as_slice() {
            [r, g, b] | [r, g, b, _] => (channel(r)?, channel(g)?, channel(b)?),
            _ => return None,
        };
        let a = match parts.get(3) {
            Some(alpha) => {
                if alpha.is_empty() || !alpha.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
                    return None;
                }
                let alpha: f32 = alpha.parse().ok()?;
                if !(0.0..=1.0).contains(&alpha) {
                    return None;
                }
                (alpha * 255.0).round() as u8
            }
            None => 255,
        };
        Some(Self::rgba(r, g, b, a))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// WCAG 2.x relative luminance in 0.0..=1.0
    pub fn relative_luminance(&self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// WCAG contrast ratio between two colors, 1.0..=21.0
    pub fn contrast_ratio(&self, other: &Color) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (hi, lo) = if a > b { (a, b) } else { (b, a) };
        (hi + 0.05) / (lo + 0.05)
    }

    /// Move each channel `fraction` of the way toward `target`
    fn blend_toward(&self, target: Color, fraction: f64) -> Color {
        let mix = |from: u8, to: u8| {
            (from as f64 + (to as f64 - from as f64) * fraction).round().clamp(0.0, 255.0) as u8
        };
        Color::rgba(
            mix(self.r, target.r),
            mix(self.g, target.g),
            mix(self.b, target.b),
            self.a,
        )
    }

    /// Adjust this color until it reaches `ratio` against `background`
    ///
    /// Walks toward black or white in 10% steps, picking whichever direction
    /// reaches the ratio first, or gets closest when neither does. Returns
    /// `self` unchanged when it already meets the ratio.
    pub fn ensure_contrast(&self, background: &Color, ratio: f64) -> Color {
        if ratio <= 1.0 || self.contrast_ratio(background) >= ratio {
            return *self;
        }

        let walk = |target: Color| {
            let mut best = *self;
            for step in 1..=10 {
                let candidate = self.blend_toward(target, step as f64 / 10.0);
                best = candidate;
                if candidate.contrast_ratio(background) >= ratio {
                    return (candidate, true);
                }
            }
            (best, false)
        };

        let (darker, darker_ok) = walk(Color::BLACK);
        let (lighter, lighter_ok) = walk(Color::WHITE);
        match (darker_ok, lighter_ok) {
            (true, true) => {
                // Prefer the smaller visual change
                if self.distance(&darker) <= self.distance(&lighter) {
                    darker
                } else {
                    lighter
                }
            }
            (true, false) => darker,
            (false, true) => lighter,
            (false, false) => {
                if darker.contrast_ratio(background) >= lighter.contrast_ratio(background) {
                    darker
                } else {
                    lighter
                }
            }
        }
    }

    fn distance(&self, other: &Color) -> u32 {
        let d = |a: u8, b: u8| (a as i32 - b as i32).unsigned_abs();
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
