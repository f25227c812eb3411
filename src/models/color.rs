//! Normalized RGBA color used for key fills and labels.

// Channel conversions between f64 and u8 are clamped before casting
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::KeyboardError;

/// Color used for drawing, each channel between 0.0 and 1.0.
///
/// The range is checked at construction; a `Color` value is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColor", into = "RawColor")]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
}

/// Unchecked channel values as they appear in serialized form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawColor {
    red: f64,
    green: f64,
    blue: f64,
    #[serde(default = "opaque")]
    alpha: f64,
}

const fn opaque() -> f64 {
    1.0
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 1.0,
    };

    /// Opaque white.
    pub const WHITE: Self = Self {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
        alpha: 1.0,
    };

    /// Creates a color, failing if any channel is outside `0.0..=1.0` or NaN.
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> crate::Result<Self> {
        for (channel, value) in [
            ("red", red),
            ("green", green),
            ("blue", blue),
            ("alpha", alpha),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(KeyboardError::InvalidColorComponent { channel, value });
            }
        }
        Ok(Self {
            red,
            green,
            blue,
            alpha,
        })
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            red: f64::from(r) / 255.0,
            green: f64::from(g) / 255.0,
            blue: f64::from(b) / 255.0,
            alpha: 1.0,
        }
    }

    /// Parses "#RRGGBB" or "#RRGGBBAA" (the leading '#' is optional).
    ///
    /// # Examples
    ///
    /// ```
    /// use vkeyboard::models::Color;
    ///
    /// let color = Color::from_hex("#FF000080").unwrap();
    /// assert_eq!(color.red(), 1.0);
    /// assert!((color.alpha() - 128.0 / 255.0).abs() < 1e-9);
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 && hex.len() != 8 {
            anyhow::bail!(
                "Invalid hex color format '{hex}'. Expected 6 or 8 hex digits (RRGGBB[AA])"
            );
        }

        let channel = |range: std::ops::Range<usize>, name: &str| -> Result<f64> {
            let digits = hex
                .get(range)
                .context(format!("Invalid {name} channel in hex color '{hex}'"))?;
            let value = u8::from_str_radix(digits, 16)
                .context(format!("Invalid {name} channel in hex color '{hex}'"))?;
            Ok(f64::from(value) / 255.0)
        };

        let alpha = if hex.len() == 8 {
            channel(6..8, "alpha")?
        } else {
            1.0
        };
        Ok(Self::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
            alpha,
        )?)
    }

    /// Formats the color as "#RRGGBBAA" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            byte(self.red),
            byte(self.green),
            byte(self.blue),
            byte(self.alpha)
        )
    }

    /// Red channel.
    #[must_use]
    pub const fn red(&self) -> f64 {
        self.red
    }

    /// Green channel.
    #[must_use]
    pub const fn green(&self) -> f64 {
        self.green
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(&self) -> f64 {
        self.blue
    }

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl TryFrom<RawColor> for Color {
    type Error = KeyboardError;

    fn try_from(raw: RawColor) -> crate::Result<Self> {
        Self::new(raw.red, raw.green, raw.blue, raw.alpha)
    }
}

impl From<Color> for RawColor {
    fn from(color: Color) -> Self {
        Self {
            red: color.red,
            green: color.green,
            blue: color.blue,
            alpha: color.alpha,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
