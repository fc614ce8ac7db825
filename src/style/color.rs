//! RGB colors for edge styling.
//!
//! Colors travel through config files and render output as `#rrggbb`
//! strings. Interpolation is per channel, rounded to the nearest integer.

use crate::error::HierScopeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Most severe violation
    pub const WORST: Rgb = Rgb::new(0xff, 0x00, 0x00);
    /// Mildest violation
    pub const BEST: Rgb = Rgb::new(0xff, 0xcc, 0xcc);
    /// No violation
    pub const GOOD: Rgb = Rgb::new(0x2e, 0xcc, 0x71);
    /// Label text on violating edges
    pub const VIOLATION_TEXT: Rgb = Rgb::new(0xd3, 0x2f, 0x2f);
    /// Label text in connection view
    pub const NEUTRAL_TEXT: Rgb = Rgb::new(0x33, 0x33, 0x33);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend from `from` (t = 0) to `to` (t = 1); `t` is clamped.
    pub fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            channel(from.r, to.r),
            channel(from.g, to.g),
            channel(from.b, to.b),
        )
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = HierScopeError;

    /// Accepts `#rrggbb`, `rrggbb` and the short `#rgb` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HierScopeError::Config(format!("Invalid color '{}'", s));
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
            }
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Rgb::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = HierScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}
