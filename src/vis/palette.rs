use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const CYAN: Color = Color::rgb(0, 191, 191);
    pub const MAGENTA: Color = Color::rgb(191, 0, 191);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(191, 191, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Format(format!("invalid hex color '{}'", hex)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| Error::Format(format!("invalid hex color '{}': {}", hex, e)))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Colors handed out to curves
///
/// Curves get colors by position, cycling through the list. A label pinned
/// with [`Palette::with_assignment`] always gets its own color.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    assigned: HashMap<String, Color>,
}

impl Palette {
    /// Palette cycling through `colors`; at least one color is required
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ConfigError(
                "palette needs at least one color".to_string(),
            ));
        }
        Ok(Palette {
            colors,
            assigned: HashMap::new(),
        })
    }

    /// Pin `color` to curves labelled `label`
    pub fn with_assignment(mut self, label: impl Into<String>, color: Color) -> Self {
        self.assigned.insert(label.into(), color);
        self
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at `position`, wrapping around the list
    pub fn color(&self, position: usize) -> Color {
        self.colors[position % self.colors.len()]
    }

    /// Pinned color for `label`, else the cyclic color at `position`
    pub fn color_for(&self, label: &str, position: usize) -> Color {
        self.assigned
            .get(label)
            .copied()
            .unwrap_or_else(|| self.color(position))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            colors: vec![
                Color::BLUE,
                Color::GREEN,
                Color::RED,
                Color::CYAN,
                Color::MAGENTA,
                Color::BLACK,
                Color::YELLOW,
            ],
            assigned: HashMap::new(),
        }
    }
}
