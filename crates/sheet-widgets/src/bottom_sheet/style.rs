#![forbid(unsafe_code)]

//! Visual options of the sheet. None of these affect gesture behavior.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(try_from = "String", into = "String"))]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha as a fraction in [0.0, 1.0].
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Error parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color: {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Accepts `#rrggbb`, `#rrggbbaa`, `rgba(r, g, b, a)` with `a` in
    /// [0, 1], and the names `white`, `black`, `transparent`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_owned());
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "transparent" => return Ok(Self::TRANSPARENT),
            _ => {}
        }

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
                return Err(err());
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            let a = if hex.len() == 8 { byte(6)? } else { 255 };
            return Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a));
        }

        let body = trimmed
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let [r, g, b, a] = parts.as_slice() else {
            return Err(err());
        };
        let channel = |v: &str| v.parse::<u8>().map_err(|_| err());
        let alpha: f64 = a.parse().map_err(|_| err())?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(err());
        }
        Ok(Self::rgba(
            channel(*r)?,
            channel(*g)?,
            channel(*b)?,
            (alpha * 255.0).round() as u8,
        ))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

/// Visual options for the sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SheetStyle {
    /// Panel and drag-indicator color.
    pub background_color_modal: Rgba,
    /// Close control background.
    pub background_color_close_icon: Rgba,
    /// Dimming layer behind the panel.
    pub backdrop_color: Rgba,
    /// Show the close control.
    pub close_icon: bool,
    /// Show the drag indicator above the panel.
    pub line_above: bool,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            background_color_modal: Rgba::WHITE,
            background_color_close_icon: Rgba::WHITE,
            backdrop_color: Rgba::rgba(0, 0, 0, 77),
            close_icon: true,
            line_above: true,
        }
    }
}

impl SheetStyle {
    /// Set the panel color.
    pub fn background_color_modal(mut self, color: Rgba) -> Self {
        self.background_color_modal = color;
        self
    }

    /// Set the close control background.
    pub fn background_color_close_icon(mut self, color: Rgba) -> Self {
        self.background_color_close_icon = color;
        self
    }

    /// Set the dimming layer color.
    pub fn backdrop_color(mut self, color: Rgba) -> Self {
        self.backdrop_color = color;
        self
    }

    /// Show or hide the close control.
    pub fn close_icon(mut self, show: bool) -> Self {
        self.close_icon = show;
        self
    }

    /// Show or hide the drag indicator.
    pub fn line_above(mut self, show: bool) -> Self {
        self.line_above = show;
        self
    }
}
