//! RGBA color value used by phasor and settings attributes.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ColorError;

static RGBA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\((\d{1,3}), ?(\d{1,3}), ?(\d{1,3}),? ?((?:0|1)\.?\d*?)?\)$")
        .expect("static color regex")
});

/// An RGBA color. Channels are 0-255, alpha is 0-1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Color { r, g, b, a }
    }

    /// `#rrggbb`, alpha dropped
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorError(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let caps = RGBA_RE.captures(s).ok_or_else(err)?;
        let channel = |i: usize| -> Result<u8, ColorError> {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u8>().ok())
                .ok_or_else(err)
        };
        let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
        let a = match caps.get(4) {
            Some(m) => m.as_str().parse::<f64>().map_err(|_| err())?,
            None => 1.0,
        };
        if !(0.0..=1.0).contains(&a) {
            return Err(err());
        }
        Ok(Color::rgba(r, g, b, a))
    }
}

/// Saved files hold either a color string or a `{ r, g, b, a }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Parts { r: i64, g: i64, b: i64, a: f64 },
}

impl TryFrom<ColorRepr> for Color {
    type Error = ColorError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Text(s) => s.parse(),
            ColorRepr::Parts { r, g, b, a } => {
                let channel = |v: i64| u8::try_from(v).map_err(|_| ColorError(format!("{r}, {g}, {b}, {a}")));
                if !(0.0..=1.0).contains(&a) {
                    return Err(ColorError(format!("{r}, {g}, {b}, {a}")));
                }
                Ok(Color::rgba(channel(r)?, channel(g)?, channel(b)?, a))
            }
        }
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_string()
    }
}
