//! Small shared value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable key of a live phasor. Also the wire id in saved records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhasorId(pub u32);

impl PhasorId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PhasorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PhasorId {
    fn from(v: u32) -> Self {
        PhasorId(v)
    }
}

/// Coordinate idiom recognized in an expression's surface syntax.
///
/// Only decides which template is shown back to the user, never the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CoordSystem {
    /// Custom expression, redisplayed verbatim
    #[default]
    None,
    /// `a + b*i`
    Cartesian,
    /// `a * e^(i*b)`
    PolarRadians,
    /// `a * e^(i*b*pi/180)`
    PolarDegrees,
}

impl CoordSystem {
    /// The next representation when the user cycles the display format.
    /// `None` has no successor.
    pub fn next(self) -> Option<CoordSystem> {
        match self {
            CoordSystem::None => None,
            CoordSystem::Cartesian => Some(CoordSystem::PolarRadians),
            CoordSystem::PolarRadians => Some(CoordSystem::PolarDegrees),
            CoordSystem::PolarDegrees => Some(CoordSystem::Cartesian),
        }
    }

    /// Short marker shown next to the expression field
    pub fn label(self) -> &'static str {
        match self {
            CoordSystem::None => "",
            CoordSystem::Cartesian => "c",
            CoordSystem::PolarRadians => "Φ",
            CoordSystem::PolarDegrees => "Φ°",
        }
    }
}

/// Replace non-finite numeric input with NaN.
///
/// Invalid numeric input never errors; it produces an invalid phasor.
#[inline]
pub fn sanitize(val: Option<f64>) -> f64 {
    match val {
        Some(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

/// Parse a numeric text field the forgiving way: empty or malformed text is NaN.
pub fn sanitize_str(val: &str) -> f64 {
    sanitize(val.trim().parse::<f64>().ok())
}
