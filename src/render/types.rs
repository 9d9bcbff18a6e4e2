//! Value types produced by the layout pass

use std::fmt;

/// Ring and tick spacing in plane units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Units {
    pub circle: f64,
    pub ticks: f64,
}

/// The visible rectangle in viewbox coordinates. Always square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewbox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewbox {
    pub fn square(x: f64, y: f64, size: f64) -> Self {
        Viewbox {
            x,
            y,
            width: size,
            height: size,
        }
    }
}

/// `x,y,width,height`, the form an SVG `viewBox` attribute takes
impl fmt::Display for Viewbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}
