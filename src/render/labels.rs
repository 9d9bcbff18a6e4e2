//! Text of the unit and angle labels

use std::ops::RangeInclusive;

use super::defaults::{PLAIN_LABEL_MAX, PLAIN_LABEL_MIN};

/// Degrees between two angle labels on the compass
pub const ANGLE_STEP: u32 = 30;

/// Indices into the twelve compass labels (0°, 30°, ... 330°) shown for a
/// quadrant mode
pub fn angle_range(quadrants: u32) -> RangeInclusive<u32> {
    match quadrants {
        1 => 0..=3,
        2 => 3..=6,
        3 => 6..=9,
        4 => 9..=11,
        _ => 0..=11,
    }
}

/// Angle labels for a quadrant mode, in drawing order. The fourth quadrant
/// closes with 0° again.
pub fn angle_labels(quadrants: u32) -> Vec<String> {
    let closing = (quadrants == 4).then_some(0);
    angle_range(quadrants)
        .chain(closing)
        .map(|i| format!("{}°", i * ANGLE_STEP))
        .collect()
}

/// JavaScript style exponent: `1e-3`, `2.5e+4`
fn exponential(value: f64) -> String {
    let s = format!("{value:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

fn decimals(value: f64) -> i32 {
    value
        .to_string()
        .split_once('.')
        .map_or(0, |(_, frac)| frac.len() as i32)
}

/// Labels for the rings from the innermost outwards
pub fn unit_labels(circle_unit: f64, rings: u32) -> Vec<String> {
    let use_exponential = circle_unit <= PLAIN_LABEL_MIN || circle_unit >= PLAIN_LABEL_MAX;
    // multiples of fractional units drift, so snap to the unit's own precision
    let precision = (circle_unit < 1.0).then(|| 10f64.powi(decimals(circle_unit)));

    (1..=rings)
        .map(|ring| {
            let mut value = circle_unit * f64::from(ring);
            if let Some(p) = precision {
                value = (value * p).round() / p;
            }
            if use_exponential {
                exponential(value)
            } else {
                value.to_string()
            }
        })
        .collect()
}
