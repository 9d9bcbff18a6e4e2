//! Ring spacing and viewbox shape

use super::defaults::{CIRCLE_UNITS, TARGET_RINGS, TARGET_RINGS_QUADRANT, TICK_UNITS};
use super::types::{Units, Viewbox};

/// Snap a leading value to 1, 5 or 10
fn bucket(x: f64) -> f64 {
    if x < 2.0 {
        1.0
    } else if x < 6.0 {
        5.0
    } else {
        10.0
    }
}

/// Pick ring and tick spacing so that a handful of rings covers
/// `max_magnitude`.
///
/// Between 1 and 1000 the spacing comes from a fixed table, choosing the
/// first entry whose ring count is closest to the target. Outside that band
/// the target spacing is rounded to 1, 5 or 10 times a power of ten.
pub fn auto_units(max_magnitude: f64, quadrants: u32) -> Units {
    let target = if quadrants > 0 {
        TARGET_RINGS_QUADRANT
    } else {
        TARGET_RINGS
    };

    if max_magnitude > 1.0 && max_magnitude <= 1000.0 {
        let mut best = 0;
        let mut best_miss = f64::INFINITY;
        for (i, unit) in CIRCLE_UNITS.iter().enumerate() {
            let miss = ((max_magnitude / unit).ceil() - target).abs();
            if miss < best_miss {
                best = i;
                best_miss = miss;
            }
        }
        return Units {
            circle: CIRCLE_UNITS[best],
            ticks: TICK_UNITS[best],
        };
    }

    let temp = max_magnitude / target;
    let circle = if temp > 1.0 {
        let digits = temp.log10().floor() as i32 + 1;
        if digits > 1 {
            let scale = 10f64.powi(digits - 1);
            bucket((temp / scale).round()) * scale
        } else {
            bucket(temp)
        }
    } else {
        // leading zeros after the decimal point, plus one
        let shift = if temp > 0.0 {
            -(temp.log10().floor() as i32)
        } else {
            0
        };
        let scale = 10f64.powi(shift);
        bucket((temp * scale).round()) / scale
    };

    Units {
        circle,
        ticks: circle * 0.5,
    }
}

/// Viewbox for the quadrant mode. `max` is the outer radius including label
/// padding, `text` the label height.
pub fn viewbox(quadrants: u32, max: f64, text: f64) -> Viewbox {
    match quadrants {
        1 => Viewbox::square(-text * 1.8, -max + text * 0.7, max + text),
        2 => Viewbox::square(-max, -max + text * 0.4, max + text * 1.8),
        3 => Viewbox::square(-max, text * -2.6, max + text * 2.5),
        4 => Viewbox::square(text * -2.5, text * -2.3, max + text * 2.0),
        _ => Viewbox::square(-max, -max, max * 2.0),
    }
}
