//! Display strings for phasor values

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::defaults::ROUNDING_PRECISION;
use crate::types::CoordSystem;

/// `Math.round` semantics: halves round toward positive infinity
#[inline]
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Round for display.
///
/// Above 1 keeps five decimals. Below 1 keeps roughly four significant
/// digits after the leading zeros. Exactly 1 is returned unchanged.
pub fn round(x: f64) -> f64 {
    let rounded = if x > 1.0 {
        round_half_up(x * ROUNDING_PRECISION) / ROUNDING_PRECISION
    } else if x < 1.0 {
        let p = 10f64.powi(leading_places(x)) * (ROUNDING_PRECISION / 100.0);
        round_half_up(x * p) / p
    } else {
        x
    };
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Position of the first significant digit in the shortest decimal text of `x`
fn leading_places(x: f64) -> i32 {
    let a = x.abs();
    // shortest text switches to exponent form below 1e-6 ("1e-7")
    if a == 0.0 {
        1
    } else if a < 1e-6 || a >= 1.0 {
        0
    } else {
        1 - a.log10().floor() as i32
    }
}

/// Display text of a rounded number, `-0` printed as `0`
pub fn number(x: f64) -> String {
    let x = round(x);
    if x == 0.0 { "0".to_string() } else { x.to_string() }
}

/// Angle in `[0, 2π)`
pub fn radians(value: Complex64) -> f64 {
    let r = value.im.atan2(value.re);
    if r < 0.0 { 2.0 * PI + r } else { r }
}

/// Angle in `[0°, 360°)`
pub fn degrees(value: Complex64) -> f64 {
    let d = value.im.atan2(value.re) * 180.0 / PI;
    if d < 0.0 { 360.0 + d } else { d }
}

/// `( x , y ) , length: L , φ: R rad / D°`
pub fn info(value: Complex64) -> String {
    format!(
        "( {} , {} ) , length: {} , φ: {} rad / {}°",
        number(value.re),
        number(value.im),
        number(value.norm()),
        number(radians(value)),
        number(degrees(value)),
    )
}

/// Expression text for `value` in the given representation.
///
/// `None` has no template and yields `None`.
pub fn template(system: CoordSystem, value: Complex64) -> Option<String> {
    match system {
        CoordSystem::None => None,
        CoordSystem::Cartesian => Some(format!("{} + i * {}", number(value.re), number(value.im))),
        CoordSystem::PolarRadians => Some(format!(
            "{} * e^(i * {})",
            number(value.norm()),
            number(radians(value))
        )),
        CoordSystem::PolarDegrees => Some(format!(
            "{} * e^(i * {} * pi/180)",
            number(value.norm()),
            number(degrees(value))
        )),
    }
}
