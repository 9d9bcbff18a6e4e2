//! Phasor limits and default attributes

use crate::color::Color;

/// Rotating palette for new phasors
pub const PALETTE: [Color; 5] = [
    Color::rgb(255, 0, 0),
    Color::rgb(255, 228, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(0, 51, 0),
    Color::rgb(153, 0, 153),
];

/// Names that can never be claimed as a phasor symbol
pub const RESERVED_SYMBOLS: [&str; 7] = ["i", "e", "exp", "sin", "cos", "tan", "pi"];

pub const MAX_PHASOR_WIDTH: u32 = 8;
pub const MAX_OUTLINE_WIDTH: u32 = 5;
pub const MAX_LABEL_LENGTH: usize = 64;
pub const MAX_SYMBOL_LENGTH: usize = 64;
pub const MAX_EXPRESSION_LENGTH: usize = 256;
pub const MAX_ID: u32 = 9999;

/// Arrow head styles: none, flat, flat filled, normal, normal filled, pointed, pointed filled
pub const ARROW_TYPE_COUNT: u32 = 7;
pub const ARROW_SIZE_MIN: u32 = 5;
pub const ARROW_SIZE_MAX: u32 = 30;

/// List skins: standard, vida loca, whiskeyapprox, valhalla
pub const SKIN_COUNT: u32 = 4;

pub const DEFAULT_WIDTH: u32 = 4;
pub const DEFAULT_ARROW: u32 = 5;
pub const DEFAULT_ARROW_SIZE: u32 = 10;
pub const DEFAULT_OUTLINE_WIDTH: u32 = 0;

/// Seed value of the phasor created by a registry reset
pub const RESET_SEED: (f64, f64) = (1.0, 1.0);

/// Decimal places kept by display rounding above 1
pub const ROUNDING_PRECISION: f64 = 100_000.0;
