//! Fixed sizes of the drawing coordinate system (viewbox units)

/// Radius of the outermost ring in viewbox units
pub const VIEWBOX_BASE: f64 = 1000.0;

/// Candidate ring spacings for diagrams between 1 and 1000
pub const CIRCLE_UNITS: [f64; 9] = [0.1, 0.5, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0];
/// Tick spacing paired with each entry of [`CIRCLE_UNITS`]
pub const TICK_UNITS: [f64; 9] = [0.05, 0.1, 0.5, 1.0, 5.0, 5.0, 10.0, 25.0, 50.0];

/// Preferred ring count for the full plane
pub const TARGET_RINGS: f64 = 4.0;
/// Preferred ring count when a single quadrant is shown
pub const TARGET_RINGS_QUADRANT: f64 = 6.0;

/// Text height per settings text size step
pub const TEXT_FACTOR: f64 = 0.0055;
/// Padding around the outermost ring, in text heights
pub const TEXT_PADDING: f64 = 2.5;

pub const ARROW_WIDTH: f64 = 0.004;
pub const ARROW_WIDTH_QUADRANT: f64 = 0.0025;
/// Head length of each arrow type as a share of the viewbox base
pub const ARROW_LENGTHS: [f64; 7] = [0.0, 0.11, 0.11, 0.1, 0.1, 0.12, 0.12];
/// Arrow heads shrink in single quadrant mode
pub const ARROW_QUADRANT_SCALE: f64 = 0.7;

pub const COS30: f64 = 0.86602540378;
pub const SIN30: f64 = 0.5;

/// Unit labels switch to exponential notation outside this band
pub const PLAIN_LABEL_MIN: f64 = 0.001;
pub const PLAIN_LABEL_MAX: f64 = 10000.0;
