//! Coordinate system sizing for the drawing layer
//!
//! This module is organized into submodules:
//! - `defaults`: Fixed viewbox sizes and unit tables
//! - `types`: `Units` and `Viewbox`
//! - `geometry`: Automatic unit choice and viewbox shape
//! - `labels`: Unit and angle label text

pub mod defaults;
pub mod geometry;
pub mod labels;
pub mod types;

pub use types::*;

use crate::settings::{MAX_CUSTOM_RINGS, Settings};
use defaults::{
    ARROW_LENGTHS, ARROW_QUADRANT_SCALE, ARROW_WIDTH, ARROW_WIDTH_QUADRANT, COS30, SIN30,
    TEXT_FACTOR, TEXT_PADDING, VIEWBOX_BASE,
};

/// Everything the drawing layer needs to map plane units onto the viewbox.
///
/// Pure function of the longest phasor and the display settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub quadrants: u32,
    pub units: Units,
    /// Rings drawn, innermost first
    pub rings: u32,
    /// Viewbox units per plane unit
    pub scale: f64,
    pub circle_unit_scaled: f64,
    pub ticks_unit_scaled: f64,
    /// Radius of the outermost ring
    pub max_circle: f64,
    pub cos30r: f64,
    pub sin30r: f64,
    /// Label text height
    pub textsize: f64,
    /// Outer radius including label padding
    pub max: f64,
    /// Stroke width of a width-1 phasor
    pub arrow_width: f64,
    /// Head length per arrow type
    pub arrow_lengths: [f64; 7],
    pub viewbox: Viewbox,
}

impl Layout {
    pub fn compute(max_magnitude: f64, settings: &Settings) -> Self {
        Self::new(
            max_magnitude,
            settings.quadrants,
            settings.labels.textsize,
            settings.active_custom_units(),
        )
    }

    /// `custom` replaces the automatic `(ring, tick)` spacing when given
    pub fn new(
        max_magnitude: f64,
        quadrants: u32,
        textsize: u32,
        custom: Option<(f64, f64)>,
    ) -> Self {
        let max_magnitude = if max_magnitude.is_finite() {
            max_magnitude.max(0.0)
        } else {
            0.0
        };
        let units = match custom {
            Some((circle, ticks)) if usable_custom(circle, ticks, max_magnitude) => {
                Units { circle, ticks }
            }
            _ => geometry::auto_units(max_magnitude, quadrants),
        };

        let rings = ((max_magnitude / units.circle).floor() as u32).saturating_add(1);
        let scale = VIEWBOX_BASE / (f64::from(rings) * units.circle);
        let circle_unit_scaled = units.circle * scale;
        let max_circle = f64::from(rings) * circle_unit_scaled;

        let quadrant = quadrants > 0;
        let mut textsize = VIEWBOX_BASE * TEXT_FACTOR * f64::from(textsize);
        if quadrant {
            textsize *= 0.5;
        }
        let max = VIEWBOX_BASE + textsize * TEXT_PADDING;
        let arrow_width = VIEWBOX_BASE * if quadrant { ARROW_WIDTH_QUADRANT } else { ARROW_WIDTH };
        let head_scale = if quadrant { ARROW_QUADRANT_SCALE } else { 1.0 };
        let arrow_lengths = ARROW_LENGTHS.map(|l| l * VIEWBOX_BASE * head_scale);

        let layout = Layout {
            quadrants,
            units,
            rings,
            scale,
            circle_unit_scaled,
            ticks_unit_scaled: units.ticks * scale,
            max_circle,
            cos30r: COS30 * max_circle,
            sin30r: SIN30 * max_circle,
            textsize,
            max,
            arrow_width,
            arrow_lengths,
            viewbox: geometry::viewbox(quadrants, max, textsize),
        };
        crate::log::trace!(
            circle = units.circle,
            rings,
            viewbox = %layout.viewbox,
            "layout computed"
        );
        layout
    }

    /// Map a plane point onto the viewbox. The y axis points down there.
    pub fn to_view(&self, p: glam::DVec2) -> glam::DVec2 {
        glam::DVec2::new(p.x * self.scale, -p.y * self.scale)
    }

    /// Ticks between two rings
    pub fn ticks_per_ring(&self) -> u32 {
        (self.units.circle / self.units.ticks).round() as u32
    }

    /// Unit labels shrink a little as rings get denser
    pub fn unit_label_size(&self) -> f64 {
        self.textsize * (1.0 - 0.015 * f64::from(self.rings))
    }

    pub fn unit_labels(&self) -> Vec<String> {
        labels::unit_labels(self.units.circle, self.rings)
    }

    pub fn angle_labels(&self) -> Vec<String> {
        labels::angle_labels(self.quadrants)
    }
}

/// A custom pair is drawn only while it gives a bounded number of rings and ticks
fn usable_custom(circle: f64, ticks: f64, max_magnitude: f64) -> bool {
    circle.is_finite()
        && ticks.is_finite()
        && circle > 0.0
        && ticks > 0.0
        && max_magnitude / circle <= MAX_CUSTOM_RINGS
        && circle / ticks <= MAX_CUSTOM_RINGS
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec2;

    #[test]
    fn full_plane_defaults() {
        let layout = Layout::compute(5.0, &Settings::default());
        assert_eq!(layout.units, Units { circle: 1.0, ticks: 0.5 });
        assert_eq!(layout.rings, 6);
        assert_relative_eq!(layout.scale, 1000.0 / 6.0);
        assert_relative_eq!(layout.max_circle, 1000.0);
        assert_relative_eq!(layout.textsize, 60.5);
        assert_relative_eq!(layout.max, 1151.25);
        assert_relative_eq!(layout.arrow_width, 4.0);
        assert_relative_eq!(layout.arrow_lengths[5], 120.0);
        assert_eq!(layout.arrow_lengths[0], 0.0);
        assert_relative_eq!(layout.viewbox.x, -1151.25);
        assert_relative_eq!(layout.viewbox.width, 2302.5);
        assert_eq!(layout.ticks_per_ring(), 2);
        assert_eq!(layout.unit_labels().len(), 6);
    }

    #[test]
    fn single_quadrant_halves_text_and_shrinks_arrows() {
        let mut settings = Settings::default();
        settings.quadrants = 1;
        let layout = Layout::compute(10.0, &settings);
        assert_eq!(layout.units.circle, 1.0);
        assert_eq!(layout.rings, 11);
        assert_relative_eq!(layout.textsize, 30.25);
        assert_relative_eq!(layout.arrow_width, 2.5);
        assert_relative_eq!(layout.arrow_lengths[1], 77.0);
        assert_eq!(layout.angle_labels(), ["0°", "30°", "60°", "90°"]);
    }

    #[test]
    fn custom_units_override() {
        let mut settings = Settings::default();
        settings.custom_units.use_custom = true;
        settings.custom_units.major = 2.0;
        settings.custom_units.minor = 0.5;
        let layout = Layout::compute(5.0, &settings);
        assert_eq!(layout.units, Units { circle: 2.0, ticks: 0.5 });
        assert_eq!(layout.rings, 3);
        assert_eq!(layout.ticks_per_ring(), 4);
        assert_relative_eq!(layout.ticks_unit_scaled, 0.5 * 1000.0 / 6.0);
    }

    #[test]
    fn unusable_custom_units_fall_back_to_automatic() {
        let auto = Layout::new(5.0, 0, 11, None);
        for pair in [(0.0, 0.0), (-1.0, 0.5), (f64::NAN, 0.5), (2.0, 0.0), (0.01, 0.005), (2.0, 0.01)] {
            let layout = Layout::new(5.0, 0, 11, Some(pair));
            assert_eq!(layout.units, auto.units, "{pair:?}");
            assert_eq!(layout.rings, 6);
            assert!(layout.scale.is_finite());
        }
    }

    #[test]
    fn zero_custom_units_from_a_document_do_not_break_layout() {
        let mut settings = Settings::default();
        settings.custom_units.use_custom = true;
        settings.custom_units.major = 0.0;
        settings.custom_units.minor = 0.0;
        assert!(settings.validate().is_err());
        let layout = Layout::compute(5.0, &settings);
        assert_eq!(layout.units, Units { circle: 1.0, ticks: 0.5 });
    }

    #[test]
    fn empty_diagram_has_one_ring() {
        let layout = Layout::compute(0.0, &Settings::default());
        assert_eq!(layout.rings, 1);
        assert_eq!(layout.scale, 1000.0);
        assert_eq!(layout.to_view(DVec2::new(0.5, 0.25)), DVec2::new(500.0, -250.0));
    }
}
