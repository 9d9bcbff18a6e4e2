//! Display settings saved alongside the phasors

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::errors::SettingsError;

/// Number of stroke styles a `style` field can index
pub const STROKE_STYLE_COUNT: u32 = 3;
pub const TEXT_SIZE_MIN: u32 = 7;
pub const TEXT_SIZE_MAX: u32 = 20;
/// Upper bound on rings for custom units
pub const MAX_CUSTOM_RINGS: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub enabled: bool,
    pub from: Color,
    pub to: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compass {
    pub show: bool,
    pub style: u32,
    pub color: Color,
    pub gradient: Gradient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub show: bool,
    pub style: u32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub show: bool,
    pub ticks: bool,
    pub style: u32,
    pub color: Color,
}

/// Which axis and angle labels are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    pub color: Color,
    pub xp: bool,
    pub xn: bool,
    pub yp: bool,
    pub yn: bool,
    pub angles: bool,
    pub textsize: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendColors {
    pub text: Color,
    pub bg: Color,
    pub border: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub show: bool,
    pub colors: LegendColors,
}

/// Fixed ring spacing that replaces the automatic choice when enabled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomUnits {
    #[serde(rename = "use")]
    pub use_custom: bool,
    pub major: f64,
    pub minor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// 0 shows the full plane, 1..=4 a single quadrant
    pub quadrants: u32,
    pub compass: Compass,
    pub grid: Grid,
    pub axis: Axis,
    pub labels: Labels,
    pub legend: Legend,
    pub custom_units: CustomUnits,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quadrants: 0,
            compass: Compass {
                show: true,
                style: 1,
                color: Color::BLACK,
                gradient: Gradient {
                    enabled: false,
                    from: Color::rgba(0, 0, 0, 0.7),
                    to: Color::WHITE,
                },
            },
            grid: Grid {
                show: false,
                style: 2,
                color: Color::BLACK,
            },
            axis: Axis {
                show: false,
                ticks: true,
                style: 0,
                color: Color::BLACK,
            },
            labels: Labels {
                color: Color::BLACK,
                xp: true,
                xn: true,
                yp: true,
                yn: true,
                angles: true,
                textsize: 11,
            },
            legend: Legend {
                show: true,
                colors: LegendColors {
                    text: Color::BLACK,
                    bg: Color::WHITE,
                    border: Color::BLACK,
                },
            },
            custom_units: CustomUnits {
                use_custom: false,
                major: 1.0,
                minor: 0.5,
            },
        }
    }
}

fn check(ok: bool, field: &'static str) -> Result<(), SettingsError> {
    if ok {
        Ok(())
    } else {
        Err(SettingsError::Field { field })
    }
}

impl Settings {
    /// Back to factory values. The minor unit resets to 1.5, not to the
    /// startup 0.5, so a reset dialog shows it as invalid until edited.
    pub fn reset(&mut self) {
        *self = Settings::default();
        self.custom_units.minor = 1.5;
    }

    /// Range checks for fields serde cannot express
    pub fn validate(&self) -> Result<(), SettingsError> {
        let style = 0..STROKE_STYLE_COUNT;
        check(self.quadrants <= 4, "quadrants")?;
        check(style.contains(&self.axis.style), "axis.style")?;
        check(style.contains(&self.compass.style), "compass.style")?;
        check(style.contains(&self.grid.style), "grid.style")?;
        check(
            (TEXT_SIZE_MIN..=TEXT_SIZE_MAX).contains(&self.labels.textsize),
            "labels.textsize",
        )?;
        check(self.custom_units.major.is_finite(), "custom_units.major")?;
        check(self.custom_units.minor.is_finite(), "custom_units.minor")?;
        if self.custom_units.use_custom {
            let (major, minor) = (self.custom_units.major, self.custom_units.minor);
            check(major > 0.0, "custom_units.major")?;
            check(
                minor > 0.0 && minor < major && major / minor <= MAX_CUSTOM_RINGS,
                "custom_units.minor",
            )?;
        }
        Ok(())
    }

    /// Check a custom unit pair against the current diagram size.
    ///
    /// The major unit must stay below twice the longest phasor and give at
    /// most 15 rings. The minor unit must divide it into at most 15 steps.
    pub fn validate_custom_units(
        major: f64,
        minor: f64,
        max_magnitude: f64,
    ) -> Result<(), SettingsError> {
        if !major.is_finite()
            || major <= 0.0
            || major >= max_magnitude * 2.0
            || max_magnitude / major > MAX_CUSTOM_RINGS
        {
            return Err(SettingsError::MajorUnit {
                major,
                max_magnitude,
            });
        }
        if !minor.is_finite() || minor <= 0.0 || minor >= major || major / minor > MAX_CUSTOM_RINGS {
            return Err(SettingsError::MinorUnit { major, minor });
        }
        Ok(())
    }

    /// Validate and store a custom unit pair
    pub fn set_custom_units(
        &mut self,
        major: f64,
        minor: f64,
        max_magnitude: f64,
    ) -> Result<(), SettingsError> {
        Self::validate_custom_units(major, minor, max_magnitude)?;
        self.custom_units.major = major;
        self.custom_units.minor = minor;
        crate::log::debug!(major, minor, "custom units set");
        Ok(())
    }

    /// The custom units in effect, if enabled
    pub fn active_custom_units(&self) -> Option<(f64, f64)> {
        self.custom_units
            .use_custom
            .then_some((self.custom_units.major, self.custom_units.minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.custom_units.minor, 0.5);
        assert_eq!(s.active_custom_units(), None);
    }

    #[test]
    fn reset_restores_factory_values() {
        let mut s = Settings::default();
        s.quadrants = 3;
        s.grid.show = true;
        s.reset();
        assert_eq!(s.quadrants, 0);
        assert!(!s.grid.show);
        assert_eq!(s.custom_units.minor, 1.5);
    }

    #[test]
    fn out_of_range_fields() {
        let mut s = Settings::default();
        s.quadrants = 5;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::Field { field: "quadrants" })
        ));

        let mut s = Settings::default();
        s.labels.textsize = 6;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::Field { field: "labels.textsize" })
        ));

        let mut s = Settings::default();
        s.grid.style = 3;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.custom_units.major = f64::INFINITY;
        assert!(s.validate().is_err());
    }

    #[test]
    fn active_custom_units_must_be_usable() {
        let mut s = Settings::default();
        s.custom_units.major = 0.0;
        s.custom_units.minor = 0.0;
        // stored but unused pairs are not checked
        assert!(s.validate().is_ok());

        s.custom_units.use_custom = true;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::Field { field: "custom_units.major" })
        ));
        s.custom_units.major = 2.0;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::Field { field: "custom_units.minor" })
        ));
        s.custom_units.minor = 0.1;
        assert!(s.validate().is_err());
        s.custom_units.minor = 0.5;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn custom_unit_rules() {
        assert!(Settings::validate_custom_units(2.0, 1.0, 10.0).is_ok());
        // 10 / 0.5 gives 20 rings
        assert!(matches!(
            Settings::validate_custom_units(0.5, 0.25, 10.0),
            Err(SettingsError::MajorUnit { .. })
        ));
        // not below twice the diagram size
        assert!(Settings::validate_custom_units(20.0, 5.0, 10.0).is_err());
        assert!(matches!(
            Settings::validate_custom_units(2.0, 2.0, 10.0),
            Err(SettingsError::MinorUnit { .. })
        ));
        assert!(matches!(
            Settings::validate_custom_units(3.0, 0.1, 10.0),
            Err(SettingsError::MinorUnit { .. })
        ));
        assert!(Settings::validate_custom_units(f64::NAN, 1.0, 10.0).is_err());
    }

    #[test]
    fn set_custom_units_keeps_old_pair_on_error() {
        let mut s = Settings::default();
        assert!(s.set_custom_units(2.0, 3.0, 10.0).is_err());
        assert_eq!((s.custom_units.major, s.custom_units.minor), (1.0, 0.5));
        s.set_custom_units(2.0, 0.5, 10.0).unwrap();
        s.custom_units.use_custom = true;
        assert_eq!(s.active_custom_units(), Some((2.0, 0.5)));
    }

    #[test]
    fn reads_object_and_string_colors() {
        let mut json = serde_json::to_value(Settings::default()).unwrap();
        json["custom_units"]["use"] = true.into();
        json["grid"]["color"] = serde_json::json!({ "r": 10, "g": 20, "b": 30, "a": 1 });
        let s: Settings = serde_json::from_value(json).unwrap();
        assert!(s.custom_units.use_custom);
        assert_eq!(s.grid.color, Color::rgb(10, 20, 30));
        assert_eq!(s.compass.gradient.from.to_string(), "rgba(0, 0, 0, 0.7)");
    }
}
