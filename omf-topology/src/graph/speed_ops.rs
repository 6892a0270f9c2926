//! speed resolution and travel-time cost for segment edges.
use std::collections::HashMap;

use geo::{Haversine, Length, LineString};
use serde::{Deserialize, Serialize};
use uom::si::f64::{Length as UomLength, Time, Velocity};
use uom::si::{length::meter, time::second, velocity::kilometer_per_hour};

use crate::collection::{OvertureMapsCollectionError, SegmentSpeedUnit};

pub const MPH_TO_KMPH: f64 = 1.60934;

/// speeds in km/h assigned to segments that declare no max speed, keyed by road class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultSpeeds {
    /// speed for any class without an entry in `classes`
    pub default_kmph: f64,
    pub classes: HashMap<String, f64>,
}

impl Default for DefaultSpeeds {
    fn default() -> Self {
        Self {
            default_kmph: 40.0,
            classes: HashMap::from([
                (String::from("service"), 20.0),
                (String::from("residential"), 30.0),
            ]),
        }
    }
}

impl DefaultSpeeds {
    pub fn default_for_class(&self, class: Option<&str>) -> f64 {
        class
            .and_then(|c| self.classes.get(c))
            .copied()
            .unwrap_or(self.default_kmph)
    }

    /// resolves a speed in km/h. a declared speed is converted from mph when tagged
    /// so and returned as-is, otherwise the class default applies. units other than
    /// mph are read as km/h unless `strict_units` is set, in which case an
    /// unrecognized unit is an error.
    pub fn resolve(
        &self,
        speed: Option<f64>,
        unit: Option<&SegmentSpeedUnit>,
        class: Option<&str>,
        strict_units: bool,
    ) -> Result<f64, OvertureMapsCollectionError> {
        let factor = match unit {
            Some(SegmentSpeedUnit::Mph) => MPH_TO_KMPH,
            Some(SegmentSpeedUnit::Other(u)) if strict_units => {
                return Err(OvertureMapsCollectionError::InvalidSpeed(format!(
                    "unrecognized speed unit '{u}'"
                )));
            }
            Some(SegmentSpeedUnit::Other(u)) => {
                log::debug!("unrecognized speed unit '{u}', reading speed as km/h");
                1.0
            }
            Some(SegmentSpeedUnit::Kmph) | None => 1.0,
        };
        match speed {
            Some(s) => Ok(s * factor),
            None => Ok(self.default_for_class(class)),
        }
    }

    pub fn validate(&self) -> Result<(), OvertureMapsCollectionError> {
        let entries = std::iter::once(("default_kmph", self.default_kmph))
            .chain(self.classes.iter().map(|(c, v)| (c.as_str(), *v)));
        for (name, v) in entries {
            if !v.is_finite() || v <= 0.0 {
                return Err(OvertureMapsCollectionError::ConfigurationError(format!(
                    "default speed '{name}' must be a positive number, found {v}"
                )));
            }
        }
        Ok(())
    }
}

/// resolves a speed in km/h using the standard class defaults
/// (service 20, residential 30, anything else 40).
pub fn resolve_speed_kmph(
    speed: Option<f64>,
    unit: Option<&SegmentSpeedUnit>,
    class: Option<&str>,
) -> Result<f64, OvertureMapsCollectionError> {
    DefaultSpeeds::default().resolve(speed, unit, class, false)
}

/// time in seconds to traverse `geometry` at `speed_kmph`, using its Haversine length.
pub fn segment_cost(
    geometry: &LineString<f64>,
    speed_kmph: f64,
) -> Result<f64, OvertureMapsCollectionError> {
    travel_time_seconds(Haversine.length(geometry), speed_kmph)
}

/// time in seconds to travel `length_meters` at `speed_kmph`.
pub fn travel_time_seconds(
    length_meters: f64,
    speed_kmph: f64,
) -> Result<f64, OvertureMapsCollectionError> {
    if !speed_kmph.is_finite() || speed_kmph <= 0.0 {
        return Err(OvertureMapsCollectionError::InvalidSpeed(format!(
            "speed must be a positive number of km/h, found {speed_kmph}"
        )));
    }
    let distance = UomLength::new::<meter>(length_meters);
    let speed = Velocity::new::<kilometer_per_hour>(speed_kmph);
    let time: Time = distance / speed;
    Ok(time.get::<second>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, line_string};

    #[test]
    fn test_class_defaults() {
        assert_eq!(resolve_speed_kmph(None, None, Some("service")).unwrap(), 20.0);
        assert_eq!(resolve_speed_kmph(None, None, Some("residential")).unwrap(), 30.0);
        assert_eq!(resolve_speed_kmph(None, None, Some("primary")).unwrap(), 40.0);
        assert_eq!(resolve_speed_kmph(None, None, None).unwrap(), 40.0);
    }

    #[test]
    fn test_mph_conversion() {
        let kmph = resolve_speed_kmph(Some(50.0), Some(&SegmentSpeedUnit::Mph), None).unwrap();
        assert_eq!(kmph, 50.0 * 1.60934);
    }

    #[test]
    fn test_declared_speed_overrides_class_default() {
        let kmph =
            resolve_speed_kmph(Some(55.0), Some(&SegmentSpeedUnit::Kmph), Some("service")).unwrap();
        assert_eq!(kmph, 55.0);
        let no_unit = resolve_speed_kmph(Some(25.0), None, Some("residential")).unwrap();
        assert_eq!(no_unit, 25.0);
    }

    #[test]
    fn test_unrecognized_unit() {
        let knots = SegmentSpeedUnit::Other(String::from("knots"));
        let lenient = resolve_speed_kmph(Some(10.0), Some(&knots), None).unwrap();
        assert_eq!(lenient, 10.0);
        let strict = DefaultSpeeds::default().resolve(Some(10.0), Some(&knots), None, true);
        assert!(matches!(
            strict,
            Err(OvertureMapsCollectionError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn test_configured_defaults() {
        let speeds = DefaultSpeeds {
            default_kmph: 50.0,
            classes: HashMap::from([(String::from("motorway"), 100.0)]),
        };
        assert_eq!(speeds.resolve(None, None, Some("motorway"), false).unwrap(), 100.0);
        assert_eq!(speeds.resolve(None, None, Some("service"), false).unwrap(), 50.0);
    }

    #[test]
    fn test_validate_rejects_non_positive_default() {
        let mut speeds = DefaultSpeeds::default();
        assert!(speeds.validate().is_ok());
        speeds.classes.insert(String::from("track"), 0.0);
        assert!(speeds.validate().is_err());
    }

    #[test]
    fn test_travel_time() {
        let seconds = travel_time_seconds(500.0, 30.0).unwrap();
        assert!((seconds - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_cost_uses_haversine_length() {
        let line = line_string![coord! { x: -105.0, y: 39.0 }, coord! { x: -105.0, y: 39.01 }];
        let meters = Haversine.length(&line);
        let seconds = segment_cost(&line, 36.0).unwrap();
        // 36 km/h is 10 m/s
        assert!((seconds - meters / 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_speed_is_an_error() {
        let line = line_string![coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 0.001 }];
        for speed in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    segment_cost(&line, speed),
                    Err(OvertureMapsCollectionError::InvalidSpeed(_))
                ),
                "{speed}"
            );
        }
    }
}
