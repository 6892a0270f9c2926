use geo::LineString;
use serde::de::{Deserializer, Error};
use serde::{Deserialize, Serialize};

use super::geometry_wkb_codec;
use super::OvertureMapsNames;
use crate::collection::OvertureMapsCollectionError;

/// an OvertureMaps transportation segment. only the fields consumed by the
/// topology builder are modeled; any other columns in the source are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportationSegmentRecord {
    pub id: String,
    #[serde(with = "geometry_wkb_codec")]
    pub geometry: LineString<f64>,
    pub subtype: Option<String>,
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub names: Option<OvertureMapsNames>,
    pub connectors: Option<Vec<SegmentConnector>>,
    pub access_restrictions: Option<Vec<SegmentAccessRestriction>>,
    pub road_surface: Option<Vec<SegmentValueBetween<String>>>,
    pub speed_limits: Option<Vec<SegmentSpeedLimit>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConnector {
    pub connector_id: String,
    pub at: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentValueBetween<T> {
    pub value: Option<T>,
    pub between: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentAccessRestriction {
    pub access_type: SegmentAccessType,
    pub when: Option<SegmentAccessRestrictionWhen>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentAccessType {
    Allowed,
    Denied,
    Designated,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentAccessRestrictionWhen {
    pub during: Option<String>,
    pub heading: Option<SegmentHeading>,
    pub using: Option<Vec<String>>,
    pub recognized: Option<Vec<String>>,
    pub mode: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentHeading {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSpeedLimit {
    pub min_speed: Option<SegmentValueUnit>,
    pub max_speed: Option<SegmentValueUnit>,
    pub is_max_speed_variable: Option<bool>,
    pub when: Option<SegmentAccessRestrictionWhen>,
    pub between: Option<Vec<f64>>,
}

/// a speed value tagged with its unit. the value may arrive as a number or as
/// a numeric string; any other string fails deserialization of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentValueUnit {
    #[serde(default, deserialize_with = "deserialize_speed_value")]
    pub value: Option<f64>,
    pub unit: Option<SegmentSpeedUnit>,
}

/// speed units observed in OvertureMaps speed limits. unrecognized strings
/// are retained so that callers can decide how strictly to treat them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SegmentSpeedUnit {
    Kmph,
    Mph,
    Other(String),
}

impl From<String> for SegmentSpeedUnit {
    fn from(value: String) -> Self {
        match value.trim() {
            "km/h" | "kmph" | "kph" => SegmentSpeedUnit::Kmph,
            "mph" => SegmentSpeedUnit::Mph,
            _ => SegmentSpeedUnit::Other(value),
        }
    }
}

impl From<SegmentSpeedUnit> for String {
    fn from(value: SegmentSpeedUnit) -> Self {
        match value {
            SegmentSpeedUnit::Kmph => String::from("km/h"),
            SegmentSpeedUnit::Mph => String::from("mph"),
            SegmentSpeedUnit::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SegmentSpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from(self.clone()))
    }
}

impl TransportationSegmentRecord {
    /// the connector list of this segment, which must contain at least two entries.
    pub fn get_connectors(&self) -> Result<&[SegmentConnector], OvertureMapsCollectionError> {
        match self.connectors.as_deref() {
            None => Err(OvertureMapsCollectionError::InvalidSegmentConnectors(
                format!("connectors is empty for segment record '{}'", self.id),
            )),
            Some(cs) if cs.len() < 2 => Err(OvertureMapsCollectionError::InvalidSegmentConnectors(
                format!(
                    "segment record '{}' has {} connector(s), at least 2 are required",
                    self.id,
                    cs.len()
                ),
            )),
            Some(cs) => Ok(cs),
        }
    }

    /// the max speed of the first speed limit entry, if any.
    pub fn first_max_speed(&self) -> Option<&SegmentValueUnit> {
        self.speed_limits
            .as_ref()
            .and_then(|limits| limits.first())
            .and_then(|limit| limit.max_speed.as_ref())
    }

    /// true when any restriction denies access in the backward heading.
    pub fn is_one_way(&self) -> bool {
        self.access_restrictions
            .as_ref()
            .map(|rs| {
                rs.iter().any(|r| {
                    r.access_type == SegmentAccessType::Denied
                        && r.when.as_ref().and_then(|w| w.heading) == Some(SegmentHeading::Backward)
                })
            })
            .unwrap_or_default()
    }

    pub fn first_surface(&self) -> Option<&String> {
        self.road_surface
            .as_ref()
            .and_then(|rs| rs.first())
            .and_then(|s| s.value.as_ref())
    }

    pub fn primary_name(&self) -> Option<&String> {
        self.names.as_ref().and_then(|n| n.primary.as_ref())
    }
}

fn deserialize_speed_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(v)) => Ok(Some(v)),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("speed value '{s}' not a valid number: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segment(restrictions: serde_json::Value) -> TransportationSegmentRecord {
        let row = json!({
            "id": "seg-1",
            "geometry": "LINESTRING (-105.2 39.7, -105.1 39.8)",
            "class": "residential",
            "connectors": [
                { "connector_id": "a", "at": 0.0 },
                { "connector_id": "b", "at": 1.0 }
            ],
            "access_restrictions": restrictions
        });
        serde_json::from_value(row).expect("test invariant: row should deserialize")
    }

    #[test]
    fn test_one_way_backward_denial() {
        let s = segment(json!([
            { "access_type": "allowed", "when": { "mode": ["foot"] } },
            { "access_type": "denied", "when": { "heading": "backward" } }
        ]));
        assert!(s.is_one_way());
    }

    #[test]
    fn test_not_one_way() {
        let forward = segment(json!([
            { "access_type": "denied", "when": { "heading": "forward" } }
        ]));
        let allowed = segment(json!([
            { "access_type": "allowed", "when": { "heading": "backward" } }
        ]));
        let missing = segment(serde_json::Value::Null);
        assert!(!forward.is_one_way());
        assert!(!allowed.is_one_way());
        assert!(!missing.is_one_way());
    }

    #[test]
    fn test_unknown_access_type_is_tolerated() {
        let s = segment(json!([
            { "access_type": "permissive", "when": { "heading": "backward" } }
        ]));
        assert!(!s.is_one_way());
    }

    #[test]
    fn test_speed_value_as_string() {
        let row = json!({
            "id": "seg-2",
            "geometry": "LINESTRING (0 0, 0 1)",
            "speed_limits": [
                { "max_speed": { "value": "45", "unit": "mph" } },
                { "max_speed": { "value": 10, "unit": "km/h" } }
            ]
        });
        let s: TransportationSegmentRecord = serde_json::from_value(row).unwrap();
        let speed = s.first_max_speed().unwrap();
        assert_eq!(speed.value, Some(45.0));
        assert_eq!(speed.unit, Some(SegmentSpeedUnit::Mph));
    }

    #[test]
    fn test_speed_value_not_numeric() {
        let row = json!({
            "id": "seg-3",
            "geometry": "LINESTRING (0 0, 0 1)",
            "speed_limits": [ { "max_speed": { "value": "fast", "unit": "mph" } } ]
        });
        let result = serde_json::from_value::<TransportationSegmentRecord>(row);
        assert!(result.is_err(), "non-numeric speed should fail to decode");
    }

    #[test]
    fn test_speed_unit_strings() {
        assert_eq!(SegmentSpeedUnit::from(String::from("kph")), SegmentSpeedUnit::Kmph);
        assert_eq!(SegmentSpeedUnit::from(String::from("km/h")), SegmentSpeedUnit::Kmph);
        assert_eq!(SegmentSpeedUnit::from(String::from("mph")), SegmentSpeedUnit::Mph);
        assert_eq!(
            SegmentSpeedUnit::from(String::from("knots")),
            SegmentSpeedUnit::Other(String::from("knots"))
        );
    }

    #[test]
    fn test_connectors_required() {
        let row = json!({
            "id": "seg-4",
            "geometry": "LINESTRING (0 0, 0 1)",
            "connectors": [ { "connector_id": "a", "at": 0.0 } ]
        });
        let s: TransportationSegmentRecord = serde_json::from_value(row).unwrap();
        assert!(matches!(
            s.get_connectors(),
            Err(OvertureMapsCollectionError::InvalidSegmentConnectors(_))
        ));
    }

    #[test]
    fn test_first_surface_and_name() {
        let row = json!({
            "id": "seg-5",
            "geometry": "LINESTRING (0 0, 0 1)",
            "names": { "primary": "Main Street" },
            "road_surface": [
                { "value": "paved", "between": [0.0, 0.5] },
                { "value": "gravel", "between": [0.5, 1.0] }
            ]
        });
        let s: TransportationSegmentRecord = serde_json::from_value(row).unwrap();
        assert_eq!(s.first_surface().map(String::as_str), Some("paved"));
        assert_eq!(s.primary_name().map(String::as_str), Some("Main Street"));
    }
}
