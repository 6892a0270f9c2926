use serde::{Deserialize, Serialize};

use crate::{
    collection::{OvertureMapsCollectionError, TransportationSegmentRecord, TravelModeFilter},
    graph::DefaultSpeeds,
};

/// defines behaviors for building a routing topology from OvertureMaps segments
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct TopologyConfiguration {
    /// segments must match every filter to enter the routing graph
    pub filter: Vec<TravelModeFilter>,
    pub default_speeds: DefaultSpeeds,
    /// reverse cost written for one-way edges
    pub reverse_cost_sentinel: f64,
    /// fail on speed units other than km/h and mph instead of reading them as km/h
    pub strict_speed_units: bool,
    /// drop edges whose cost cannot be computed instead of failing the build
    pub ignore_invalid_costs: bool,
    pub parallelize: bool,
}

impl Default for TopologyConfiguration {
    fn default() -> Self {
        Self {
            filter: vec![TravelModeFilter::default()],
            default_speeds: DefaultSpeeds::default(),
            reverse_cost_sentinel: -1.0,
            strict_speed_units: false,
            ignore_invalid_costs: false,
            parallelize: true,
        }
    }
}

impl TopologyConfiguration {
    pub fn is_routable(&self, segment: &TransportationSegmentRecord) -> bool {
        TravelModeFilter::matches_all(&self.filter, segment)
    }

    pub fn validate(&self) -> Result<(), OvertureMapsCollectionError> {
        if self.filter.is_empty() {
            return Err(OvertureMapsCollectionError::ConfigurationError(
                String::from("at least one travel mode filter is required"),
            ));
        }
        if !(self.reverse_cost_sentinel < 0.0) {
            return Err(OvertureMapsCollectionError::ConfigurationError(format!(
                "reverse_cost_sentinel must be negative, found {}",
                self.reverse_cost_sentinel
            )));
        }
        self.default_speeds.validate()
    }

    /// validates the configuration and orders filters so that cheaper tests run first.
    fn prepare(mut self) -> Result<Self, OvertureMapsCollectionError> {
        self.validate()?;
        self.filter.sort();
        Ok(self)
    }
}

impl TryFrom<&String> for TopologyConfiguration {
    type Error = OvertureMapsCollectionError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let read = || {
            std::fs::read_to_string(f).map_err(|e| {
                OvertureMapsCollectionError::ConfigurationError(format!(
                    "failure reading {f}: {e}"
                ))
            })
        };
        let conf: TopologyConfiguration = if f.ends_with(".toml") {
            toml::from_str(&read()?).map_err(|e| {
                OvertureMapsCollectionError::ConfigurationError(format!(
                    "failure decoding {f}: {e}"
                ))
            })?
        } else if f.ends_with(".json") {
            serde_json::from_str(&read()?).map_err(|e| {
                OvertureMapsCollectionError::ConfigurationError(format!(
                    "failure decoding {f}: {e}"
                ))
            })?
        } else {
            return Err(OvertureMapsCollectionError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.prepare()
    }
}
