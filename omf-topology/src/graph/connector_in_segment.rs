use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// represents a connector found within a segment, at a fractional position along it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectorInSegment {
    pub segment_id: String,
    pub connector_id: String,
    pub linear_reference: OrderedFloat<f64>,
}

impl ConnectorInSegment {
    /// records an entry of a segment's connector list as a connector within that segment.
    pub fn new(segment_id: String, connector_id: String, linear_reference: f64) -> Self {
        Self {
            segment_id,
            connector_id,
            linear_reference: OrderedFloat(linear_reference),
        }
    }

    pub fn at(&self) -> f64 {
        self.linear_reference.0
    }
}
