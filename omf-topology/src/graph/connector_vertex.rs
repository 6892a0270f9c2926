use geo::Point;
use serde::Serialize;

use crate::collection::record::geometry_wkb_codec;

/// a row of the connector table. `vertex_id` is dense and starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorVertex {
    pub vertex_id: usize,
    pub connector_id: String,
    #[serde(serialize_with = "geometry_wkb_codec::serialize_wkt")]
    pub geometry: Point<f64>,
}
