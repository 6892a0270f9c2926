use geo::LineString;
use serde::Serialize;

use crate::{collection::record::geometry_wkb_codec, graph::segment_edge::SegmentEdge};

/// a row of the routing edge table. both vertex ids refer to rows of the
/// connector table; `edge_id` is dense and starts at 1. `cost` and
/// `reverse_cost` are seconds, except that `reverse_cost` holds a negative
/// sentinel on one-way edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyEdge {
    pub edge_id: usize,
    pub source_vertex_id: usize,
    pub target_vertex_id: usize,
    pub cost: f64,
    pub reverse_cost: f64,
    #[serde(serialize_with = "geometry_wkb_codec::serialize_wkt")]
    pub geometry: LineString<f64>,
    /// meters
    pub length: f64,
    /// id of the parent segment
    pub id: String,
    pub connector_source: String,
    pub connector_target: String,
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub surface: Option<String>,
    pub speed_kmph: f64,
    pub primary_name: Option<String>,
    pub one_way: bool,
}

impl TopologyEdge {
    pub fn new(
        edge_id: usize,
        source_vertex_id: usize,
        target_vertex_id: usize,
        cost: f64,
        reverse_cost: f64,
        length: f64,
        edge: SegmentEdge,
    ) -> Self {
        Self {
            edge_id,
            source_vertex_id,
            target_vertex_id,
            cost,
            reverse_cost,
            geometry: edge.geometry,
            length,
            id: edge.id,
            connector_source: edge.connector_source,
            connector_target: edge.connector_target,
            class: edge.class,
            subclass: edge.subclass,
            surface: edge.surface,
            speed_kmph: edge.speed_kmph,
            primary_name: edge.primary_name,
            one_way: edge.one_way,
        }
    }
}
