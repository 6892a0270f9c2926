use geo::LineString;

/// a directed piece of one segment between two consecutive connectors, carrying
/// the parent segment's attributes. vertex ids are resolved later by the
/// topology builder.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEdge {
    /// id of the parent segment
    pub id: String,
    /// sub-line of the parent geometry, always of positive length
    pub geometry: LineString<f64>,
    pub connector_source: String,
    pub connector_target: String,
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub surface: Option<String>,
    pub speed_kmph: f64,
    pub primary_name: Option<String>,
    pub one_way: bool,
}
