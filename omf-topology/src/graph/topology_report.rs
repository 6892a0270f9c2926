use serde::{Deserialize, Serialize};

/// counts recorded at each stage of a topology build.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyReport {
    /// segment records read
    pub segments: usize,
    /// segments admitted by the travel mode filters
    pub routable_segments: usize,
    /// edges produced by decomposing routable segments
    pub segment_edges: usize,
    /// unique connectors, equal to the number of vertices
    pub connectors: usize,
    /// connector references that repeat an already materialized connector id
    pub repeated_connector_references: usize,
    /// repeated references whose interpolated point lies away from the first-seen point
    pub divergent_connector_references: usize,
    /// edges dropped because an endpoint connector was not materialized
    pub unresolved_edges: usize,
    /// edges dropped because their cost could not be computed
    pub invalid_cost_edges: usize,
    /// edges written to the edge table
    pub edges: usize,
}

impl std::fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "segments: {} ({} routable), segment edges: {}, connectors: {} ({} repeated, {} divergent), edges: {} ({} unresolved, {} invalid cost)",
            self.segments,
            self.routable_segments,
            self.segment_edges,
            self.connectors,
            self.repeated_connector_references,
            self.divergent_connector_references,
            self.edges,
            self.unresolved_edges,
            self.invalid_cost_edges
        )
    }
}
