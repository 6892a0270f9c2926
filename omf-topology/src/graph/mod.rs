mod connector_in_segment;
mod connector_vertex;
mod omf_topology;
mod segment_edge;
mod segment_split;
mod serialize_ops;
mod topology_edge;
mod topology_report;

pub mod linear_reference_ops;
pub mod segment_ops;
pub mod speed_ops;
pub use connector_in_segment::ConnectorInSegment;
pub use connector_vertex::ConnectorVertex;
pub use omf_topology::{OmfTopology, CONNECTORS_FILENAME, EDGES_FILENAME, REPORT_FILENAME};
pub use segment_edge::SegmentEdge;
pub use segment_ops::SegmentEdges;
pub use segment_split::SegmentSplit;
pub use serialize_ops::IdSequence;
pub use speed_ops::DefaultSpeeds;
pub use topology_edge::TopologyEdge;
pub use topology_report::TopologyReport;
