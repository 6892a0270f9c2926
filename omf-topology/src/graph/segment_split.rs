use geo::{Haversine, Length};

use crate::{
    collection::{OvertureMapsCollectionError, TransportationSegmentRecord},
    graph::{
        connector_in_segment::ConnectorInSegment, linear_reference_ops::LinearReference,
        segment_edge::SegmentEdge,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentSplit {
    /// splits at the connectors (vertices) ignoring linear-referenced split points
    /// for other attributes such as speed. does not require creating additional vertices.
    SimpleConnectorSplit {
        src: ConnectorInSegment,
        dst: ConnectorInSegment,
    },
}

impl SegmentSplit {
    /// slices the segment geometry at this split and attaches the segment attributes.
    /// returns None when the slice has no length, which happens when the source
    /// line repeats a coordinate across the whole split.
    ///
    /// # Arguments
    ///
    /// * `segment` - the segment this split was created from
    /// * `reference` - linear reference over `segment.geometry`
    /// * `speed_kmph` - resolved speed of the segment
    pub fn create_segment_edge(
        &self,
        segment: &TransportationSegmentRecord,
        reference: &LinearReference,
        speed_kmph: f64,
    ) -> Result<Option<SegmentEdge>, OvertureMapsCollectionError> {
        use OvertureMapsCollectionError as E;
        match self {
            SegmentSplit::SimpleConnectorSplit { src, dst } => {
                if src.segment_id != segment.id || dst.segment_id != segment.id {
                    let msg = format!(
                        "attempting to create edge for segment '{}' from split of ('{}', '{}')",
                        segment.id, src.segment_id, dst.segment_id
                    );
                    return Err(E::InvalidSegmentConnectors(msg));
                }
                if dst.linear_reference <= src.linear_reference {
                    return Err(E::InvalidSegmentConnectors(format!(
                        "SimpleConnectorSplit: at_dst ({}) <= at_src ({}) for connectors {} -> {}",
                        dst.linear_reference,
                        src.linear_reference,
                        src.connector_id,
                        dst.connector_id
                    )));
                }

                let geometry = reference.substring(src.at(), dst.at())?;
                if Haversine.length(&geometry) <= 0.0 {
                    log::debug!(
                        "segment '{}' has zero length between connectors {} and {}",
                        segment.id,
                        src.connector_id,
                        dst.connector_id
                    );
                    return Ok(None);
                }

                let edge = SegmentEdge {
                    id: segment.id.clone(),
                    geometry,
                    connector_source: src.connector_id.clone(),
                    connector_target: dst.connector_id.clone(),
                    class: segment.class.clone(),
                    subclass: segment.subclass.clone(),
                    surface: segment.first_surface().cloned(),
                    speed_kmph,
                    primary_name: segment.primary_name().cloned(),
                    one_way: segment.is_one_way(),
                };
                Ok(Some(edge))
            }
        }
    }
}
