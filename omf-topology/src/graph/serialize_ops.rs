use std::collections::HashMap;

use geo::line_measures::Distance;
use geo::{Haversine, Length};
use indexmap::{map::Entry, IndexMap};
use kdam::tqdm;
use rayon::prelude::*;

use crate::{
    collection::{OvertureMapsCollectionError, TransportationSegmentRecord},
    config::TopologyConfiguration,
    graph::{
        connector_vertex::ConnectorVertex, linear_reference_ops::LinearReference, segment_ops,
        segment_edge::SegmentEdge, speed_ops, topology_edge::TopologyEdge,
    },
};

/// repeated connector references further than this from the first-seen point
/// are counted as divergent.
const DIVERGENT_CONNECTOR_METERS: f64 = 1.0;

/// hands out dense identifiers starting at 1. one sequence is created per
/// table per build so ids never depend on earlier runs.
#[derive(Debug)]
pub struct IdSequence {
    next: usize,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// counts observed while materializing connectors.
#[derive(Debug, Default)]
pub struct ConnectorCounts {
    pub repeated: usize,
    pub divergent: usize,
}

/// counts observed while resolving edges.
#[derive(Debug, Default)]
pub struct EdgeCounts {
    pub unresolved: usize,
    pub invalid_cost: usize,
}

/// decomposes every segment into its edges, keeping segment order and then
/// connector order within each segment.
pub fn decompose_segments(
    segments: &[&TransportationSegmentRecord],
    config: &TopologyConfiguration,
) -> Result<Vec<SegmentEdge>, OvertureMapsCollectionError> {
    let nested: Vec<Vec<SegmentEdge>> = if config.parallelize {
        segments
            .par_iter()
            .map(|s| decompose_segment(s, config))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        tqdm!(
            segments.iter(),
            total = segments.len(),
            desc = "decompose segments"
        )
        .map(|s| decompose_segment(s, config))
        .collect::<Result<Vec<_>, _>>()?
    };
    Ok(nested.into_iter().flatten().collect())
}

fn decompose_segment(
    segment: &TransportationSegmentRecord,
    config: &TopologyConfiguration,
) -> Result<Vec<SegmentEdge>, OvertureMapsCollectionError> {
    segment_ops::decompose(segment, config)?.collect()
}

/// materializes one vertex per unique connector id across the connector lists
/// of `segments`. the point comes from the first segment that references the
/// connector, visiting segments in order and connectors in list order, and
/// vertex ids follow that same order.
pub fn materialize_connectors(
    segments: &[&TransportationSegmentRecord],
) -> Result<(Vec<ConnectorVertex>, ConnectorCounts), OvertureMapsCollectionError> {
    let mut points = IndexMap::new();
    let mut counts = ConnectorCounts::default();
    let iter = tqdm!(
        segments.iter(),
        total = segments.len(),
        desc = "materialize connectors"
    );
    for segment in iter {
        let reference = LinearReference::new(&segment.geometry)?;
        for connector in segment.get_connectors()? {
            let point = reference.interpolate(connector.at)?;
            match points.entry(connector.connector_id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(point);
                }
                Entry::Occupied(entry) => {
                    counts.repeated += 1;
                    let distance = Haversine.distance(*entry.get(), point);
                    if distance > DIVERGENT_CONNECTOR_METERS {
                        log::debug!(
                            "connector {} on segment '{}' lies {distance:.2}m from its first-seen point",
                            connector.connector_id,
                            segment.id
                        );
                        counts.divergent += 1;
                    }
                }
            }
        }
    }
    eprintln!();

    let mut ids = IdSequence::default();
    let vertices = points
        .into_iter()
        .map(|(connector_id, geometry)| ConnectorVertex {
            vertex_id: ids.next_id(),
            connector_id,
            geometry,
        })
        .collect();
    Ok((vertices, counts))
}

/// attaches vertex ids and costs to segment edges. edges with an endpoint
/// missing from `connectors` are dropped. an edge whose cost cannot be computed
/// fails the build unless the configuration ignores invalid costs.
pub fn resolve_edges(
    edges: Vec<SegmentEdge>,
    connectors: &[ConnectorVertex],
    config: &TopologyConfiguration,
) -> Result<(Vec<TopologyEdge>, EdgeCounts), OvertureMapsCollectionError> {
    let vertex_lookup: HashMap<&str, usize> = connectors
        .iter()
        .map(|c| (c.connector_id.as_str(), c.vertex_id))
        .collect();
    let mut counts = EdgeCounts::default();
    let mut ids = IdSequence::default();
    let mut result = Vec::with_capacity(edges.len());

    let total = edges.len();
    for edge in tqdm!(edges.into_iter(), total = total, desc = "resolve edges") {
        let src = vertex_lookup.get(edge.connector_source.as_str());
        let dst = vertex_lookup.get(edge.connector_target.as_str());
        let (src, dst) = match (src, dst) {
            (Some(src), Some(dst)) => (*src, *dst),
            _ => {
                counts.unresolved += 1;
                continue;
            }
        };
        let length = Haversine.length(&edge.geometry);
        let cost = match speed_ops::travel_time_seconds(length, edge.speed_kmph) {
            Ok(cost) => cost,
            Err(e) if config.ignore_invalid_costs => {
                log::warn!(
                    "dropping edge of segment '{}' ({} -> {}): {e}",
                    edge.id,
                    edge.connector_source,
                    edge.connector_target
                );
                counts.invalid_cost += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        let reverse_cost = if edge.one_way {
            config.reverse_cost_sentinel
        } else {
            cost
        };
        result.push(TopologyEdge::new(
            ids.next_id(),
            src,
            dst,
            cost,
            reverse_cost,
            length,
            edge,
        ));
    }
    eprintln!();
    Ok((result, counts))
}
