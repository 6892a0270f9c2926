//! functions mapped onto [TransportationSegmentRecord] rows to create [SegmentSplit] values
//! and the [SegmentEdge]s they describe.

use crate::{
    collection::{OvertureMapsCollectionError, TransportationSegmentRecord},
    config::TopologyConfiguration,
    graph::{
        linear_reference_ops::LinearReference, segment_edge::SegmentEdge,
        segment_split::SegmentSplit, ConnectorInSegment,
    },
};
use itertools::Itertools;

/// creates simple connector splits from a record, one per consecutive pair of
/// connectors. pairs at the same offset describe no geometry and are skipped;
/// a pair with a decreasing offset is an error.
pub fn process_simple_connector_splits(
    segment: &TransportationSegmentRecord,
) -> Result<Vec<SegmentSplit>, OvertureMapsCollectionError> {
    let mut result = vec![];
    for (src, dst) in segment.get_connectors()?.iter().tuple_windows() {
        if dst.at < src.at {
            return Err(OvertureMapsCollectionError::InvalidSegmentConnectors(
                format!(
                    "segment '{}' connector offsets decrease from {} ({}) to {} ({})",
                    segment.id, src.connector_id, src.at, dst.connector_id, dst.at
                ),
            ));
        }
        if dst.at == src.at {
            log::debug!(
                "segment '{}' skipping split between {} and {} at same offset {}",
                segment.id,
                src.connector_id,
                dst.connector_id,
                src.at
            );
            continue;
        }
        let src = ConnectorInSegment::new(segment.id.clone(), src.connector_id.clone(), src.at);
        let dst = ConnectorInSegment::new(segment.id.clone(), dst.connector_id.clone(), dst.at);
        result.push(SegmentSplit::SimpleConnectorSplit { src, dst });
    }
    Ok(result)
}

/// decomposes a segment into the edges between its consecutive connectors.
/// splits and speed are resolved up front, so a malformed connector list or
/// unit fails here; the edge geometries are sliced as the iterator is consumed.
pub fn decompose<'a>(
    segment: &'a TransportationSegmentRecord,
    config: &TopologyConfiguration,
) -> Result<SegmentEdges<'a>, OvertureMapsCollectionError> {
    let splits = process_simple_connector_splits(segment)?;
    let reference = LinearReference::new(&segment.geometry)?;
    let (speed, unit) = match segment.first_max_speed() {
        Some(max_speed) => (max_speed.value, max_speed.unit.as_ref()),
        None => (None, None),
    };
    let speed_kmph = config.default_speeds.resolve(
        speed,
        unit,
        segment.class.as_deref(),
        config.strict_speed_units,
    )?;
    Ok(SegmentEdges {
        segment,
        reference,
        splits: splits.into_iter(),
        speed_kmph,
    })
}

/// the edges of one segment in connector order. each split is sliced into an
/// edge only when requested and zero-length slices are passed over.
pub struct SegmentEdges<'a> {
    segment: &'a TransportationSegmentRecord,
    reference: LinearReference<'a>,
    splits: std::vec::IntoIter<SegmentSplit>,
    speed_kmph: f64,
}

impl Iterator for SegmentEdges<'_> {
    type Item = Result<SegmentEdge, OvertureMapsCollectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        for split in self.splits.by_ref() {
            match split.create_segment_edge(self.segment, &self.reference, self.speed_kmph) {
                Ok(Some(edge)) => return Some(Ok(edge)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.splits.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Haversine, Length};
    use serde_json::json;

    fn segment(row: serde_json::Value) -> TransportationSegmentRecord {
        serde_json::from_value(row).expect("test invariant: row should deserialize")
    }

    fn three_connector_segment() -> TransportationSegmentRecord {
        segment(json!({
            "id": "seg-1",
            "geometry": "LINESTRING (-105.2 39.7, -105.2 39.705, -105.195 39.705)",
            "class": "residential",
            "subclass": "link",
            "names": { "primary": "Pine Street" },
            "road_surface": [ { "value": "paved" } ],
            "connectors": [
                { "connector_id": "a", "at": 0.0 },
                { "connector_id": "b", "at": 0.3 },
                { "connector_id": "c", "at": 1.0 }
            ]
        }))
    }

    fn edges(segment: &TransportationSegmentRecord) -> Vec<SegmentEdge> {
        decompose(segment, &TopologyConfiguration::default())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_one_edge_per_connector_pair() {
        let s = three_connector_segment();
        let result = edges(&s);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].connector_source, "a");
        assert_eq!(result[0].connector_target, "b");
        assert_eq!(result[1].connector_source, "b");
        assert_eq!(result[1].connector_target, "c");
        for edge in result.iter() {
            assert_eq!(edge.id, "seg-1");
            assert_eq!(edge.class.as_deref(), Some("residential"));
            assert_eq!(edge.subclass.as_deref(), Some("link"));
            assert_eq!(edge.surface.as_deref(), Some("paved"));
            assert_eq!(edge.primary_name.as_deref(), Some("Pine Street"));
            assert_eq!(edge.speed_kmph, 30.0);
            assert!(!edge.one_way);
        }
    }

    #[test]
    fn test_edges_splice_back_into_segment() {
        let s = three_connector_segment();
        let result = edges(&s);
        assert_eq!(result[0].geometry.0.first(), s.geometry.0.first());
        assert_eq!(result[0].geometry.0.last(), result[1].geometry.0.first());
        assert_eq!(result[1].geometry.0.last(), s.geometry.0.last());
        let total: f64 = result.iter().map(|e| Haversine.length(&e.geometry)).sum();
        assert!((total - Haversine.length(&s.geometry)).abs() < 1e-6);
    }

    #[test]
    fn test_equal_offsets_are_skipped() {
        let s = segment(json!({
            "id": "seg-2",
            "geometry": "LINESTRING (0 0, 0 0.01)",
            "class": "primary",
            "connectors": [
                { "connector_id": "a", "at": 0.0 },
                { "connector_id": "b", "at": 0.5 },
                { "connector_id": "b2", "at": 0.5 },
                { "connector_id": "c", "at": 1.0 }
            ]
        }));
        let result = edges(&s);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].connector_target, "b");
        assert_eq!(result[1].connector_source, "b2");
        assert!(result
            .iter()
            .all(|e| Haversine.length(&e.geometry) > 0.0));
    }

    #[test]
    fn test_repeated_coordinates_produce_no_edge() {
        let s = segment(json!({
            "id": "seg-3",
            "geometry": "LINESTRING (0 0, 0 0, 0 0.01)",
            "class": "primary",
            "connectors": [
                { "connector_id": "a", "at": 0.0 },
                { "connector_id": "b", "at": 1.0 }
            ]
        }));
        assert_eq!(edges(&s).len(), 1);

        let degenerate = segment(json!({
            "id": "seg-4",
            "geometry": "LINESTRING (1 1, 1 1)",
            "class": "primary",
            "connectors": [
                { "connector_id": "a", "at": 0.0 },
                { "connector_id": "b", "at": 1.0 }
            ]
        }));
        assert!(edges(&degenerate).is_empty());
    }

    #[test]
    fn test_decreasing_offsets_are_an_error() {
        let s = segment(json!({
            "id": "seg-5",
            "geometry": "LINESTRING (0 0, 0 0.01)",
            "connectors": [
                { "connector_id": "a", "at": 0.6 },
                { "connector_id": "b", "at": 0.4 }
            ]
        }));
        let result = decompose(&s, &TopologyConfiguration::default());
        assert!(matches!(
            result,
            Err(OvertureMapsCollectionError::InvalidSegmentConnectors(_))
        ));
    }

    #[test]
    fn test_too_few_connectors_is_an_error() {
        let s = segment(json!({
            "id": "seg-6",
            "geometry": "LINESTRING (0 0, 0 0.01)",
            "connectors": [ { "connector_id": "a", "at": 0.0 } ]
        }));
        assert!(decompose(&s, &TopologyConfiguration::default()).is_err());
    }

    #[test]
    fn test_declared_speed_and_one_way() {
        let s = segment(json!({
            "id": "seg-7",
            "geometry": "LINESTRING (0 0, 0 0.01)",
            "class": "primary",
            "speed_limits": [ { "max_speed": { "value": 25, "unit": "mph" } } ],
            "access_restrictions": [
                { "access_type": "denied", "when": { "heading": "backward" } }
            ],
            "connectors": [
                { "connector_id": "a", "at": 0.0 },
                { "connector_id": "b", "at": 1.0 }
            ]
        }));
        let result = edges(&s);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].speed_kmph, 25.0 * 1.60934);
        assert!(result[0].one_way);
    }

    #[test]
    fn test_edges_are_produced_lazily() {
        let s = segment(json!({
            "id": "seg-8",
            "geometry": "LINESTRING (0 0, 0 0.01)",
            "connectors": [
                { "connector_id": "a", "at": 0.0 },
                { "connector_id": "b", "at": 0.5 },
                { "connector_id": "c", "at": 1.5 }
            ]
        }));
        // the out-of-range offset only fails when its edge is requested
        let mut iter = decompose(&s, &TopologyConfiguration::default()).unwrap();
        assert!(matches!(iter.next(), Some(Ok(_))));
        assert!(matches!(
            iter.next(),
            Some(Err(OvertureMapsCollectionError::InvalidGeometry(_)))
        ));
    }
}
