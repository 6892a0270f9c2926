mod common;
mod transportation_collection;
mod transportation_segment;

pub use transportation_collection::TransportationCollection;
pub use transportation_segment::{
    SegmentAccessRestriction, SegmentAccessRestrictionWhen, SegmentAccessType, SegmentConnector,
    SegmentHeading, SegmentSpeedLimit, SegmentSpeedUnit, SegmentValueBetween, SegmentValueUnit,
    TransportationSegmentRecord,
};

pub use common::OvertureMapsNames;
pub mod geometry_wkb_codec;
