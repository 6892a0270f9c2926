mod error;

pub mod filter;
pub mod record;

pub use error::OvertureMapsCollectionError;
pub use filter::TravelModeFilter;
pub use record::{
    SegmentAccessRestriction, SegmentAccessRestrictionWhen, SegmentAccessType, SegmentConnector,
    SegmentHeading, SegmentSpeedLimit, SegmentSpeedUnit, SegmentValueBetween, SegmentValueUnit,
    TransportationCollection, TransportationSegmentRecord,
};
