mod travel_mode_filter;

pub use travel_mode_filter::{TravelModeFilter, ROUTABLE_ROAD_CLASSES};
