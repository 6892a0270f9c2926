use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::collection::TransportationSegmentRecord;

/// road classes admitted into a drivable routing graph when no filter is configured.
pub const ROUTABLE_ROAD_CLASSES: [&str; 7] = [
    "motorway",
    "primary",
    "residential",
    "secondary",
    "tertiary",
    "trunk",
    "unclassified",
];

/// configures a predicate for testing whether a Segment belongs to the routable network
/// [{ type = "subtype", value = "road"}]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "value")]
pub enum TravelModeFilter {
    /// filter a row based on its subtype. fails if not a match or value is not set.
    #[serde(rename = "subtype")]
    MatchesSubtype(String),
    /// filter a row based on a class. fails if not a match, and optionally, if 'class'
    /// is unset on the row data.
    #[serde(rename = "class")]
    MatchesClasses {
        classes: HashSet<String>,
        ignore_unset: bool,
    },
    /// filter a row based on a class with additional subclass(es). fails if not a match,
    /// and optionally, if 'class' or 'subclass' are unset. an empty subclass list admits
    /// every subclass of that class.
    #[serde(rename = "class_with_subclasses")]
    MatchesClassesWithSubclasses {
        classes: HashMap<String, Vec<String>>,
        ignore_unset: bool,
    },
}

impl Default for TravelModeFilter {
    fn default() -> Self {
        TravelModeFilter::MatchesClasses {
            classes: ROUTABLE_ROAD_CLASSES.iter().map(|c| c.to_string()).collect(),
            ignore_unset: false,
        }
    }
}

impl TravelModeFilter {
    /// test whether a given row matches a travel mode filter.
    /// returns false if there is no match.
    pub fn matches_filter(&self, segment: &TransportationSegmentRecord) -> bool {
        match self {
            TravelModeFilter::MatchesSubtype(subtype) => segment
                .subtype
                .as_ref()
                .map(|s| s == subtype)
                .unwrap_or_default(),

            TravelModeFilter::MatchesClasses {
                classes,
                ignore_unset,
            } => segment
                .class
                .as_ref()
                .map(|c| classes.contains(c))
                .unwrap_or(*ignore_unset),

            TravelModeFilter::MatchesClassesWithSubclasses {
                classes,
                ignore_unset,
            } => match (segment.class.as_ref(), segment.subclass.as_ref()) {
                (Some(cl), None) => classes.contains_key(cl),
                (Some(cl), Some(sc)) => match classes.get(cl) {
                    None => false,
                    Some(subclasses) if subclasses.is_empty() => true,
                    Some(subclasses) => subclasses.contains(sc),
                },
                _ => *ignore_unset,
            },
        }
    }

    /// true if the segment passes every filter. an empty filter list admits nothing.
    pub fn matches_all(filters: &[TravelModeFilter], segment: &TransportationSegmentRecord) -> bool {
        !filters.is_empty() && filters.iter().all(|f| f.matches_filter(segment))
    }

    /// number indicating what order this filter should appear in a sorted list.
    /// used internally to optimize performance.
    /// higher priority matching conditions (i.e. ones we want to test first) should have lower values.
    fn ordering_value(&self) -> u64 {
        use TravelModeFilter as T;
        match self {
            T::MatchesSubtype(..) => 0,
            T::MatchesClasses { .. } => 1,
            T::MatchesClassesWithSubclasses { .. } => 1,
        }
    }
}

impl PartialEq for TravelModeFilter {
    fn eq(&self, other: &Self) -> bool {
        self.ordering_value().cmp(&other.ordering_value()).is_eq()
    }
}

impl PartialOrd for TravelModeFilter {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for TravelModeFilter {}

impl Ord for TravelModeFilter {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordering_value().cmp(&other.ordering_value())
    }
}
