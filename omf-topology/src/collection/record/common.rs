use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// the `names` column shared by OvertureMaps feature types. the primary name is
/// carried onto edges; localized names keyed by language tag are retained as read.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OvertureMapsNames {
    pub primary: Option<String>,
    pub common: Option<HashMap<String, Option<String>>>,
}
