//! Point, disk and area queries against an [`IndexedPolygon`](crate::IndexedPolygon).

mod area;
mod contains;
mod distance;
mod montecarlo;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use area::area_exact;
pub use contains::{disk_intersects_polygon, is_in_polygon};
pub use distance::{distance_to_edge, distance_to_polygon, find_minimum_distance};
pub use montecarlo::{
    estimate_area, estimate_area_par, estimate_intersection_area, estimate_intersection_area_par,
    sample_in_cap,
};

/// Fill rule used by point-in-polygon queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Inside iff a ray from the point crosses the boundary an odd number of times.
    #[default]
    EvenOdd,
    /// Inside iff the signed crossing count is non-zero.
    Winding,
}

impl Rule {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::EvenOdd => "even-odd",
            Rule::Winding => "winding",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "even-odd" | "evenodd" => Ok(Rule::EvenOdd),
            "winding" | "nonzero" => Ok(Rule::Winding),
            _ => Err(Error::invalid_parameter("rule", s, "expected \"even-odd\" or \"winding\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_parses_and_prints() {
        assert_eq!("even-odd".parse::<Rule>().unwrap(), Rule::EvenOdd);
        assert_eq!("Winding".parse::<Rule>().unwrap(), Rule::Winding);
        assert_eq!(Rule::Winding.to_string(), "winding");
        assert!(matches!("inside".parse::<Rule>(), Err(Error::InvalidParameter { name: "rule", .. })));
    }

    #[test]
    fn rule_serializes_in_kebab_case() {
        assert_eq!(serde_json::to_string(&Rule::EvenOdd).unwrap(), "\"even-odd\"");
        assert_eq!(serde_json::from_str::<Rule>("\"winding\"").unwrap(), Rule::Winding);
    }
}
