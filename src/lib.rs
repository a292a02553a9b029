#![doc = "Spherical polygon engine for habitat-range maps: containment, area, simplification and geodesic buffers"]
mod bounds;
mod buffer;
mod edge;
mod error;
mod index;
mod indexed;
mod polygon;
mod simplify;
mod subsets;
mod vertex_list;

pub mod geometry;

#[doc(inline)]
pub use greatcircle::{LatLon, EARTH_RADIUS_KM, KM_PER_DEGREE};

#[doc(inline)]
pub use bounds::Bounds;

#[doc(inline)]
pub use buffer::{buffer, BufferOptions};

#[doc(inline)]
pub use edge::Edge;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use geometry::{area_exact, disk_intersects_polygon, distance_to_polygon, is_in_polygon, Rule};

#[doc(inline)]
pub use index::{AxisIndex, Band, IntervalIndex, RegionBounds};

#[doc(inline)]
pub use indexed::IndexedPolygon;

#[doc(inline)]
pub use polygon::Polygon;

#[doc(inline)]
pub use simplify::{douglas_peucker, remove_duplicate_edges, simplify};

#[doc(inline)]
pub use subsets::{binomial, KSubsets};

#[doc(inline)]
pub use vertex_list::VertexList;
