//! Great-circle math on a spherical Earth of mean radius 6371 km.
//!
//! Every function here is stateless and works on plain [`LatLon`] values in
//! degrees; distances are in kilometres and areas in km².
pub mod area;
pub mod coord;
pub mod distance;

pub use area::{cap_area, cap_radius, cell_area, polar_triangle_area, spherical_excess};
pub use coord::LatLon;
pub use distance::{
    angular_distance, cross_track_along_track, destination, distance, initial_bearing,
    latitude_at_meridian, midpoint, normalize_longitude,
};

/// Mean Earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Length of one degree of great-circle arc, in km.
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
