use greatcircle::{LatLon, KM_PER_DEGREE};
use tracing::trace;

use crate::edge::Edge;
use crate::error::{Error, Result};

/// A half-open latitude band `[lat_min, lat_max)`. The topmost band also
/// includes `90`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub lat_min: f64,
    pub lat_max: f64,
}

/// Latitude-band bucketing of edges for radius queries.
///
/// Primary bands tile `[-90, 90]` with a fixed width starting at `-90`.
/// Offset bands are shifted by half a width, so the first and last are half
/// as wide. An edge goes to the primary band holding its whole latitude
/// extent, else to the offset band holding it, else to the unclassified
/// bucket that every query scans.
#[derive(Clone, Debug)]
pub struct RegionBounds {
    width: f64,
    primary: usize,
    bands: Vec<Band>,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    unclassified: Vec<u32>,
}

impl RegionBounds {
    pub const DEFAULT_BAND_WIDTH: f64 = 1.0;

    /// Bucket `edges` into bands `width` degrees tall.
    pub fn new(edges: &[Edge], width: f64) -> Result<Self> {
        Self::check_width(width)?;
        Ok(Self::build(edges, width))
    }

    /// Rejects widths that are NaN, infinite, or outside `(0, 180]`.
    pub(crate) fn check_width(width: f64) -> Result<()> {
        if width > 0.0 && width <= 180.0 { return Ok(()) }
        Err(Error::invalid_parameter("band_width", width, "must be finite and in (0, 180]"))
    }

    /// Width must already have passed [`RegionBounds::check_width`].
    pub(crate) fn build(edges: &[Edge], width: f64) -> Self {
        let primary = (180.0 / width).ceil() as usize;
        let offset = ((180.0 - width / 2.0) / width).ceil() as usize + 1;

        let bands = (0..primary)
            .map(|i| Band { lat_min: -90.0 + i as f64 * width, lat_max: (-90.0 + (i + 1) as f64 * width).min(90.0) })
            .chain((0..offset).map(|j| Band {
                lat_min: (-90.0 + (j as f64 - 0.5) * width).max(-90.0),
                lat_max: (-90.0 + (j as f64 + 0.5) * width).min(90.0),
            }))
            .collect::<Vec<_>>();

        let mut buckets = vec![Vec::new(); bands.len()];
        let mut unclassified = Vec::new();
        for (i, edge) in edges.iter().enumerate() {
            let (lo, hi) = edge.latitude_extent();
            let (p_lo, p_hi) = (Self::primary_band(lo, width, primary), Self::primary_band(hi, width, primary));
            let (o_lo, o_hi) = (Self::offset_band(lo, width, offset), Self::offset_band(hi, width, offset));

            if p_lo == p_hi {
                buckets[p_lo].push(i as u32);
            } else if o_lo == o_hi {
                buckets[primary + o_lo].push(i as u32);
            } else {
                unclassified.push(i as u32);
            }
        }

        trace!(edges = edges.len(), bands = bands.len(), unclassified = unclassified.len(), "built region bounds");

        let (offsets, edges) = super::compress(&buckets);
        Self { width, primary, bands, offsets, edges, unclassified }
    }

    #[inline]
    fn primary_band(lat: f64, width: f64, count: usize) -> usize {
        (((lat + 90.0) / width).floor().max(0.0) as usize).min(count - 1)
    }

    #[inline]
    fn offset_band(lat: f64, width: f64, count: usize) -> usize {
        (((lat + 90.0 + width / 2.0) / width).floor().max(0.0) as usize).min(count - 1)
    }

    #[inline] pub fn band_width(&self) -> f64 { self.width }

    #[inline] pub fn bands(&self) -> &[Band] { &self.bands }

    /// Edges whose latitude extent spans band boundaries on both grids.
    #[inline] pub fn unclassified(&self) -> &[u32] { &self.unclassified }

    #[inline]
    fn band_edges(&self, band: usize) -> &[u32] {
        &self.edges[self.offsets[band] as usize .. self.offsets[band + 1] as usize]
    }

    /// Candidate edges that may lie within `radius_km` of `point`.
    ///
    /// Conservative: every edge within the radius is returned, along with
    /// others from the overlapping bands and the unclassified bucket.
    pub fn find_edges_within_radius(&self, point: LatLon, radius_km: f64) -> Vec<usize> {
        let reach = radius_km / KM_PER_DEGREE;
        let (lo, hi) = (point.lat - reach, point.lat + reach);
        let offset = self.bands.len() - self.primary;

        let primary = Self::primary_band(lo, self.width, self.primary) ..= Self::primary_band(hi, self.width, self.primary);
        let shifted = Self::offset_band(lo, self.width, offset) ..= Self::offset_band(hi, self.width, offset);

        primary
            .chain(shifted.map(|j| self.primary + j))
            .flat_map(|band| self.band_edges(band))
            .chain(&self.unclassified)
            .map(|&i| i as usize)
            .collect()
    }
}
