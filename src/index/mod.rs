mod interval;
mod region;

pub use interval::{AxisIndex, IntervalIndex};
pub use region::{Band, RegionBounds};

/// Flatten per-bucket lists into compressed sparse row offsets and entries.
fn compress(buckets: &[Vec<u32>]) -> (Vec<u32>, Vec<u32>) {
    let offsets = std::iter::once(0u32).chain(
        buckets.iter()
            .map(|v| v.len() as u32)
            .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
    ).collect::<Vec<u32>>();

    (offsets, buckets.iter().flatten().copied().collect())
}
