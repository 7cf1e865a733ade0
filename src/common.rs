use crate::error::{Error, Result};
use rayon::current_num_threads;
use std::ops::Range;

/// Post-processing config.
///
/// The presets mirror how the different segmentation tools clean up their output:
/// - `connectivity_only()`: split disconnected labels and stop (SLIC, ETPS, ERGC, SEEDS,
///   reSEEDS, FH),
/// - `merge_fragments(passes)`: additionally merge fragments that are small compared to the
///   fragment count (one pass for CRS, LSC and PB; two passes for CCS),
/// - `with_min_region_size(size)`: extra cleanup pass with a fixed pixel threshold (VC, see
///   `geometry::small_region_size()`).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Fraction of the mean component area below which a component is merged into a
    /// neighbor in the fragment merging passes.
    ///
    /// The threshold is computed as _round(min_size_factor * width * height / num_components)_
    /// where _num_components_ is the count reported by the connectivity split.
    pub min_size_factor: f32,
    /// How many fragment merging passes are run, all against the same threshold.
    /// Zero disables fragment merging.
    ///
    /// A merge can leave a new undersized remainder behind, a second pass picks those up.
    pub merge_passes: u8,
    /// Fixed minimum region size in pixels applied after fragment merging. Zero disables it.
    pub min_region_size: u32,
    /// Renumber labels to `0..K` in first-seen order at the end.
    pub canonicalize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size_factor: 0.25,
            merge_passes: 1,
            min_region_size: 0,
            canonicalize: true,
        }
    }
}

impl Config {
    pub fn connectivity_only() -> Self {
        Self {
            merge_passes: 0,
            canonicalize: false,
            ..Self::default()
        }
    }

    pub fn merge_fragments(passes: u8) -> Self {
        Self {
            merge_passes: passes,
            ..Self::default()
        }
    }

    pub fn with_min_region_size(mut self, min_region_size: u32) -> Self {
        self.min_region_size = min_region_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_size_factor.is_finite() || self.min_size_factor < 0.0 {
            return Err(Error::InvalidInput(format!(
                "min_size_factor must be a non-negative number, got {}",
                self.min_size_factor
            )));
        }
        Ok(())
    }
}

pub(crate) fn split_length_to_ranges(length: usize, splits: usize) -> Vec<Range<usize>> {
    let splits = splits.max(1);
    let chunk_size = length / splits;
    let rem = length % splits;
    (0..splits)
        .scan((rem, 0usize), |(r, acc), _split| {
            let mut size = chunk_size;
            if *r > 0 {
                *r -= 1;
                size += 1;
            }
            let out = (*acc, *acc + size);
            *acc += size;
            Some(out.0..out.1)
        })
        .collect()
}

/// Rewrites every label in `data` with `substitute(index, label)`. The buffer is cut into one
/// contiguous chunk per rayon thread; every element is written exactly once.
pub(crate) fn substitute_labels<F>(data: &mut [u32], substitute: F)
where
    F: Fn(usize, u32) -> u32 + Sync,
{
    let ranges = split_length_to_ranges(data.len(), current_num_threads());
    let substitute = &substitute;
    rayon::scope(|s| {
        let mut data_rest: &mut [u32] = data;
        for range in ranges {
            let (chunk, rest) = data_rest.split_at_mut(range.len());
            data_rest = rest;
            s.spawn(move |_| {
                (range.start..).zip(chunk.iter_mut()).for_each(|(i, label)| {
                    *label = substitute(i, *label);
                })
            });
        }
        debug_assert!(data_rest.is_empty(), "{} labels left unassigned", data_rest.len());
    });
}
