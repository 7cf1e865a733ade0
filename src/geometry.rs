//! Initial region geometry for segmentation algorithms.
//!
//! Everything here is computed from the image dimensions and the desired number of
//! superpixels _K_. Rounding is always `f64::round()` (half away from zero) and every side is
//! clamped to at least one pixel.
use crate::error::{Error, Result};

/// Hierarchical plans always have at least this many levels.
pub const MIN_LEVELS: u32 = 2;
/// Upper bound for the longest side of the finest (base) block in hierarchical plans.
pub const MAX_BASE_SIDE: f64 = 4.0;

/// Size of one initial region in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionSize {
    pub height: u32,
    pub width: u32,
}

/// Region plan for hierarchical algorithms (SEEDS-like). The region at level `l` is the base
/// region doubled `l` times, the coarsest level is `levels - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    pub levels: u32,
    /// Base (finest) region.
    pub region: RegionSize,
    /// Number of regions a grid of coarsest-level blocks needs to cover the image.
    pub coarsest_superpixels: u64,
}

impl LevelPlan {
    pub fn region_at_level(&self, level: u32) -> RegionSize {
        debug_assert!(level < self.levels);
        RegionSize {
            height: self.region.height << level,
            width: self.region.width << level,
        }
    }
}

/// Returns the mean region area _W * H / K_ after checking the inputs.
fn area_per_superpixel(width: usize, height: usize, superpixels: u32) -> Result<f64> {
    if superpixels == 0 {
        return Err(Error::InvalidInput(
            "desired number of superpixels must be positive".to_string(),
        ));
    }
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "image of {width}x{height} pixels has no area"
        )));
    }
    Ok((width as f64 * height as f64) / superpixels as f64)
}

#[inline]
fn side(value: f64) -> u32 {
    value.round().max(1.0) as u32
}

/// Side length _S = round(sqrt(W * H / K))_ of a square region.
pub fn region_size(width: usize, height: usize, superpixels: u32) -> Result<u32> {
    Ok(side(area_per_superpixel(width, height, superpixels)?.sqrt()))
}

/// Rectangular region keeping the aspect ratio of the image: _W / sqrt(K)_ by _H / sqrt(K)_.
pub fn height_width(width: usize, height: usize, superpixels: u32) -> Result<RegionSize> {
    area_per_superpixel(width, height, superpixels)?;
    let k_sqrt = (superpixels as f64).sqrt();
    Ok(RegionSize {
        height: side(height as f64 / k_sqrt),
        width: side(width as f64 / k_sqrt),
    })
}

fn plan_levels_for_target(
    width: usize,
    height: usize,
    target_height: f64,
    target_width: f64,
) -> LevelPlan {
    let longest = target_height.max(target_width);
    let mut levels = MIN_LEVELS;
    while longest / f64::from(1u32 << (levels - 1)) > MAX_BASE_SIDE && levels < 31 {
        levels += 1;
    }
    let scale = f64::from(1u32 << (levels - 1));
    let region = RegionSize {
        height: side(target_height / scale),
        width: side(target_width / scale),
    };
    let coarse_height = (region.height as u64) << (levels - 1);
    let coarse_width = (region.width as u64) << (levels - 1);
    LevelPlan {
        levels,
        region,
        coarsest_superpixels: (height as u64).div_ceil(coarse_height)
            * (width as u64).div_ceil(coarse_width),
    }
}

/// Levels and base region such that doubling the base region `levels - 1` times gives
/// approximately the rectangular region of [`height_width()`].
///
/// `levels` is the smallest number (at least [`MIN_LEVELS`]) for which the longest side of the
/// base region does not exceed [`MAX_BASE_SIDE`].
pub fn height_width_levels(width: usize, height: usize, superpixels: u32) -> Result<LevelPlan> {
    area_per_superpixel(width, height, superpixels)?;
    let k_sqrt = (superpixels as f64).sqrt();
    Ok(plan_levels_for_target(
        width,
        height,
        height as f64 / k_sqrt,
        width as f64 / k_sqrt,
    ))
}

/// Square variant of [`height_width_levels()`].
pub fn region_size_levels(width: usize, height: usize, superpixels: u32) -> Result<LevelPlan> {
    let target = area_per_superpixel(width, height, superpixels)?.sqrt();
    Ok(plan_levels_for_target(width, height, target, target))
}

/// Region for grid initialization. With `fair` set the region is square so every compared
/// algorithm starts from the same blocks.
pub fn plan_region(
    width: usize,
    height: usize,
    superpixels: u32,
    fair: bool,
) -> Result<RegionSize> {
    if fair {
        let size = region_size(width, height, superpixels)?;
        Ok(RegionSize {
            height: size,
            width: size,
        })
    } else {
        height_width(width, height, superpixels)
    }
}

pub fn plan_levels(width: usize, height: usize, superpixels: u32, fair: bool) -> Result<LevelPlan> {
    if fair {
        region_size_levels(width, height, superpixels)
    } else {
        height_width_levels(width, height, superpixels)
    }
}

/// Fixed threshold for small region cleanup: a tenth of the mean region area, truncated.
pub fn small_region_size(width: usize, height: usize, superpixels: u32) -> Result<u32> {
    area_per_superpixel(width, height, superpixels)?;
    Ok(((width as u64 * height as u64) / superpixels as u64 / 10) as u32)
}
