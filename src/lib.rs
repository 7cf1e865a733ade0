//! Post-processing of superpixel label maps in Rust.
//!
//! Segmentation algorithms (SLIC, SEEDS, CRS, LSC, ...) produce a label map which can contain
//! labels split into several disconnected pieces, tiny fragments and sparse label values. This
//! crate repairs such label maps into a valid partition:
//!
//! - `connectivity`: every label becomes exactly one 4-connected superpixel,
//! - `merge`: superpixels below a minimum size are merged into a neighbor,
//! - `relabel`: labels are renumbered to `0..K` in first-seen order,
//! - `geometry`: initial region sizes for the segmentation algorithms themselves.
//!
//! The segmentation itself, image I/O and visualization are not part of this crate.
//!
//! The following example repairs a label map coming from some segmentation:
//!
//! ```rust
//! use superpixel_repair::arrays::LabelMap;
//! use superpixel_repair::common::Config;
//! use superpixel_repair::geometry::region_size;
//! use superpixel_repair::pipeline::post_process;
//!
//! fn main() -> Result<(), superpixel_repair::error::Error> {
//!     // region size the segmentation should use for 400 superpixels
//!     assert_eq!(region_size(100, 100, 400)?, 5);
//!     // label map (normally produced by the segmentation)
//!     let mut labels = LabelMap::from_rows(&[
//!         [4u32, 4, 9, 9],
//!         [4, 9, 9, 4],
//!         [4, 4, 9, 9],
//!     ])?;
//!     // split, merge fragments, remove regions below 2 pixels and renumber
//!     let config = Config::merge_fragments(1).with_min_region_size(2);
//!     let summary = post_process(&mut labels, &config)?;
//!     assert_eq!(summary.num_components, 3);
//!     assert_eq!(summary.num_superpixels, 2);
//!     assert_eq!(labels.get_row(1), &[0, 1, 1, 1]);
//!     Ok(())
//! }
//! ```
//!
//! Every stage is deterministic: the same label map always gives the same output. Stages run
//! sequentially on one image; only the final label substitution of `merge` and `relabel` is
//! spread over the rayon thread pool, which does not change the result. Images can be
//! processed in parallel since no state is shared between calls.
//!
//! Logging goes through the `log` crate (`debug` for stage counts, `warn` when a size
//! threshold cannot be met).

pub mod arrays;
pub mod common;
pub mod connectivity;
pub mod error;
pub mod geometry;
pub mod merge;
pub mod pipeline;
pub mod relabel;
