use crate::arrays::LabelMap;
use crate::common::Config;
use crate::connectivity::relabel_connected;
use crate::error::Result;
use crate::merge::{enforce_minimum_size, enforce_minimum_size_repeated, min_size_from_bound};
use crate::relabel::canonicalize;

/// Counts reported after post-processing one label map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Distinct labels in the raw label map.
    pub num_input_labels: u32,
    /// Connected components after splitting disconnected labels.
    pub num_components: u32,
    /// Components merged by all size enforcement passes together.
    pub merges: u32,
    /// Components left below the size threshold of the last size enforcement pass.
    pub residual_undersized: u32,
    /// Superpixels in the final label map.
    pub num_superpixels: u32,
}

/// Repairs a raw label map in place.
///
/// The steps are:
/// - split labels into connected components (`connectivity::relabel_connected()`)
/// - `config.merge_passes` fragment merging passes with the threshold derived from the
///   component count (`merge::min_size_from_bound()`)
/// - one pass with the fixed `config.min_region_size`, when non-zero
/// - renumbering to `0..K` (`relabel::canonicalize()`), when enabled
///
/// Fails with `InvalidInput` before touching the label map when the config is invalid.
pub fn post_process(labels: &mut LabelMap, config: &Config) -> Result<Summary> {
    config.validate()?;
    let mut summary = Summary {
        num_input_labels: labels.count_labels(),
        ..Summary::default()
    };
    if labels.is_empty() {
        return Ok(summary);
    }

    summary.num_components = relabel_connected(labels);
    summary.num_superpixels = summary.num_components;

    if config.merge_passes > 0 {
        let min_size = min_size_from_bound(labels, summary.num_components, config)?;
        let report = enforce_minimum_size_repeated(labels, min_size, config.merge_passes);
        summary.merges += report.merges;
        summary.residual_undersized = report.residual_undersized;
    }

    if config.min_region_size > 0 {
        let report = enforce_minimum_size(labels, config.min_region_size);
        summary.merges += report.merges;
        summary.residual_undersized = report.residual_undersized;
    }

    if config.canonicalize {
        summary.num_superpixels = canonicalize(labels);
    } else if summary.merges > 0 {
        summary.num_superpixels = summary.num_components - summary.merges;
    }

    log::debug!(
        "post-processing: {} labels -> {} components -> {} superpixels ({} merges)",
        summary.num_input_labels,
        summary.num_components,
        summary.num_superpixels,
        summary.merges
    );
    Ok(summary)
}
