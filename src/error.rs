use thiserror::Error;

/// Errors returned by label map construction and the post-processing stages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Zero superpixel count, zero-area image, ragged rows, negative labels or a buffer that
    /// does not match the given dimensions. Nothing is mutated when this is returned.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Some regions are still smaller than the requested minimum size after merging. Only
    /// produced on request by [`crate::merge::MergeReport::check`].
    #[error("{residual} region(s) remain below the minimum size of {min_size} pixels")]
    DegenerateMerge { residual: u32, min_size: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
