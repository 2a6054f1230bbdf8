//! Validation helpers shared by the Hawkes core.
//!
//! Purpose
//! -------
//! Centralize the precondition checks the layers, snapshot arenas and
//! intensity evaluators run before touching their buffers, so each failure
//! is surfaced as the same structured [`HawkesError`] and reported through
//! `tracing` once.
//!
//! Conventions
//! -----------
//! - Every helper returns `HawkesResult<()>` and never panics on bad input.
//! - Shape checks log the mismatch at `error` level before returning it;
//!   callers must not log it a second time.
use crate::hawkes::errors::{HawkesError, HawkesResult};
use tracing::error;

/// Check that a 1-D length matches the expected length.
///
/// Errors
/// ------
/// - `HawkesError::ShapeMismatch { op, expected: [expected], found: [found] }`.
pub fn validate_len(op: &'static str, expected: usize, found: usize) -> HawkesResult<()> {
    if expected != found {
        return Err(shape_mismatch(op, vec![expected], vec![found]));
    }
    Ok(())
}

/// Check that a full shape matches the expected shape.
///
/// Errors
/// ------
/// - `HawkesError::ShapeMismatch` carrying both shapes.
pub fn validate_shape(op: &'static str, expected: &[usize], found: &[usize]) -> HawkesResult<()> {
    if expected != found {
        return Err(shape_mismatch(op, expected.to_vec(), found.to_vec()));
    }
    Ok(())
}

/// Hidden sizes must be strictly positive.
pub fn validate_hidden_size(value: usize) -> HawkesResult<()> {
    if value == 0 {
        return Err(HawkesError::InvalidHiddenSize { value });
    }
    Ok(())
}

/// Monte-Carlo sample counts must be strictly positive.
pub fn validate_mc_samples(value: usize) -> HawkesResult<()> {
    if value == 0 {
        return Err(HawkesError::InvalidMcSamples { value });
    }
    Ok(())
}

/// Check that a snapshot index lies inside an arena of `len` snapshots.
pub fn validate_snapshot_index(index: usize, len: usize) -> HawkesResult<()> {
    if index >= len {
        return Err(HawkesError::SnapshotOutOfRange { index, len });
    }
    Ok(())
}

// ---- Helper Methods ----

fn shape_mismatch(op: &'static str, expected: Vec<usize>, found: Vec<usize>) -> HawkesError {
    error!(op, ?expected, ?found, "shape mismatch");
    HawkesError::ShapeMismatch { op, expected, found }
}
