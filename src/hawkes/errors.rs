//! Errors for neural Hawkes models (event-data validation, configuration
//! checks, shape preconditions, and unimplemented operations).
//!
//! This module defines the crate-wide error type, [`HawkesError`], used
//! across the Rust core and, behind the `python-bindings` feature, converted
//! to `PyErr` at the PyO3 boundary.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to the real events `t_1..t_N`
//!   as supplied by the caller (the synthetic start `t_0 = 0` is never
//!   reported).
//! - Timestamps must be **finite, strictly increasing, strictly positive**
//!   and no later than the horizon.
//! - Shape errors carry both offending shapes so the caller can see which
//!   side of the contract was violated.
#[cfg(feature = "python-bindings")]
use pyo3::exceptions::{PyNotImplementedError, PyValueError};
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;
use statrs::distribution::NormalError;

/// Crate-wide result alias for operations that may produce [`HawkesError`].
pub type HawkesResult<T> = Result<T, HawkesError>;

/// Unified error type for neural Hawkes modeling.
///
/// Covers input/data validation, configuration checks, shape preconditions
/// inside the intensity evaluators, and explicit stubs. Implements
/// `Display`/`Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum HawkesError {
    // ---- Event data validation ----
    /// An event timestamp is NaN/±inf.
    NonFiniteTimestamp { index: usize, value: f64 },

    /// The first real event must lie strictly after the synthetic start 0.
    NonPositiveFirstEvent { value: f64 },

    /// Timestamps must be strictly increasing.
    NonIncreasingTimestamps { index: usize, previous: f64, value: f64 },

    /// The last event lies beyond the observation horizon.
    EventAfterHorizon { last: f64, horizon: f64 },

    /// Horizon must be finite and > 0.
    InvalidHorizon { value: f64 },

    /// A batch needs at least one sequence.
    EmptyBatch,

    /// All sequences of a batch must carry the same number of events.
    RaggedBatch { index: usize, expected: usize, found: usize },

    // ---- Configuration ----
    /// Hidden size must be > 0.
    InvalidHiddenSize { value: usize },

    /// Number of Monte-Carlo samples per interval must be > 0.
    InvalidMcSamples { value: usize },

    /// A sampling distribution could not be constructed.
    InvalidDistribution { reason: String },

    /// Unknown recurrent nonlinearity name.
    InvalidNonlinearity { name: String, reason: &'static str },

    // ---- Shapes ----
    /// Incompatible dimensions between a snapshot, a weight and a query.
    ShapeMismatch { op: &'static str, expected: Vec<usize>, found: Vec<usize> },

    /// Snapshot index outside the arena.
    SnapshotOutOfRange { index: usize, len: usize },

    // ---- Stubs ----
    /// Operation exists in the API but has no implementation yet.
    NotImplemented { op: &'static str },
}

impl std::error::Error for HawkesError {}

impl std::fmt::Display for HawkesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Event data validation ----
            HawkesError::NonFiniteTimestamp { index, value } => {
                write!(f, "Event timestamp at index {index} is non-finite: {value}")
            }
            HawkesError::NonPositiveFirstEvent { value } => {
                write!(f, "First event must occur strictly after time 0; got: {value}")
            }
            HawkesError::NonIncreasingTimestamps { index, previous, value } => {
                write!(
                    f,
                    "Event timestamps must be strictly increasing; index {index} has {value} after {previous}"
                )
            }
            HawkesError::EventAfterHorizon { last, horizon } => {
                write!(f, "Last event at {last} lies beyond the horizon {horizon}")
            }
            HawkesError::InvalidHorizon { value } => {
                write!(f, "Horizon must be finite and > 0; got: {value}")
            }
            HawkesError::EmptyBatch => {
                write!(f, "Event batch is empty.")
            }
            HawkesError::RaggedBatch { index, expected, found } => {
                write!(
                    f,
                    "Sequence {index} of the batch has {found} events; expected {expected}"
                )
            }
            // ---- Configuration ----
            HawkesError::InvalidHiddenSize { value } => {
                write!(f, "Hidden size must be > 0; got: {value}")
            }
            HawkesError::InvalidMcSamples { value } => {
                write!(f, "Monte-Carlo samples per interval must be > 0; got: {value}")
            }
            HawkesError::InvalidDistribution { reason } => {
                write!(f, "Could not build sampling distribution: {reason}")
            }
            HawkesError::InvalidNonlinearity { name, reason } => {
                write!(f, "Unknown nonlinearity '{name}'. {reason}")
            }
            // ---- Shapes ----
            HawkesError::ShapeMismatch { op, expected, found } => {
                write!(f, "Shape mismatch in {op}: expected {expected:?}, found {found:?}")
            }
            HawkesError::SnapshotOutOfRange { index, len } => {
                write!(f, "Snapshot index {index} out of range for {len} snapshots")
            }
            // ---- Stubs ----
            HawkesError::NotImplemented { op } => {
                write!(f, "{op} is not implemented")
            }
        }
    }
}

impl From<NormalError> for HawkesError {
    fn from(err: NormalError) -> HawkesError {
        HawkesError::InvalidDistribution { reason: err.to_string() }
    }
}

/// Convert a [`HawkesError`] into a Python exception with the error message.
///
/// `NotImplemented` maps to `NotImplementedError`; everything else maps to
/// `ValueError`.
#[cfg(feature = "python-bindings")]
impl std::convert::From<HawkesError> for PyErr {
    fn from(err: HawkesError) -> PyErr {
        match err {
            HawkesError::NotImplemented { .. } => PyNotImplementedError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
