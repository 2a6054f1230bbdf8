//! core — shared neural Hawkes data, layers, decay and intensity primitives.
//!
//! Purpose
//! -------
//! Collect the building blocks both neural Hawkes parameterizations are
//! assembled from: validated event containers, affine and recurrent layers,
//! the continuous-time decay laws, the intensity projection, snapshot
//! arenas, configuration types and the sampling source. The model layer in
//! `hawkes::models` composes these without re-implementing any numerics.
//!
//! Key behaviors
//! -------------
//! - Track event times in [`EventSequence`] / [`EventBatch`] with the
//!   synthetic start `t_0 = 0` and the gap vectors every recursion consumes.
//! - Provide [`Linear`] and [`RNNCell`] with explicit parameter buffers and
//!   shape-checked application.
//! - Implement the plain and asymptotic decay laws in [`decay`] and the
//!   non-negative projection [`IntensityHead`].
//! - Store per-interval state in [`RnnSnapshots`] / [`CtlstmSnapshots`] so
//!   queries can be gathered and evaluated in bulk.
//! - Route every random draw through a caller-owned [`SampleSource`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Event times are validated once at construction; downstream code assumes
//!   `0 = t_0 < t_1 < … < t_N ≤ T_max`.
//! - Decay rates and intensities are produced through softplus / ReLU and
//!   are therefore non-negative.
//! - Shape disagreements are reported as `HawkesError::ShapeMismatch`,
//!   never as panics.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based. Snapshot row `i` belongs to interval
//!   `[t_i, t_{i+1})`; row `N` covers the censored tail `[t_N, T_max]`.
//! - Matrices are row-major in the sense "one row per query / batch member".
//! - Only [`validation`] logs (at `error` level, on shape mismatches).
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own contract; integration
//!   tests under `tests/` exercise the full forward + likelihood pipeline.

pub mod data;
pub mod decay;
pub mod intensity;
pub mod layers;
pub mod options;
pub mod sampling;
pub mod snapshots;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{EventBatch, EventSequence};
pub use self::decay::{
    decay_asymptotic, decay_asymptotic_rows, decay_asymptotic_scalar, decay_plain,
    decay_plain_rows, decay_plain_scalar,
};
pub use self::intensity::{IntensityActivation, IntensityHead};
pub use self::layers::{Linear, Nonlinearity, RNNCell};
pub use self::options::{CtlstmConfig, EstimatorOptions, RnnConfig};
pub use self::sampling::{RngSampler, SampleSource};
pub use self::snapshots::{CtlstmRows, CtlstmSnapshots, RnnSnapshots, SnapshotArena};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use neural_hawkes::hawkes::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::data::{EventBatch, EventSequence};
    pub use super::intensity::{IntensityActivation, IntensityHead};
    pub use super::layers::{Linear, Nonlinearity, RNNCell};
    pub use super::options::{CtlstmConfig, EstimatorOptions, RnnConfig};
    pub use super::sampling::{RngSampler, SampleSource};
    pub use super::snapshots::{CtlstmSnapshots, RnnSnapshots, SnapshotArena};
}
