//! hawkes — neural Hawkes processes: data, primitives, models and errors.
//!
//! Purpose
//! -------
//! Provide a self-contained layer for temporal point processes whose
//! intensity is driven by a latent state that is updated at each event and
//! decays continuously in between. This is the main entry point of the
//! crate and the surface the Python bindings wrap.
//!
//! Key behaviors
//! -------------
//! - [`core`]: validated event containers, affine / recurrent layers, the
//!   decay laws, the intensity head, snapshot arenas, options and sampling.
//! - [`models`]: [`HawkesRNN`], [`NeuralCTLSTM`] and the Monte-Carlo
//!   [`LikelihoodEstimator`].
//! - [`errors`]: [`HawkesError`] and the [`HawkesResult`] alias.
//!
//! Invariants & assumptions
//! ------------------------
//! - Event times satisfy `0 = t_0 < t_1 < … < t_N ≤ T_max` once wrapped in
//!   an [`EventSequence`]; nothing downstream re-validates them.
//! - Intensities are non-negative by construction. A zero intensity at an
//!   observed event gives an infinite loss, which is returned rather than
//!   clamped.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Build an [`EventSequence`] (or an [`EventBatch`]).
//!   2. Construct a model from its config and a seeded [`RngSampler`].
//!   3. Draw an initial state, run the forward pass to get snapshots.
//!   4. Evaluate [`LikelihoodEstimator::negative_log_likelihood`] (or the
//!      batch variant) with the same or another sampler.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; `tests/` holds end-to-end
//!   pipelines over both models.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CtlstmConfig, EstimatorOptions, EventBatch, EventSequence, IntensityHead, Nonlinearity,
    RngSampler, RnnConfig, SampleSource,
};

pub use self::errors::{HawkesError, HawkesResult};

pub use self::models::{
    CellState, ContinuousIntensity, HawkesRNN, LikelihoodEstimator, LikelihoodTerms,
    NeuralCTLSTM,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use neural_hawkes::hawkes::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::{
        CellState, ContinuousIntensity, CtlstmConfig, EstimatorOptions, EventBatch,
        EventSequence, HawkesError, HawkesRNN, HawkesResult, LikelihoodEstimator,
        LikelihoodTerms, NeuralCTLSTM, Nonlinearity, RngSampler, RnnConfig, SampleSource,
    };
}
