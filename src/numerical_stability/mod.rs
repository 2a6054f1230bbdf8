//! numerical_stability — numerically robust elementwise activations.
//!
//! Purpose
//! -------
//! Collect the scalar and array nonlinearities used by the neural Hawkes
//! stack (softplus, logistic, relu, tanh) so every model applies the same
//! overflow-safe formulas.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, `safe_logistic`,
//!   `relu`) for mapping unconstrained pre-activations into `[0, ∞)` or
//!   `(0, 1)` without overflow/underflow.
//! - Provide `*_inplace` helpers that apply those transforms to whole
//!   `ndarray` buffers without allocating.
//!
//! Invariants & assumptions
//! ------------------------
//! - `safe_softplus` and `relu` never return a negative value for a
//!   non-NaN input; decay rates and intensities rely on this.
//! - NaN inputs are propagated, not masked.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas
//!   on safe grids, tail behavior and the in-place helpers.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    SOFTPLUS_CUTOFF, logistic_inplace, relu, relu_inplace, safe_logistic, safe_softplus,
    softplus_inplace, tanh_inplace,
};
