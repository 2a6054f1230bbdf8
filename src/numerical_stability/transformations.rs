//! Numerical stability utilities.
//!
//! Provides safe implementations of the elementwise nonlinearities used by
//! the neural Hawkes models. The scalar functions follow guarded strategies
//! similar to those in major ML libraries (e.g. PyTorch, TensorFlow), using
//! explicit cutoffs (`x > 20.0`) to keep `f64` arithmetic in a
//! well-conditioned regime.
//!
//! # Provided items
//! - [`SOFTPLUS_CUTOFF`]: threshold above which `softplus(x) == x` in `f64`.
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → [0, ∞) without overflow.
//! - [`safe_logistic(x)`]: stable sigmoid `1 / (1 + exp(-x))`.
//! - [`relu(x)`]: `max(x, 0)`.
//! - `*_inplace` helpers applying the above to whole `ndarray` buffers.
//!
//! # Rationale
//! Decay rates and intensities must be non-negative, and gate values must
//! stay in `(0, 1)` even for large-magnitude pre-activations. Every model in
//! the crate routes its activations through this module.
use ndarray::{ArrayBase, DataMut, Dimension};

/// Threshold above which softplus is evaluated as the identity.
pub const SOFTPLUS_CUTOFF: f64 = 20.0;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// For very negative `x` the result underflows to `0.0`, never below, so
/// softplus outputs can be used directly as decay rates and intensities.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`, always `>= 0`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > SOFTPLUS_CUTOFF { x } else { x.exp().ln_1p() }
}

/// Numerically stable logistic sigmoid `σ(x) = 1 / (1 + exp(-x))`.
///
/// Evaluates `exp` only on non-positive arguments so neither branch can
/// overflow:
///
/// - `x >= 0`: `1 / (1 + exp(-x))`
/// - `x < 0`:  `exp(x) / (1 + exp(x))`
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Rectified linear unit, `max(x, 0)`.
///
/// NaN inputs propagate unchanged so upstream bugs stay visible.
pub fn relu(x: f64) -> f64 {
    if x > 0.0 || x.is_nan() { x } else { 0.0 }
}

/// Apply [`safe_softplus`] to every element of `a` in place.
pub fn softplus_inplace<S, D>(a: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    a.mapv_inplace(safe_softplus);
}

/// Apply [`safe_logistic`] to every element of `a` in place.
pub fn logistic_inplace<S, D>(a: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    a.mapv_inplace(safe_logistic);
}

/// Apply `tanh` to every element of `a` in place.
pub fn tanh_inplace<S, D>(a: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    a.mapv_inplace(f64::tanh);
}

/// Apply [`relu`] to every element of `a` in place.
pub fn relu_inplace<S, D>(a: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    a.mapv_inplace(relu);
}
