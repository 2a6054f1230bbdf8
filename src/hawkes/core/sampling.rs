//! Random sampling sources for initialization and Monte-Carlo quadrature.
//!
//! The likelihood estimator and the initial-state conventions draw all their
//! randomness through [`SampleSource`], which the caller owns and passes in
//! explicitly. No model holds a generator of its own, so evaluation is
//! reproducible given a seeded source.
use crate::hawkes::errors::HawkesResult;
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, distributions::Distribution, rngs::StdRng};
use statrs::distribution::Normal;

/// Source of the random draws used by the Hawkes models.
///
/// Required:
/// - `uniform01()`: a draw from `U[0, 1)`.
/// - `standard_normal()`: a draw from `N(0, 1)`.
///
/// Provided:
/// - `uniform(low, high)`: `low + (high − low)·U[0, 1)`. A zero-width
///   interval returns `low` without special casing.
/// - array fillers built on the scalar draws.
pub trait SampleSource {
    fn uniform01(&mut self) -> f64;
    fn standard_normal(&mut self) -> f64;

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.uniform01()
    }

    fn uniform01_array(&mut self, len: usize) -> Array1<f64> {
        Array1::from_shape_fn(len, |_| self.uniform01())
    }

    fn uniform_array2(&mut self, shape: (usize, usize), low: f64, high: f64) -> Array2<f64> {
        Array2::from_shape_fn(shape, |_| self.uniform(low, high))
    }

    fn standard_normal_array(&mut self, len: usize) -> Array1<f64> {
        Array1::from_shape_fn(len, |_| self.standard_normal())
    }
}

/// [`SampleSource`] backed by a `rand` generator and `statrs` distributions.
#[derive(Debug, Clone)]
pub struct RngSampler<R: Rng = StdRng> {
    rng: R,
    normal: Normal,
}

impl RngSampler<StdRng> {
    /// Build a sampler from an optional seed; `None` seeds from OS entropy.
    pub fn from_seed(seed: Option<u64>) -> HawkesResult<Self> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> HawkesResult<Self> {
        let normal = Normal::new(0.0, 1.0)?;
        Ok(RngSampler { rng, normal })
    }
}

impl<R: Rng> SampleSource for RngSampler<R> {
    fn uniform01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn standard_normal(&mut self) -> f64 {
        self.normal.sample(&mut self.rng)
    }
}
