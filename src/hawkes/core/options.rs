//! Hawkes options — configuration for model construction and likelihood
//! evaluation.
//!
//! Purpose
//! -------
//! Collect the configuration knobs of both neural Hawkes variants and of the
//! Monte-Carlo likelihood estimator in validated, plain-data structs, so
//! call sites pass explicit options instead of ad-hoc arguments.
//!
//! Key behaviors
//! -------------
//! - [`RnnConfig`]: hidden size and recurrent nonlinearity of `HawkesRNN`.
//! - [`CtlstmConfig`]: hidden size of `NeuralCTLSTM`.
//! - [`EstimatorOptions`]: Monte-Carlo samples per interval and an optional
//!   RNG seed for the estimator's sampler.
//! - Every `new` validates its inputs and returns [`HawkesResult`]; every
//!   struct has a `Default` matching the reference configuration.
//!
//! Conventions
//! -----------
//! - Defaults: hidden size 16, ReLU recurrence, one Monte-Carlo sample per
//!   interval, entropy seeding.
//!
//! Testing notes
//! -------------
//! - Unit tests check that defaults are valid, that `new` preserves its
//!   inputs, and that zero sizes are rejected.
use crate::hawkes::{
    core::{
        layers::Nonlinearity,
        sampling::RngSampler,
        validation::{validate_hidden_size, validate_mc_samples},
    },
    errors::HawkesResult,
};

/// Default hidden size for both variants.
pub const DEFAULT_HIDDEN_SIZE: usize = 16;

/// Default Monte-Carlo samples per interval.
pub const DEFAULT_MC_SAMPLES: usize = 1;

/// RnnConfig — construction options for `HawkesRNN`.
///
/// Fields
/// ------
/// - `hidden_size`: width `H` of the hidden state, `> 0`.
/// - `nonlinearity`: elementwise activation of the recurrent cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RnnConfig {
    pub hidden_size: usize,
    pub nonlinearity: Nonlinearity,
}

impl RnnConfig {
    /// Errors
    /// ------
    /// - `HawkesError::InvalidHiddenSize` when `hidden_size == 0`.
    pub fn new(hidden_size: usize, nonlinearity: Nonlinearity) -> HawkesResult<Self> {
        validate_hidden_size(hidden_size)?;
        Ok(RnnConfig { hidden_size, nonlinearity })
    }
}

impl Default for RnnConfig {
    fn default() -> Self {
        RnnConfig { hidden_size: DEFAULT_HIDDEN_SIZE, nonlinearity: Nonlinearity::Relu }
    }
}

/// CtlstmConfig — construction options for `NeuralCTLSTM`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtlstmConfig {
    pub hidden_size: usize,
}

impl CtlstmConfig {
    pub fn new(hidden_size: usize) -> HawkesResult<Self> {
        validate_hidden_size(hidden_size)?;
        Ok(CtlstmConfig { hidden_size })
    }
}

impl Default for CtlstmConfig {
    fn default() -> Self {
        CtlstmConfig { hidden_size: DEFAULT_HIDDEN_SIZE }
    }
}

/// EstimatorOptions — Monte-Carlo configuration of the likelihood estimator.
///
/// Fields
/// ------
/// - `mc_samples`: `usize`
///   Uniform samples drawn per interval for the compensator, `> 0`. One
///   sample gives the unbiased single-draw estimator.
/// - `seed`: `Option<u64>`
///   Seed for [`EstimatorOptions::sampler`]; `None` seeds from OS entropy.
///
/// Notes
/// -----
/// - The estimator itself never owns a generator. `seed` only configures the
///   sampler handed out by [`EstimatorOptions::sampler`] for callers that do
///   not manage one themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorOptions {
    pub mc_samples: usize,
    pub seed: Option<u64>,
}

impl EstimatorOptions {
    /// Errors
    /// ------
    /// - `HawkesError::InvalidMcSamples` when `mc_samples == 0`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use neural_hawkes::hawkes::core::options::EstimatorOptions;
    /// let opts = EstimatorOptions::new(8, Some(42)).unwrap();
    /// assert_eq!(opts.mc_samples, 8);
    /// assert!(EstimatorOptions::new(0, None).is_err());
    /// ```
    pub fn new(mc_samples: usize, seed: Option<u64>) -> HawkesResult<Self> {
        validate_mc_samples(mc_samples)?;
        Ok(EstimatorOptions { mc_samples, seed })
    }

    /// Fresh sampler seeded from `seed`.
    pub fn sampler(&self) -> HawkesResult<RngSampler> {
        RngSampler::from_seed(self.seed)
    }
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        EstimatorOptions { mc_samples: DEFAULT_MC_SAMPLES, seed: None }
    }
}
