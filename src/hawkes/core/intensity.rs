//! Intensity head: map a (decayed) latent state to a non-negative rate.
//!
//! Purpose
//! -------
//! Provide the final projection `λ = act(w · state)` shared by both Hawkes
//! parameterizations. The recurrent variant uses a ReLU activation over a
//! learned weight; the CT-LSTM variant uses softplus over a fixed `U[0, 1)`
//! weight.
//!
//! Key behaviors
//! -------------
//! - [`IntensityHead::intensity`] evaluates one state vector.
//! - [`IntensityHead::intensities`] evaluates every row of an `M × H` matrix
//!   in a single product and checks the width first, returning
//!   `HawkesError::ShapeMismatch` with both shapes on disagreement.
//!
//! Invariants & assumptions
//! ------------------------
//! - Outputs are always `>= 0` for finite inputs; NaN propagates.
use crate::{
    hawkes::{
        core::{
            layers::Linear,
            sampling::SampleSource,
            validation::{validate_hidden_size, validate_len, validate_shape},
        },
        errors::HawkesResult,
    },
    numerical_stability::transformations::{relu, safe_softplus},
};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Output activation of an [`IntensityHead`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityActivation {
    Relu,
    Softplus,
}

impl IntensityActivation {
    fn apply(&self, x: f64) -> f64 {
        match self {
            IntensityActivation::Relu => relu(x),
            IntensityActivation::Softplus => safe_softplus(x),
        }
    }
}

/// `IntensityHead` — bias-free projection followed by a non-negative
/// activation.
///
/// Fields
/// ------
/// - `weight`: `Array1<f64>` of length `H`.
/// - `activation`: [`IntensityActivation`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityHead {
    weight: Array1<f64>,
    activation: IntensityActivation,
}

impl IntensityHead {
    /// Head over a caller-supplied weight vector.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::InvalidHiddenSize` for an empty weight.
    pub fn new(weight: Array1<f64>, activation: IntensityActivation) -> HawkesResult<Self> {
        validate_hidden_size(weight.len())?;
        Ok(IntensityHead { weight, activation })
    }

    /// ReLU head whose weight is initialized like a bias-free `Linear(H, 1)`.
    pub fn relu_linear<S: SampleSource + ?Sized>(
        hidden_size: usize, sampler: &mut S,
    ) -> HawkesResult<Self> {
        let lin = Linear::new(hidden_size, 1, false, sampler)?;
        Self::new(lin.weight().row(0).to_owned(), IntensityActivation::Relu)
    }

    /// Softplus head with a fixed `U[0, 1)` weight.
    pub fn softplus_uniform<S: SampleSource + ?Sized>(
        hidden_size: usize, sampler: &mut S,
    ) -> HawkesResult<Self> {
        validate_hidden_size(hidden_size)?;
        Self::new(sampler.uniform01_array(hidden_size), IntensityActivation::Softplus)
    }

    pub fn hidden_size(&self) -> usize {
        self.weight.len()
    }

    pub fn weight(&self) -> ArrayView1<'_, f64> {
        self.weight.view()
    }

    pub fn activation(&self) -> IntensityActivation {
        self.activation
    }

    /// Mutable access for external optimizers.
    pub fn weight_mut(&mut self) -> &mut Array1<f64> {
        &mut self.weight
    }

    /// Intensity of a single state vector.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if `state.len() != H`.
    pub fn intensity(&self, state: ArrayView1<'_, f64>) -> HawkesResult<f64> {
        validate_len("IntensityHead::intensity", self.hidden_size(), state.len())?;
        Ok(self.activation.apply(self.weight.dot(&state)))
    }

    /// Intensities of every row of `states` (`M × H`), returned as length `M`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch { expected: [M, H], found: [M, H'] }`.
    pub fn intensities(&self, states: ArrayView2<'_, f64>) -> HawkesResult<Array1<f64>> {
        validate_shape(
            "IntensityHead::intensities",
            &[states.nrows(), self.hidden_size()],
            states.shape(),
        )?;
        let act = self.activation;
        Ok(states.dot(&self.weight).mapv_into(|x| act.apply(x)))
    }
}
