//! Feed-forward building blocks: learnable affine maps and a recurrent cell.
//!
//! Purpose
//! -------
//! Provide the two generic collaborators both Hawkes parameterizations are
//! wired from: [`Linear`] (`y = W x + b`) and [`RNNCell`]
//! (`h' = φ(W_ih x + b_ih + W_hh h + b_hh)`). Parameters are plain `ndarray`
//! buffers owned by the layer; training code outside the crate reads and
//! overwrites them through the accessors.
//!
//! Key behaviors
//! -------------
//! - Random construction follows the usual uniform fan-in convention
//!   `U(−1/√fan, 1/√fan)` and draws through a caller-owned
//!   [`SampleSource`].
//! - `from_parts` constructors accept externally supplied parameters after
//!   checking that their shapes agree.
//! - Every `apply`/`step` checks its input shape and returns
//!   `HawkesError::ShapeMismatch` instead of panicking inside `ndarray`.
//!
//! Conventions
//! -----------
//! - Weights are stored `out × in`; batched inputs are `B × in` and produce
//!   `B × out`.
use crate::{
    hawkes::{
        core::{
            sampling::SampleSource,
            validation::{validate_hidden_size, validate_len, validate_shape},
        },
        errors::{HawkesError, HawkesResult},
    },
    numerical_stability::transformations::{relu_inplace, tanh_inplace},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::str::FromStr;

/// Elementwise nonlinearity applied by [`RNNCell`].
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"tanh"`, `"relu"`). Unknown names return
/// `HawkesError::InvalidNonlinearity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nonlinearity {
    Tanh,
    Relu,
}

impl Nonlinearity {
    /// Apply the nonlinearity to every element of `a` in place.
    pub fn apply_inplace(&self, a: &mut Array2<f64>) {
        match self {
            Nonlinearity::Tanh => tanh_inplace(a),
            Nonlinearity::Relu => relu_inplace(a),
        }
    }
}

impl FromStr for Nonlinearity {
    type Err = HawkesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tanh" => Ok(Nonlinearity::Tanh),
            "relu" => Ok(Nonlinearity::Relu),
            _ => Err(HawkesError::InvalidNonlinearity {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'tanh' or 'relu'.",
            }),
        }
    }
}

/// Learnable affine transform `y = W x (+ b)`.
///
/// Fields
/// ------
/// - `weight`: `Array2<f64>` of shape `out × in`.
/// - `bias`: `Option<Array1<f64>>` of length `out` when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    weight: Array2<f64>,
    bias: Option<Array1<f64>>,
}

impl Linear {
    /// Randomly initialized affine map with weights and bias drawn from
    /// `U(−1/√in, 1/√in)`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::InvalidHiddenSize` if either dimension is zero.
    pub fn new<S: SampleSource + ?Sized>(
        in_dim: usize, out_dim: usize, bias: bool, sampler: &mut S,
    ) -> HawkesResult<Self> {
        let bound = 1.0 / (in_dim.max(1) as f64).sqrt();
        Self::with_bound(in_dim, out_dim, bias, bound, sampler)
    }

    /// Randomly initialized affine map with every parameter drawn from
    /// `U(−bound, bound)`.
    pub fn with_bound<S: SampleSource + ?Sized>(
        in_dim: usize, out_dim: usize, bias: bool, bound: f64, sampler: &mut S,
    ) -> HawkesResult<Self> {
        validate_hidden_size(in_dim)?;
        validate_hidden_size(out_dim)?;
        let weight = sampler.uniform_array2((out_dim, in_dim), -bound, bound);
        let bias = if bias {
            Some(Array1::from_shape_fn(out_dim, |_| sampler.uniform(-bound, bound)))
        } else {
            None
        };
        Ok(Linear { weight, bias })
    }

    /// Affine map over caller-supplied parameters.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::InvalidHiddenSize` for an empty weight.
    /// - `HawkesError::ShapeMismatch` if `bias.len() != weight.nrows()`.
    pub fn from_parts(weight: Array2<f64>, bias: Option<Array1<f64>>) -> HawkesResult<Self> {
        validate_hidden_size(weight.nrows())?;
        validate_hidden_size(weight.ncols())?;
        if let Some(b) = &bias {
            validate_len("Linear::from_parts", weight.nrows(), b.len())?;
        }
        Ok(Linear { weight, bias })
    }

    pub fn in_dim(&self) -> usize {
        self.weight.ncols()
    }

    pub fn out_dim(&self) -> usize {
        self.weight.nrows()
    }

    pub fn weight(&self) -> ArrayView2<'_, f64> {
        self.weight.view()
    }

    pub fn bias(&self) -> Option<ArrayView1<'_, f64>> {
        self.bias.as_ref().map(|b| b.view())
    }

    /// Mutable access for external optimizers.
    pub fn params_mut(&mut self) -> (&mut Array2<f64>, Option<&mut Array1<f64>>) {
        (&mut self.weight, self.bias.as_mut())
    }

    /// Apply to a single input vector of length `in`.
    pub fn apply(&self, x: ArrayView1<'_, f64>) -> HawkesResult<Array1<f64>> {
        validate_len("Linear::apply", self.in_dim(), x.len())?;
        let mut y = self.weight.dot(&x);
        if let Some(b) = &self.bias {
            y += b;
        }
        Ok(y)
    }

    /// Apply row-wise to a `B × in` batch, producing `B × out`.
    pub fn apply_batch(&self, x: ArrayView2<'_, f64>) -> HawkesResult<Array2<f64>> {
        validate_len("Linear::apply_batch", self.in_dim(), x.ncols())?;
        let mut y = x.dot(&self.weight.t());
        if let Some(b) = &self.bias {
            y += &b.view().insert_axis(Axis(0));
        }
        Ok(y)
    }
}

/// Generic Elman recurrent cell `h' = φ(W_ih x + b_ih + W_hh h + b_hh)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RNNCell {
    input: Linear,
    hidden: Linear,
    nonlinearity: Nonlinearity,
}

impl RNNCell {
    /// Randomly initialized cell; every parameter is drawn from
    /// `U(−1/√hidden, 1/√hidden)`.
    pub fn new<S: SampleSource + ?Sized>(
        input_size: usize, hidden_size: usize, nonlinearity: Nonlinearity, sampler: &mut S,
    ) -> HawkesResult<Self> {
        validate_hidden_size(hidden_size)?;
        let bound = 1.0 / (hidden_size as f64).sqrt();
        let input = Linear::with_bound(input_size, hidden_size, true, bound, sampler)?;
        let hidden = Linear::with_bound(hidden_size, hidden_size, true, bound, sampler)?;
        Ok(RNNCell { input, hidden, nonlinearity })
    }

    /// Cell over caller-supplied input and recurrent maps.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` unless `hidden` is square and its size
    ///   matches `input.out_dim()`.
    pub fn from_parts(
        input: Linear, hidden: Linear, nonlinearity: Nonlinearity,
    ) -> HawkesResult<Self> {
        let h = input.out_dim();
        validate_shape("RNNCell::from_parts", &[h, h], &[hidden.out_dim(), hidden.in_dim()])?;
        Ok(RNNCell { input, hidden, nonlinearity })
    }

    pub fn input_size(&self) -> usize {
        self.input.in_dim()
    }

    pub fn hidden_size(&self) -> usize {
        self.input.out_dim()
    }

    pub fn nonlinearity(&self) -> Nonlinearity {
        self.nonlinearity
    }

    pub fn input_map(&self) -> &Linear {
        &self.input
    }

    pub fn hidden_map(&self) -> &Linear {
        &self.hidden
    }

    /// One step for a single sequence.
    pub fn step(
        &self, x: ArrayView1<'_, f64>, h_prev: ArrayView1<'_, f64>,
    ) -> HawkesResult<Array1<f64>> {
        let out = self.step_batch(x.insert_axis(Axis(0)), h_prev.insert_axis(Axis(0)))?;
        Ok(out.index_axis_move(Axis(0), 0))
    }

    /// One step for a `B`-row batch: `x` is `B × input_size`, `h_prev` is
    /// `B × hidden_size`.
    pub fn step_batch(
        &self, x: ArrayView2<'_, f64>, h_prev: ArrayView2<'_, f64>,
    ) -> HawkesResult<Array2<f64>> {
        validate_shape(
            "RNNCell::step_batch",
            &[x.nrows(), self.hidden_size()],
            &[h_prev.nrows(), h_prev.ncols()],
        )?;
        let mut pre = self.input.apply_batch(x)?;
        pre += &self.hidden.apply_batch(h_prev)?;
        self.nonlinearity.apply_inplace(&mut pre);
        Ok(pre)
    }
}
