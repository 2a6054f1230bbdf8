//! HawkesRNN — recurrent neural Hawkes process with a single decaying hidden
//! state.
//!
//! Purpose
//! -------
//! Implement the recurrent parameterization: after each event the hidden
//! state is updated by an Elman cell fed with the inter-event gap, a
//! per-unit decay rate is read off the new state, and between events the
//! state relaxes toward zero as `h(t) = h_i · exp(−δ_i (t − t_i))`. The
//! intensity is `λ(t) = ReLU(w · h(t))`.
//!
//! Key behaviors
//! -------------
//! - [`HawkesRNN::update`] / [`HawkesRNN::update_batch`]: one pure step
//!   `(dt, h_prev) → (h_new, δ_new)`.
//! - [`HawkesRNN::forward_sequence`]: run the `N + 1` steps of a sequence
//!   and fill an [`RnnSnapshots`] arena.
//! - [`HawkesRNN::compute_intensity`]: intensity at one `(snapshot, elapsed)`
//!   query; the [`ContinuousIntensity`] implementation evaluates many
//!   queries with one gather, one decay and one projection.
//!
//! Invariants & assumptions
//! ------------------------
//! - The recurrent cell takes a 1-dimensional input (the gap).
//! - `δ = softplus(Linear(h_new)) ≥ 0` elementwise.
//! - The model holds no mutable state; chaining steps is the caller's job
//!   (or `forward_sequence`'s).
//!
//! Testing notes
//! -------------
//! - Unit tests cover a hand-checked step, zero-elapsed agreement between
//!   the decayed and raw snapshot, bulk vs single-query agreement, and
//!   bit-identical repeated forward passes.
use crate::{
    hawkes::{
        core::{
            data::EventSequence,
            decay::{decay_plain, decay_plain_rows},
            intensity::IntensityHead,
            layers::{Linear, RNNCell},
            options::RnnConfig,
            sampling::SampleSource,
            snapshots::RnnSnapshots,
            validation::{validate_len, validate_shape, validate_snapshot_index},
        },
        errors::HawkesResult,
        models::likelihood::{ContinuousIntensity, LikelihoodEstimator},
    },
    numerical_stability::transformations::softplus_inplace,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, aview1};

/// Recurrent neural Hawkes model.
///
/// Fields
/// ------
/// - `cell`: [`RNNCell`] with input size 1 and hidden size `H`.
/// - `decay_layer`: [`Linear`] `H → H` producing the decay pre-activation.
/// - `head`: ReLU [`IntensityHead`] of width `H`.
#[derive(Debug, Clone, PartialEq)]
pub struct HawkesRNN {
    cell: RNNCell,
    decay_layer: Linear,
    head: IntensityHead,
}

impl HawkesRNN {
    /// Randomly initialized model.
    ///
    /// Parameters
    /// ----------
    /// - `config`: validated [`RnnConfig`] (hidden size, nonlinearity).
    /// - `sampler`: source of the initialization draws.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::InvalidHiddenSize` if `config.hidden_size == 0`.
    pub fn new<S: SampleSource + ?Sized>(config: RnnConfig, sampler: &mut S) -> HawkesResult<Self> {
        let h = config.hidden_size;
        let cell = RNNCell::new(1, h, config.nonlinearity, sampler)?;
        let decay_layer = Linear::new(h, h, true, sampler)?;
        let head = IntensityHead::relu_linear(h, sampler)?;
        Ok(HawkesRNN { cell, decay_layer, head })
    }

    /// Model over caller-supplied components.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` unless the cell input size is 1 and the
    ///   decay layer and head are both `H`-wide.
    pub fn from_parts(cell: RNNCell, decay_layer: Linear, head: IntensityHead) -> HawkesResult<Self> {
        let h = cell.hidden_size();
        validate_len("HawkesRNN::from_parts", 1, cell.input_size())?;
        validate_shape(
            "HawkesRNN::from_parts",
            &[h, h],
            &[decay_layer.out_dim(), decay_layer.in_dim()],
        )?;
        validate_len("HawkesRNN::from_parts", h, head.hidden_size())?;
        Ok(HawkesRNN { cell, decay_layer, head })
    }

    pub fn hidden_size(&self) -> usize {
        self.cell.hidden_size()
    }

    pub fn cell(&self) -> &RNNCell {
        &self.cell
    }

    pub fn decay_layer(&self) -> &Linear {
        &self.decay_layer
    }

    pub fn head(&self) -> &IntensityHead {
        &self.head
    }

    /// Initial hidden state drawn from `N(0, 1)`.
    pub fn initial_hidden<S: SampleSource + ?Sized>(&self, sampler: &mut S) -> Array1<f64> {
        sampler.standard_normal_array(self.hidden_size())
    }

    /// One update step for a single sequence.
    ///
    /// Returns
    /// -------
    /// `(h_new, δ_new)`, both of length `H`.
    pub fn update(
        &self, dt: f64, h_prev: ArrayView1<'_, f64>,
    ) -> HawkesResult<(Array1<f64>, Array1<f64>)> {
        let dts = [dt];
        let (h, d) = self.update_batch(aview1(&dts), h_prev.insert_axis(Axis(0)))?;
        Ok((h.index_axis_move(Axis(0), 0), d.index_axis_move(Axis(0), 0)))
    }

    /// One update step for `B` sequences: `dt` has length `B`, `h_prev` is
    /// `B × H`.
    pub fn update_batch(
        &self, dt: ArrayView1<'_, f64>, h_prev: ArrayView2<'_, f64>,
    ) -> HawkesResult<(Array2<f64>, Array2<f64>)> {
        validate_len("HawkesRNN::update_batch", h_prev.nrows(), dt.len())?;
        let h_new = self.cell.step_batch(dt.insert_axis(Axis(1)), h_prev)?;
        let mut decay = self.decay_layer.apply_batch(h_new.view())?;
        softplus_inplace(&mut decay);
        Ok((h_new, decay))
    }

    /// Run the update over `seq.input_gaps()` starting from `h0`.
    ///
    /// Returns
    /// -------
    /// An arena of `N + 1` snapshots; row `i` is valid on `[t_i, t_{i+1})`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if `h0.len() != H`.
    pub fn forward_sequence(
        &self, seq: &EventSequence, h0: ArrayView1<'_, f64>,
    ) -> HawkesResult<RnnSnapshots> {
        validate_len("HawkesRNN::forward_sequence", self.hidden_size(), h0.len())?;
        let mut snapshots = RnnSnapshots::zeros(seq.n_intervals(), self.hidden_size());
        let mut h = h0.to_owned();
        for (i, &dt) in seq.input_gaps().iter().enumerate() {
            let (h_new, decay) = self.update(dt, h.view())?;
            snapshots.set(i, h_new.view(), decay.view());
            h = h_new;
        }
        Ok(snapshots)
    }

    /// Hidden state of snapshot `index` decayed by `elapsed`.
    pub fn decayed_hidden(
        &self, snapshots: &RnnSnapshots, index: usize, elapsed: f64,
    ) -> HawkesResult<Array1<f64>> {
        let (h, d) = snapshots.get(index)?;
        decay_plain(h, d, elapsed)
    }

    /// Intensity at `t_index + elapsed` using snapshot `index`.
    pub fn compute_intensity(
        &self, snapshots: &RnnSnapshots, index: usize, elapsed: f64,
    ) -> HawkesResult<f64> {
        let decayed = self.decayed_hidden(snapshots, index, elapsed)?;
        self.head.intensity(decayed.view())
    }

    /// Draw `h0`, run the forward pass and estimate the loss of `seq`.
    pub fn negative_log_likelihood<S: SampleSource + ?Sized>(
        &self, seq: &EventSequence, estimator: &LikelihoodEstimator, sampler: &mut S,
    ) -> HawkesResult<f64> {
        let h0 = self.initial_hidden(sampler);
        let snapshots = self.forward_sequence(seq, h0.view())?;
        estimator.negative_log_likelihood(self, seq, &snapshots, sampler)
    }
}

impl ContinuousIntensity for HawkesRNN {
    type Snapshots = RnnSnapshots;

    fn intensities_at(
        &self, snapshots: &RnnSnapshots, column: usize, indices: &[usize],
        elapsed: ArrayView1<'_, f64>,
    ) -> HawkesResult<Array1<f64>> {
        validate_snapshot_index(column, 1)?;
        validate_len("HawkesRNN::intensities_at", self.hidden_size(), snapshots.hidden_size())?;
        let (h, d) = snapshots.gather(indices)?;
        let decayed = decay_plain_rows(h.view(), d.view(), elapsed)?;
        self.head.intensities(decayed.view())
    }
}
