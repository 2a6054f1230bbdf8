//! NeuralCTLSTM — continuous-time LSTM Hawkes process.
//!
//! Purpose
//! -------
//! Implement the memory-cell parameterization. Each update reads the
//! previous output `h`, computes five sigmoid gates, a tanh candidate and a
//! per-unit decay rate, lets the cell relax toward its target over the gap,
//! and then writes the new cell and target. Between events the cell follows
//! `c(t) = c̄ + (c − c̄) · exp(−δ (t − t_i))` and the intensity is
//! `λ(t) = softplus(w · (o ⊙ tanh c(t)))`.
//!
//! Key behaviors
//! -------------
//! - [`NeuralCTLSTM::update`]: one batched step `(CellState, dt) →
//!   CellUpdate`. The model holds no recurrent state; the caller threads
//!   [`CellUpdate::into_state`] into the next call.
//! - [`NeuralCTLSTM::forward_batch`]: run the `N + 1` steps of an
//!   [`EventBatch`] and fill a [`CtlstmSnapshots`] arena.
//! - [`NeuralCTLSTM::eval_intensity`] and the [`ContinuousIntensity`]
//!   implementation evaluate many `(snapshot, elapsed)` queries for one
//!   batch column in bulk.
//! - [`NeuralCTLSTM::next_event`] is part of the API but returns
//!   `HawkesError::NotImplemented`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Seven independent `H × H` affine maps: input, forget, output, input
//!   target and forget target gates, the candidate and the decay.
//! - Gates lie in `[0, 1]`, the candidate in `[−1, 1]`, the decay in
//!   `[0, ∞)`.
//! - The decay used to relax the cell over the gap is computed from the
//!   previous output, in the same step that writes the new cell.
//! - The intensity weight `w ~ U[0, 1)` is drawn at construction and not
//!   exposed to gradient-style updates.
//!
//! Conventions
//! -----------
//! - Every state buffer is `B × H`; `dt` has length `B`.
//! - The snapshot stored for step `i` is `(o_i, c_i, c̄_i, δ_i)`: the output
//!   gate, the cell written by the step, the new target and the decay
//!   computed in the step.
use crate::{
    hawkes::{
        core::{
            data::{EventBatch, EventSequence},
            decay::decay_asymptotic_rows,
            intensity::IntensityHead,
            layers::Linear,
            options::CtlstmConfig,
            sampling::SampleSource,
            snapshots::CtlstmSnapshots,
            validation::{validate_len, validate_shape},
        },
        errors::{HawkesError, HawkesResult},
        models::likelihood::{ContinuousIntensity, LikelihoodEstimator},
    },
    numerical_stability::transformations::{logistic_inplace, softplus_inplace, tanh_inplace},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Recurrent state threaded between updates; every buffer is `B × H`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    output: Array2<f64>,
    cell: Array2<f64>,
    cell_target: Array2<f64>,
}

impl CellState {
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if the three buffers differ in shape.
    pub fn new(
        output: Array2<f64>, cell: Array2<f64>, cell_target: Array2<f64>,
    ) -> HawkesResult<Self> {
        validate_shape("CellState::new", output.shape(), cell.shape())?;
        validate_shape("CellState::new", output.shape(), cell_target.shape())?;
        Ok(CellState { output, cell, cell_target })
    }

    pub fn batch_size(&self) -> usize {
        self.output.nrows()
    }

    pub fn hidden_size(&self) -> usize {
        self.output.ncols()
    }

    /// Previous output `h`.
    pub fn output(&self) -> ArrayView2<'_, f64> {
        self.output.view()
    }

    pub fn cell(&self) -> ArrayView2<'_, f64> {
        self.cell.view()
    }

    /// Asymptotic cell value `c̄`.
    pub fn cell_target(&self) -> ArrayView2<'_, f64> {
        self.cell_target.view()
    }
}

/// Everything one [`NeuralCTLSTM::update`] computes; every field is `B × H`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellUpdate {
    pub input_gate: Array2<f64>,
    pub forget_gate: Array2<f64>,
    pub output_gate: Array2<f64>,
    pub input_target_gate: Array2<f64>,
    pub forget_target_gate: Array2<f64>,
    /// `z = tanh(Linear_z(h))`.
    pub candidate: Array2<f64>,
    pub decay: Array2<f64>,
    /// Previous cell relaxed toward its target over the gap.
    pub cell_after_decay: Array2<f64>,
    pub cell: Array2<f64>,
    pub cell_target: Array2<f64>,
    /// `h_new = o ⊙ tanh(c_after)`.
    pub output: Array2<f64>,
}

impl CellUpdate {
    /// State to feed into the next update.
    pub fn into_state(self) -> CellState {
        CellState { output: self.output, cell: self.cell, cell_target: self.cell_target }
    }
}

/// The seven affine maps of a [`NeuralCTLSTM`], each `H → H`.
#[derive(Debug, Clone, PartialEq)]
pub struct CtlstmLayers {
    pub input_gate: Linear,
    pub forget_gate: Linear,
    pub output_gate: Linear,
    pub input_target_gate: Linear,
    pub forget_target_gate: Linear,
    pub candidate: Linear,
    pub decay: Linear,
}

impl CtlstmLayers {
    fn new<S: SampleSource + ?Sized>(h: usize, sampler: &mut S) -> HawkesResult<Self> {
        Ok(CtlstmLayers {
            input_gate: Linear::new(h, h, true, sampler)?,
            forget_gate: Linear::new(h, h, true, sampler)?,
            output_gate: Linear::new(h, h, true, sampler)?,
            input_target_gate: Linear::new(h, h, true, sampler)?,
            forget_target_gate: Linear::new(h, h, true, sampler)?,
            candidate: Linear::new(h, h, true, sampler)?,
            decay: Linear::new(h, h, true, sampler)?,
        })
    }

    fn all(&self) -> [&Linear; 7] {
        [
            &self.input_gate,
            &self.forget_gate,
            &self.output_gate,
            &self.input_target_gate,
            &self.forget_target_gate,
            &self.candidate,
            &self.decay,
        ]
    }
}

/// Continuous-time LSTM Hawkes model.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralCTLSTM {
    layers: CtlstmLayers,
    head: IntensityHead,
}

impl NeuralCTLSTM {
    /// Randomly initialized model: PyTorch-style uniform layers and a
    /// softplus head with `w ~ U[0, 1)`.
    pub fn new<S: SampleSource + ?Sized>(
        config: CtlstmConfig, sampler: &mut S,
    ) -> HawkesResult<Self> {
        let layers = CtlstmLayers::new(config.hidden_size, sampler)?;
        let head = IntensityHead::softplus_uniform(config.hidden_size, sampler)?;
        Ok(NeuralCTLSTM { layers, head })
    }

    /// Model over caller-supplied components.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` unless every layer is `H × H` with
    ///   `H = head.hidden_size()`.
    pub fn from_parts(layers: CtlstmLayers, head: IntensityHead) -> HawkesResult<Self> {
        let h = head.hidden_size();
        for lin in layers.all() {
            validate_shape("NeuralCTLSTM::from_parts", &[h, h], &[lin.out_dim(), lin.in_dim()])?;
        }
        Ok(NeuralCTLSTM { layers, head })
    }

    pub fn hidden_size(&self) -> usize {
        self.head.hidden_size()
    }

    pub fn layers(&self) -> &CtlstmLayers {
        &self.layers
    }

    pub fn head(&self) -> &IntensityHead {
        &self.head
    }

    /// Initial `(h, c, c̄)` for `batch` sequences, every entry `U[0, 1)`.
    pub fn initial_state<S: SampleSource + ?Sized>(
        &self, batch: usize, sampler: &mut S,
    ) -> CellState {
        let shape = (batch, self.hidden_size());
        CellState {
            output: sampler.uniform_array2(shape, 0.0, 1.0),
            cell: sampler.uniform_array2(shape, 0.0, 1.0),
            cell_target: sampler.uniform_array2(shape, 0.0, 1.0),
        }
    }

    /// One batched update step.
    ///
    /// Parameters
    /// ----------
    /// - `state`: previous `(h, c, c̄)`, each `B × H`.
    /// - `dt`: gap since the previous event for each of the `B` rows.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if `state` is not `H` wide or `dt` does
    ///   not have `B` entries.
    pub fn update(&self, state: &CellState, dt: ArrayView1<'_, f64>) -> HawkesResult<CellUpdate> {
        let b = state.batch_size();
        validate_shape("NeuralCTLSTM::update", &[b, self.hidden_size()], state.output.shape())?;
        validate_len("NeuralCTLSTM::update", b, dt.len())?;
        let h = state.output.view();
        let l = &self.layers;

        let gate = |lin: &Linear| -> HawkesResult<Array2<f64>> {
            let mut g = lin.apply_batch(h)?;
            logistic_inplace(&mut g);
            Ok(g)
        };
        let input_gate = gate(&l.input_gate)?;
        let forget_gate = gate(&l.forget_gate)?;
        let output_gate = gate(&l.output_gate)?;
        let input_target_gate = gate(&l.input_target_gate)?;
        let forget_target_gate = gate(&l.forget_target_gate)?;

        let mut candidate = l.candidate.apply_batch(h)?;
        tanh_inplace(&mut candidate);
        let mut decay = l.decay.apply_batch(h)?;
        softplus_inplace(&mut decay);

        let cell_after_decay =
            decay_asymptotic_rows(state.cell(), state.cell_target(), decay.view(), dt)?;
        let cell = &forget_gate * &cell_after_decay + &input_gate * &candidate;
        let cell_target = &forget_target_gate * &state.cell_target + &input_target_gate * &candidate;
        let output = &output_gate * &cell_after_decay.mapv(f64::tanh);

        Ok(CellUpdate {
            input_gate,
            forget_gate,
            output_gate,
            input_target_gate,
            forget_target_gate,
            candidate,
            decay,
            cell_after_decay,
            cell,
            cell_target,
            output,
        })
    }

    /// Run the `N + 1` update steps of `batch` starting from `state0`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if `state0` is not `batch.len() × H`.
    pub fn forward_batch(
        &self, batch: &EventBatch, state0: CellState,
    ) -> HawkesResult<CtlstmSnapshots> {
        validate_shape(
            "NeuralCTLSTM::forward_batch",
            &[batch.len(), self.hidden_size()],
            state0.output.shape(),
        )?;
        let gaps = batch.input_gaps();
        let mut snapshots =
            CtlstmSnapshots::zeros(gaps.nrows(), batch.len(), self.hidden_size());
        let mut state = state0;
        for (i, dt) in gaps.rows().into_iter().enumerate() {
            let step = self.update(&state, dt)?;
            snapshots.set(
                i,
                step.output_gate.view(),
                step.cell.view(),
                step.cell_target.view(),
                step.decay.view(),
            );
            state = step.into_state();
        }
        Ok(snapshots)
    }

    /// Single-sequence forward pass; `state0` must have one row.
    pub fn forward_sequence(
        &self, seq: &EventSequence, state0: CellState,
    ) -> HawkesResult<CtlstmSnapshots> {
        let batch = EventBatch::new(vec![seq.clone()])?;
        self.forward_batch(&batch, state0)
    }

    /// Intensity of batch column `column` at every query `m`: snapshot
    /// `indices[m]` with its cell decayed by `elapsed[m]`.
    pub fn eval_intensity(
        &self, snapshots: &CtlstmSnapshots, column: usize, indices: &[usize],
        elapsed: ArrayView1<'_, f64>,
    ) -> HawkesResult<Array1<f64>> {
        validate_len("NeuralCTLSTM::eval_intensity", self.hidden_size(), snapshots.hidden_size())?;
        let rows = snapshots.gather(column, indices)?;
        let mut hidden = decay_asymptotic_rows(
            rows.cell.view(),
            rows.cell_target.view(),
            rows.decay.view(),
            elapsed,
        )?;
        tanh_inplace(&mut hidden);
        hidden *= &rows.output_gate;
        self.head.intensities(hidden.view())
    }

    /// Sample the time of the next event after snapshot `index` by thinning.
    ///
    /// Errors
    /// ------
    /// - Always `HawkesError::NotImplemented`.
    pub fn next_event<S: SampleSource + ?Sized>(
        &self, _snapshots: &CtlstmSnapshots, _index: usize, _sampler: &mut S,
    ) -> HawkesResult<f64> {
        Err(HawkesError::NotImplemented { op: "NeuralCTLSTM::next_event" })
    }

    /// Draw an initial state, run the forward pass and return the mean loss
    /// over `batch`.
    pub fn negative_log_likelihood<S: SampleSource + ?Sized>(
        &self, batch: &EventBatch, estimator: &LikelihoodEstimator, sampler: &mut S,
    ) -> HawkesResult<f64> {
        let state0 = self.initial_state(batch.len(), sampler);
        let snapshots = self.forward_batch(batch, state0)?;
        estimator.batch_negative_log_likelihood(self, batch, &snapshots, sampler)
    }
}

impl ContinuousIntensity for NeuralCTLSTM {
    type Snapshots = CtlstmSnapshots;

    fn intensities_at(
        &self, snapshots: &CtlstmSnapshots, column: usize, indices: &[usize],
        elapsed: ArrayView1<'_, f64>,
    ) -> HawkesResult<Array1<f64>> {
        self.eval_intensity(snapshots, column, indices, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hawkes::core::{intensity::IntensityActivation, sampling::RngSampler};
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - One update step with all-zero layers against the closed form.
    // - Gate / decay ranges for a random model and large states.
    // - Snapshot layout, per-column independence and determinism of
    //   `forward_batch`.
    // - The zero-elapsed intensity identity and the `next_event` stub.
    // -------------------------------------------------------------------------

    fn zero_model(h: usize) -> NeuralCTLSTM {
        let zero = || Linear::from_parts(Array2::zeros((h, h)), Some(Array1::zeros(h))).unwrap();
        let layers = CtlstmLayers {
            input_gate: zero(),
            forget_gate: zero(),
            output_gate: zero(),
            input_target_gate: zero(),
            forget_target_gate: zero(),
            candidate: zero(),
            decay: zero(),
        };
        let head = IntensityHead::new(Array1::ones(h), IntensityActivation::Softplus).unwrap();
        NeuralCTLSTM::from_parts(layers, head).unwrap()
    }

    fn seeded_model(h: usize, seed: u64) -> NeuralCTLSTM {
        let mut s = RngSampler::from_seed(Some(seed)).unwrap();
        NeuralCTLSTM::new(CtlstmConfig::new(h).unwrap(), &mut s).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify one step against the closed form when every layer is zero.
    //
    // Given
    // -----
    // - All gates σ(0) = 0.5, candidate tanh(0) = 0, decay softplus(0) = ln 2.
    // - c = [1], c̄ = [0.2], h = [0.7], dt = 2.
    //
    // Expect
    // ------
    // - c_after = 0.2 + 0.8 · 2^{-2} = 0.4.
    // - c_new = 0.2, c̄_new = 0.1, h_new = 0.5 · tanh(0.4).
    fn zero_layer_update_matches_closed_form() {
        let model = zero_model(1);
        let state = CellState::new(array![[0.7]], array![[1.0]], array![[0.2]]).unwrap();
        let step = model.update(&state, array![2.0].view()).unwrap();

        assert_eq!(step.input_gate, array![[0.5]]);
        assert_eq!(step.candidate, array![[0.0]]);
        assert_relative_eq!(step.decay[[0, 0]], 2.0_f64.ln(), epsilon = 1e-15);
        assert_relative_eq!(step.cell_after_decay[[0, 0]], 0.4, epsilon = 1e-14);
        assert_relative_eq!(step.cell[[0, 0]], 0.2, epsilon = 1e-14);
        assert_relative_eq!(step.cell_target[[0, 0]], 0.1, epsilon = 1e-15);
        assert_relative_eq!(step.output[[0, 0]], 0.5 * 0.4_f64.tanh(), epsilon = 1e-14);

        let next = step.into_state();
        assert_eq!(next.cell_target(), array![[0.1]]);
        assert!(model.update(&next, array![1.0, 2.0].view()).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify gate, candidate and decay ranges for a random model driven by
    // large-magnitude states.
    fn update_outputs_stay_in_range() {
        let model = seeded_model(5, 41);
        let mut s = RngSampler::from_seed(Some(42)).unwrap();
        let state = CellState::new(
            s.uniform_array2((3, 5), -50.0, 50.0),
            s.uniform_array2((3, 5), -50.0, 50.0),
            s.uniform_array2((3, 5), -50.0, 50.0),
        )
        .unwrap();
        let step = model.update(&state, array![0.1, 1.0, 10.0].view()).unwrap();

        for g in [
            &step.input_gate,
            &step.forget_gate,
            &step.output_gate,
            &step.input_target_gate,
            &step.forget_target_gate,
        ] {
            assert!(g.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
        assert!(step.candidate.iter().all(|&v| (-1.0..=1.0).contains(&v)));
        assert!(step.decay.iter().all(|&v| v >= 0.0 && v.is_finite()));
        assert!(step.output.iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Verify the batch layout: column `b` of a batched forward pass equals a
    // single-sequence pass from the same initial row, and repeated passes
    // are bit-identical.
    fn forward_batch_columns_match_single_sequences() {
        let model = seeded_model(4, 51);
        let mut s = RngSampler::from_seed(Some(52)).unwrap();
        let a = EventSequence::new(array![0.5, 1.5], 2.0).unwrap();
        let b = EventSequence::new(array![0.1, 0.2], 5.0).unwrap();
        let batch = EventBatch::new(vec![a, b.clone()]).unwrap();
        let state0 = model.initial_state(2, &mut s);

        let snaps = model.forward_batch(&batch, state0.clone()).unwrap();
        assert_eq!((snaps.len(), snaps.batch_size(), snaps.hidden_size()), (3, 2, 4));
        assert_eq!(snaps, model.forward_batch(&batch, state0.clone()).unwrap());

        let row = |a: ArrayView2<'_, f64>| a.slice(ndarray::s![1..2, ..]).to_owned();
        let single_state =
            CellState::new(row(state0.output()), row(state0.cell()), row(state0.cell_target()))
                .unwrap();
        let single = model.forward_sequence(&b, single_state).unwrap();
        let joint = snaps.gather(1, &[0, 1, 2]).unwrap();
        let alone = single.gather(0, &[0, 1, 2]).unwrap();
        for (x, y) in joint.cell.iter().zip(alone.cell.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that zero elapsed time reproduces the intensity of the raw
    // snapshot `softplus(w · (o ⊙ tanh c))`, and that intensities are
    // non-negative.
    fn zero_elapsed_intensity_matches_raw_snapshot() {
        let model = seeded_model(3, 61);
        let mut s = RngSampler::from_seed(Some(62)).unwrap();
        let seq = EventSequence::new(array![0.4, 0.8, 2.0], 3.0).unwrap();
        let snaps = model.forward_sequence(&seq, model.initial_state(1, &mut s)).unwrap();

        let indices = [0, 1, 2, 3];
        let lam = model.eval_intensity(&snaps, 0, &indices, Array1::zeros(4).view()).unwrap();
        let rows = snaps.gather(0, &indices).unwrap();
        let raw = &rows.output_gate * &rows.cell.mapv(f64::tanh);
        let expected = model.head().intensities(raw.view()).unwrap();
        for (l, e) in lam.iter().zip(expected.iter()) {
            assert_relative_eq!(*l, *e, epsilon = 1e-14);
        }
        assert!(lam.iter().all(|&l| l > 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `next_event` is an explicit stub.
    fn next_event_is_not_implemented() {
        let model = zero_model(2);
        let mut s = RngSampler::from_seed(Some(0)).unwrap();
        let seq = EventSequence::new(array![1.0], 2.0).unwrap();
        let snaps = model.forward_sequence(&seq, model.initial_state(1, &mut s)).unwrap();

        assert_eq!(
            model.next_event(&snaps, 0, &mut s).unwrap_err(),
            HawkesError::NotImplemented { op: "NeuralCTLSTM::next_event" }
        );
    }
}
