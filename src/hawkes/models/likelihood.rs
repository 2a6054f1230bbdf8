//! Monte-Carlo negative log-likelihood for continuous-intensity models.
//!
//! - [`ContinuousIntensity`]: trait a model implements so its intensity can
//!   be read at `(snapshot index, elapsed)` queries.
//! - [`LikelihoodEstimator`]: combines the exact log-intensity at the events
//!   with a Monte-Carlo estimate of the compensator.
//! - [`LikelihoodTerms`]: the two parts of the loss, kept apart for
//!   diagnostics.
//!
//! Convention: the point-process log-likelihood on `[0, T_max]` is
//! `ℓ = Σ_i log λ(t_{i+1}^-) − ∫_0^{T_max} λ(u) du`, and the estimator returns
//! the loss `−ℓ = −exact + compensator` for every model.
//!
//! Exact term: event `t_{i+1}` is scored with snapshot `i` decayed by the gap
//! `Δ_i = t_{i+1} − t_i`, i.e. the state that was active just before the
//! event fired.
//!
//! Compensator: interval `i` (of length `L_i`, the tail included) receives
//! `k` draws `u_ij ~ U[0, 1)` and contributes `L_i · mean_j λ_i(L_i · u_ij)`,
//! an unbiased estimate of `∫ λ` over that interval.
use crate::hawkes::{
    core::{
        data::{EventBatch, EventSequence},
        options::EstimatorOptions,
        sampling::SampleSource,
        snapshots::SnapshotArena,
        validation::validate_len,
    },
    errors::HawkesResult,
};
use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

/// Model-side interface consumed by [`LikelihoodEstimator`].
///
/// - `type Snapshots`: the arena the model's forward pass produces.
///
/// Required:
/// - `intensities_at(snapshots, column, indices, elapsed)`: intensity of
///   batch column `column` at every query `m`, using snapshot `indices[m]`
///   decayed by `elapsed[m]`. Returns a vector of length `indices.len()`.
///   - Errors: `ShapeMismatch` when `indices` and `elapsed` disagree or the
///     arena does not match the model, `SnapshotOutOfRange` for bad indices
///     or columns.
pub trait ContinuousIntensity {
    type Snapshots: SnapshotArena;

    fn intensities_at(
        &self, snapshots: &Self::Snapshots, column: usize, indices: &[usize],
        elapsed: ArrayView1<'_, f64>,
    ) -> HawkesResult<Array1<f64>>;
}

/// Exact and compensator parts of the loss for one sequence.
///
/// Fields:
/// - `exact`: `Σ log λ` over the real events (0 when there are none).
/// - `compensator`: Monte-Carlo estimate of `∫_0^{T_max} λ`.
/// - `n_events`: number of real events scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodTerms {
    pub exact: f64,
    pub compensator: f64,
    pub n_events: usize,
}

impl LikelihoodTerms {
    /// Negative log-likelihood `−exact + compensator`.
    pub fn nll(&self) -> f64 {
        self.compensator - self.exact
    }
}

/// Monte-Carlo likelihood estimator.
///
/// Holds only [`EstimatorOptions`]; every random draw comes from the
/// sampler passed to each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikelihoodEstimator {
    options: EstimatorOptions,
}

impl LikelihoodEstimator {
    pub fn new(options: EstimatorOptions) -> Self {
        LikelihoodEstimator { options }
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.options
    }

    /// Loss of a single sequence stored in column 0 of `snapshots`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if the arena does not hold
    ///   `seq.n_intervals()` snapshots.
    /// - Any error raised by the model's intensity evaluator.
    ///
    /// Notes
    /// -----
    /// - A zero intensity at an event yields `+∞`; it is returned as is and
    ///   reported with `tracing::warn!`.
    pub fn negative_log_likelihood<M, S>(
        &self, model: &M, seq: &EventSequence, snapshots: &M::Snapshots, sampler: &mut S,
    ) -> HawkesResult<f64>
    where
        M: ContinuousIntensity + ?Sized,
        S: SampleSource + ?Sized,
    {
        Ok(self.decompose(model, seq, snapshots, sampler)?.nll())
    }

    /// Both loss terms of a single sequence stored in column 0.
    pub fn decompose<M, S>(
        &self, model: &M, seq: &EventSequence, snapshots: &M::Snapshots, sampler: &mut S,
    ) -> HawkesResult<LikelihoodTerms>
    where
        M: ContinuousIntensity + ?Sized,
        S: SampleSource + ?Sized,
    {
        self.decompose_column(model, seq, snapshots, 0, sampler)
    }

    /// Both loss terms of the sequence stored in batch column `column`.
    pub fn decompose_column<M, S>(
        &self, model: &M, seq: &EventSequence, snapshots: &M::Snapshots, column: usize,
        sampler: &mut S,
    ) -> HawkesResult<LikelihoodTerms>
    where
        M: ContinuousIntensity + ?Sized,
        S: SampleSource + ?Sized,
    {
        validate_len("LikelihoodEstimator::decompose", seq.n_intervals(), snapshots.n_intervals())?;
        let n_events = seq.n_events();

        let exact = if n_events == 0 {
            0.0
        } else {
            let indices: Vec<usize> = (0..n_events).collect();
            let gaps = seq.gaps();
            let at_events = model.intensities_at(snapshots, column, &indices, gaps.view())?;
            if let Some(index) = at_events.iter().position(|&l| l <= 0.0) {
                warn!(column, index, "zero intensity at an observed event; loss is infinite");
            }
            at_events.mapv(f64::ln).sum()
        };

        let k = self.options.mc_samples;
        let lengths = seq.interval_lengths();
        let mut indices = Vec::with_capacity(lengths.len() * k);
        let mut elapsed = Array1::<f64>::zeros(lengths.len() * k);
        let mut weights = Array1::<f64>::zeros(lengths.len() * k);
        for (i, &len) in lengths.iter().enumerate() {
            for j in 0..k {
                let m = i * k + j;
                indices.push(i);
                elapsed[m] = len * sampler.uniform01();
                weights[m] = len / k as f64;
            }
        }
        let at_samples = model.intensities_at(snapshots, column, &indices, elapsed.view())?;
        let compensator = weights.dot(&at_samples);

        let terms = LikelihoodTerms { exact, compensator, n_events };
        debug!(column, n_events, exact, compensator, nll = terms.nll(), "likelihood terms");
        Ok(terms)
    }

    /// Mean loss over every sequence of `batch`, column `b` of `snapshots`
    /// holding sequence `b`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if the arena's batch size differs from
    ///   `batch.len()`.
    pub fn batch_negative_log_likelihood<M, S>(
        &self, model: &M, batch: &EventBatch, snapshots: &M::Snapshots, sampler: &mut S,
    ) -> HawkesResult<f64>
    where
        M: ContinuousIntensity + ?Sized,
        S: SampleSource + ?Sized,
    {
        validate_len(
            "LikelihoodEstimator::batch_negative_log_likelihood",
            batch.len(),
            snapshots.batch_size(),
        )?;
        let mut total = 0.0;
        for (b, seq) in batch.sequences().iter().enumerate() {
            total += self.decompose_column(model, seq, snapshots, b, sampler)?.nll();
        }
        Ok(total / batch.len() as f64)
    }
}
