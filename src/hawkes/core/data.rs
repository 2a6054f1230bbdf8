//! Event-sequence containers for neural Hawkes models.
//!
//! Purpose
//! -------
//! Provide small, validated containers for event timestamps observed on a
//! window `[0, T_max]`. This module centralizes input validation for raw
//! timestamps so the recurrent updates and the likelihood estimator can
//! assume strictly increasing times.
//!
//! Key behaviors
//! -------------
//! - [`EventSequence`] enforces the timestamp invariants (finite, strictly
//!   positive first event, strictly increasing, bounded by the horizon) and
//!   prepends the synthetic start marker `t_0 = 0`.
//! - [`EventBatch`] groups sequences with the same event count so a batch
//!   can be stepped through a recurrent cell row-wise.
//! - Both expose the gap vectors the models consume.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 = t_0 < t_1 < … < t_N ≤ T_max` with every `t_i` finite.
//! - `N = 0` (no real events) is valid; the only interval is `[0, T_max]`.
//! - Nothing is clamped or reordered: violations are reported as
//!   [`HawkesError`] values at construction time.
//!
//! Conventions
//! -----------
//! - `times()` includes `t_0`; `event_times()` does not.
//! - Interval `i` is `[t_i, t_{i+1})` for `i < N` and `[t_N, T_max]` for
//!   `i = N`; there are always `N + 1` intervals.
//! - The update step for event `i` consumes `input_gaps()[i]`, which is 0
//!   for the synthetic start.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction (happy path, zero events, each rejection
//!   path) and the gap accessors.
use crate::hawkes::errors::{HawkesError, HawkesResult};
use ndarray::{Array1, Array2, ArrayView1, s};

/// `EventSequence` — validated event times plus the observation horizon.
///
/// Purpose
/// -------
/// Represent a single realization of the point process on `[0, T_max]`.
///
/// Fields
/// ------
/// - `times`: `Array1<f64>`
///   `[t_0 = 0, t_1, …, t_N]`; length `N + 1`.
/// - `horizon`: `f64`
///   Terminal time `T_max ≥ t_N`.
///
/// Invariants
/// ----------
/// - `times[0] == 0.0` and `times` strictly increasing.
/// - `times[N] <= horizon`, `horizon` finite and `> 0`.
///
/// Performance
/// -----------
/// - Validation is a single O(N) scan; accessors returning views do not
///   allocate.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSequence {
    times: Array1<f64>,
    horizon: f64,
}

impl EventSequence {
    /// Construct a validated [`EventSequence`] from real event times.
    ///
    /// Parameters
    /// ----------
    /// - `event_times`: `Array1<f64>`
    ///   Real events `t_1..t_N` (may be empty). Must be finite, strictly
    ///   positive and strictly increasing.
    /// - `horizon`: `f64`
    ///   Observation horizon `T_max`; finite, `> 0` and `>= t_N`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::InvalidHorizon` for a non-finite or non-positive horizon.
    /// - `HawkesError::NonFiniteTimestamp` for NaN/±inf entries.
    /// - `HawkesError::NonPositiveFirstEvent` when `t_1 <= 0`.
    /// - `HawkesError::NonIncreasingTimestamps` when `t_{i+1} <= t_i`.
    /// - `HawkesError::EventAfterHorizon` when `t_N > T_max`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use neural_hawkes::hawkes::core::data::EventSequence;
    /// let seq = EventSequence::new(array![0.5, 1.25], 2.0).unwrap();
    /// assert_eq!(seq.n_events(), 2);
    /// assert_eq!(seq.tail_gap(), 0.75);
    /// ```
    pub fn new(event_times: Array1<f64>, horizon: f64) -> HawkesResult<Self> {
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(HawkesError::InvalidHorizon { value: horizon });
        }

        let mut previous = 0.0;
        for (index, &value) in event_times.iter().enumerate() {
            if !value.is_finite() {
                return Err(HawkesError::NonFiniteTimestamp { index, value });
            }
            if index == 0 && value <= 0.0 {
                return Err(HawkesError::NonPositiveFirstEvent { value });
            }
            if index > 0 && value <= previous {
                return Err(HawkesError::NonIncreasingTimestamps { index, previous, value });
            }
            previous = value;
        }
        if previous > horizon {
            return Err(HawkesError::EventAfterHorizon { last: previous, horizon });
        }

        let mut times = Array1::zeros(event_times.len() + 1);
        times.slice_mut(s![1..]).assign(&event_times);
        Ok(EventSequence { times, horizon })
    }

    /// All times including the synthetic start, `[0, t_1, …, t_N]`.
    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.times.view()
    }

    /// Real event times `[t_1, …, t_N]`.
    pub fn event_times(&self) -> ArrayView1<'_, f64> {
        self.times.slice(s![1..])
    }

    /// Number of real events `N`.
    pub fn n_events(&self) -> usize {
        self.times.len() - 1
    }

    /// Number of intervals carrying a snapshot, `N + 1`.
    pub fn n_intervals(&self) -> usize {
        self.times.len()
    }

    /// Observation horizon `T_max`.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Time of the last real event, or 0 when there is none.
    pub fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Inter-event gaps `Δ_i = t_{i+1} − t_i` for `i = 0..N`, length `N`.
    pub fn gaps(&self) -> Array1<f64> {
        &self.times.slice(s![1..]) - &self.times.slice(s![..-1])
    }

    /// Gap consumed by each update step: `[0, Δ_0, …, Δ_{N−1}]`, length `N + 1`.
    pub fn input_gaps(&self) -> Array1<f64> {
        let mut out = Array1::zeros(self.n_intervals());
        out.slice_mut(s![1..]).assign(&self.gaps());
        out
    }

    /// Length of the censored tail `[t_N, T_max]`.
    pub fn tail_gap(&self) -> f64 {
        self.horizon - self.last_time()
    }

    /// Lengths of all `N + 1` intervals: the gaps followed by the tail.
    pub fn interval_lengths(&self) -> Array1<f64> {
        let n = self.n_events();
        let mut out = Array1::zeros(n + 1);
        out.slice_mut(s![..n]).assign(&self.gaps());
        out[n] = self.tail_gap();
        out
    }
}

/// `EventBatch` — sequences with a common event count, stepped together.
///
/// Invariants
/// ----------
/// - At least one sequence.
/// - Every sequence has the same `n_events()`; horizons may differ.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBatch {
    sequences: Vec<EventSequence>,
}

impl EventBatch {
    /// Construct a batch, rejecting empty and ragged inputs.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::EmptyBatch` for an empty vector.
    /// - `HawkesError::RaggedBatch` when a sequence's event count differs
    ///   from the first sequence's.
    pub fn new(sequences: Vec<EventSequence>) -> HawkesResult<Self> {
        let expected = match sequences.first() {
            Some(first) => first.n_events(),
            None => return Err(HawkesError::EmptyBatch),
        };
        for (index, seq) in sequences.iter().enumerate() {
            if seq.n_events() != expected {
                return Err(HawkesError::RaggedBatch { index, expected, found: seq.n_events() });
            }
        }
        Ok(EventBatch { sequences })
    }

    pub fn sequences(&self) -> &[EventSequence] {
        &self.sequences
    }

    /// Batch size `B`.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Common event count `N`.
    pub fn n_events(&self) -> usize {
        self.sequences[0].n_events()
    }

    /// Update-step gaps laid out as `(N + 1) × B`: row `i` holds the gap
    /// consumed by step `i` for every sequence of the batch.
    pub fn input_gaps(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.n_events() + 1, self.len()));
        for (b, seq) in self.sequences.iter().enumerate() {
            out.column_mut(b).assign(&seq.input_gaps());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction behavior of `EventSequence::new` and each rejection path.
    // - Gap accessors, including the zero-event edge case.
    // - `EventBatch::new` validation and the batched gap layout.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a valid sequence stores the synthetic start and exposes
    // consistent gaps.
    //
    // Given
    // -----
    // - Events [1.0, 2.5, 4.0] on horizon 5.0.
    //
    // Expect
    // ------
    // - `times = [0, 1, 2.5, 4]`, `gaps = [1, 1.5, 1.5]`, tail = 1.
    // - `input_gaps = [0, 1, 1.5, 1.5]`, `interval_lengths = [1, 1.5, 1.5, 1]`.
    fn event_sequence_new_builds_times_and_gaps() {
        let seq = EventSequence::new(array![1.0, 2.5, 4.0], 5.0).unwrap();

        assert_eq!(seq.times(), array![0.0, 1.0, 2.5, 4.0]);
        assert_eq!(seq.event_times(), array![1.0, 2.5, 4.0]);
        assert_eq!(seq.n_events(), 3);
        assert_eq!(seq.n_intervals(), 4);
        assert_eq!(seq.gaps(), array![1.0, 1.5, 1.5]);
        assert_eq!(seq.input_gaps(), array![0.0, 1.0, 1.5, 1.5]);
        assert_eq!(seq.tail_gap(), 1.0);
        assert_eq!(seq.interval_lengths(), array![1.0, 1.5, 1.5, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify the zero-event edge case.
    //
    // Given
    // -----
    // - No events, horizon 3.0.
    //
    // Expect
    // ------
    // - One interval of length 3 and empty gap vector.
    fn event_sequence_accepts_zero_events() {
        let seq = EventSequence::new(Array1::zeros(0), 3.0).unwrap();

        assert_eq!(seq.n_events(), 0);
        assert_eq!(seq.gaps().len(), 0);
        assert_eq!(seq.input_gaps(), array![0.0]);
        assert_eq!(seq.tail_gap(), 3.0);
        assert_eq!(seq.interval_lengths(), array![3.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify each rejection path of `EventSequence::new`.
    //
    // Expect
    // ------
    // - The matching `HawkesError` variant with the offending values.
    fn event_sequence_new_rejects_invalid_inputs() {
        assert!(matches!(
            EventSequence::new(array![1.0], f64::NAN),
            Err(HawkesError::InvalidHorizon { .. })
        ));
        assert!(matches!(
            EventSequence::new(array![1.0], 0.0),
            Err(HawkesError::InvalidHorizon { .. })
        ));
        assert!(matches!(
            EventSequence::new(array![1.0, f64::INFINITY], 5.0),
            Err(HawkesError::NonFiniteTimestamp { index: 1, .. })
        ));
        assert_eq!(
            EventSequence::new(array![0.0, 1.0], 5.0).unwrap_err(),
            HawkesError::NonPositiveFirstEvent { value: 0.0 }
        );
        assert_eq!(
            EventSequence::new(array![1.0, 1.0], 5.0).unwrap_err(),
            HawkesError::NonIncreasingTimestamps { index: 1, previous: 1.0, value: 1.0 }
        );
        assert_eq!(
            EventSequence::new(array![1.0, 6.0], 5.0).unwrap_err(),
            HawkesError::EventAfterHorizon { last: 6.0, horizon: 5.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that an event exactly at the horizon is accepted and yields a
    // zero-length tail.
    fn event_sequence_allows_last_event_on_horizon() {
        let seq = EventSequence::new(array![1.0, 2.0], 2.0).unwrap();
        assert_eq!(seq.tail_gap(), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify `EventBatch::new` validation and gap layout.
    //
    // Given
    // -----
    // - Two sequences with two events each, then a ragged third sequence.
    //
    // Expect
    // ------
    // - `input_gaps` is (N + 1) × B with one column per sequence.
    // - Empty and ragged batches are rejected.
    fn event_batch_validates_and_lays_out_gaps() {
        let a = EventSequence::new(array![1.0, 3.0], 4.0).unwrap();
        let b = EventSequence::new(array![0.5, 0.75], 1.0).unwrap();
        let batch = EventBatch::new(vec![a.clone(), b]).unwrap();

        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.n_events(), 2);
        assert_eq!(batch.input_gaps(), array![[0.0, 0.0], [1.0, 0.5], [2.0, 0.25]]);

        assert_eq!(EventBatch::new(vec![]).unwrap_err(), HawkesError::EmptyBatch);
        let short = EventSequence::new(array![1.0], 2.0).unwrap();
        assert_eq!(
            EventBatch::new(vec![a, short]).unwrap_err(),
            HawkesError::RaggedBatch { index: 1, expected: 2, found: 1 }
        );
    }
}
