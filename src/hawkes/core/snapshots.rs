//! Pre-allocated arenas of per-interval state snapshots.
//!
//! Purpose
//! -------
//! Store the state attached to each interval `[t_i, t_{i+1})` once, in
//! contiguous buffers indexed by event position, so the intensity evaluators
//! can gather many `(snapshot index, elapsed)` queries into one vectorized
//! decay + projection.
//!
//! Key behaviors
//! -------------
//! - [`RnnSnapshots`]: hidden state and decay rate, each `(N + 1) × H`.
//! - [`CtlstmSnapshots`]: output gate, cell, cell target and decay rate, each
//!   `(N + 1) × B × H`.
//! - Writers (`set_*`) are crate-private and used only by the forward passes;
//!   callers see immutable snapshots.
//! - `gather` helpers copy the requested rows into an `M × H` matrix for a
//!   list of snapshot indices.
//! - [`SnapshotArena`] exposes the interval and batch extents generically so
//!   the likelihood estimator can check an arena against its event data.
//!
//! Invariants & assumptions
//! ------------------------
//! - Row `i` is valid on `[t_i, t_{i+1})`; the last row covers the censored
//!   tail `[t_N, T_max]`.
use crate::hawkes::{
    core::validation::{validate_hidden_size, validate_shape, validate_snapshot_index},
    errors::HawkesResult,
};
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis, s};

/// Extents shared by every snapshot arena.
pub trait SnapshotArena {
    /// Number of stored intervals, `N + 1`.
    fn n_intervals(&self) -> usize;
    /// Number of independent sequences stored side by side.
    fn batch_size(&self) -> usize;
}

/// Snapshot arena for the recurrent Hawkes variant.
#[derive(Debug, Clone, PartialEq)]
pub struct RnnSnapshots {
    hidden: Array2<f64>,
    decay: Array2<f64>,
}

impl RnnSnapshots {
    /// Zero-filled arena for `n_intervals` snapshots of width `hidden_size`.
    pub(crate) fn zeros(n_intervals: usize, hidden_size: usize) -> Self {
        RnnSnapshots {
            hidden: Array2::zeros((n_intervals, hidden_size)),
            decay: Array2::zeros((n_intervals, hidden_size)),
        }
    }

    pub(crate) fn set(
        &mut self, index: usize, hidden: ArrayView1<'_, f64>, decay: ArrayView1<'_, f64>,
    ) {
        self.hidden.row_mut(index).assign(&hidden);
        self.decay.row_mut(index).assign(&decay);
    }

    /// Arena over caller-supplied snapshot matrices.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::ShapeMismatch` if the two matrices differ in shape.
    /// - `HawkesError::InvalidHiddenSize` for zero-width matrices.
    pub fn from_parts(hidden: Array2<f64>, decay: Array2<f64>) -> HawkesResult<Self> {
        validate_shape("RnnSnapshots::from_parts", hidden.shape(), decay.shape())?;
        validate_hidden_size(hidden.ncols())?;
        Ok(RnnSnapshots { hidden, decay })
    }

    pub fn len(&self) -> usize {
        self.hidden.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.nrows() == 0
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden.ncols()
    }

    pub fn hidden(&self) -> ArrayView2<'_, f64> {
        self.hidden.view()
    }

    pub fn decay(&self) -> ArrayView2<'_, f64> {
        self.decay.view()
    }

    /// Snapshot `i` as `(h_i, δ_i)`.
    pub fn get(&self, index: usize) -> HawkesResult<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        validate_snapshot_index(index, self.len())?;
        Ok((self.hidden.row(index), self.decay.row(index)))
    }

    /// Gather `(hidden, decay)` rows for `indices` into two `M × H` matrices.
    pub fn gather(&self, indices: &[usize]) -> HawkesResult<(Array2<f64>, Array2<f64>)> {
        check_indices(indices, self.len())?;
        Ok((self.hidden.select(Axis(0), indices), self.decay.select(Axis(0), indices)))
    }
}

impl SnapshotArena for RnnSnapshots {
    fn n_intervals(&self) -> usize {
        self.len()
    }

    fn batch_size(&self) -> usize {
        1
    }
}

/// The four gathered CT-LSTM buffers for one batch column.
#[derive(Debug, Clone, PartialEq)]
pub struct CtlstmRows {
    pub output_gate: Array2<f64>,
    pub cell: Array2<f64>,
    pub cell_target: Array2<f64>,
    pub decay: Array2<f64>,
}

/// Snapshot arena for the continuous-time LSTM variant.
///
/// Layout
/// ------
/// Every buffer is `(N + 1) × B × H`: axis 0 is the interval, axis 1 the
/// batch row, axis 2 the hidden unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CtlstmSnapshots {
    output_gate: Array3<f64>,
    cell: Array3<f64>,
    cell_target: Array3<f64>,
    decay: Array3<f64>,
}

impl CtlstmSnapshots {
    pub(crate) fn zeros(n_intervals: usize, batch: usize, hidden_size: usize) -> Self {
        let shape = (n_intervals, batch, hidden_size);
        CtlstmSnapshots {
            output_gate: Array3::zeros(shape),
            cell: Array3::zeros(shape),
            cell_target: Array3::zeros(shape),
            decay: Array3::zeros(shape),
        }
    }

    /// Store step `index` for the whole batch; every argument is `B × H`.
    pub(crate) fn set(
        &mut self, index: usize, output_gate: ArrayView2<'_, f64>, cell: ArrayView2<'_, f64>,
        cell_target: ArrayView2<'_, f64>, decay: ArrayView2<'_, f64>,
    ) {
        self.output_gate.index_axis_mut(Axis(0), index).assign(&output_gate);
        self.cell.index_axis_mut(Axis(0), index).assign(&cell);
        self.cell_target.index_axis_mut(Axis(0), index).assign(&cell_target);
        self.decay.index_axis_mut(Axis(0), index).assign(&decay);
    }

    /// Number of intervals `N + 1`.
    pub fn len(&self) -> usize {
        self.cell.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batch_size(&self) -> usize {
        self.cell.len_of(Axis(1))
    }

    pub fn hidden_size(&self) -> usize {
        self.cell.len_of(Axis(2))
    }

    pub fn output_gate(&self) -> &Array3<f64> {
        &self.output_gate
    }

    pub fn cell(&self) -> &Array3<f64> {
        &self.cell
    }

    pub fn cell_target(&self) -> &Array3<f64> {
        &self.cell_target
    }

    pub fn decay(&self) -> &Array3<f64> {
        &self.decay
    }

    /// Gather the rows of batch column `b` at `indices`, each `M × H`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::SnapshotOutOfRange` for a bad interval index or batch
    ///   column.
    pub fn gather(&self, b: usize, indices: &[usize]) -> HawkesResult<CtlstmRows> {
        validate_snapshot_index(b, self.batch_size())?;
        check_indices(indices, self.len())?;
        let pick = |a: &Array3<f64>| a.slice(s![.., b, ..]).select(Axis(0), indices);
        Ok(CtlstmRows {
            output_gate: pick(&self.output_gate),
            cell: pick(&self.cell),
            cell_target: pick(&self.cell_target),
            decay: pick(&self.decay),
        })
    }
}

impl SnapshotArena for CtlstmSnapshots {
    fn n_intervals(&self) -> usize {
        self.len()
    }

    fn batch_size(&self) -> usize {
        CtlstmSnapshots::batch_size(self)
    }
}

// ---- Helper Methods ----

fn check_indices(indices: &[usize], len: usize) -> HawkesResult<()> {
    indices.iter().try_for_each(|&i| validate_snapshot_index(i, len))
}
