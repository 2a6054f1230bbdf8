//! Continuous-time decay of latent states between events.
//!
//! Purpose
//! -------
//! Reconstruct the latent state at an arbitrary time inside an interval from
//! the snapshot taken at the interval's start, its per-dimension decay rate
//! and the elapsed time since that start.
//!
//! Key behaviors
//! -------------
//! - Plain form: `h(t) = h · exp(−δ · e)`.
//! - Asymptotic form: `c(t) = c̄ + (c − c̄) · exp(−δ · e)`.
//! - Each form comes in scalar, vector and row-batched flavours; the batched
//!   flavour takes one elapsed value per row and broadcasts it across the
//!   hidden dimension.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both forms are exact at `e = 0`.
//! - For `δ > 0` and `e ≥ 0` the plain form shrinks toward 0 and the
//!   asymptotic form moves monotonically from `c` toward `c̄`.
//! - Negative `e` or `δ` are evaluated as written; callers own those
//!   preconditions.
use crate::hawkes::{
    core::validation::{validate_len, validate_shape},
    errors::HawkesResult,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

/// Scalar plain decay `h · exp(−δ · elapsed)`.
pub fn decay_plain_scalar(h: f64, delta: f64, elapsed: f64) -> f64 {
    h * (-delta * elapsed).exp()
}

/// Scalar asymptotic decay `c̄ + (c − c̄) · exp(−δ · elapsed)`.
pub fn decay_asymptotic_scalar(c: f64, c_bar: f64, delta: f64, elapsed: f64) -> f64 {
    c_bar + (c - c_bar) * (-delta * elapsed).exp()
}

/// Plain decay of one state vector.
///
/// Errors
/// ------
/// - `HawkesError::ShapeMismatch` if `h` and `delta` differ in length.
pub fn decay_plain(
    h: ArrayView1<'_, f64>, delta: ArrayView1<'_, f64>, elapsed: f64,
) -> HawkesResult<Array1<f64>> {
    validate_len("decay_plain", h.len(), delta.len())?;
    Ok(Zip::from(&h).and(&delta).map_collect(|&h, &d| decay_plain_scalar(h, d, elapsed)))
}

/// Asymptotic decay of one cell vector toward its target.
///
/// Errors
/// ------
/// - `HawkesError::ShapeMismatch` if the three vectors differ in length.
pub fn decay_asymptotic(
    c: ArrayView1<'_, f64>, c_bar: ArrayView1<'_, f64>, delta: ArrayView1<'_, f64>,
    elapsed: f64,
) -> HawkesResult<Array1<f64>> {
    validate_len("decay_asymptotic", c.len(), c_bar.len())?;
    validate_len("decay_asymptotic", c.len(), delta.len())?;
    Ok(Zip::from(&c)
        .and(&c_bar)
        .and(&delta)
        .map_collect(|&c, &cb, &d| decay_asymptotic_scalar(c, cb, d, elapsed)))
}

/// Row-batched plain decay.
///
/// Parameters
/// ----------
/// - `h`, `delta`: `M × H` state and decay rows.
/// - `elapsed`: length `M`; row `m` is decayed by `elapsed[m]`.
///
/// Errors
/// ------
/// - `HawkesError::ShapeMismatch` on any disagreement in `M` or `H`.
pub fn decay_plain_rows(
    h: ArrayView2<'_, f64>, delta: ArrayView2<'_, f64>, elapsed: ArrayView1<'_, f64>,
) -> HawkesResult<Array2<f64>> {
    validate_shape("decay_plain_rows", h.shape(), delta.shape())?;
    validate_len("decay_plain_rows", h.nrows(), elapsed.len())?;
    let mut factor = (&delta * &elapsed.insert_axis(Axis(1))).mapv(|x| (-x).exp());
    factor *= &h;
    Ok(factor)
}

/// Row-batched asymptotic decay; shapes as in [`decay_plain_rows`].
pub fn decay_asymptotic_rows(
    c: ArrayView2<'_, f64>, c_bar: ArrayView2<'_, f64>, delta: ArrayView2<'_, f64>,
    elapsed: ArrayView1<'_, f64>,
) -> HawkesResult<Array2<f64>> {
    validate_shape("decay_asymptotic_rows", c.shape(), c_bar.shape())?;
    validate_shape("decay_asymptotic_rows", c.shape(), delta.shape())?;
    validate_len("decay_asymptotic_rows", c.nrows(), elapsed.len())?;
    let mut out = Array2::zeros(c.raw_dim());
    for (m, &e) in elapsed.iter().enumerate() {
        Zip::from(out.row_mut(m))
            .and(c.row(m))
            .and(c_bar.row(m))
            .and(delta.row(m))
            .for_each(|o, &c, &cb, &d| *o = decay_asymptotic_scalar(c, cb, d, e));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exactness at zero elapsed time for both forms.
    // - Monotonicity of the plain form and the limit of the asymptotic form.
    // - Agreement of the row-batched flavours with the vector flavours.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the plain form is exact at zero and non-increasing in
    // elapsed time for non-negative states and rates.
    //
    // Given
    // -----
    // - h = [1, 2, 0.5], δ = [0.1, 1, 0], elapsed on a grid in [0, 10].
    //
    // Expect
    // ------
    // - Equality with h at 0; each component never increases along the grid.
    fn plain_decay_is_exact_at_zero_and_non_increasing() {
        let h = array![1.0, 2.0, 0.5];
        let d = array![0.1, 1.0, 0.0];

        assert_eq!(decay_plain(h.view(), d.view(), 0.0).unwrap(), h);
        let mut prev = h.clone();
        for k in 1..=100 {
            let cur = decay_plain(h.view(), d.view(), k as f64 * 0.1).unwrap();
            assert!(cur.iter().zip(prev.iter()).all(|(c, p)| c <= p));
            prev = cur;
        }
        assert_eq!(prev[2], 0.5);
    }

    #[test]
    // Purpose
    // -------
    // Verify the asymptotic form: `c` at zero, monotone toward `c̄`, and
    // converging to `c̄` for large elapsed time.
    //
    // Given
    // -----
    // - c = [2, -1], c̄ = [0.5, 0.5], δ = [0.7, 3].
    //
    // Expect
    // ------
    // - Value at 0 equals c; distance to c̄ shrinks along the grid; value at
    //   elapsed 1e3 equals c̄ to 1e-12.
    fn asymptotic_decay_moves_monotonically_to_target() {
        let c = array![2.0, -1.0];
        let cb = array![0.5, 0.5];
        let d = array![0.7, 3.0];

        assert_eq!(decay_asymptotic(c.view(), cb.view(), d.view(), 0.0).unwrap(), c);
        let mut prev_gap = (&c - &cb).mapv(f64::abs);
        for k in 1..=50 {
            let cur = decay_asymptotic(c.view(), cb.view(), d.view(), k as f64 * 0.2).unwrap();
            let gap = (&cur - &cb).mapv(f64::abs);
            assert!(gap.iter().zip(prev_gap.iter()).all(|(g, p)| g <= p));
            prev_gap = gap;
        }
        let far = decay_asymptotic(c.view(), cb.view(), d.view(), 1e3).unwrap();
        for (f, t) in far.iter().zip(cb.iter()) {
            assert_relative_eq!(*f, *t, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that the row-batched flavours agree with per-row vector calls and
    // reject mismatched elapsed lengths.
    fn row_batched_decay_matches_vector_form() {
        let c = array![[1.0, 2.0], [3.0, -4.0]];
        let cb = array![[0.0, 1.0], [-1.0, 0.0]];
        let d = array![[0.5, 0.25], [2.0, 0.1]];
        let e = array![0.3, 1.7];

        let plain = decay_plain_rows(c.view(), d.view(), e.view()).unwrap();
        let asym = decay_asymptotic_rows(c.view(), cb.view(), d.view(), e.view()).unwrap();
        for m in 0..2 {
            let p = decay_plain(c.row(m), d.row(m), e[m]).unwrap();
            let a = decay_asymptotic(c.row(m), cb.row(m), d.row(m), e[m]).unwrap();
            assert_eq!(plain.row(m), p);
            assert_eq!(asym.row(m), a);
        }

        assert!(decay_plain_rows(c.view(), d.view(), array![1.0].view()).is_err());
        assert!(decay_asymptotic(c.row(0), cb.row(0), array![1.0].view(), 0.0).is_err());
    }
}
