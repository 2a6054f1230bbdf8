//! Conversion helpers for the PyO3 boundary.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! turns Python inputs into validated Rust types, mapping failures to
//! `PyErr`.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::hawkes::core::data::EventSequence;

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Borrow or copy a Python 1-D float input as a contiguous `f64` array.
///
/// Accepts a contiguous `numpy.ndarray`, anything with a `to_numpy` method
/// (e.g. `pandas.Series`), or a plain sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Build a validated [`EventSequence`] from Python event times and a horizon.
#[cfg(feature = "python-bindings")]
pub fn extract_event_sequence<'py>(
    py: Python<'py>, times: &Bound<'py, PyAny>, horizon: f64,
) -> PyResult<EventSequence> {
    let arr = extract_f64_array(py, times)?;
    let slice = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("times must be a 1-D contiguous float64 array"))?;
    Ok(EventSequence::new(Array1::from(slice.to_vec()), horizon)?)
}
