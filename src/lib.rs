//! neural_hawkes — neural Hawkes point processes with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge exposing the two neural Hawkes models to
//! Python through the `neural_hawkes` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`hawkes` and `numerical_stability`) as
//!   the public crate surface.
//! - Define `#[pyclass]` wrappers (`HawkesRNN`, `NeuralCTLSTM`) and the
//!   `#[pymodule]` initializer.
//! - Register the `models` submodule under `neural_hawkes` in `sys.modules`
//!   so dotted imports work from Python.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion and error mapping.
//! - Each Python model object owns its own seeded sampler, so repeated
//!   `loss` calls advance one reproducible random stream.
//!
//! Conventions
//! -----------
//! - Errors from the core are `HawkesError` values converted to `PyErr`
//!   (`ValueError`, or `NotImplementedError` for stubs) at the boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`hawkes`] directly and can ignore the
//!   items guarded by `python-bindings`.

pub mod hawkes;
pub mod numerical_stability;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    hawkes::{
        core::{
            data::EventBatch,
            layers::Nonlinearity,
            options::{CtlstmConfig, EstimatorOptions, RnnConfig},
            sampling::RngSampler,
        },
        models::{ctlstm::NeuralCTLSTM, likelihood::LikelihoodEstimator, rnn::HawkesRNN},
    },
    utils::extract_event_sequence,
};

/// HawkesRNN — Python-facing wrapper for the recurrent neural Hawkes model.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `HawkesRNN(hidden_size=16, nonlinearity="relu", mc_samples=1, seed=None)`:
/// - `hidden_size`: width of the hidden state, `> 0`.
/// - `nonlinearity`: `"relu"` or `"tanh"` (case-insensitive).
/// - `mc_samples`: Monte-Carlo samples per interval for the compensator.
/// - `seed`: optional seed for initialization and sampling.
///
/// Fields
/// ------
/// - `inner`: the Rust [`HawkesRNN`].
/// - `estimator`: the [`LikelihoodEstimator`] used by `loss`.
/// - `sampler`: seeded source for initial states and Monte-Carlo draws.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "HawkesRNN", module = "neural_hawkes.models")]
pub struct PyHawkesRNN {
    inner: HawkesRNN,
    estimator: LikelihoodEstimator,
    sampler: RngSampler,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyHawkesRNN {
    #[new]
    #[pyo3(
        signature = (hidden_size = 16, nonlinearity = "relu", mc_samples = 1, seed = None),
        text_signature = "(hidden_size=16, nonlinearity='relu', mc_samples=1, seed=None)"
    )]
    pub fn new(
        hidden_size: usize, nonlinearity: &str, mc_samples: usize, seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = RnnConfig::new(hidden_size, nonlinearity.parse::<Nonlinearity>()?)?;
        let options = EstimatorOptions::new(mc_samples, seed)?;
        let mut sampler = options.sampler()?;
        let inner = HawkesRNN::new(config, &mut sampler)?;
        Ok(PyHawkesRNN { inner, estimator: LikelihoodEstimator::new(options), sampler })
    }

    /// Negative log-likelihood of one sequence of event times on
    /// `[0, horizon]`.
    #[pyo3(text_signature = "(self, times, horizon)")]
    pub fn loss<'py>(
        &mut self, py: Python<'py>, times: &Bound<'py, PyAny>, horizon: f64,
    ) -> PyResult<f64> {
        let seq = extract_event_sequence(py, times, horizon)?;
        Ok(self.inner.negative_log_likelihood(&seq, &self.estimator, &mut self.sampler)?)
    }

    #[getter]
    pub fn hidden_size(&self) -> usize {
        self.inner.hidden_size()
    }
}

/// NeuralCTLSTM — Python-facing wrapper for the continuous-time LSTM model.
///
/// Constructed from Python via
/// `NeuralCTLSTM(hidden_size=16, mc_samples=1, seed=None)`; `loss` scores a
/// single sequence as a batch of one.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "NeuralCTLSTM", module = "neural_hawkes.models")]
pub struct PyNeuralCTLSTM {
    inner: NeuralCTLSTM,
    estimator: LikelihoodEstimator,
    sampler: RngSampler,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyNeuralCTLSTM {
    #[new]
    #[pyo3(
        signature = (hidden_size = 16, mc_samples = 1, seed = None),
        text_signature = "(hidden_size=16, mc_samples=1, seed=None)"
    )]
    pub fn new(hidden_size: usize, mc_samples: usize, seed: Option<u64>) -> PyResult<Self> {
        let options = EstimatorOptions::new(mc_samples, seed)?;
        let mut sampler = options.sampler()?;
        let inner = NeuralCTLSTM::new(CtlstmConfig::new(hidden_size)?, &mut sampler)?;
        Ok(PyNeuralCTLSTM { inner, estimator: LikelihoodEstimator::new(options), sampler })
    }

    #[pyo3(text_signature = "(self, times, horizon)")]
    pub fn loss<'py>(
        &mut self, py: Python<'py>, times: &Bound<'py, PyAny>, horizon: f64,
    ) -> PyResult<f64> {
        let seq = extract_event_sequence(py, times, horizon)?;
        let batch = EventBatch::new(vec![seq])?;
        Ok(self.inner.negative_log_likelihood(&batch, &self.estimator, &mut self.sampler)?)
    }

    #[getter]
    pub fn hidden_size(&self) -> usize {
        self.inner.hidden_size()
    }
}

/// neural_hawkes — PyO3 module initializer for the Python extension.
///
/// Creates the `models` submodule, attaches it to the parent module and
/// registers it in `sys.modules` as `neural_hawkes.models`.
///
/// Errors
/// ------
/// - `PyErr` if creating the submodule or touching `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
#[pyo3(name = "neural_hawkes")]
fn py_neural_hawkes<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let models_mod = PyModule::new(py, "models")?;
    models_mod.add_class::<PyHawkesRNN>()?;
    models_mod.add_class::<PyNeuralCTLSTM>()?;
    m.add_submodule(&models_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    py.import("sys")?.getattr("modules")?.set_item("neural_hawkes.models", models_mod)?;
    Ok(())
}
