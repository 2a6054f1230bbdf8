//! models — neural Hawkes parameterizations and their likelihood.
//!
//! Purpose
//! -------
//! Compose the primitives in `hawkes::core` into the two trainable
//! point-process models and the Monte-Carlo loss shared by both.
//!
//! Key behaviors
//! -------------
//! - [`HawkesRNN`]: Elman-cell recurrence with a single hidden state decaying
//!   toward zero between events; ReLU intensity.
//! - [`NeuralCTLSTM`]: continuous-time LSTM whose cell relaxes toward a
//!   target between events; softplus intensity; batched over sequences.
//! - [`LikelihoodEstimator`]: `−Σ log λ(events) + ∫ λ` with the integral
//!   estimated by uniform sampling inside every interval, reading
//!   intensities through the [`ContinuousIntensity`] trait.
//!
//! Conventions
//! -----------
//! - Models are immutable during evaluation. Every random draw comes from a
//!   `SampleSource` the caller passes in.
//! - Loss sign: both models return the negative log-likelihood.

pub mod ctlstm;
pub mod likelihood;
pub mod rnn;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::ctlstm::{CellState, CellUpdate, CtlstmLayers, NeuralCTLSTM};
pub use self::likelihood::{ContinuousIntensity, LikelihoodEstimator, LikelihoodTerms};
pub use self::rnn::HawkesRNN;
