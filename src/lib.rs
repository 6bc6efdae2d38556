//! # psplines
//!
//! Penalized B-spline (P-spline) curve fitting in pure Rust.
//!
//! Fits a smooth, optionally monotone curve through noisy, irregularly
//! spaced (x, y) samples by solving
//!
//! ```text
//! (B'B + lambda * D3'D3 + kappa * D1'VD1) alpha = B'y
//! ```
//!
//! where B'B is the least-squares part, lambda * D3'D3 the smoothing part,
//! and kappa * D1'VD1 the monotonicity part with an active-constraint
//! indicator V that is re-derived from the solution until it stabilizes
//! (Eilers 2005). Typical uses are calibration curves, growth curves, and
//! sensor linearization.
//!
//! ## Capabilities
//!
//! - Extended uniform knot sequences and B-spline design matrices
//!   ([`basis`])
//! - Finite-difference penalty operators ([`penalty`])
//! - Plain and monotone penalized fits with an explicit convergence status
//!   ([`solver`])
//! - Evaluation of the fitted curve at arbitrary points within the training
//!   range, with extrapolation as an explicit opt-in ([`curve`])
//! - Batch fitting of independent curves, parallel under the `parallel`
//!   feature
//!
//! ## Example
//!
//! ```
//! use psplines::{fit_monotone, DEFAULT_MAX_ITERATIONS, DEFAULT_MONOTONE_KAPPA};
//!
//! let x = [1.0, 8.0, 15.0, 22.0, 30.0, 38.0, 46.0, 54.0];
//! let y = [1.0, 2.0, 2.5, 3.4, 3.0, 3.6, 3.33, 3.0];
//!
//! let fit = fit_monotone(
//!     &x,
//!     &y,
//!     3,
//!     100,
//!     100_000.0,
//!     DEFAULT_MONOTONE_KAPPA,
//!     DEFAULT_MAX_ITERATIONS,
//! )?;
//!
//! assert!(fit.convergence.is_converged());
//! let value = fit.curve.evaluate(27.0)?;
//! assert!(value.is_finite());
//! # Ok::<(), psplines::FitError>(())
//! ```

#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

pub mod parallel;

pub mod basis;
pub mod curve;
pub mod error;
pub mod helpers;
pub mod penalty;
pub mod solver;

// Re-export commonly used items
pub use curve::FittedCurve;
pub use error::FitError;
pub use helpers::{DEFAULT_MAX_ITERATIONS, DEFAULT_MONOTONE_KAPPA, NUMERICAL_EPS};
pub use solver::{
    fit_monotone, fit_penalized, fit_penalized_batch, fit_pspline, Convergence, Direction,
    PsplineFit,
};
