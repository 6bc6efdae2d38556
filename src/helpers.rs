//! Shared numerical constants.

/// Small epsilon for numerical comparisons (zero-width knot intervals,
/// singular-value cutoff in the SVD solve).
pub const NUMERICAL_EPS: f64 = 1e-10;

/// Default monotonicity penalty strength. Large enough that converged fits
/// violate the requested direction only at numerical-noise level.
pub const DEFAULT_MONOTONE_KAPPA: f64 = 1e6;

/// Default iteration budget for the active-set reweighting loop.
pub const DEFAULT_MAX_ITERATIONS: usize = 30;
