//! Fitting errors.

use thiserror::Error;

/// Errors that can occur while fitting or evaluating a penalized spline.
///
/// Precondition violations fail before any computation is performed.
/// Exhausting the iteration budget is deliberately *not* an error: the
/// solver still returns a usable fit tagged
/// [`Convergence::MaxIterExceeded`](crate::solver::Convergence).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// x and y have different lengths
    #[error("x has {x_len} values but y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    /// Not enough samples for the requested spline degree
    #[error("degree {degree} needs at least {min} samples, got {got}")]
    TooFewSamples {
        degree: usize,
        min: usize,
        got: usize,
    },

    /// Spline degree below 1
    #[error("degree must be at least 1, got {0}")]
    InvalidDegree(usize),

    /// Knot segment count below 1
    #[error("segments must be at least 1, got {0}")]
    InvalidSegments(usize),

    /// Penalty weight is negative, NaN, or infinite
    #[error("{name} must be finite and non-negative, got {value}")]
    NonFinitePenalty { name: &'static str, value: f64 },

    /// Iteration budget below 1
    #[error("max_iterations must be at least 1")]
    InvalidIterationBudget,

    /// All x values are identical, so no knot interval can be formed
    #[error("x range is degenerate: min == max == {0}")]
    DegenerateRange(f64),

    /// Too few basis functions for the order-3 smoothing penalty
    #[error("order-3 penalty needs at least 4 basis functions, got {0} (degree + segments)")]
    TooFewBasisFunctions(usize),

    /// Evaluation requested outside the fitted x range
    #[error("x = {x} lies outside the fitted domain [{min}, {max}]")]
    OutOfDomain { x: f64, min: f64, max: f64 },

    /// The penalized normal equations could not be solved
    #[error("linear solve failed: {0}")]
    SolveFailure(String),
}
