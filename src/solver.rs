//! Iteratively reweighted penalized least-squares solver.
//!
//! Fits spline coefficients by solving
//!
//! ```text
//! (B'B + lambda * D3'D3 + kappa * D1'VD1) alpha = B'y
//! ```
//!
//! where B is the B-spline design matrix, D3/D1 are difference operators
//! over the coefficient index, and V is a diagonal 0/1 indicator marking
//! first differences that currently violate the requested monotonicity
//! direction. V depends on the solution, so the system is re-solved with a
//! refreshed indicator until the active set stabilizes or the iteration
//! budget runs out. The algorithm was introduced in Eilers (2005), Unimodal
//! smoothing, Journal of Chemometrics 19:317-328.

use crate::basis::{basis_count, design_matrix, knot_sequence};
use crate::curve::FittedCurve;
use crate::error::FitError;
use crate::helpers::NUMERICAL_EPS;
use crate::penalty::difference_matrix;
use crate::slice_maybe_parallel;
use nalgebra::{DMatrix, DVector, SVD};
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Direction a monotone fit is constrained toward.
///
/// Only consulted when the monotonicity penalty is active (kappa > 0); the
/// sign test on the fitted first differences is the single place the
/// direction enters the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Penalize decreasing coefficient pairs (non-decreasing fit).
    #[default]
    Increasing,
    /// Penalize increasing coefficient pairs (non-increasing fit).
    Decreasing,
}

/// Termination status of the reweighting loop.
///
/// `iterations` counts linear solves performed. Exhausting the budget is a
/// degraded-confidence result, not a failure: the last coefficients are
/// still returned and the caller decides how to surface the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The active-constraint set reached a fixed point.
    Converged { iterations: usize },
    /// The active-constraint set was still changing when the budget ran out.
    MaxIterExceeded { iterations: usize },
}

impl Convergence {
    /// Whether the active set stabilized.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    /// Number of linear solves performed.
    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations } => iterations,
            Convergence::MaxIterExceeded { iterations } => iterations,
        }
    }
}

/// Result of a penalized spline fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PsplineFit {
    /// The fitted curve, evaluable at arbitrary x within the training range.
    pub curve: FittedCurve,
    /// Termination status of the solver.
    pub convergence: Convergence,
    /// Fitted values at the training x, in input order.
    pub fitted: Vec<f64>,
    /// Residual sum of squares at the training x.
    pub rss: f64,
}

/// Fit a penalized regression spline, optionally monotone.
///
/// This is the unified entry point: `kappa = 0` yields a plain penalized
/// least-squares fit in a single solve, `kappa > 0` runs the active-set
/// reweighting loop of the module doc. [`fit_pspline`] and [`fit_monotone`]
/// are thin wrappers over this function.
///
/// # Arguments
/// * `x`, `y` - samples; x need not be sorted but must span a non-degenerate
///   range
/// * `degree` - B-spline degree, at least 1
/// * `segments` - inter-knot segments over the x range, at least 1
/// * `lambda` - smoothing strength, non-negative
/// * `kappa` - monotonicity penalty strength, non-negative
/// * `max_iterations` - budget for the reweighting loop, at least 1
/// * `direction` - monotonicity direction enforced when kappa > 0
pub fn fit_penalized(
    x: &[f64],
    y: &[f64],
    degree: usize,
    segments: usize,
    lambda: f64,
    kappa: f64,
    max_iterations: usize,
    direction: Direction,
) -> Result<PsplineFit, FitError> {
    let (x_min, x_max) = validate(x, y, degree, segments, lambda, kappa, max_iterations)?;

    let knots = knot_sequence(x_min, x_max, degree, segments);
    let b = design_matrix(x, &knots, degree);
    let m = basis_count(&knots, degree);

    let d1 = difference_matrix(m, 1);
    let d3 = difference_matrix(m, 3);

    // Iteration-independent parts of the normal equations.
    let gram = b.transpose() * &b;
    let a_fixed = &gram + lambda * (d3.transpose() * &d3);
    let rhs = b.transpose() * DVector::from_column_slice(y);

    let (alpha, convergence) = if kappa == 0.0 {
        // No monotonicity term: the system does not depend on the solution,
        // so one solve suffices.
        let alpha = solve_symmetric(a_fixed, &rhs)?;
        (alpha, Convergence::Converged { iterations: 1 })
    } else {
        reweighted_solve(&a_fixed, &d1, &rhs, kappa, max_iterations, direction)?
    };

    let fitted = &b * &alpha;
    let rss = y
        .iter()
        .zip(fitted.iter())
        .map(|(yi, fi)| (yi - fi) * (yi - fi))
        .sum();

    Ok(PsplineFit {
        curve: FittedCurve::new(
            knots,
            alpha.iter().copied().collect(),
            degree,
            (x_min, x_max),
        ),
        convergence,
        fitted: fitted.iter().copied().collect(),
        rss,
    })
}

/// Fit a plain (non-monotone) penalized regression spline.
///
/// Equivalent to [`fit_penalized`] with `kappa = 0`: a single solve of
/// `(B'B + lambda * D3'D3) alpha = B'y`.
pub fn fit_pspline(
    x: &[f64],
    y: &[f64],
    degree: usize,
    segments: usize,
    lambda: f64,
) -> Result<PsplineFit, FitError> {
    fit_penalized(x, y, degree, segments, lambda, 0.0, 1, Direction::Increasing)
}

/// Fit a monotone-increasing penalized regression spline.
///
/// Equivalent to [`fit_penalized`] with `Direction::Increasing`; use
/// [`fit_penalized`] directly for a decreasing fit.
pub fn fit_monotone(
    x: &[f64],
    y: &[f64],
    degree: usize,
    segments: usize,
    lambda: f64,
    kappa: f64,
    max_iterations: usize,
) -> Result<PsplineFit, FitError> {
    fit_penalized(
        x,
        y,
        degree,
        segments,
        lambda,
        kappa,
        max_iterations,
        Direction::Increasing,
    )
}

/// Fit several curves sharing one x grid.
///
/// Each curve is an independent fit with its own coefficient vector and
/// active-constraint state; under the `parallel` feature the curves are
/// distributed across threads. Fails on the first curve that fails.
pub fn fit_penalized_batch(
    x: &[f64],
    curves: &[Vec<f64>],
    degree: usize,
    segments: usize,
    lambda: f64,
    kappa: f64,
    max_iterations: usize,
    direction: Direction,
) -> Result<Vec<PsplineFit>, FitError> {
    let fits: Vec<Result<PsplineFit, FitError>> = slice_maybe_parallel!(curves)
        .map(|y| fit_penalized(x, y, degree, segments, lambda, kappa, max_iterations, direction))
        .collect();
    fits.into_iter().collect()
}

/// Check all preconditions up front; nothing is computed on failure.
fn validate(
    x: &[f64],
    y: &[f64],
    degree: usize,
    segments: usize,
    lambda: f64,
    kappa: f64,
    max_iterations: usize,
) -> Result<(f64, f64), FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < degree + 2 {
        return Err(FitError::TooFewSamples {
            degree,
            min: degree + 2,
            got: x.len(),
        });
    }
    if degree < 1 {
        return Err(FitError::InvalidDegree(degree));
    }
    if segments < 1 {
        return Err(FitError::InvalidSegments(segments));
    }
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(FitError::NonFinitePenalty {
            name: "lambda",
            value: lambda,
        });
    }
    if !kappa.is_finite() || kappa < 0.0 {
        return Err(FitError::NonFinitePenalty {
            name: "kappa",
            value: kappa,
        });
    }
    if max_iterations < 1 {
        return Err(FitError::InvalidIterationBudget);
    }

    let x_min = x.iter().cloned().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !(x_max > x_min) {
        return Err(FitError::DegenerateRange(x_min));
    }

    let m = degree + segments;
    if m < 4 {
        return Err(FitError::TooFewBasisFunctions(m));
    }

    Ok((x_min, x_max))
}

/// Run the active-set reweighting loop.
///
/// The indicator starts all-inactive, so the first pass is the unpenalized
/// (kappa-free) solution. A fixed point of the indicator map means every
/// active difference stays active and every inactive one stays inactive,
/// which is the convergence criterion; the loop is a discrete fixed-point
/// iteration, not a continuous optimization, and can oscillate between
/// active sets without settling.
fn reweighted_solve(
    a_fixed: &DMatrix<f64>,
    d1: &DMatrix<f64>,
    rhs: &DVector<f64>,
    kappa: f64,
    max_iterations: usize,
    direction: Direction,
) -> Result<(DVector<f64>, Convergence), FitError> {
    let m = a_fixed.ncols();
    let mut active = vec![false; m - 1];
    let mut alpha = DVector::zeros(m);

    for iteration in 1..=max_iterations {
        let weights = DVector::from_iterator(
            m - 1,
            active.iter().map(|&on| if on { kappa } else { 0.0 }),
        );
        let system = a_fixed + d1.transpose() * DMatrix::from_diagonal(&weights) * d1;
        alpha = solve_symmetric(system, rhs)?;

        let diffs = d1 * &alpha;
        let next: Vec<bool> = diffs
            .iter()
            .map(|&d| match direction {
                Direction::Increasing => d < 0.0,
                Direction::Decreasing => d > 0.0,
            })
            .collect();

        let changed = active
            .iter()
            .zip(next.iter())
            .filter(|(was, now)| was != now)
            .count();
        log::debug!(
            "reweighting iteration {iteration}: {changed} of {} indicators changed",
            m - 1
        );
        active = next;

        if changed == 0 {
            return Ok((alpha, Convergence::Converged { iterations: iteration }));
        }
    }

    log::warn!(
        "active set did not stabilize within {max_iterations} iterations; returning last solution"
    );
    Ok((
        alpha,
        Convergence::MaxIterExceeded {
            iterations: max_iterations,
        },
    ))
}

/// Solve the symmetric normal-equations system via SVD with a small
/// singular-value cutoff.
fn solve_symmetric(system: DMatrix<f64>, rhs: &DVector<f64>) -> Result<DVector<f64>, FitError> {
    SVD::new(system, true, true)
        .solve(rhs, NUMERICAL_EPS)
        .map_err(|message| FitError::SolveFailure(message.to_string()))
}
