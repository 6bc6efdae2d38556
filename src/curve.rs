//! The fitted spline curve.

use crate::basis::design_matrix;
use crate::error::FitError;
use nalgebra::DVector;

/// A fitted penalized B-spline: knot sequence, coefficients, and degree.
///
/// Evaluation is a pure function of the stored state and may be called any
/// number of times. Queries are restricted to the x range the curve was
/// fitted on; outside it the basis loses support and values become
/// unreliable, so [`evaluate`](FittedCurve::evaluate) rejects such queries
/// and extrapolation must be requested explicitly via
/// [`evaluate_extrapolated`](FittedCurve::evaluate_extrapolated).
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    knots: Vec<f64>,
    coefficients: Vec<f64>,
    degree: usize,
    domain: (f64, f64),
}

impl FittedCurve {
    pub(crate) fn new(
        knots: Vec<f64>,
        coefficients: Vec<f64>,
        degree: usize,
        domain: (f64, f64),
    ) -> Self {
        Self {
            knots,
            coefficients,
            degree,
            domain,
        }
    }

    /// The extended knot sequence the curve was fitted over.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// The fitted basis coefficients (one per basis function).
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// The B-spline degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The x range of the training data, `(x_min, x_max)`.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn check_domain(&self, x: f64) -> Result<(), FitError> {
        let (min, max) = self.domain;
        if x < min || x > max || x.is_nan() {
            return Err(FitError::OutOfDomain { x, min, max });
        }
        Ok(())
    }

    fn value_at(&self, x: f64) -> f64 {
        let row = design_matrix(&[x], &self.knots, self.degree);
        (0..self.coefficients.len())
            .map(|j| row[(0, j)] * self.coefficients[j])
            .sum()
    }

    /// Evaluate the curve at a single point.
    ///
    /// Returns [`FitError::OutOfDomain`] for x outside the training range.
    pub fn evaluate(&self, x: f64) -> Result<f64, FitError> {
        self.check_domain(x)?;
        Ok(self.value_at(x))
    }

    /// Evaluate the curve at a sequence of points.
    ///
    /// Output order matches input order. Fails on the first query outside
    /// the training range, before any values are computed.
    pub fn evaluate_many(&self, xs: &[f64]) -> Result<Vec<f64>, FitError> {
        for &x in xs {
            self.check_domain(x)?;
        }
        let basis = design_matrix(xs, &self.knots, self.degree);
        let coefs = DVector::from_column_slice(&self.coefficients);
        let values = basis * coefs;
        Ok(values.iter().copied().collect())
    }

    /// Evaluate outside the training range.
    ///
    /// Between the training range and the extended knot boundary the curve
    /// is supported by fewer than `degree + 1` basis functions; beyond the
    /// extended knots it decays to 0. Either way the value carries low
    /// confidence, which is why this is a separate opt-in.
    pub fn evaluate_extrapolated(&self, x: f64) -> f64 {
        self.value_at(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::knot_sequence;

    /// Curve whose coefficients are all 1: partition of unity makes it
    /// constant 1 over the training domain.
    fn unit_curve() -> FittedCurve {
        let degree = 3;
        let knots = knot_sequence(0.0, 10.0, degree, 8);
        let m = knots.len() - degree - 1;
        FittedCurve::new(knots, vec![1.0; m], degree, (0.0, 10.0))
    }

    #[test]
    fn test_evaluate_constant_curve() {
        let curve = unit_curve();
        for x in [0.0, 0.1, 3.7, 9.99, 10.0] {
            let v = curve.evaluate(x).unwrap();
            assert!((v - 1.0).abs() < 1e-10, "value at {} was {}", x, v);
        }
    }

    #[test]
    fn test_evaluate_rejects_out_of_domain() {
        let curve = unit_curve();
        let err = curve.evaluate(10.5).unwrap_err();
        assert!(matches!(err, FitError::OutOfDomain { .. }));
        assert!(curve.evaluate(-0.01).is_err());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let curve = unit_curve();
        let a = curve.evaluate(4.2).unwrap();
        let b = curve.evaluate(4.2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_evaluate_many_preserves_order() {
        let curve = unit_curve();
        let xs = [7.0, 1.0, 5.5, 0.0];
        let many = curve.evaluate_many(&xs).unwrap();
        assert_eq!(many.len(), xs.len());
        for (i, &x) in xs.iter().enumerate() {
            assert_eq!(many[i], curve.evaluate(x).unwrap());
        }
    }

    #[test]
    fn test_evaluate_many_rejects_any_out_of_domain() {
        let curve = unit_curve();
        assert!(curve.evaluate_many(&[1.0, 11.0, 2.0]).is_err());
    }

    #[test]
    fn test_extrapolation_is_opt_in() {
        let curve = unit_curve();
        // Just past the domain: still some basis support.
        let near = curve.evaluate_extrapolated(10.2);
        assert!(near.is_finite());
        // Far past the extended knots: no support at all.
        let far = curve.evaluate_extrapolated(1e6);
        assert_eq!(far, 0.0);
    }
}
