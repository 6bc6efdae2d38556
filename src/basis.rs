//! B-spline knot construction and design-matrix evaluation.
//!
//! The knot sequence extends uniformly beyond the data range so that every
//! x in [x_min, x_max] is covered by exactly degree+1 non-zero basis
//! functions; see De Leeuw (2017), Computing and Fitting Monotone Splines.

use crate::helpers::NUMERICAL_EPS;
use nalgebra::DMatrix;

/// Build the extended knot sequence for a P-spline fit.
///
/// The basic interval `[x_min, x_max]` is split into `segments` pieces of
/// width `h`, and `degree + 1` extra knots of roughly width h are placed
/// beyond each boundary. The full sequence is a uniform subdivision of
/// `[x_min - (degree+1)h, x_max + (degree+1)h]` into
/// `2*degree + segments + 1` points.
///
/// Inside the basic interval the B-spline basis of the given degree forms a
/// partition of unity; outside it fewer basis functions are non-zero and a
/// fitted curve is extrapolating.
///
/// # Arguments
/// * `x_min`, `x_max` - data range, `x_max > x_min`
/// * `degree` - B-spline degree, at least 1
/// * `segments` - number of inter-knot segments over the data range, at least 1
pub fn knot_sequence(x_min: f64, x_max: f64, degree: usize, segments: usize) -> Vec<f64> {
    debug_assert!(degree >= 1);
    debug_assert!(segments >= 1);
    debug_assert!(x_max > x_min);

    let h = (x_max - x_min) / segments as f64;
    let pad = (degree + 1) as f64 * h;
    let lo = x_min - pad;
    let hi = x_max + pad;
    let count = 2 * degree + segments + 1;

    let step = (hi - lo) / (count - 1) as f64;
    let mut knots: Vec<f64> = (0..count).map(|i| lo + i as f64 * step).collect();
    // Pin the endpoint against accumulated rounding.
    knots[count - 1] = hi;
    knots
}

/// Number of B-spline basis functions defined by a knot sequence and degree.
#[inline]
pub fn basis_count(knots: &[f64], degree: usize) -> usize {
    knots.len() - degree - 1
}

/// Evaluate the B-spline design matrix for a set of x values.
///
/// Returns an n x m matrix where n = `x.len()` and
/// m = `knots.len() - degree - 1`; row i holds the values of all m basis
/// functions at `x[i]` (Cox-de Boor recursion). Each row has at most
/// `degree + 1` non-zero entries, and rows for x inside the basic interval
/// of [`knot_sequence`] sum to 1.
///
/// Values of x with no containing knot interval (beyond the extended knot
/// range) produce an all-zero row.
pub fn design_matrix(x: &[f64], knots: &[f64], degree: usize) -> DMatrix<f64> {
    let order = degree + 1;
    let n = x.len();
    let m = basis_count(knots, degree);
    let last = knots.len() - 1;

    let mut design = DMatrix::zeros(n, m);

    for (i, &xi) in x.iter().enumerate() {
        // Degree-0 indicator over half-open intervals [t_j, t_{j+1}),
        // closed at the top of the final interval.
        let mut b = vec![0.0; last];
        for j in 0..last {
            let contains = if j + 1 == last {
                xi >= knots[j] && xi <= knots[j + 1]
            } else {
                xi >= knots[j] && xi < knots[j + 1]
            };
            if contains {
                b[j] = 1.0;
                break;
            }
        }

        for k in 2..=order {
            let mut next = vec![0.0; knots.len() - k];
            for j in 0..next.len() {
                let left_width = knots[j + k - 1] - knots[j];
                let right_width = knots[j + k] - knots[j + 1];

                let left = if left_width.abs() > NUMERICAL_EPS {
                    (xi - knots[j]) / left_width * b[j]
                } else {
                    0.0
                };
                let right = if right_width.abs() > NUMERICAL_EPS {
                    (knots[j + k] - xi) / right_width * b[j + 1]
                } else {
                    0.0
                };
                next[j] = left + right;
            }
            b = next;
        }

        for j in 0..m {
            design[(i, j)] = b[j];
        }
    }

    design
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_grid(lo: f64, hi: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    // ============== Knot sequence tests ==============

    #[test]
    fn test_knot_sequence_length() {
        let knots = knot_sequence(1.0, 54.0, 3, 120);
        assert_eq!(knots.len(), 127);
    }

    #[test]
    fn test_knot_sequence_strictly_increasing() {
        let knots = knot_sequence(1.0, 54.0, 3, 120);
        for w in knots.windows(2) {
            assert!(w[1] > w[0], "knots must be strictly increasing");
        }
    }

    #[test]
    fn test_knot_sequence_padding_outside_range() {
        let degree = 3;
        let knots = knot_sequence(1.0, 54.0, degree, 120);
        for j in 0..=degree {
            assert!(knots[j] < 1.0, "leading knot {} not below x_min", j);
            let k = knots.len() - 1 - j;
            assert!(knots[k] > 54.0, "trailing knot {} not above x_max", k);
        }
        // Exactly degree + 1 knots pad each side.
        assert!(knots[degree + 1] > 1.0);
        assert!(knots[knots.len() - 2 - degree] < 54.0);
    }

    #[test]
    fn test_knot_sequence_endpoints() {
        let knots = knot_sequence(0.0, 10.0, 2, 5);
        let h = 2.0;
        assert!((knots[0] - (0.0 - 3.0 * h)).abs() < NUMERICAL_EPS);
        assert!((knots[knots.len() - 1] - (10.0 + 3.0 * h)).abs() < NUMERICAL_EPS);
    }

    // ============== Design matrix tests ==============

    #[test]
    fn test_design_matrix_dimensions() {
        let x = uniform_grid(0.0, 1.0, 25);
        let knots = knot_sequence(0.0, 1.0, 3, 10);
        let b = design_matrix(&x, &knots, 3);
        assert_eq!(b.nrows(), 25);
        assert_eq!(b.ncols(), basis_count(&knots, 3));
        assert_eq!(b.ncols(), 13); // degree + segments
    }

    #[test]
    fn test_design_matrix_partition_of_unity() {
        let x = uniform_grid(0.0, 1.0, 50);
        let knots = knot_sequence(0.0, 1.0, 3, 8);
        let b = design_matrix(&x, &knots, 3);
        for i in 0..b.nrows() {
            let sum: f64 = (0..b.ncols()).map(|j| b[(i, j)]).sum();
            assert!(
                (sum - 1.0).abs() < 1e-10,
                "partition of unity failed at row {}: sum = {}",
                i,
                sum
            );
        }
    }

    #[test]
    fn test_design_matrix_local_support() {
        let degree = 3;
        let x = uniform_grid(2.0, 9.0, 40);
        let knots = knot_sequence(2.0, 9.0, degree, 12);
        let b = design_matrix(&x, &knots, degree);
        for i in 0..b.nrows() {
            let nonzero = (0..b.ncols()).filter(|&j| b[(i, j)].abs() > 1e-12).count();
            assert!(
                nonzero <= degree + 1,
                "row {} has {} non-zero entries",
                i,
                nonzero
            );
        }
    }

    #[test]
    fn test_design_matrix_non_negative() {
        let x = uniform_grid(0.0, 1.0, 30);
        let knots = knot_sequence(0.0, 1.0, 2, 6);
        let b = design_matrix(&x, &knots, 2);
        for i in 0..b.nrows() {
            for j in 0..b.ncols() {
                assert!(b[(i, j)] >= -1e-12, "negative basis value at ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_design_matrix_outside_knot_range_is_zero() {
        let knots = knot_sequence(0.0, 1.0, 3, 5);
        let far = knots[knots.len() - 1] + 1.0;
        let b = design_matrix(&[far], &knots, 3);
        for j in 0..b.ncols() {
            assert_eq!(b[(0, j)], 0.0);
        }
    }

    #[test]
    fn test_design_matrix_boundary_values_finite() {
        let knots = knot_sequence(1.0, 54.0, 3, 100);
        let b = design_matrix(&[1.0, 54.0], &knots, 3);
        for i in 0..b.nrows() {
            for j in 0..b.ncols() {
                assert!(b[(i, j)].is_finite());
            }
        }
    }
}
