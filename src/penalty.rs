//! Finite-difference penalty operators.
//!
//! P-spline penalties are quadratic forms in difference matrices over the
//! coefficient index: order 3 discourages roughness, order 1 carries the
//! monotonicity penalty (re-weighted per iteration by the solver).

use nalgebra::DMatrix;

/// Build the order-`order` finite-difference matrix over `m` coefficients.
///
/// Order 0 is the m x m identity. Order 1 is the (m-1) x m matrix with rows
/// `[-1, 1]`, mapping a coefficient vector to its first differences. Higher
/// orders difference repeatedly, losing one row each time, so the result is
/// (m - order) x m.
///
/// Requires `m > order`; order-3 penalties therefore need at least 4 basis
/// functions (validated by the fit entry points).
pub fn difference_matrix(m: usize, order: usize) -> DMatrix<f64> {
    let mut d = DMatrix::<f64>::identity(m, m);
    for _ in 0..order {
        if d.nrows() < 2 {
            break;
        }
        let rows = d.nrows() - 1;
        let mut next = DMatrix::zeros(rows, m);
        for i in 0..rows {
            for j in 0..m {
                next[(i, j)] = d[(i + 1, j)] - d[(i, j)];
            }
        }
        d = next;
    }
    d
}
