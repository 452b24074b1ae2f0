//! Thin singular value decomposition of a square matrix.
use faer::{Mat, MatRef};

use crate::NumericalError;

/// `A = U·diag(singular_values)·Vᵀ`.
/// Singular values are in non-increasing order.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Non-negative, sorted largest first.
    pub singular_values: Vec<f64>,
    /// Left orthogonal factor.
    pub u: Mat<f64>,
    /// Right orthogonal factor.
    pub v: Mat<f64>,
}

/// Decompose a square matrix.
/// Fails if the matrix isn't square, or contains NaN or infinity
/// (which means something upstream already went wrong).
pub fn decompose(a: MatRef<'_, f64>) -> Result<Decomposition, NumericalError> {
    let (rows, cols) = (a.nrows(), a.ncols());
    if rows != cols {
        return Err(NumericalError::NotSquare { rows, cols });
    }
    let all_finite = (0..cols).all(|j| (0..rows).all(|i| a[(i, j)].is_finite()));
    if !all_finite {
        return Err(NumericalError::NonFinite {
            stage: "matrix to decompose",
        });
    }

    // SVD decomposes `A` into `A = UΣVᵀ`.
    let svd = a.svd().map_err(NumericalError::FaerSvd)?;
    let singular_values: Vec<f64> = svd.S().column_vector().iter().copied().collect();
    if singular_values.iter().any(|s| !s.is_finite()) {
        return Err(NumericalError::NonFinite {
            stage: "singular values",
        });
    }
    Ok(Decomposition {
        singular_values,
        u: svd.U().to_owned(),
        v: svd.V().to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(d: &Decomposition) -> Mat<f64> {
        let n = d.singular_values.len();
        Mat::from_fn(n, n, |i, j| {
            (0..n)
                .map(|k| d.u[(i, k)] * d.singular_values[k] * d.v[(j, k)])
                .sum()
        })
    }

    fn assert_orthogonal(m: &Mat<f64>) {
        let n = m.nrows();
        for i in 0..n {
            for j in 0..n {
                let dot: f64 = (0..n).map(|k| m[(k, i)] * m[(k, j)]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-12, "column {i}·{j} = {dot}");
            }
        }
    }

    #[test]
    fn decomposes_spd_matrix() {
        let a = Mat::from_fn(3, 3, |i, j| match (i, j) {
            (0, 0) => 4.0,
            (1, 1) => 3.0,
            (2, 2) => 1.0,
            (0, 1) | (1, 0) => 1.0,
            _ => 0.0,
        });
        let d = decompose(a.as_ref()).unwrap();
        assert_eq!(d.singular_values.len(), 3);
        assert!(d.singular_values.windows(2).all(|w| w[0] >= w[1]));
        assert!(d.singular_values.iter().all(|s| *s > 0.0));
        assert_orthogonal(&d.u);
        assert_orthogonal(&d.v);
        let back = reconstruct(&d);
        for i in 0..3 {
            for j in 0..3 {
                assert!((back[(i, j)] - a[(i, j)]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn diagonal_singular_values() {
        let a = Mat::from_fn(2, 2, |i, j| if i == j { [1.0, 4.0][i] } else { 0.0 });
        let d = decompose(a.as_ref()).unwrap();
        assert!((d.singular_values[0] - 4.0).abs() < 1e-14);
        assert!((d.singular_values[1] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn rejects_non_finite() {
        let a = Mat::from_fn(2, 2, |i, j| if i == j { f64::NAN } else { 0.0 });
        assert!(matches!(
            decompose(a.as_ref()),
            Err(NumericalError::NonFinite { .. })
        ));
    }

    #[test]
    fn rejects_non_square() {
        let a = Mat::<f64>::zeros(2, 3);
        assert!(matches!(
            decompose(a.as_ref()),
            Err(NumericalError::NotSquare { rows: 2, cols: 3 })
        ));
    }
}
