//! Khachiyan's algorithm for the minimum volume enclosing ellipsoid.
//!
//! Reference: L. G. Khachiyan, "Rounding of polytopes in the real number model
//! of computation", Mathematics of Operations Research 21(2), 1996.
use std::time::Instant;

use faer::{Mat, MatRef, Side, linalg::solvers::Solve};

use crate::{
    Config, Ellipsoid, FitDiagnostics, FitError, FitOutcome, InputError, NumericalError, PointSet,
    decomposition::{Decomposition, decompose},
    warnings,
};

mod khachiyan;
mod leverage;

/// What happened in one iteration of the weight update.
/// Passed to the observer given to [`fit_with_observer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Euclidean norm of this iteration's change to the weights.
    pub error: f64,
    /// Largest leverage score, before the update.
    pub max_leverage: f64,
    /// Which point had the largest leverage score (lowest index on ties).
    pub index: usize,
    /// How much weight moved onto that point.
    pub step_size: f64,
    /// Sum of the weights after the update. Should always be 1.
    pub weight_sum: f64,
    /// Smallest weight after the update. Should never be negative.
    pub min_weight: f64,
}

/// Fit the minimum volume enclosing ellipsoid of these points.
pub fn fit(points: &PointSet, config: Config) -> Result<FitOutcome, FitError> {
    fit_with_observer(points, config, |_| {})
}

/// Like [`fit`], but calls `observer` after every iteration.
pub fn fit_with_observer<F>(
    points: &PointSet,
    config: Config,
    mut observer: F,
) -> Result<FitOutcome, FitError>
where
    F: FnMut(&IterationStats),
{
    config.validate()?;
    let (num_points, dimension) = (points.num_points(), points.dimension());
    if num_points <= dimension {
        return Err(InputError::TooFewPoints {
            points: num_points,
            dimension,
        }
        .into());
    }
    let mut warnings = warnings::lint_input(points, &config);
    log::debug!("Fitting {num_points} points in {dimension} dimensions with {config:?}");

    let lifted = LiftedMatrix::new(points);
    let start = Instant::now();
    let converged = khachiyan::iterate(&lifted, &config, &mut observer).inspect_err(|e| {
        log::warn!("Khachiyan iteration stopped: {e}");
    })?;
    let ellipsoid = extract(points, &converged.weights).inspect_err(|e| {
        log::warn!("Could not extract ellipsoid from converged weights: {e}");
    })?;
    check_enclosure(&ellipsoid, points, &config).inspect_err(|e| {
        log::warn!("Rejecting fitted ellipsoid: {e}");
    })?;
    let elapsed = start.elapsed();

    log::debug!(
        "Converged after {} iterations in {elapsed:?}, radii = {:?}",
        converged.iterations,
        ellipsoid.radii()
    );
    warnings::lint_ellipsoid(&ellipsoid, &mut warnings);
    Ok(FitOutcome {
        ellipsoid,
        diagnostics: FitDiagnostics {
            iterations: converged.iterations,
            elapsed,
            final_error: converged.final_error,
        },
        warnings,
    })
}

/// The points in homogeneous coordinates: a (d+1)×n matrix whose columns are `[pᵢ; 1]`.
/// Stored column-major, so each lifted point is a contiguous slice.
pub(crate) struct LiftedMatrix {
    values: Vec<f64>,
    num_rows: usize,
}

impl LiftedMatrix {
    pub(crate) fn new(points: &PointSet) -> Self {
        let num_rows = points.dimension() + 1;
        let mut values = Vec::with_capacity(num_rows * points.num_points());
        for point in points.iter() {
            values.extend_from_slice(point);
            values.push(1.0);
        }
        Self { values, num_rows }
    }

    /// d+1
    pub(crate) fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// n
    pub(crate) fn num_points(&self) -> usize {
        self.values.len() / self.num_rows
    }

    pub(crate) fn column(&self, i: usize) -> &[f64] {
        let start = i * self.num_rows;
        &self.values[start..start + self.num_rows]
    }

    fn columns(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.num_rows)
    }

    /// `Q·diag(weights)·Qᵀ + λI`.
    pub(crate) fn gram(&self, weights: &[f64], regularization: f64) -> Mat<f64> {
        let k = self.num_rows;
        let mut gram = Mat::<f64>::zeros(k, k);
        // Accumulate the lower triangle, then mirror it.
        for (q, &w) in self.columns().zip(weights) {
            for a in 0..k {
                let wq = w * q[a];
                for b in 0..=a {
                    gram[(a, b)] += wq * q[b];
                }
            }
        }
        for a in 0..k {
            gram[(a, a)] += regularization;
            for b in 0..a {
                gram[(b, a)] = gram[(a, b)];
            }
        }
        gram
    }
}

/// Invert a symmetric positive-definite matrix via its Cholesky factorization.
pub(crate) fn invert_spd(
    m: MatRef<'_, f64>,
    stage: &'static str,
) -> Result<Mat<f64>, NumericalError> {
    let n = m.nrows();
    let llt = m
        .llt(Side::Lower)
        .map_err(|_| NumericalError::NotPositiveDefinite { stage })?;
    let inverse = llt.solve(Mat::<f64>::identity(n, n).as_ref());
    let all_finite = (0..n).all(|j| (0..n).all(|i| inverse[(i, j)].is_finite()));
    if !all_finite {
        return Err(NumericalError::NonFinite { stage });
    }
    Ok(inverse)
}

/// Turn the converged weights into an ellipsoid.
fn extract(points: &PointSet, weights: &[f64]) -> Result<Ellipsoid, NumericalError> {
    let d = points.dimension();

    // Centroid is the weighted mean, X·u.
    let mut centroid = vec![0.0; d];
    for (p, &w) in points.iter().zip(weights) {
        for (c, x) in centroid.iter_mut().zip(p) {
            *c += w * x;
        }
    }

    // Weighted covariance. Since the weights sum to 1, this equals
    // X·diag(u)·Xᵀ - (Xu)(Xu)ᵀ, but centering first loses less precision
    // when the points are far from the origin.
    let mut covariance = Mat::<f64>::zeros(d, d);
    let mut offset = vec![0.0; d];
    for (p, &w) in points.iter().zip(weights) {
        for ((o, x), c) in offset.iter_mut().zip(p).zip(&centroid) {
            *o = x - c;
        }
        for a in 0..d {
            for b in 0..d {
                covariance[(a, b)] += w * offset[a] * offset[b];
            }
        }
    }

    // E = (1/d)·covariance⁻¹
    let covariance_inv = invert_spd(covariance.as_ref(), "weighted covariance")?;
    let scale = 1.0 / d as f64;
    let shape = Mat::from_fn(d, d, |a, b| scale * covariance_inv[(a, b)]);

    let Decomposition {
        singular_values, v, ..
    } = decompose(shape.as_ref())?;
    let radii: Vec<f64> = singular_values
        .iter()
        .map(|&s| 1.0 / libm::sqrt(s))
        .collect();
    if radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
        return Err(NumericalError::NonFinite { stage: "radii" });
    }
    Ok(Ellipsoid {
        centroid,
        radii,
        pose: v,
    })
}

/// The stopping rule keeps every point within about `(d+1)·tolerance` of the
/// boundary. Regularization biases the weights, so that has to be checked.
fn check_enclosure(
    ellipsoid: &Ellipsoid,
    points: &PointSet,
    config: &Config,
) -> Result<(), NumericalError> {
    let allowed = 2.0 * (points.dimension() + 1) as f64 * config.tolerance;
    let worst_distance = points
        .iter()
        .map(|p| ellipsoid.mahalanobis_distance(p))
        .fold(0.0, libm::fmax);
    if worst_distance > 1.0 + allowed {
        return Err(NumericalError::PointsOutside { worst_distance });
    }
    Ok(())
}
