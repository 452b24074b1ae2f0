use std::time::Duration;

use faer::MatRef;

use crate::{Ellipsoid, Warning};

/// How much work a fit took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDiagnostics {
    /// How many Khachiyan iterations ran. Always at least 1.
    pub iterations: usize,
    /// Wall-clock time spent iterating and extracting the ellipsoid,
    /// excluding building the lifted matrix.
    pub elapsed: Duration,
    /// Step error of the last iteration, which was at most the tolerance.
    pub final_error: f64,
}

/// Data from a successful fit.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub struct FitOutcome {
    /// The minimum volume enclosing ellipsoid.
    pub(crate) ellipsoid: Ellipsoid,
    /// Iterations and timing.
    pub(crate) diagnostics: FitDiagnostics,
    /// Anything suspicious about the input or the result.
    pub(crate) warnings: Vec<Warning>,
}

impl FitOutcome {
    /// The minimum volume enclosing ellipsoid.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Consume the outcome, keeping only the ellipsoid.
    pub fn into_ellipsoid(self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Center of the ellipsoid.
    pub fn centroid(&self) -> &[f64] {
        self.ellipsoid.centroid()
    }

    /// Semi-axis lengths.
    pub fn radii(&self) -> &[f64] {
        self.ellipsoid.radii()
    }

    /// Principal axis directions, one per column.
    pub fn pose(&self) -> MatRef<'_, f64> {
        self.ellipsoid.pose()
    }

    /// Iterations and timing.
    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    /// How many Khachiyan iterations ran?
    pub fn iterations(&self) -> usize {
        self.diagnostics.iterations
    }

    /// How long did iterating and extraction take?
    pub fn elapsed(&self) -> Duration {
        self.diagnostics.elapsed
    }

    /// Anything suspicious about the input or the result.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
