use crate::InputError;

/// Below this many points, leverage scores are computed on the calling thread.
pub const AUTO_PARALLEL_THRESHOLD: usize = 4096;

/// Default convergence tolerance on the weight update.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;
/// Default Levenberg-Marquardt damping added to the Gram matrix.
pub const DEFAULT_REGULARIZATION: f64 = 1e-8;
/// Default cap on Khachiyan iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// How the per-point leverage scores are computed each iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum Parallelism {
    /// Always on the calling thread.
    Sequential,
    /// Always split across rayon's global pool.
    Rayon,
    /// Use rayon once there are at least [`AUTO_PARALLEL_THRESHOLD`] points.
    #[default]
    Auto,
}

impl Parallelism {
    pub(crate) fn use_rayon(self, num_points: usize) -> bool {
        match self {
            Self::Sequential => false,
            Self::Rayon => true,
            Self::Auto => num_points >= AUTO_PARALLEL_THRESHOLD,
        }
    }
}

/// Parameters for a fit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct Config {
    /// Stop once the Euclidean norm of the weight update is at most this.
    pub tolerance: f64,
    /// Multiple of the identity added to the Gram matrix before inverting it.
    pub regularization: f64,
    /// Fail with [`crate::FitError::DidNotConverge`] after this many iterations.
    pub max_iterations: usize,
    /// Threading strategy for leverage scores.
    pub parallelism: Parallelism,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            regularization: DEFAULT_REGULARIZATION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallelism: Parallelism::default(),
        }
    }
}

impl Config {
    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the regularization constant.
    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the threading strategy.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Check every parameter is usable.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(InputError::InvalidTolerance(self.tolerance));
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(InputError::InvalidRegularization(self.regularization));
        }
        if self.max_iterations == 0 {
            return Err(InputError::ZeroIterationCap);
        }
        Ok(())
    }
}
