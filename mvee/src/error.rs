use faer::linalg::svd::SvdError;

/// Problems with the points or parameters handed to a fit.
/// These are detected before any iteration runs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum InputError {
    /// The point set has no rows or no columns.
    #[error("Cannot fit an ellipsoid to an empty point set")]
    EmptyPointSet,
    /// A d-dimensional ellipsoid needs at least d+1 points to have a full-rank covariance.
    #[error(
        "A {dimension}-dimensional ellipsoid needs more than {dimension} points, but only {points} were given"
    )]
    TooFewPoints {
        /// How many points were given.
        points: usize,
        /// How many coordinates each point has.
        dimension: usize,
    },
    /// Points must all have the same number of coordinates.
    #[error("Point {row} has {found} coordinates, but earlier points have {expected}")]
    RaggedRows {
        /// Which point had the wrong number of coordinates.
        row: usize,
        /// Number of coordinates in the first point.
        expected: usize,
        /// Number of coordinates in this point.
        found: usize,
    },
    /// Coordinates must be finite numbers.
    #[error("Coordinate {column} of point {row} is not a finite number")]
    NonFiniteCoordinate {
        /// Which point.
        row: usize,
        /// Which coordinate of that point.
        column: usize,
    },
    /// Tolerance must be a positive, finite number.
    #[error("Tolerance must be positive and finite, but was {0}")]
    InvalidTolerance(f64),
    /// Regularization must be a non-negative, finite number.
    #[error("Regularization must be non-negative and finite, but was {0}")]
    InvalidRegularization(f64),
    /// The iteration cap must allow at least one iteration.
    #[error("The maximum number of iterations must be at least 1")]
    ZeroIterationCap,
}

/// The linear algebra broke down, even after regularization.
/// Callers may retry with a larger regularization constant.
#[derive(thiserror::Error, Debug)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum NumericalError {
    /// A matrix which should be symmetric positive-definite wasn't,
    /// so it could not be inverted.
    #[error("The {stage} matrix is not positive-definite and cannot be inverted")]
    NotPositiveDefinite {
        /// Which matrix failed to factorize.
        stage: &'static str,
    },
    /// A computation produced NaN or infinity.
    #[error("Non-finite values appeared while computing the {stage}")]
    NonFinite {
        /// Which computation produced them.
        stage: &'static str,
    },
    /// Every leverage score is at most 1, so the weighted points have no spread
    /// and the Khachiyan step size is undefined.
    #[error("Leverage scores collapsed (max {max_leverage}); the points have no spread")]
    LeverageCollapsed {
        /// Largest leverage score in the last iteration.
        max_leverage: f64,
    },
    /// The regularization outweighs the spread of the points, so every leverage
    /// score sits well below d+1 and the weights can't move towards the optimum.
    #[error(
        "Regularization dominates the points (max leverage {max_leverage}); the points are too close together for it. Try a smaller regularization, or rescale the points"
    )]
    RegularizationDominates {
        /// Largest leverage score in the last iteration.
        max_leverage: f64,
    },
    /// The fitted ellipsoid leaves some points outside, by more than the
    /// tolerance allows. Happens when regularization biased the weights.
    #[error(
        "The fitted ellipsoid does not enclose every point (worst scaled distance {worst_distance}). Try a smaller regularization, or rescale the points"
    )]
    PointsOutside {
        /// Largest Mahalanobis distance from the centroid, where 1 is the boundary.
        worst_distance: f64,
    },
    /// Only square matrices can be decomposed here.
    #[error("Expected a square matrix, but got {rows}x{cols}")]
    NotSquare {
        /// Rows of the rejected matrix.
        rows: usize,
        /// Columns of the rejected matrix.
        cols: usize,
    },
    /// Faer: could not compute the SVD.
    #[error("Something went wrong doing SVD in faer")]
    FaerSvd(SvdError),
}

/// Any reason a fit could fail.
/// All of these are terminal for the fit that produced them; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum FitError {
    /// Bad points or parameters.
    #[error("{0}")]
    Input(#[from] InputError),
    /// Matrix inversion or decomposition failed.
    #[error("{0}")]
    Numerical(#[from] NumericalError),
    /// The iteration cap was reached before the weights settled.
    /// Consider loosening the tolerance or raising the cap.
    #[error(
        "Did not converge within {iterations} iterations (last step error was {last_error:e})"
    )]
    DidNotConverge {
        /// How many iterations ran.
        iterations: usize,
        /// Step error of the last iteration.
        last_error: f64,
    },
}

/// Errors from parsing the delimited-text point format.
#[derive(thiserror::Error, Debug)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum TextualError {
    /// A line could not be parsed as delimiter-separated numbers.
    #[error("Line {line}: {message}")]
    Syntax {
        /// 1-based line number in the input.
        line: usize,
        /// What the parser complained about.
        message: String,
    },
    /// The numbers parsed, but they don't form a valid point set.
    #[error("{0}")]
    Points(#[from] InputError),
}
