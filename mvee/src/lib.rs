//! Minimum Volume Enclosing Ellipsoids.
//! Finds the smallest ellipsoid containing a set of points, using Khachiyan's algorithm.
//!
//! ```
//! use mvee::{Config, PointSet, fit};
//!
//! let points = PointSet::from_rows(&[[1.0, 1.0], [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]]).unwrap();
//! let outcome = fit(&points, Config::default()).unwrap();
//! for r in outcome.radii() {
//!     assert!((r - 2f64.sqrt()).abs() < 1e-6);
//! }
//! ```

pub use crate::config::{
    AUTO_PARALLEL_THRESHOLD, Config, DEFAULT_MAX_ITERATIONS, DEFAULT_REGULARIZATION,
    DEFAULT_TOLERANCE, Parallelism,
};
pub use crate::decomposition::{Decomposition, decompose};
pub use crate::ellipsoid::{EllipseParams, Ellipsoid};
pub use crate::engine::{IterationStats, fit, fit_with_observer};
pub use crate::error::{FitError, InputError, NumericalError, TextualError};
pub use crate::fit_outcome::{FitDiagnostics, FitOutcome};
pub use crate::points::PointSet;
pub use crate::textual::{Delimiter, parse_points};
pub use crate::warnings::{Warning, WarningContent};

/// Tolerance, regularization and threading.
mod config;
/// SVD of the shape matrix.
mod decomposition;
/// The fitted ellipsoid and what you can ask of it.
mod ellipsoid;
/// Khachiyan iteration and ellipsoid extraction.
mod engine;
mod error;
mod fit_outcome;
/// Input points.
mod points;
/// Parser for delimited text files of points.
pub mod textual;
/// Non-fatal problems with a fit.
mod warnings;
